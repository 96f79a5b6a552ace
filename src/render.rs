//! Terminal rendering of the dashboard document.
//!
//! Maps the document's structural classes onto colored terminal text:
//! `alert-success` / `alert-danger` panels, chat bubbles by sender, the
//! typing placeholder, and the nav bar with the active section highlighted.

use colored::Colorize;

use crate::dashboard::{ChatMessage, MessageKind, Sender};
use crate::dom::{Document, NodeId};

/// Render an alert panel or loading state held in `region`.
pub fn render_result(doc: &Document, region: NodeId) -> String {
    let mut out = String::new();
    for &child in doc.children(region) {
        let Some(element) = doc.element(child) else {
            continue;
        };
        let heading = doc
            .descendants(child)
            .into_iter()
            .filter_map(|n| doc.element(n))
            .find(|e| e.has_class("alert-heading"))
            .map(|e| e.text().to_string());
        let body: Vec<String> = doc
            .descendants(child)
            .into_iter()
            .filter_map(|n| doc.element(n))
            .filter(|e| e.tag() == "p")
            .map(|e| e.text().to_string())
            .collect();

        if element.has_class("alert-success") {
            if let Some(h) = heading {
                out.push_str(&format!("{}\n", h.bold().green()));
            }
            for line in body {
                out.push_str(&format!("  {line}\n"));
            }
        } else if element.has_class("alert-danger") {
            if let Some(h) = heading {
                out.push_str(&format!("{}\n", h.bold().red()));
            }
            for line in body {
                out.push_str(&format!("  {}\n", line.red()));
            }
        } else {
            for line in body {
                out.push_str(&format!("{}\n", line.dimmed()));
            }
        }
    }
    out
}

/// Render one transcript entry.
pub fn render_message(message: &ChatMessage) -> String {
    let stamp = format!("[{}]", message.timestamp).dimmed();
    match (message.sender, message.kind) {
        (Sender::User, _) => format!("{stamp} {} {}", "you:".bold().cyan(), message.text),
        (Sender::Bot, MessageKind::Normal) => {
            format!("{stamp} {} {}", "bot:".bold().green(), message.text)
        }
        (Sender::Bot, MessageKind::Error) => {
            format!("{stamp} {} {}", "bot:".bold().red(), message.text.red())
        }
    }
}

/// Render the typing placeholder line.
pub fn render_typing() -> String {
    format!("{}", "bot is typing...".dimmed().italic())
}

/// Render the nav bar; the active entry is bracketed and highlighted.
pub fn render_nav(entries: &[(String, String, bool)]) -> String {
    entries
        .iter()
        .map(|(id, label, active)| {
            if *active {
                format!("[{}]", label.bold().cyan())
            } else {
                format!(" {} ({id}) ", label.dimmed())
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn success_panel_shows_heading_and_body() {
        plain();
        let mut doc = Document::new();
        let root = doc.root();
        let region = doc.append(root, Element::new("div"));
        let panel = doc.append(region, Element::new("div").with_class("alert alert-success"));
        doc.append(
            panel,
            Element::new("h4")
                .with_class("alert-heading")
                .with_text("Recommended Crop: Rice"),
        );
        doc.append(panel, Element::new("p").with_text("Needs water"));

        let out = render_result(&doc, region);
        assert_eq!(out, "Recommended Crop: Rice\n  Needs water\n");
    }

    #[test]
    fn user_and_bot_messages_are_labelled() {
        plain();
        let user = ChatMessage {
            sender: Sender::User,
            text: "hi".into(),
            timestamp: "10:00:00".into(),
            kind: MessageKind::Normal,
        };
        let bot = ChatMessage {
            sender: Sender::Bot,
            text: "hello".into(),
            timestamp: "10:00:01".into(),
            kind: MessageKind::Error,
        };
        assert_eq!(render_message(&user), "[10:00:00] you: hi");
        assert_eq!(render_message(&bot), "[10:00:01] bot: hello");
    }

    #[test]
    fn nav_marks_active_entry() {
        plain();
        let entries = vec![
            ("overview".to_string(), "Overview".to_string(), false),
            ("chatbot".to_string(), "AgriBot".to_string(), true),
        ];
        let out = render_nav(&entries);
        assert!(out.contains("[AgriBot]"));
        assert!(out.contains("Overview (overview)"));
    }
}
