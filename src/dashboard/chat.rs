use std::fmt;

use chrono::Local;

use crate::api::{ApiError, CHATBOT_ENDPOINT, ChatRequest, ChatResponse, Transport};
use crate::dom::page::{CHAT_FORM, CHAT_MESSAGES, MESSAGE_INPUT};
use crate::dom::{Element, NodeId};
use crate::storage::PreferenceStore;

use super::tracker::Ticket;
use super::{Completion, Dashboard, error_label};

const TYPING_CLASS: &str = "bot-typing";
const MESSAGE_CLASS: &str = "message-container";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "bot" => Some(Self::Bot),
            _ => None,
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Styling of a bubble: normal text or an inline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Normal,
    Error,
}

/// One rendered transcript entry, read back from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// Local wall-clock time the bubble was added (`HH:MM:SS`).
    pub timestamp: String,
    pub kind: MessageKind,
}

/// A chat submission waiting for the bot, tied to its own typing placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChat {
    ticket: Ticket,
    placeholder: NodeId,
    request: ChatRequest,
}

impl PendingChat {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn placeholder(&self) -> NodeId {
        self.placeholder
    }

    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

impl<S: PreferenceStore, T: Transport> Dashboard<S, T> {
    pub(super) fn init_chat(&mut self) -> bool {
        [CHAT_FORM, CHAT_MESSAGES, MESSAGE_INPUT]
            .iter()
            .all(|id| self.document.get_element_by_id(id).is_some())
    }

    /// Post the user's message into the transcript and show the typing
    /// placeholder. Returns `None` (and changes nothing) for a blank message.
    pub fn begin_chat(&mut self) -> Option<PendingChat> {
        if !self.features.chat {
            return None;
        }
        let input = self.document.get_element_by_id(MESSAGE_INPUT)?;
        let transcript = self.document.get_element_by_id(CHAT_MESSAGES)?;

        let message = self.document.value(input).trim().to_string();
        if message.is_empty() {
            return None;
        }

        self.add_message(Sender::User, &message, MessageKind::Normal);
        self.document.set_value(input, "");

        let placeholder = self.document.append(
            transcript,
            Element::new("div").with_class(&format!("{MESSAGE_CLASS} {TYPING_CLASS}")),
        );
        let bubble = self.document.append(
            placeholder,
            Element::new("div").with_class("message bot-message"),
        );
        let dots = self
            .document
            .append(bubble, Element::new("div").with_class("typing-indicator"));
        for _ in 0..3 {
            self.document.append(dots, Element::new("span"));
        }
        self.document.scroll_to_bottom(transcript);

        let ticket = self.chat.issue();
        let request = ChatRequest {
            message,
            language: self.current_language(),
        };
        Some(PendingChat {
            ticket,
            placeholder,
            request,
        })
    }

    /// Remove `pending`'s placeholder and append the bot's answer.
    ///
    /// Every live submission gets its answer; only cancelled ones (see
    /// [`clear_transcript`](Self::clear_transcript)) are discarded.
    pub fn complete_chat(
        &mut self,
        pending: PendingChat,
        outcome: Result<ChatResponse, ApiError>,
    ) -> Completion {
        self.document.remove(pending.placeholder);
        if !self.chat.is_live(pending.ticket) {
            return Completion::Discarded;
        }
        self.chat.settle(pending.ticket);

        match outcome {
            Ok(ChatResponse::Reply { response }) => {
                self.add_message(Sender::Bot, &response, MessageKind::Normal)
            }
            Ok(ChatResponse::Failure { error }) => self.add_message(
                Sender::Bot,
                &format!("Sorry, I encountered an error: {error}"),
                MessageKind::Error,
            ),
            Err(ApiError::Decode(e)) => self.add_message(
                Sender::Bot,
                &format!("Sorry, I encountered an error: {e}"),
                MessageKind::Error,
            ),
            Err(e) => self.add_message(
                Sender::Bot,
                &format!("Sorry, I couldn't process your request: {e}"),
                MessageKind::Error,
            ),
        }
        Completion::Applied
    }

    /// Submit the chat form and wait for the bot.
    pub fn submit_chat(&mut self) -> Completion {
        let Some(pending) = self.begin_chat() else {
            return Completion::Skipped;
        };
        let (outcome, latency_ms) = self.timed(|client| client.chat(pending.request()));
        let label = match &outcome {
            Ok(ChatResponse::Reply { .. }) => "ok",
            Ok(ChatResponse::Failure { .. }) => "server-error",
            Err(e) => error_label(e),
        };
        self.diagnostics
            .record_request(CHATBOT_ENDPOINT, label, latency_ms);
        self.complete_chat(pending, outcome)
    }

    /// Type `text` into the message box and submit it.
    pub fn send_chat_message(&mut self, text: &str) -> Completion {
        if let Some(input) = self.document.get_element_by_id(MESSAGE_INPUT) {
            self.document.set_value(input, text);
        }
        self.submit_chat()
    }

    /// Empty the transcript and cancel every chat request still in flight.
    pub fn clear_transcript(&mut self) {
        self.chat.cancel_all();
        if let Some(transcript) = self.document.get_element_by_id(CHAT_MESSAGES) {
            self.document.clear_children(transcript);
        }
    }

    /// Rendered messages in order, excluding typing placeholders.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        let Some(transcript) = self.document.get_element_by_id(CHAT_MESSAGES) else {
            return Vec::new();
        };
        self.document
            .children(transcript)
            .iter()
            .filter_map(|&node| self.read_message(node))
            .collect()
    }

    /// Number of typing placeholders currently shown.
    pub fn typing_placeholders(&self) -> usize {
        self.document.query_class(TYPING_CLASS).len()
    }

    fn read_message(&self, node: NodeId) -> Option<ChatMessage> {
        let container = self.document.element(node)?;
        let sender = Sender::parse(container.data("sender")?)?;
        let kind = if container.data("kind") == Some("error") {
            MessageKind::Error
        } else {
            MessageKind::Normal
        };
        let text = self
            .document
            .descendants(node)
            .into_iter()
            .filter_map(|n| self.document.element(n))
            .find(|e| e.tag() == "p")
            .map(|e| e.text().to_string())
            .unwrap_or_default();
        Some(ChatMessage {
            sender,
            text,
            timestamp: container.data("time").unwrap_or_default().to_string(),
            kind,
        })
    }

    fn add_message(&mut self, sender: Sender, text: &str, kind: MessageKind) {
        let Some(transcript) = self.document.get_element_by_id(CHAT_MESSAGES) else {
            return;
        };
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        let kind_name = match kind {
            MessageKind::Normal => "normal",
            MessageKind::Error => "error",
        };

        let container = self.document.append(
            transcript,
            Element::new("div")
                .with_class(&format!("{MESSAGE_CLASS} {sender}-message-container"))
                .with_attr("data-sender", sender.as_str())
                .with_attr("data-kind", kind_name)
                .with_attr("data-time", timestamp.clone()),
        );
        let mut bubble_class = format!("message {sender}-message");
        if kind == MessageKind::Error {
            bubble_class.push_str(" error-message");
        }
        let bubble = self
            .document
            .append(container, Element::new("div").with_class(&bubble_class));
        self.document
            .append(bubble, Element::new("p").with_text(text));
        self.document.append(
            bubble,
            Element::new("small")
                .with_class("message-time")
                .with_text(timestamp),
        );
        self.document.scroll_to_bottom(transcript);
    }
}
