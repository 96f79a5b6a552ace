//! CLI command implementations for the AgriGuide dashboard.
//!
//! Provides subcommand handlers for:
//! - `agriguide predict --nitrogen .. --rainfall ..` — one crop recommendation
//! - `agriguide chat [MESSAGE...]` — ask AgriBot, interactively without a message
//! - `agriguide language [CODE]` — show or persist the preferred language
//! - `agriguide languages [--remote]` — list supported languages
//! - `agriguide translate --to CODE TEXT...` — translate through the backend
//! - `agriguide dashboard` — interactive session over every dashboard feature
//! - `agriguide config show|init|set|reset` — configuration management

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::api::{
    BackendClient, HttpTransport, LanguagesResponse, PredictionRequest, TranslateRequest,
    TranslateResponse,
};
use crate::config::{self, DashboardConfig};
use crate::dashboard::{Completion, Dashboard};
use crate::diagnostics::Diagnostics;
use crate::dom::page::{self, PREDICTION_FIELDS, PREDICTION_RESULT, SECTIONS};
use crate::languages;
use crate::render;
use crate::storage::FileStore;

/// The dashboard as the CLI runs it: file-backed preferences, real HTTP.
pub type CliDashboard = Dashboard<FileStore, HttpTransport>;

/// Build and initialize a dashboard from resolved configuration.
pub fn build_dashboard(cfg: &DashboardConfig) -> Result<CliDashboard> {
    let preferences = cfg
        .storage
        .preferences_path()
        .context("could not determine home directory for preferences")?;
    let transport = HttpTransport::new(
        &cfg.server.base_url,
        Duration::from_millis(cfg.server.timeout_ms),
        cfg.session.cookies.clone(),
    );
    let client = BackendClient::new(transport, cfg.session.cookies.clone())
        .with_csrf_cookie(cfg.session.csrf_cookie_name.clone());

    let mut dashboard = Dashboard::new(page::dashboard_page(), FileStore::new(preferences), client)
        .with_diagnostics(diagnostics_for(cfg));
    dashboard.init();
    Ok(dashboard)
}

/// Diagnostics sink for `cfg`: `~/.agriguide/` when logging is enabled.
pub fn diagnostics_for(cfg: &DashboardConfig) -> Diagnostics {
    match config::agriguide_dir() {
        Some(dir) if cfg.logging.enabled => Diagnostics::in_dir(dir),
        _ => Diagnostics::disabled(),
    }
}

// ---------------------------------------------------------------------------
// agriguide predict
// ---------------------------------------------------------------------------

/// Fill the prediction form, submit it and print the result panel.
pub fn run_predict(request: &PredictionRequest) -> Result<()> {
    let mut dashboard = build_dashboard(&config::load())?;
    for field in PREDICTION_FIELDS {
        if let Some(value) = request.field(field) {
            dashboard.set_prediction_input(field, value);
        }
    }

    println!("{}", crate::dashboard::LOADING_TEXT.dimmed());
    dashboard.submit_prediction();
    print_prediction_result(&dashboard);
    Ok(())
}

fn print_prediction_result(dashboard: &CliDashboard) {
    if let Some(region) = dashboard.document().get_element_by_id(PREDICTION_RESULT) {
        print!("{}", render::render_result(dashboard.document(), region));
    }
}

// ---------------------------------------------------------------------------
// agriguide chat
// ---------------------------------------------------------------------------

/// Send one message, or start an interactive chat when `message` is empty.
pub fn run_chat(message: &str) -> Result<()> {
    let mut dashboard = build_dashboard(&config::load())?;
    if message.trim().is_empty() {
        return chat_session(&mut dashboard);
    }
    send_and_print(&mut dashboard, message);
    Ok(())
}

fn chat_session(dashboard: &mut CliDashboard) -> Result<()> {
    println!("{}", "AgriBot".bold().cyan());
    println!(
        "{}",
        format!(
            "Language: {}. Type /clear to reset, /quit to leave.",
            dashboard.current_language()
        )
        .dimmed()
    );

    let stdin = io::stdin();
    loop {
        prompt("you> ")?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                dashboard.clear_transcript();
                println!("{}", "Transcript cleared.".dimmed());
            }
            text => send_and_print(dashboard, text),
        }
    }
    Ok(())
}

/// Submit `text` and print the transcript entries it produced.
fn send_and_print(dashboard: &mut CliDashboard, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    let before = dashboard.transcript().len();
    println!("{}", render::render_typing());
    dashboard.send_chat_message(text);
    for message in dashboard.transcript().iter().skip(before) {
        println!("{}", render::render_message(message));
    }
}

// ---------------------------------------------------------------------------
// agriguide language / languages
// ---------------------------------------------------------------------------

/// Show the preferred language, or persist a new one.
pub fn run_language(code: Option<&str>) -> Result<()> {
    let mut dashboard = build_dashboard(&config::load())?;
    let Some(code) = code else {
        let current = dashboard.current_language();
        let name = languages::name_for(&current).unwrap_or("unknown");
        println!("{} {} ({})", "Language:".bold(), current, name);
        return Ok(());
    };

    if languages::name_for(code).is_none() {
        println!(
            "{} '{}' is not a supported language code; saving it anyway.",
            "!".yellow().bold(),
            code
        );
    }
    dashboard.change_language(code);
    println!("{} Language set to {}", "✓".green().bold(), code.bold());
    Ok(())
}

/// List supported languages, from the backend when `remote` is set.
pub fn run_languages(remote: bool) -> Result<()> {
    let mut list: Vec<(String, String)> = languages::SUPPORTED
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect();

    if remote {
        let dashboard = build_dashboard(&config::load())?;
        match dashboard.client().languages() {
            Ok(LanguagesResponse::Languages(map)) => list = map.into_iter().collect(),
            Ok(LanguagesResponse::Failure { error }) => warn_fallback(&error),
            Err(e) => warn_fallback(&e.to_string()),
        }
    }

    println!("{}", "Supported Languages".bold().cyan());
    println!("{}", "=".repeat(40));
    for (code, name) in &list {
        println!("  {} {}", format!("{code:<8}").bold(), name);
    }
    Ok(())
}

fn warn_fallback(reason: &str) {
    println!(
        "{} could not fetch languages ({}); showing built-in list.",
        "!".yellow().bold(),
        reason
    );
}

// ---------------------------------------------------------------------------
// agriguide translate
// ---------------------------------------------------------------------------

/// Translate `text` into `to` through the backend.
pub fn run_translate(text: &str, to: &str, from: &str) -> Result<()> {
    let dashboard = build_dashboard(&config::load())?;
    let request = TranslateRequest {
        text: text.to_string(),
        target_language: to.to_string(),
        source_language: from.to_string(),
    };
    match dashboard.client().translate(&request)? {
        TranslateResponse::Translated(t) => {
            println!(
                "{}",
                format!("{} → {}", t.source_language, t.target_language).dimmed()
            );
            println!("{}", t.translated_text);
            Ok(())
        }
        TranslateResponse::Failure { error } => bail!("translation failed: {error}"),
    }
}

// ---------------------------------------------------------------------------
// agriguide dashboard
// ---------------------------------------------------------------------------

/// One line typed into the interactive dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Nav(String),
    Lang(String),
    Set { field: String, value: String },
    Predict,
    Chat(String),
    Clear,
    Show,
    Help,
    Quit,
    Nothing,
}

/// Parse a dashboard session line.
pub fn parse_session_command(line: &str) -> Result<SessionCommand> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "" => SessionCommand::Nothing,
        "nav" | "go" => {
            if rest.is_empty() {
                bail!("usage: nav <section>");
            }
            SessionCommand::Nav(rest.to_string())
        }
        "lang" | "language" => {
            if rest.is_empty() {
                bail!("usage: lang <code>");
            }
            SessionCommand::Lang(rest.to_string())
        }
        "set" => {
            let Some((field, value)) = rest.split_once(char::is_whitespace) else {
                bail!("usage: set <field> <value>");
            };
            // Values are sent as typed, so only the separating space is dropped.
            SessionCommand::Set {
                field: field.to_string(),
                value: value.trim_start().to_string(),
            }
        }
        "predict" => SessionCommand::Predict,
        "chat" | "say" => SessionCommand::Chat(rest.to_string()),
        "clear" => SessionCommand::Clear,
        "show" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(command)
}

/// Run the interactive dashboard until `quit` or end of input.
pub fn run_dashboard() -> Result<()> {
    let mut dashboard = build_dashboard(&config::load())?;
    println!("{}", "AgriGuide Dashboard".bold().cyan());
    println!("{}", "=".repeat(50));
    print_session_help();
    show_section(&dashboard);

    let stdin = io::stdin();
    loop {
        prompt("agriguide> ")?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let command = match parse_session_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{} {}", "✗".red().bold(), e);
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        apply_session_command(&mut dashboard, command);
    }
    Ok(())
}

fn apply_session_command(dashboard: &mut CliDashboard, command: SessionCommand) {
    match command {
        SessionCommand::Nav(target) => match dashboard.navigate_to(&target) {
            Ok(_) => show_section(dashboard),
            Err(e) => println!("{} {}", "✗".red().bold(), e),
        },
        SessionCommand::Lang(code) => {
            if dashboard.change_language(&code) == Completion::Applied {
                println!("{} Language set to {}", "✓".green().bold(), code.bold());
            }
        }
        SessionCommand::Set { field, value } => {
            if !dashboard.set_prediction_input(&field, &value) {
                println!(
                    "{} unknown field '{}'; expected one of: {}",
                    "✗".red().bold(),
                    field,
                    PREDICTION_FIELDS.join(", ")
                );
            }
        }
        SessionCommand::Predict => {
            println!("{}", crate::dashboard::LOADING_TEXT.dimmed());
            dashboard.submit_prediction();
            print_prediction_result(dashboard);
        }
        SessionCommand::Chat(text) => send_and_print(dashboard, &text),
        SessionCommand::Clear => {
            dashboard.clear_transcript();
            println!("{}", "Transcript cleared.".dimmed());
        }
        SessionCommand::Show => show_section(dashboard),
        SessionCommand::Help => print_session_help(),
        SessionCommand::Quit | SessionCommand::Nothing => {}
    }
}

fn show_section(dashboard: &CliDashboard) {
    println!();
    println!("{}", render::render_nav(&dashboard.nav_entries()));
    println!();
    match dashboard.active_section().as_deref() {
        Some("crop-prediction") => {
            let doc = dashboard.document();
            for field in PREDICTION_FIELDS {
                let value = doc
                    .get_element_by_id(field)
                    .map(|input| doc.value(input))
                    .unwrap_or_default();
                println!("  {} {}", format!("{field:<12}").bold(), value);
            }
            print_prediction_result(dashboard);
        }
        Some("chatbot") => {
            for message in dashboard.transcript() {
                println!("{}", render::render_message(&message));
            }
        }
        Some(_) => println!(
            "  {} {}",
            "Language:".bold(),
            dashboard.current_language()
        ),
        None => {}
    }
    println!();
}

fn print_session_help() {
    let sections: Vec<&str> = SECTIONS.iter().map(|(id, _)| *id).collect();
    println!("{}", "Commands:".bold());
    println!("  nav <{}>", sections.join("|"));
    println!("  lang <code>            change language");
    println!("  set <field> <value>    fill a prediction input");
    println!("  predict                submit the prediction form");
    println!("  chat <message>         ask AgriBot");
    println!("  clear                  clear the chat transcript");
    println!("  show | help | quit");
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text.bold());
    io::stdout().flush().context("failed to flush stdout")
}

// ---------------------------------------------------------------------------
// agriguide config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective AgriGuide Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.agriguide/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.agriguide/config.toml (not found)".dimmed()
        );
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "AGRIGUIDE_* environment variables".dimmed()
    );
    Ok(())
}

/// Initialize a default config file at `~/.agriguide/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the user config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation_and_language() {
        assert_eq!(
            parse_session_command("nav chatbot").unwrap(),
            SessionCommand::Nav("chatbot".into())
        );
        assert_eq!(
            parse_session_command("  lang ta ").unwrap(),
            SessionCommand::Lang("ta".into())
        );
        assert!(parse_session_command("nav").is_err());
    }

    #[test]
    fn set_keeps_value_text() {
        assert_eq!(
            parse_session_command("set ph 6.5").unwrap(),
            SessionCommand::Set {
                field: "ph".into(),
                value: "6.5".into()
            }
        );
        assert_eq!(
            parse_session_command("set rainfall  about 200").unwrap(),
            SessionCommand::Set {
                field: "rainfall".into(),
                value: "about 200".into()
            }
        );
        assert!(parse_session_command("set ph").is_err());
    }

    #[test]
    fn chat_takes_rest_of_line() {
        assert_eq!(
            parse_session_command("chat when should I sow wheat?").unwrap(),
            SessionCommand::Chat("when should I sow wheat?".into())
        );
        assert_eq!(
            parse_session_command("chat").unwrap(),
            SessionCommand::Chat(String::new())
        );
    }

    #[test]
    fn bare_verbs_and_blank_lines() {
        assert_eq!(parse_session_command("").unwrap(), SessionCommand::Nothing);
        assert_eq!(parse_session_command("predict").unwrap(), SessionCommand::Predict);
        assert_eq!(parse_session_command("exit").unwrap(), SessionCommand::Quit);
        assert_eq!(parse_session_command("?").unwrap(), SessionCommand::Help);
        assert!(parse_session_command("weather").is_err());
    }

    #[test]
    fn diagnostics_follow_logging_switch() {
        let mut cfg = DashboardConfig::default();
        cfg.logging.enabled = false;
        assert!(!diagnostics_for(&cfg).is_enabled());
    }
}
