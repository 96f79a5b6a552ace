/// Configuration schema and defaults for the agriguide client.
///
/// Defines the TOML-serializable configuration with sections `[server]`,
/// `[session]`, `[storage]` and `[logging]`. Every field has a built-in
/// default; users only set what they want to override.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default backend address (Django dev server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration, mapping to `~/.agriguide/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL the `/api/...` paths are appended to.
    pub base_url: String,
    /// Request timeout in milliseconds. `0` disables the timeout.
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// [session]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie string copied from a logged-in browser session,
    /// e.g. `"sessionid=...; csrftoken=..."`.
    pub cookies: String,
    /// Name of the cookie holding the anti-forgery token.
    pub csrf_cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookies: String::new(),
            csrf_cookie_name: crate::cookies::CSRF_COOKIE.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [storage]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Preferences file. Empty means `~/.agriguide/preferences.toml`.
    pub preferences_file: String,
}

impl StorageConfig {
    /// Resolve the preferences file, falling back to the default location.
    pub fn preferences_path(&self) -> Option<PathBuf> {
        if self.preferences_file.is_empty() {
            super::agriguide_dir().map(|d| d.join("preferences.toml"))
        } else {
            Some(PathBuf::from(&self.preferences_file))
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write `dashboard.log` and `requests.jsonl` under `~/.agriguide/`.
    pub enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl DashboardConfig {
    /// Annotated default config written by `agriguide config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# agriguide configuration
# Environment variables (AGRIGUIDE_*) override values in this file.

[server]
# Backend base URL (AGRIGUIDE_BASE_URL)
base_url = "{DEFAULT_BASE_URL}"
# Request timeout in milliseconds, 0 = no timeout (AGRIGUIDE_TIMEOUT_MS)
timeout_ms = {DEFAULT_TIMEOUT_MS}

[session]
# Cookie string from a logged-in session (AGRIGUIDE_COOKIES)
cookies = ""
# Cookie carrying the anti-forgery token
csrf_cookie_name = "csrftoken"

[storage]
# Preferences file; empty = ~/.agriguide/preferences.toml
preferences_file = ""

[logging]
# Diagnostic logs under ~/.agriguide/ (AGRIGUIDE_LOGGING)
enabled = true
"#
        )
    }
}
