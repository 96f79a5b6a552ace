//! Best-effort diagnostic logs under `~/.agriguide/`.
//!
//! - `dashboard.log` — one timestamped line per notable controller event
//! - `requests.jsonl` — one JSON record per backend exchange
//!
//! Write failures are swallowed; logging must never break a user action.

use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A single backend exchange, as recorded in `requests.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub timestamp: String,
    pub endpoint: String,
    /// `"ok"`, `"server-error"`, `"transport-error"`, `"malformed"` or `"discarded"`.
    pub outcome: String,
    pub latency_ms: u64,
}

/// Sink for diagnostic lines and request records.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    dir: Option<PathBuf>,
}

impl Diagnostics {
    /// Log into the given directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// A sink that drops everything.
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Append a timestamped line to `dashboard.log`.
    pub fn log(&self, message: &str) {
        let Some(path) = self.file("dashboard.log") else {
            return;
        };
        let _ = append_line(&path, &format!("{} {}", Utc::now().to_rfc3339(), message));
    }

    /// Append a request record to `requests.jsonl`.
    pub fn record_request(&self, endpoint: &str, outcome: &str, latency_ms: u64) {
        let Some(path) = self.file("requests.jsonl") else {
            return;
        };
        let record = RequestRecord {
            timestamp: Utc::now().to_rfc3339(),
            endpoint: endpoint.to_string(),
            outcome: outcome.to_string(),
            latency_ms,
        };
        if let Ok(json) = serde_json::to_string(&record) {
            let _ = append_line(&path, &json);
        }
    }

    fn file(&self, name: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.join(name))
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}
