/// Configuration system for agriguide.
///
/// Layers, later ones winning at the field level:
///
/// 1. **Built-in defaults** — [`schema::DashboardConfig::default()`]
/// 2. **User config** — `~/.agriguide/config.toml`
/// 3. **Environment variables** — `AGRIGUIDE_*` overrides
///
/// # Usage
///
/// ```rust,ignore
/// use agriguide::config;
///
/// let cfg = config::load();
/// let url = cfg.server.base_url;
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::DashboardConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration from the default location.
pub fn load() -> DashboardConfig {
    load_from(global_config_path().as_deref())
}

/// Load defaults, then `path` (if given and readable), then env overrides.
///
/// A malformed file is ignored so that a typo never locks the user out of
/// the dashboard; `config show` reveals what was actually applied.
pub fn load_from(path: Option<&Path>) -> DashboardConfig {
    let mut config = path.and_then(load_toml_file).unwrap_or_default();
    apply_env_overrides(&mut config);
    config
}

fn load_toml_file(path: &Path) -> Option<DashboardConfig> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.agriguide`, home of config, preferences and logs.
pub fn agriguide_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".agriguide"))
}

fn global_config_path() -> Option<PathBuf> {
    agriguide_dir().map(|dir| dir.join("config.toml"))
}

/// Path of the user config file, for display.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// - `AGRIGUIDE_BASE_URL` — backend base URL
/// - `AGRIGUIDE_TIMEOUT_MS` — request timeout, `0` for none
/// - `AGRIGUIDE_COOKIES` — session cookie string
/// - `AGRIGUIDE_LOGGING` — diagnostic logs on/off
fn apply_env_overrides(config: &mut DashboardConfig) {
    if let Ok(val) = std::env::var("AGRIGUIDE_BASE_URL")
        && !val.is_empty()
    {
        config.server.base_url = val;
    }
    if let Ok(val) = std::env::var("AGRIGUIDE_TIMEOUT_MS")
        && let Ok(ms) = val.trim().parse::<u64>()
    {
        config.server.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("AGRIGUIDE_COOKIES") {
        config.session.cookies = val;
    }
    if let Ok(val) = std::env::var("AGRIGUIDE_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.agriguide/config.toml`.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    init_config_at(&path, force)?;
    Ok(path)
}

/// Write the annotated default config to `path`.
///
/// Fails if the file already exists, unless `force` is set.
pub fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, DashboardConfig::default_toml()).context("failed to write config file")?;
    Ok(())
}

/// Set a dotted key (e.g. `server.base_url`) in the user config file.
pub fn set_config_value(key: &str, value: &str) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)?;
    Ok(path)
}

/// Set a dotted key in the config file at `path`, creating it from defaults
/// when missing. Keys that do not exist in the schema are rejected.
pub fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        fs::read_to_string(path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&DashboardConfig::default())
            .context("failed to serialize default config")?
    };
    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML")?;

    // Files may omit sections; fill them from the defaults so every key is settable.
    let defaults = toml::Value::try_from(DashboardConfig::default())
        .context("failed to serialize default config")?;
    fill_missing(&mut root, &defaults);

    set_toml_value(&mut root, key, value)?;

    // Reject values that no longer fit the schema (e.g. a string for a port).
    let updated = toml::to_string_pretty(&root).context("failed to serialize config")?;
    toml::from_str::<DashboardConfig>(&updated)
        .with_context(|| format!("invalid value for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, updated).context("failed to write config file")?;
    Ok(())
}

fn fill_missing(target: &mut toml::Value, defaults: &toml::Value) {
    let (Some(target), Some(defaults)) = (target.as_table_mut(), defaults.as_table()) else {
        return;
    };
    for (key, default) in defaults {
        match target.get_mut(key) {
            Some(existing) => fill_missing(existing, default),
            None => {
                target.insert(key.clone(), default.clone());
            }
        }
    }
}

/// Set a value in a TOML tree by dotted key, keeping the existing type.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config keys have the form section.key, got '{key}'");
    };

    let mut current = root;
    for part in section.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }
    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{section}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .trim()
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the user config to defaults.
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    toml::to_string_pretty(&load()).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_truthy_accepts_variants() {
        for yes in ["1", "true", "TRUE", "yes", "on", " on "] {
            assert!(is_truthy(yes), "{yes}");
        }
        for no in ["0", "false", "no", "off", ""] {
            assert!(!is_truthy(no), "{no}");
        }
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root: toml::Value = toml::from_str("[server]\nbase_url = \"http://a\"\n").unwrap();
        set_toml_value(&mut root, "server.base_url", "http://b").unwrap();
        assert_eq!(root["server"]["base_url"].as_str(), Some("http://b"));
    }

    #[test]
    fn set_toml_value_updates_integer_and_bool() {
        let mut root: toml::Value =
            toml::from_str("[server]\ntimeout_ms = 100\n[logging]\nenabled = true\n").unwrap();
        set_toml_value(&mut root, "server.timeout_ms", "0").unwrap();
        set_toml_value(&mut root, "logging.enabled", "off").unwrap();
        assert_eq!(root["server"]["timeout_ms"].as_integer(), Some(0));
        assert_eq!(root["logging"]["enabled"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_rejects_bad_input() {
        let mut root: toml::Value = toml::from_str("[server]\ntimeout_ms = 100\n").unwrap();
        assert!(set_toml_value(&mut root, "server.timeout_ms", "soon").is_err());
        assert!(set_toml_value(&mut root, "server.nope", "x").is_err());
        assert!(set_toml_value(&mut root, "nosection.key", "x").is_err());
        assert!(set_toml_value(&mut root, "flat", "x").is_err());
    }

    #[test]
    fn set_config_value_creates_file_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        set_config_value_at(&path, "session.cookies", "csrftoken=abc").unwrap();

        let cfg = load_toml_file(&path).unwrap();
        assert_eq!(cfg.session.cookies, "csrftoken=abc");
        assert_eq!(cfg.server.base_url, schema::DEFAULT_BASE_URL);
    }

    #[test]
    fn set_config_value_fills_sections_missing_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\nbase_url = \"http://farm:8000\"\n").unwrap();

        set_config_value_at(&path, "logging.enabled", "false").unwrap();
        let cfg = load_toml_file(&path).unwrap();
        assert!(!cfg.logging.enabled);
        assert_eq!(cfg.server.base_url, "http://farm:8000");
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        init_config_at(&path, false).unwrap();
        assert!(init_config_at(&path, false).is_err());
        assert!(init_config_at(&path, true).is_ok());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\nbase_url = ").unwrap();
        assert!(load_toml_file(&path).is_none());
    }
}
