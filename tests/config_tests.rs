/// Integration tests for configuration layering.
///
/// # Safety
///
/// `std::env::set_var` / `remove_var` are `unsafe` in Rust 2024 edition. All
/// env-mutating assertions live in a single `#[test]` so they cannot race
/// with each other when Cargo runs tests in parallel.
use std::fs;

use agriguide::config::{self, DashboardConfig, schema};

/// Helper: set an env var (wraps the `unsafe` call).
///
/// # Safety
/// Must only be called from single-threaded test contexts.
unsafe fn set_env(key: &str, val: &str) {
    unsafe { std::env::set_var(key, val) }
}

/// Helper: remove an env var (wraps the `unsafe` call).
///
/// # Safety
/// Must only be called from single-threaded test contexts.
unsafe fn remove_env(key: &str) {
    unsafe { std::env::remove_var(key) }
}

const ENV_KEYS: [&str; 4] = [
    "AGRIGUIDE_BASE_URL",
    "AGRIGUIDE_TIMEOUT_MS",
    "AGRIGUIDE_COOKIES",
    "AGRIGUIDE_LOGGING",
];

#[test]
fn defaults_then_file_then_env() {
    for key in ENV_KEYS {
        unsafe { remove_env(key) };
    }

    // --- no file: built-in defaults ---
    let cfg = config::load_from(None);
    assert_eq!(cfg, DashboardConfig::default());
    assert_eq!(cfg.server.base_url, schema::DEFAULT_BASE_URL);

    // --- file overrides defaults, untouched keys keep theirs ---
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[server]
base_url = "http://farm.local:9000"

[session]
cookies = "csrftoken=fromfile"
"#,
    )
    .unwrap();
    let cfg = config::load_from(Some(&path));
    assert_eq!(cfg.server.base_url, "http://farm.local:9000");
    assert_eq!(cfg.server.timeout_ms, schema::DEFAULT_TIMEOUT_MS);
    assert_eq!(cfg.session.cookies, "csrftoken=fromfile");
    assert!(cfg.logging.enabled);

    // --- env overrides file ---
    unsafe {
        set_env("AGRIGUIDE_BASE_URL", "http://10.0.0.5:8000");
        set_env("AGRIGUIDE_TIMEOUT_MS", "0");
        set_env("AGRIGUIDE_COOKIES", "csrftoken=fromenv");
        set_env("AGRIGUIDE_LOGGING", "off");
    }
    let cfg = config::load_from(Some(&path));
    assert_eq!(cfg.server.base_url, "http://10.0.0.5:8000");
    assert_eq!(cfg.server.timeout_ms, 0);
    assert_eq!(cfg.session.cookies, "csrftoken=fromenv");
    assert!(!cfg.logging.enabled);

    // --- unparsable env values are ignored ---
    unsafe {
        set_env("AGRIGUIDE_TIMEOUT_MS", "soon");
        set_env("AGRIGUIDE_BASE_URL", "");
    }
    let cfg = config::load_from(Some(&path));
    assert_eq!(cfg.server.timeout_ms, schema::DEFAULT_TIMEOUT_MS);
    assert_eq!(cfg.server.base_url, "http://farm.local:9000");

    for key in ENV_KEYS {
        unsafe { remove_env(key) };
    }
}

#[test]
fn set_then_load_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    config::init_config_at(&path, false).unwrap();
    config::set_config_value_at(&path, "server.timeout_ms", "1500").unwrap();
    config::set_config_value_at(&path, "storage.preferences_file", "/srv/prefs.toml").unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let parsed: DashboardConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed.server.timeout_ms, 1500);
    assert_eq!(parsed.storage.preferences_file, "/srv/prefs.toml");

    assert!(config::set_config_value_at(&path, "server.port", "80").is_err());
}
