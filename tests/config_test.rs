//! Integration tests for configuration loading and validation

use docket_engine::config::{Config, ConfigError};
use std::fs;

#[test]
fn test_load_full_config_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let config_path = dir.path().join("config.toml");

    let contents = format!(
        r#"
[core]
data_dir = "{}"
log_level = "debug"

[llm.gemini]
base_url = "http://localhost:9999"
model = "gemini-test"
"#,
        data_dir.display()
    );
    fs::write(&config_path, contents).unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.core.log_level, "debug");
    assert_eq!(config.llm.gemini.base_url, "http://localhost:9999");
    assert_eq!(config.llm.gemini.model, "gemini-test");

    // The data directory is created during validation.
    assert!(data_dir.is_dir());
}

#[test]
fn test_partial_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    let contents = format!(
        r#"
[core]
data_dir = "{}"
"#,
        dir.path().join("data").display()
    );
    fs::write(&config_path, contents).unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.core.log_level, "info");
    assert_eq!(config.llm.gemini.model, "gemini-2.5-flash");
    assert_eq!(
        config.llm.gemini.base_url,
        "https://generativelanguage.googleapis.com/v1beta"
    );
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    let contents = format!(
        r#"
[core]
data_dir = "{}"
log_level = "chatty"
"#,
        dir.path().join("data").display()
    );
    fs::write(&config_path, contents).unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("chatty"));
}

#[test]
fn test_malformed_toml_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "this is not toml [").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_path(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read(_)));
}
