//! Tests for config file resolution and loading
//!
//! Tests that manipulate MOODLIST_CONFIG are marked with #[serial] so they
//! never race each other.

use moodlist_common::config::{load_config, load_toml_config, CONFIG_ENV_VAR};
use moodlist_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_full_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "config.toml",
        r#"
        port = 6001

        [logging]
        level = "debug"
        file = "/tmp/moodlist.log"

        [model]
        model = "test/model"
        api_key = "toml-key"
        timeout_secs = 5

        [catalog]
        api_url = "http://localhost:9999/v1"
        min_request_interval_ms = 0

        [synthesis]
        attempt_budget = 4
        default_target_size = 20
        recommendation_fallback = true
        random_seed = 42
        "#,
    );

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.port, 6001);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.file.is_some());
    assert_eq!(config.model.model, "test/model");
    assert_eq!(config.model.api_key.as_deref(), Some("toml-key"));
    assert_eq!(config.model.timeout_secs, 5);
    // Unset field in a present section keeps its default
    assert_eq!(config.model.api_url, "https://openrouter.ai/api/v1");
    assert_eq!(config.catalog.api_url, "http://localhost:9999/v1");
    assert_eq!(config.catalog.timeout_secs, 15);
    assert_eq!(config.synthesis.attempt_budget, 4);
    assert_eq!(config.synthesis.default_target_size, 20);
    assert!(config.synthesis.recommendation_fallback);
    assert_eq!(config.synthesis.random_seed, Some(42));
}

#[test]
fn test_malformed_toml_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad.toml", "port = \"not a number\"");

    let err = load_toml_config(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "zero.toml", "[synthesis]\nattempt_budget = 0\n");

    assert!(load_toml_config(&path).is_err());
}

#[test]
#[serial]
fn test_cli_path_wins_over_env() {
    let dir = TempDir::new().unwrap();
    let cli_path = write_config(&dir, "cli.toml", "port = 7001");
    let env_path = write_config(&dir, "env.toml", "port = 7002");
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let config = load_config(Some(&cli_path)).unwrap();
    assert_eq!(config.port, 7001);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_path_used_without_cli() {
    let dir = TempDir::new().unwrap();
    let env_path = write_config(&dir, "env.toml", "port = 7002");
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let config = load_config(None).unwrap();
    assert_eq!(config.port, 7002);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_explicit_missing_file_is_error() {
    env::set_var(CONFIG_ENV_VAR, "/nonexistent/moodlist/config.toml");

    let result = load_config(None);
    assert!(matches!(result, Err(Error::Config(_))));

    env::remove_var(CONFIG_ENV_VAR);
}
