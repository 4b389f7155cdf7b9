//! Model API key resolution tests
//!
//! All tests touch process environment and run under #[serial].

use moodlist_common::config::TomlConfig;
use moodlist_common::Error;
use moodlist_synth::config::{resolve_model_api_key, MODEL_API_KEY_ENV, OPENROUTER_API_KEY_ENV};
use serial_test::serial;
use std::env;

fn clear_env() {
    env::remove_var(MODEL_API_KEY_ENV);
    env::remove_var(OPENROUTER_API_KEY_ENV);
}

fn config_with_key(key: Option<&str>) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.model.api_key = key.map(str::to_string);
    config
}

#[test]
#[serial]
fn test_primary_env_var_wins() {
    clear_env();
    env::set_var(MODEL_API_KEY_ENV, "primary-key");
    env::set_var(OPENROUTER_API_KEY_ENV, "provider-key");

    let key = resolve_model_api_key(&config_with_key(Some("toml-key"))).unwrap();
    assert_eq!(key, "primary-key");

    clear_env();
}

#[test]
#[serial]
fn test_provider_env_var_before_toml() {
    clear_env();
    env::set_var(OPENROUTER_API_KEY_ENV, "  provider-key  ");

    let key = resolve_model_api_key(&config_with_key(Some("toml-key"))).unwrap();
    assert_eq!(key, "provider-key");

    clear_env();
}

#[test]
#[serial]
fn test_blank_env_falls_through_to_toml() {
    clear_env();
    env::set_var(MODEL_API_KEY_ENV, "   ");

    let key = resolve_model_api_key(&config_with_key(Some("toml-key"))).unwrap();
    assert_eq!(key, "toml-key");

    clear_env();
}

#[test]
#[serial]
fn test_missing_key_is_config_error() {
    clear_env();

    let err = resolve_model_api_key(&config_with_key(None)).unwrap_err();
    match err {
        Error::Config(msg) => assert!(msg.contains(MODEL_API_KEY_ENV)),
        other => panic!("expected Config error, got {:?}", other),
    }
}
