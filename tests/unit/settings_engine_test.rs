//! Unit tests for the SettingsEngine public API: default loading, file
//! parsing, path resolution, and environment overrides.

use std::collections::HashMap;
use std::fs;

use recall::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use recall::types::errors::SettingsError;
use recall::types::settings::{AISettings, RecallSettings};
use tempfile::TempDir;

/// Helper: a SettingsEngine pointed at `settings.json` inside `dir`.
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

/// Missing config file: defaults, no error. Only fields that no environment
/// variable can override are compared.
#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();
    let defaults = AISettings::default();

    assert_eq!(settings.ai.api_endpoint, defaults.api_endpoint);
    assert_eq!(settings.ai.request_timeout_secs, None);
    assert!(!dir.path().join("settings.json").exists(), "load must not write the file");
}

#[test]
fn test_load_reads_file_and_fills_missing_fields() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("settings.json"),
        r#"{"ai": {"api_endpoint": "http://localhost:9999/v1", "request_timeout_secs": 5}}"#,
    )
    .unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings.ai.api_endpoint, "http://localhost:9999/v1");
    assert_eq!(settings.ai.request_timeout_secs, Some(5));
    assert_eq!(engine.get_settings(), &settings);
}

#[test]
fn test_empty_object_is_all_defaults() {
    let settings: RecallSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, RecallSettings::default());
    assert_eq!(settings.ai.model, "gemini-3-pro-preview");
    assert!(settings.ai.api_key.is_none());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    let mut engine = engine_in_temp(&dir);

    let err = engine.load().unwrap_err();
    assert!(matches!(err, SettingsError::SerializationError(_)));
}

#[test]
fn test_explicit_path_is_reported() {
    let engine = SettingsEngine::new(Some("/tmp/recall-test/custom.json".to_string()));
    assert_eq!(engine.get_config_path(), "/tmp/recall-test/custom.json");
}

#[test]
fn test_env_overrides_model_and_key() {
    let env: HashMap<&str, &str> = [("API_KEY", "fallback-key"), ("RECALL_MODEL", "gemini-2.5-flash")]
        .into_iter()
        .collect();
    let mut settings = RecallSettings::default();

    SettingsEngine::apply_overrides(&mut settings, |n| env.get(n).map(|v| v.to_string()));

    assert_eq!(settings.ai.api_key.as_deref(), Some("fallback-key"));
    assert_eq!(settings.ai.model, "gemini-2.5-flash");
}

#[test]
fn test_unset_optional_fields_are_not_serialized() {
    let json = serde_json::to_value(RecallSettings::default()).unwrap();
    assert!(json["ai"].get("api_key").is_none());
    assert!(json["ai"].get("request_timeout_secs").is_none());
}

#[test]
fn test_request_timeout_is_opt_in() {
    assert_eq!(AISettings::default().request_timeout_secs, None);

    let settings: RecallSettings =
        serde_json::from_str(r#"{"ai": {"request_timeout_secs": 30}}"#).unwrap();
    assert_eq!(settings.ai.request_timeout_secs, Some(30));

    let settings: RecallSettings =
        serde_json::from_str(r#"{"ai": {"request_timeout_secs": null}}"#).unwrap();
    assert_eq!(settings.ai.request_timeout_secs, None);
}
