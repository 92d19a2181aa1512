// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

use lfsbridge_config::{Config, ConfigError, ConfigFormat, ConfigLoader, Validator};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_load_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[filter]
name = "lfs"
patterns = ["*.psd", "Assets/**/*.fbx"]
required = false

[helper]
program = "/usr/bin/git-lfs"

[observability]
log_level = "debug"
log_format = "compact"
"#,
    )
    .unwrap();

    let config = ConfigLoader::new().load_file(&path).await.unwrap();

    assert_eq!(config.filter.patterns, vec!["*.psd", "Assets/**/*.fbx"]);
    assert!(!config.filter.required);
    assert!(config.filter.enabled);
    assert_eq!(config.helper.program, "/usr/bin/git-lfs");
    assert_eq!(config.observability.log_level, "debug");
}

#[tokio::test]
async fn test_load_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(&path, "helper:\n  program: git-lfs\n  args: [\"--verbose\"]\n").unwrap();

    let config = ConfigLoader::new().load_file(&path).await.unwrap();

    assert_eq!(config.helper.args, vec!["--verbose"]);
}

#[tokio::test]
async fn test_missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let result = ConfigLoader::new()
        .load_file(dir.path().join("absent.toml"))
        .await;
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[tokio::test]
async fn test_invalid_file_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"observability": {"log_level": "chatty"}}"#).unwrap();

    let result = ConfigLoader::new().load_file(&path).await;
    assert!(matches!(result, Err(ConfigError::InvalidValue { field, .. }) if field == "observability.log_level"));
}

#[tokio::test]
async fn test_malformed_toml_is_parse_error() {
    let result = ConfigLoader::new().load_from_string("[filter\nname = ", ConfigFormat::Toml);
    assert!(matches!(result, Err(ConfigError::TomlParseError(_))));
}

#[tokio::test]
async fn test_repository_config_round_trip() {
    let repo = TempDir::new().unwrap();
    let mut config = Config::default();
    config.filter.patterns = vec!["*.wav".to_string()];
    config.save(repo.path()).unwrap();

    assert!(repo.path().join(".lfsbridge/config.toml").exists());
    let loaded = Config::load(repo.path()).await.unwrap();
    assert_eq!(loaded.filter.patterns, vec!["*.wav"]);
    assert!(loaded.validate().is_ok());
}

// The only test in this binary that touches LFSBRIDGE_* variables.
#[tokio::test]
async fn test_repository_config_with_env_overrides() {
    let repo = TempDir::new().unwrap();
    Config::default().save(repo.path()).unwrap();

    std::env::set_var("LFSBRIDGE_HELPER_PROGRAM", "/opt/stub/helper");
    std::env::set_var("LFSBRIDGE_FILTER_ENABLED", "false");
    let loaded = Config::load_with_overrides(repo.path()).await;
    std::env::remove_var("LFSBRIDGE_HELPER_PROGRAM");
    std::env::remove_var("LFSBRIDGE_FILTER_ENABLED");

    let loaded = loaded.unwrap();
    assert_eq!(loaded.helper.program, "/opt/stub/helper");
    assert!(!loaded.filter.enabled);
}
