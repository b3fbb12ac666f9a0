//! Integration tests for configuration management
//!
//! These tests verify that the Config struct can be properly loaded,
//! validated, and turned into a balancing policy.

use roster_engine::balancing::{BalancingPolicy, LeaderDirection, LeaderFallback};
use roster_engine::config::Config;
use sdk::errors::EngineError;
use std::fs;
use tempfile::TempDir;

fn write_config(temp_dir: &TempDir, body: &str) -> std::path::PathBuf {
    let data_dir = temp_dir.path().join("data");
    let contents = format!(
        "[core]\nlog_level = \"debug\"\ndata_dir = \"{}\"\n{}",
        data_dir.display(),
        body
    );
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_minimal_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "");

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.core.log_level, "debug");
    assert!(config.core.data_dir.exists());
    assert_eq!(config.db_path(), temp_dir.path().join("data").join("roster.db"));
    assert_eq!(config.balancing_policy(), BalancingPolicy::default());
}

#[test]
fn test_full_config_toml_parsing() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[balancing]
max_members = 120
leader_direction = "higher_is_better"
leader_fallback = "zero"
preference_fallback = 5
preference_weight = 0.25
gender_penalty = 2.0

[survey]
outward_letter = "i"
leadership_keywords = ["lead"]
preference_keywords = ["drink"]
"#,
    );

    let config = Config::load_from_path(&path).unwrap();
    let policy = config.balancing_policy();

    assert_eq!(policy.max_members, 120);
    assert_eq!(policy.leader_direction, LeaderDirection::HigherIsBetter);
    assert_eq!(policy.leader_fallback, LeaderFallback::Zero);
    assert_eq!(policy.preference_fallback, 5);
    assert_eq!(policy.preference_weight, 0.25);
    assert_eq!(policy.gender_penalty, 2.0);
    assert_eq!(policy.outward_letter, 'I');
    assert_eq!(policy.keywords.leadership, vec!["lead"]);
    assert_eq!(policy.keywords.preference, vec!["drink"]);
    // Unlisted keyword tables keep their defaults
    assert_eq!(
        policy.keywords.personality,
        BalancingPolicy::default().keywords.personality
    );
}

#[test]
fn test_invalid_log_level() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[core]\nlog_level = \"loud\"\n").unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
    assert!(err.to_string().contains("Invalid log level"));
}

#[test]
fn test_invalid_balancing_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "[balancing]\nmax_members = 0\n");
    assert!(Config::load_from_path(&path).is_err());

    let path = write_config(&temp_dir, "[balancing]\npreference_weight = -1.0\n");
    assert!(Config::load_from_path(&path).is_err());

    let path = write_config(&temp_dir, "[balancing]\nleader_direction = \"sideways\"\n");
    assert!(Config::load_from_path(&path).is_err());
}

#[test]
fn test_missing_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::load_from_path(&temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
}
