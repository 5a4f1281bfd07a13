//! Tests for the configuration module.

use super::*;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.search.time_budget_ms, 1000);
    assert_eq!(config.search.iterations, 0);
    assert_eq!(config.search.workers, 1);
    assert_eq!(config.driver.episodes, 1);
    assert_eq!(config.driver.max_decisions, 5000);
    assert_eq!(config.duel.deck_size, 30);
    assert_eq!(config.duel.starting_health, 30);
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
log_level = "debug"

[search]
iterations = 500
exploration = 0.7
workers = 4

[driver]
episodes = 3
seed = 9
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.log_level, "debug");
    assert_eq!(config.search.iterations, 500);
    assert!((config.search.exploration - 0.7).abs() < f64::EPSILON);
    assert_eq!(config.search.workers, 4);
    assert_eq!(config.driver.episodes, 3);
    assert_eq!(config.driver.seed, 9);
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[duel]
deck_size = 10
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.duel.deck_size, 10);
    assert_eq!(config.duel.starting_health, 30); // Default
    assert_eq!(config.search.time_budget_ms, 1000); // Default
    assert_eq!(config.driver.max_decisions, 5000); // Default
}

#[test]
fn test_load_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[search]\nmax_rollout_moves = 123\n\n[driver]\nprogress = false").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.search.max_rollout_moves, 123);
    assert!(!config.driver.progress);
    assert_eq!(config.common.log_level, "info");
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[search\niterations = ").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.search.iterations, defaults::iterations());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_from_path(&dir.path().join("nope.toml"));
    assert_eq!(config.duel.starting_health, defaults::starting_health());
}

#[test]
fn test_resolve_reports_file_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[duel]\nstarting_health = 12").unwrap();

    let loaded = resolve_from_path(file.path());
    assert_eq!(loaded.source, ConfigSource::File(file.path().to_path_buf()));
    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.config.duel.starting_health, 12);
}

#[test]
fn test_resolve_keeps_parse_failure() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[search\niterations = ").unwrap();

    let loaded = resolve_from_path(file.path());
    assert_eq!(loaded.source, ConfigSource::Defaults);
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains("Failed to parse"));
    assert_eq!(loaded.config.search.iterations, defaults::iterations());
}

#[test]
fn test_resolve_missing_explicit_path_warns() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let loaded = crate::loader::resolve(Some(missing.clone()));
    assert!(loaded.warnings[0].contains(CONFIG_PATH_ENV));
    assert!(loaded.warnings[0].contains(&missing.display().to_string()));
    assert_eq!(ConfigSource::Defaults.to_string(), "built-in defaults");
}

#[test]
fn test_env_overrides() {
    std::env::set_var("DUEL_DRIVER_EPISODES", "7");
    std::env::set_var("DUEL_SEARCH_EXPLORATION", "0.5");
    std::env::set_var("DUEL_DUEL_DECK_SIZE", "not-a-number");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.driver.episodes, 7);
    assert!((config.search.exploration - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.duel.deck_size, 30); // Unparseable, ignored

    std::env::remove_var("DUEL_DRIVER_EPISODES");
    std::env::remove_var("DUEL_SEARCH_EXPLORATION");
    std::env::remove_var("DUEL_DUEL_DECK_SIZE");
}

#[test]
fn test_env_overrides_beat_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[search]\nworkers = 2").unwrap();
    std::env::set_var("DUEL_SEARCH_WORKERS", "6");

    let config = load_from_path(file.path());
    assert_eq!(config.search.workers, 6);

    std::env::remove_var("DUEL_SEARCH_WORKERS");
}

#[test]
fn test_config_path_env() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[common]\nlog_level = \"trace\"").unwrap();
    std::env::set_var(CONFIG_PATH_ENV, file.path());

    let config = load_config();
    assert_eq!(config.common.log_level, "trace");

    std::env::remove_var(CONFIG_PATH_ENV);
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(config.common.log_level, cloned.common.log_level);
    assert_eq!(config.driver.seed, cloned.driver.seed);
}
