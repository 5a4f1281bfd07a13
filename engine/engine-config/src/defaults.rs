//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time, so the binary carries the
//! same values the repository documents.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    driver: DriverDefaults,
    duel: DuelDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    time_budget_ms: u64,
    iterations: u32,
    exploration: f64,
    max_rollout_moves: u32,
    workers: usize,
    verify_adapter: bool,
}

#[derive(Debug, Deserialize)]
struct DriverDefaults {
    episodes: u32,
    max_decisions: u32,
    seed: u64,
    progress: bool,
}

#[derive(Debug, Deserialize)]
struct DuelDefaults {
    deck_size: u8,
    starting_health: i32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Search
pub fn time_budget_ms() -> u64 {
    DEFAULTS.search.time_budget_ms
}
pub fn iterations() -> u32 {
    DEFAULTS.search.iterations
}
pub fn exploration() -> f64 {
    DEFAULTS.search.exploration
}
pub fn max_rollout_moves() -> u32 {
    DEFAULTS.search.max_rollout_moves
}
pub fn workers() -> usize {
    DEFAULTS.search.workers
}
pub fn verify_adapter() -> bool {
    DEFAULTS.search.verify_adapter
}

// Driver
pub fn episodes() -> u32 {
    DEFAULTS.driver.episodes
}
pub fn max_decisions() -> u32 {
    DEFAULTS.driver.max_decisions
}
pub fn seed() -> u64 {
    DEFAULTS.driver.seed
}
pub fn progress() -> bool {
    DEFAULTS.driver.progress
}

// Duel
pub fn deck_size() -> u8 {
    DEFAULTS.duel.deck_size
}
pub fn starting_health() -> i32 {
    DEFAULTS.duel.starting_health
}
