//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_time_budget_ms() -> u64 {
    defaults::time_budget_ms()
}
fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_max_rollout_moves() -> u32 {
    defaults::max_rollout_moves()
}
fn d_workers() -> usize {
    defaults::workers()
}
fn d_verify_adapter() -> bool {
    defaults::verify_adapter()
}
fn d_episodes() -> u32 {
    defaults::episodes()
}
fn d_max_decisions() -> u32 {
    defaults::max_decisions()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_progress() -> bool {
    defaults::progress()
}
fn d_deck_size() -> u8 {
    defaults::deck_size()
}
fn d_starting_health() -> i32 {
    defaults::starting_health()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub duel: DuelSetup,
}

/// Settings shared by every binary
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Per-decision search settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Wall-clock budget per decision, used when `iterations` is 0
    #[serde(default = "d_time_budget_ms")]
    pub time_budget_ms: u64,
    /// Fixed iteration budget per decision (0 = use the time budget)
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    #[serde(default = "d_max_rollout_moves")]
    pub max_rollout_moves: u32,
    #[serde(default = "d_workers")]
    pub workers: usize,
    #[serde(default = "d_verify_adapter")]
    pub verify_adapter: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: defaults::time_budget_ms(),
            iterations: defaults::iterations(),
            exploration: defaults::exploration(),
            max_rollout_moves: defaults::max_rollout_moves(),
            workers: defaults::workers(),
            verify_adapter: defaults::verify_adapter(),
        }
    }
}

/// Episode runner settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DriverConfig {
    #[serde(default = "d_episodes")]
    pub episodes: u32,
    /// Decisions after which an episode is aborted
    #[serde(default = "d_max_decisions")]
    pub max_decisions: u32,
    #[serde(default = "d_seed")]
    pub seed: u64,
    #[serde(default = "d_progress")]
    pub progress: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            episodes: defaults::episodes(),
            max_decisions: defaults::max_decisions(),
            seed: defaults::seed(),
            progress: defaults::progress(),
        }
    }
}

/// Match setup for the card duel
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DuelSetup {
    #[serde(default = "d_deck_size")]
    pub deck_size: u8,
    #[serde(default = "d_starting_health")]
    pub starting_health: i32,
}

impl Default for DuelSetup {
    fn default() -> Self {
        Self {
            deck_size: defaults::deck_size(),
            starting_health: defaults::starting_health(),
        }
    }
}
