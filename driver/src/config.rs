//! Configuration for the episode driver
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};
use engine_config::{resolve_config, LoadedConfig};
use games_duel::{DuelConfig, MAX_DECK_SIZE};
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<LoadedConfig> = Lazy::new(resolve_config);

fn default_log_level() -> String {
    CENTRAL_CONFIG.config.common.log_level.clone()
}

/// Report where the central config came from. Call once tracing is up.
pub fn log_config_source() {
    CENTRAL_CONFIG.log();
}

#[derive(Parser, Debug, Clone)]
#[command(name = "duel-driver")]
#[command(about = "Play card duel episodes with UCT search on both sides")]
#[command(
    long_about = "Plays full card duel episodes, draft included, choosing every move for
both players with an anytime UCT search and reporting the outcomes.

Configuration is loaded from config.toml with DUEL_<SECTION>_<KEY> environment
variable overrides. CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Episodes to play
    #[arg(long, default_value_t = CENTRAL_CONFIG.config.driver.episodes)]
    pub episodes: u32,

    /// Decisions after which an episode is aborted as runaway
    #[arg(long, default_value_t = CENTRAL_CONFIG.config.driver.max_decisions)]
    pub max_decisions: u32,

    /// Base seed; episode i plays with seed + i
    #[arg(long, default_value_t = CENTRAL_CONFIG.config.driver.seed)]
    pub seed: u64,

    /// Show a progress bar when stderr is a terminal
    #[arg(long, action = ArgAction::Set, default_value_t = CENTRAL_CONFIG.config.driver.progress)]
    pub progress: bool,

    /// Wall-clock budget per decision in milliseconds
    #[arg(long, default_value_t = CENTRAL_CONFIG.config.search.time_budget_ms)]
    pub time_budget_ms: u64,

    /// Fixed iterations per decision, overrides the time budget (0 = off)
    #[arg(long, default_value_t = CENTRAL_CONFIG.config.search.iterations)]
    pub iterations: u32,

    /// UCT exploration constant
    #[arg(long, default_value_t = CENTRAL_CONFIG.config.search.exploration)]
    pub exploration: f64,

    /// Rollout length after which the game is considered endless
    #[arg(long, default_value_t = CENTRAL_CONFIG.config.search.max_rollout_moves)]
    pub max_rollout_moves: u32,

    /// Root-parallel searches per decision
    #[arg(long, default_value_t = CENTRAL_CONFIG.config.search.workers)]
    pub workers: usize,

    /// Check the game state contract while searching
    #[arg(long, action = ArgAction::Set, default_value_t = CENTRAL_CONFIG.config.search.verify_adapter)]
    pub verify_adapter: bool,

    /// Cards each player drafts
    #[arg(long, default_value_t = CENTRAL_CONFIG.config.duel.deck_size)]
    pub deck_size: u8,

    /// Hero starting health
    #[arg(long, default_value_t = CENTRAL_CONFIG.config.duel.starting_health)]
    pub starting_health: i32,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(anyhow!("episodes must be greater than 0"));
        }

        if self.max_decisions == 0 {
            return Err(anyhow!("max_decisions must be greater than 0"));
        }

        if self.iterations == 0 && self.time_budget_ms == 0 {
            return Err(anyhow!(
                "time_budget_ms must be greater than 0 when no iteration budget is set"
            ));
        }

        if self.deck_size == 0 || self.deck_size > MAX_DECK_SIZE {
            return Err(anyhow!("deck_size must be between 1 and {}", MAX_DECK_SIZE));
        }

        if self.starting_health <= 0 {
            return Err(anyhow!("starting_health must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        self.search_config()
            .validate()
            .map_err(|e| anyhow!("invalid search settings: {}", e))?;

        Ok(())
    }

    /// Search settings for one decision.
    pub fn search_config(&self) -> MctsConfig {
        let config = MctsConfig::default()
            .with_exploration(self.exploration)
            .with_max_rollout_moves(self.max_rollout_moves)
            .with_workers(self.workers)
            .with_adapter_checks(self.verify_adapter);
        if self.iterations > 0 {
            config.with_iterations(self.iterations)
        } else {
            config.with_time_budget(self.time_budget())
        }
    }

    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    /// Match setup for an episode, seeded from the episode's generator.
    pub fn duel_config(&self, seed: u64) -> DuelConfig {
        DuelConfig {
            deck_size: self.deck_size,
            starting_health: self.starting_health,
            seed,
        }
    }
}
