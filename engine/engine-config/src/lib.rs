//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! across the workspace binaries (the episode driver, benchmarks).
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`DUEL_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (`config.defaults.toml`, embedded at compile time)
//!
//! Binaries may layer command-line arguments on top.
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! DUEL_<SECTION>_<KEY>=value
//!
//! Examples:
//!     DUEL_COMMON_LOG_LEVEL=debug
//!     DUEL_SEARCH_TIME_BUDGET_MS=250
//!     DUEL_SEARCH_WORKERS=4
//!     DUEL_DRIVER_EPISODES=10
//!     DUEL_DUEL_DECK_SIZE=15
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, resolve_config, resolve_from_path,
    ConfigSource, LoadedConfig, CONFIG_PATH_ENV, CONFIG_SEARCH_PATHS,
};
pub use structs::*;

#[cfg(test)]
mod tests;
