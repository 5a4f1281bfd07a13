//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "DUEL_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// A loaded configuration plus what happened while finding it.
///
/// Loading usually runs before a subscriber is installed, so problems are
/// collected here and reported later through [`LoadedConfig::log`].
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: CentralConfig,
    pub source: ConfigSource,
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Report the source and any fallbacks through `tracing`.
    pub fn log(&self) {
        info!(source = %self.source, "Configuration loaded");
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the DUEL_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    resolve_config().config
}

/// Like [`load_config`], keeping the source and any fallback warnings.
pub fn resolve_config() -> LoadedConfig {
    resolve(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
}

pub(crate) fn resolve(explicit: Option<PathBuf>) -> LoadedConfig {
    let mut warnings = Vec::new();

    // Check for explicit config path
    if let Some(path) = explicit {
        if path.exists() {
            return resolve_from_path(&path);
        }
        warnings.push(format!(
            "{}={} not found, searching defaults",
            CONFIG_PATH_ENV,
            path.display()
        ));
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            let mut loaded = resolve_from_path(path);
            warnings.append(&mut loaded.warnings);
            loaded.warnings = warnings;
            return loaded;
        }
    }

    // Fall back to defaults
    LoadedConfig {
        config: apply_env_overrides(CentralConfig::default()),
        source: ConfigSource::Defaults,
        warnings,
    }
}

/// Load configuration from a specific path.
///
/// An unreadable or malformed file is replaced by the defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    resolve_from_path(path).config
}

/// Like [`load_from_path`], keeping the source and any fallback warning.
pub fn resolve_from_path(path: &Path) -> LoadedConfig {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}, using defaults", path.display(), e))
        .and_then(|content| {
            toml::from_str::<CentralConfig>(&content)
                .map_err(|e| format!("Failed to parse {}: {}, using defaults", path.display(), e))
        });

    match parsed {
        Ok(config) => LoadedConfig {
            config: apply_env_overrides(config),
            source: ConfigSource::File(path.to_path_buf()),
            warnings: Vec::new(),
        },
        Err(warning) => LoadedConfig {
            config: apply_env_overrides(CentralConfig::default()),
            source: ConfigSource::Defaults,
            warnings: vec![warning],
        },
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, u64, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: DUEL_<SECTION>_<KEY>. Values
/// that fail to parse are ignored.
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "DUEL_COMMON_LOG_LEVEL");

    // Search
    env_override!(
        config,
        search.time_budget_ms,
        "DUEL_SEARCH_TIME_BUDGET_MS",
        parse
    );
    env_override!(config, search.iterations, "DUEL_SEARCH_ITERATIONS", parse);
    env_override!(config, search.exploration, "DUEL_SEARCH_EXPLORATION", parse);
    env_override!(
        config,
        search.max_rollout_moves,
        "DUEL_SEARCH_MAX_ROLLOUT_MOVES",
        parse
    );
    env_override!(config, search.workers, "DUEL_SEARCH_WORKERS", parse);
    env_override!(
        config,
        search.verify_adapter,
        "DUEL_SEARCH_VERIFY_ADAPTER",
        parse
    );

    // Driver
    env_override!(config, driver.episodes, "DUEL_DRIVER_EPISODES", parse);
    env_override!(
        config,
        driver.max_decisions,
        "DUEL_DRIVER_MAX_DECISIONS",
        parse
    );
    env_override!(config, driver.seed, "DUEL_DRIVER_SEED", parse);
    env_override!(config, driver.progress, "DUEL_DRIVER_PROGRESS", parse);

    // Duel
    env_override!(config, duel.deck_size, "DUEL_DUEL_DECK_SIZE", parse);
    env_override!(
        config,
        duel.starting_health,
        "DUEL_DUEL_STARTING_HEALTH",
        parse
    );

    config
}
