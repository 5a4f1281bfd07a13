//! MCTS configuration parameters.

use std::time::Duration;

use crate::search::SearchError;

/// Default UCB1 exploration constant (√2).
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Default cap on moves per rollout before the adapter is considered broken.
pub const DEFAULT_MAX_ROLLOUT_MOVES: u32 = 10_000;

/// When a search stops iterating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchBudget {
    /// Stop once this much wall-clock time has elapsed.
    Time(Duration),
    /// Stop after this many attempted iterations (discarded ones included).
    /// Removes timing nondeterminism, which makes seeded runs reproducible.
    Iterations(u32),
}

/// Configuration for UCT search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Budget per search (per worker for root-parallel search).
    pub budget: SearchBudget,

    /// Exploration constant C in `W/N + C * sqrt(2 ln N_parent / N)`.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration: f64,

    /// Maximum moves in a single rollout. A state that keeps offering moves past
    /// this point is treated as an adapter contract violation.
    pub max_rollout_moves: u32,

    /// Number of independent root-parallel searches. 1 disables threading.
    pub workers: usize,

    /// Run adapter contract checks (clone independence at the root, terminal
    /// consistency and result range at the end of every rollout).
    pub verify_adapter: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            budget: SearchBudget::Time(Duration::from_secs(1)),
            exploration: DEFAULT_EXPLORATION,
            max_rollout_moves: DEFAULT_MAX_ROLLOUT_MOVES,
            workers: 1,
            verify_adapter: true,
        }
    }
}

impl MctsConfig {
    /// Create a fast, deterministic config for testing.
    pub fn for_testing() -> Self {
        Self {
            budget: SearchBudget::Iterations(200),
            exploration: DEFAULT_EXPLORATION,
            max_rollout_moves: 1_000,
            workers: 1,
            verify_adapter: true,
        }
    }

    /// Builder pattern: set a wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.budget = SearchBudget::Time(budget);
        self
    }

    /// Builder pattern: set a fixed iteration budget.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.budget = SearchBudget::Iterations(n);
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the rollout length cap.
    pub fn with_max_rollout_moves(mut self, n: u32) -> Self {
        self.max_rollout_moves = n;
        self
    }

    /// Builder pattern: set the number of root-parallel workers.
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = n;
        self
    }

    /// Builder pattern: toggle adapter contract checks.
    pub fn with_adapter_checks(mut self, enabled: bool) -> Self {
        self.verify_adapter = enabled;
        self
    }

    /// Reject configurations the search cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !(self.exploration.is_finite() && self.exploration >= 0.0) {
            return Err(SearchError::InvalidConfig(
                "exploration must be finite and >= 0",
            ));
        }
        match self.budget {
            SearchBudget::Time(d) if d.is_zero() => {
                return Err(SearchError::InvalidConfig("time budget must be > 0"));
            }
            SearchBudget::Iterations(0) => {
                return Err(SearchError::InvalidConfig("iteration budget must be > 0"));
            }
            _ => {}
        }
        if self.max_rollout_moves == 0 {
            return Err(SearchError::InvalidConfig("max_rollout_moves must be > 0"));
        }
        if self.workers == 0 {
            return Err(SearchError::InvalidConfig("workers must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.budget, SearchBudget::Time(Duration::from_secs(1)));
        assert!((config.exploration - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(config.workers, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_iterations(100)
            .with_exploration(0.7)
            .with_workers(4);

        assert_eq!(config.budget, SearchBudget::Iterations(100));
        assert!((config.exploration - 0.7).abs() < 1e-12);
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(MctsConfig::default().with_iterations(0).validate().is_err());
        assert!(MctsConfig::default()
            .with_time_budget(Duration::ZERO)
            .validate()
            .is_err());
        assert!(MctsConfig::default()
            .with_exploration(f64::NAN)
            .validate()
            .is_err());
        assert!(MctsConfig::default()
            .with_exploration(-1.0)
            .validate()
            .is_err());
        assert!(MctsConfig::default().with_workers(0).validate().is_err());
        assert!(MctsConfig::default()
            .with_max_rollout_moves(0)
            .validate()
            .is_err());
    }
}
