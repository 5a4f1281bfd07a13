//! Driver statistics.
//!
//! Two levels are tracked:
//! - [`EpisodeStats`]: search counters for a single episode
//! - [`DriverStats`]: match tally and totals over the whole run, designed for
//!   lock-free updates so the shutdown path can read it at any time

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use engine_core::game_utils::Outcome;
use engine_core::Player;
use mcts::SearchStats;
use tracing::info;

/// Search counters accumulated over one episode.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EpisodeStats {
    /// Moves applied to the live state
    pub decisions: u32,
    /// Searches run (one per decision)
    pub searches: u32,
    pub iterations: u64,
    pub discarded: u64,
    pub tree_nodes: u64,
    /// Deepest tree seen in any search
    pub max_depth: u32,
    pub search_time: Duration,
}

impl EpisodeStats {
    /// Add stats from a single search.
    pub fn add(&mut self, stats: &SearchStats) {
        self.searches += 1;
        self.iterations += stats.iterations as u64;
        self.discarded += stats.discarded as u64;
        self.tree_nodes += stats.tree_nodes as u64;
        self.max_depth = self.max_depth.max(stats.max_depth);
        self.search_time += stats.elapsed;
    }

    /// Mean iterations per search.
    pub fn avg_iterations(&self) -> f64 {
        if self.searches == 0 {
            return 0.0;
        }
        self.iterations as f64 / self.searches as f64
    }

    /// Log a summary of the episode stats.
    pub fn log_summary(&self, episode_num: u32) {
        if self.searches == 0 {
            return;
        }

        let discarded_pct = if self.iterations > 0 {
            self.discarded as f64 / self.iterations as f64 * 100.0
        } else {
            0.0
        };
        let iterations_per_sec = if self.search_time.is_zero() {
            0.0
        } else {
            self.iterations as f64 / self.search_time.as_secs_f64()
        };

        info!(
            episode = episode_num,
            decisions = self.decisions,
            searches = self.searches,
            avg_iterations = format!("{:.0}", self.avg_iterations()),
            discarded_pct = format!("{:.1}%", discarded_pct),
            iterations_per_sec = format!("{:.0}", iterations_per_sec),
            max_depth = self.max_depth,
            search_ms = format!("{:.1}", self.search_time.as_secs_f64() * 1000.0),
            "UCT episode stats"
        );
    }
}

/// Aggregated run statistics.
#[derive(Debug)]
pub struct DriverStats {
    episodes_completed: AtomicU32,
    player1_wins: AtomicU32,
    player2_wins: AtomicU32,
    draws: AtomicU32,
    total_decisions: AtomicU64,
    total_searches: AtomicU64,
    total_iterations: AtomicU64,
    total_discarded: AtomicU64,
    /// Total search time (microseconds)
    search_time_us: AtomicU64,
    start_time: Instant,
}

/// Point-in-time copy of [`DriverStats`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub episodes_completed: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub draws: u32,
    pub total_decisions: u64,
    pub total_searches: u64,
    pub total_iterations: u64,
    pub total_discarded: u64,
    pub avg_decisions_per_episode: f64,
    pub avg_search_ms: f64,
    pub runtime_seconds: f64,
}

impl DriverStats {
    pub fn new() -> Self {
        Self {
            episodes_completed: AtomicU32::new(0),
            player1_wins: AtomicU32::new(0),
            player2_wins: AtomicU32::new(0),
            draws: AtomicU32::new(0),
            total_decisions: AtomicU64::new(0),
            total_searches: AtomicU64::new(0),
            total_iterations: AtomicU64::new(0),
            total_discarded: AtomicU64::new(0),
            search_time_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a finished episode and its outcome.
    pub fn record_episode(&self, episode: &EpisodeStats, outcome: Outcome) {
        self.episodes_completed.fetch_add(1, Ordering::Relaxed);
        match outcome.winner() {
            Some(Player::One) => self.player1_wins.fetch_add(1, Ordering::Relaxed),
            Some(Player::Two) => self.player2_wins.fetch_add(1, Ordering::Relaxed),
            None => self.draws.fetch_add(1, Ordering::Relaxed),
        };
        self.record_searches(episode);
    }

    /// Record the search work of an episode that did not finish.
    pub fn record_searches(&self, episode: &EpisodeStats) {
        self.total_decisions
            .fetch_add(episode.decisions as u64, Ordering::Relaxed);
        self.total_searches
            .fetch_add(episode.searches as u64, Ordering::Relaxed);
        self.total_iterations
            .fetch_add(episode.iterations, Ordering::Relaxed);
        self.total_discarded
            .fetch_add(episode.discarded, Ordering::Relaxed);
        self.search_time_us.fetch_add(
            episode.search_time.as_micros() as u64,
            Ordering::Relaxed,
        );
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let episodes = self.episodes_completed.load(Ordering::Relaxed);
        let decisions = self.total_decisions.load(Ordering::Relaxed);
        let searches = self.total_searches.load(Ordering::Relaxed);
        let search_time_us = self.search_time_us.load(Ordering::Relaxed);

        let avg_decisions_per_episode = if episodes > 0 {
            decisions as f64 / episodes as f64
        } else {
            0.0
        };
        let avg_search_ms = if searches > 0 {
            search_time_us as f64 / searches as f64 / 1000.0
        } else {
            0.0
        };

        StatsSnapshot {
            episodes_completed: episodes,
            player1_wins: self.player1_wins.load(Ordering::Relaxed),
            player2_wins: self.player2_wins.load(Ordering::Relaxed),
            draws: self.draws.load(Ordering::Relaxed),
            total_decisions: decisions,
            total_searches: searches,
            total_iterations: self.total_iterations.load(Ordering::Relaxed),
            total_discarded: self.total_discarded.load(Ordering::Relaxed),
            avg_decisions_per_episode,
            avg_search_ms,
            runtime_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }

    /// Log the match tally and totals.
    pub fn log_summary(&self) {
        let s = self.snapshot();
        info!(
            episodes = s.episodes_completed,
            player1_wins = s.player1_wins,
            player2_wins = s.player2_wins,
            draws = s.draws,
            decisions = s.total_decisions,
            iterations = s.total_iterations,
            discarded = s.total_discarded,
            avg_decisions = format!("{:.1}", s.avg_decisions_per_episode),
            avg_search_ms = format!("{:.1}", s.avg_search_ms),
            runtime_secs = format!("{:.1}", s.runtime_seconds),
            "Run summary"
        );
    }
}

impl Default for DriverStats {
    fn default() -> Self {
        Self::new()
    }
}
