//! Episode loop.
//!
//! The driver owns the live game state. Each decision lends it to the search,
//! applies the returned move exactly once, and stops at a terminal state. A
//! move the live state rejects aborts the episode with the cause.

use std::fmt::Display;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use engine_core::game_utils::{outcome_from_result, Outcome};
use engine_core::{GameState, Player};
use games_duel::DuelState;
use indicatif::{ProgressBar, ProgressStyle};
use mcts::{run_uct, CancelToken, SearchError, UniformRollout};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::stats::{DriverStats, EpisodeStats};

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    Finished(Outcome),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct EpisodeReport {
    pub end: EpisodeEnd,
    pub stats: EpisodeStats,
}

pub struct Driver {
    config: Config,
    policy: UniformRollout,
    cancel: CancelToken,
    stats: DriverStats,
}

impl Driver {
    pub fn new(config: Config, cancel: CancelToken) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            policy: UniformRollout::new(),
            cancel,
            stats: DriverStats::new(),
        })
    }

    /// Play every configured episode, or until cancelled.
    pub fn run(&self) -> Result<()> {
        info!(
            episodes = self.config.episodes,
            seed = self.config.seed,
            workers = self.config.workers,
            budget = ?self.config.search_config().budget,
            "Driver starting"
        );

        // Progress bar only when stderr is a TTY
        let progress = if self.config.progress && std::io::IsTerminal::is_terminal(&std::io::stderr())
        {
            let pb = ProgressBar::new(self.config.episodes as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} episodes ({eta})")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for episode in 1..=self.config.episodes {
            if self.cancel.is_cancelled() {
                info!("Cancelled, stopping before episode {}", episode);
                break;
            }

            let started = Instant::now();
            let report = self
                .run_episode(episode)
                .with_context(|| format!("episode {} failed", episode))?;

            match report.end {
                EpisodeEnd::Finished(outcome) => {
                    self.stats.record_episode(&report.stats, outcome);
                    let log = || {
                        info!(
                            episode,
                            outcome = %describe(outcome),
                            decisions = report.stats.decisions,
                            secs = format!("{:.2}", started.elapsed().as_secs_f64()),
                            "Episode completed"
                        );
                        report.stats.log_summary(episode);
                    };
                    // Suspend progress bar while logging to avoid visual glitches
                    match progress {
                        Some(ref pb) => pb.suspend(log),
                        None => log(),
                    }
                }
                EpisodeEnd::Cancelled => {
                    self.stats.record_searches(&report.stats);
                    info!(
                        episode,
                        decisions = report.stats.decisions,
                        "Episode cancelled"
                    );
                    break;
                }
            }

            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }
        self.stats.log_summary();
        Ok(())
    }

    /// Play one duel from the first draft pick. Episode `n` is seeded with
    /// `seed + n`, so a run can be replayed episode by episode.
    pub fn run_episode(&self, episode: u32) -> Result<EpisodeReport> {
        let mut rng = ChaCha20Rng::seed_from_u64(self.config.seed.wrapping_add(episode as u64));
        let state = DuelState::new(self.config.duel_config(rng.gen()));
        debug!(episode, "Starting episode");
        self.play(state, &mut rng)
    }

    /// Drive `state` to a terminal state with UCT choosing every move.
    pub fn play<S>(&self, mut state: S, rng: &mut ChaCha20Rng) -> Result<EpisodeReport>
    where
        S: GameState + Display,
        S::Move: Display,
    {
        let search_config = self.config.search_config();
        let mut stats = EpisodeStats::default();

        loop {
            if state.legal_moves().is_empty() {
                let outcome = outcome_from_result(state.result(Player::One), Player::One);
                debug!(decisions = stats.decisions, %state, "Terminal state reached");
                return Ok(EpisodeReport {
                    end: EpisodeEnd::Finished(outcome),
                    stats,
                });
            }

            if self.cancel.is_cancelled() {
                return Ok(EpisodeReport {
                    end: EpisodeEnd::Cancelled,
                    stats,
                });
            }

            if stats.decisions >= self.config.max_decisions {
                warn!(
                    "Episode exceeded max decisions ({}) without terminating",
                    self.config.max_decisions
                );
                bail!(
                    "episode exceeded {} decisions without terminating",
                    self.config.max_decisions
                );
            }

            let result = match run_uct(
                &state,
                &self.policy,
                search_config.clone(),
                rng,
                Some(&self.cancel),
            ) {
                Ok(result) => result,
                // Cancelled before the first iteration finished
                Err(SearchError::DegenerateSearch { .. }) if self.cancel.is_cancelled() => {
                    return Ok(EpisodeReport {
                        end: EpisodeEnd::Cancelled,
                        stats,
                    });
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("search failed at decision {}", stats.decisions))
                }
            };
            stats.add(&result.stats);

            debug!(
                "decision {} by {}: {}\n{}",
                stats.decisions,
                state.current_player(),
                state,
                result
            );

            state
                .do_move(&result.best_move)
                .with_context(|| format!("live state rejected {}", result.best_move))?;
            stats.decisions += 1;
        }
    }
}

fn describe(outcome: Outcome) -> String {
    match outcome.winner() {
        Some(player) => format!("{} wins", player),
        None => "draw".to_string(),
    }
}
