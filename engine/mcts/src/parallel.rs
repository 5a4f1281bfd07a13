//! Root-parallel search.
//!
//! Each worker builds its own tree from its own clones of the root state, with
//! a generator seeded from the caller's. When every worker is done, root child
//! statistics are merged by move and the most visited move wins. Workers never
//! share mutable state, so the merged result is as reproducible as a single
//! search under an iteration budget.

use std::thread;
use std::time::Instant;

use engine_core::contract::verify_clone_independence;
use engine_core::GameState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::config::MctsConfig;
use crate::report::ChildStats;
use crate::rollout::RolloutPolicy;
use crate::search::{CancelToken, SearchError, SearchResult, SearchStats, UctSearch};

/// Run `config.workers` independent searches on scoped threads and merge them.
///
/// A worker that ends without root children contributes only its iteration
/// count. Any other worker error aborts the whole search.
pub fn run_root_parallel<S, P>(
    root_state: &S,
    policy: &P,
    config: MctsConfig,
    rng: &mut ChaCha20Rng,
    cancel: Option<&CancelToken>,
) -> Result<SearchResult<S::Move>, SearchError>
where
    S: GameState,
    P: RolloutPolicy<S>,
{
    config.validate()?;
    if config.verify_adapter {
        verify_clone_independence(root_state)?;
    }

    let workers = config.workers;
    let worker_config = config.with_workers(1);
    let seeds: Vec<u64> = (0..workers).map(|_| rng.gen()).collect();
    let start = Instant::now();

    let outcomes: Vec<Result<SearchResult<S::Move>, SearchError>> = thread::scope(|scope| {
        let handles: Vec<_> = seeds
            .iter()
            .map(|&seed| {
                let config = worker_config.clone();
                let cancel = cancel.cloned();
                scope.spawn(move || -> Result<SearchResult<S::Move>, SearchError> {
                    let mut rng = ChaCha20Rng::seed_from_u64(seed);
                    let mut search = UctSearch::new(root_state, policy, config)?;
                    if let Some(token) = cancel {
                        search = search.with_cancel(token);
                    }
                    search.run(&mut rng)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(SearchError::WorkerPanicked))
            })
            .collect()
    });

    let mut stats = SearchStats::default();
    let mut merged: Vec<ChildStats<S::Move>> = Vec::new();

    for outcome in outcomes {
        let result = match outcome {
            Ok(result) => result,
            Err(SearchError::DegenerateSearch { iterations }) => {
                stats.iterations += iterations;
                stats.discarded += iterations;
                continue;
            }
            Err(e) => return Err(e),
        };

        stats.iterations += result.stats.iterations;
        stats.discarded += result.stats.discarded;
        stats.tree_nodes += result.stats.tree_nodes;
        stats.max_depth = stats.max_depth.max(result.stats.max_depth);
        stats.cancelled |= result.stats.cancelled;

        for child in result.children {
            match merged.iter_mut().find(|m| m.mv == child.mv) {
                Some(existing) => {
                    existing.visits += child.visits;
                    existing.value_sum += child.value_sum;
                }
                None => merged.push(child),
            }
        }
    }
    stats.elapsed = start.elapsed();

    // Stable: equal visit counts keep first-seen order
    merged.sort_by_key(|c| std::cmp::Reverse(c.visits));

    let best_move = merged
        .first()
        .map(|c| c.mv.clone())
        .ok_or(SearchError::DegenerateSearch {
            iterations: stats.iterations,
        })?;

    debug!(
        workers,
        iterations = stats.iterations,
        discarded = stats.discarded,
        nodes = stats.tree_nodes,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        best = ?best_move,
        "root-parallel search complete"
    );

    Ok(SearchResult {
        best_move,
        children: merged,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollout::UniformRollout;
    use crate::search::run_uct;
    use crate::test_games::{Branch, Fork, Minefield, Nim, Step, Take};
    use games_tictactoe::TicTacToe;

    #[test]
    fn test_parallel_merges_worker_visits() {
        let config = MctsConfig::for_testing()
            .with_iterations(100)
            .with_workers(4);
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = run_uct(&TicTacToe::new(), &UniformRollout, config, &mut rng, None).unwrap();

        assert_eq!(result.stats.iterations, 400);
        let visits: u32 = result.children.iter().map(|c| c.visits).sum();
        assert_eq!(visits, 400);
        assert_eq!(result.children[0].mv, result.best_move);
        for pair in result.children.windows(2) {
            assert!(pair[0].visits >= pair[1].visits);
        }
    }

    #[test]
    fn test_parallel_is_deterministic() {
        let run = || {
            let config = MctsConfig::for_testing()
                .with_iterations(150)
                .with_workers(3);
            let mut rng = ChaCha20Rng::seed_from_u64(7);
            run_uct(&Nim::new(10), &UniformRollout, config, &mut rng, None).unwrap()
        };
        let a = run();
        let b = run();

        assert_eq!(a.best_move, b.best_move);
        let visits = |r: &SearchResult<Take>| {
            r.children
                .iter()
                .map(|c| (c.mv, c.visits))
                .collect::<Vec<_>>()
        };
        assert_eq!(visits(&a), visits(&b));
    }

    #[test]
    fn test_parallel_prefers_win() {
        let config = MctsConfig::for_testing().with_iterations(10).with_workers(2);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let result = run_uct(&Fork::new(), &UniformRollout, config, &mut rng, None).unwrap();
        assert_eq!(result.best_move, Branch::Win);
    }

    #[test]
    fn test_parallel_counts_discards() {
        let config = MctsConfig::for_testing().with_iterations(20).with_workers(2);
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let result = run_uct(&Minefield::new(), &UniformRollout, config, &mut rng, None).unwrap();

        assert_eq!(result.best_move, Step::Safe);
        assert_eq!(result.stats.iterations, 40);
        assert_eq!(
            result.children[0].visits,
            result.stats.iterations - result.stats.discarded
        );
    }

    #[test]
    fn test_parallel_all_degenerate() {
        let config = MctsConfig::for_testing().with_iterations(5).with_workers(3);
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let err = run_uct(
            &Minefield::risky_only(),
            &UniformRollout,
            config,
            &mut rng,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::DegenerateSearch { iterations: 15 }));
    }
}
