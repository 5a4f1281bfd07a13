//! UCT search implementation.
//!
//! Implements the anytime UCT loop:
//! 1. Selection: descend with UCB1 while a node is fully expanded
//! 2. Expansion: build one pending child for an untried move
//! 3. Simulation: play the rollout policy to a terminal state
//! 4. Backpropagation: attach the pending child and update statistics up to the root
//!
//! An illegal move anywhere in steps 1-3 discards the iteration: the tree is
//! left exactly as it was, apart from pruning an expansion move the state
//! refused outright.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use engine_core::contract::{check_result, check_terminal_consistency, verify_clone_independence};
use engine_core::{AdapterError, GameState, Player};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace, Level};

use crate::config::{MctsConfig, SearchBudget};
use crate::node::{MctsNode, NodeId};
use crate::parallel;
use crate::report::ChildStats;
use crate::rollout::RolloutPolicy;
use crate::tree::MctsTree;

/// Errors that can occur during UCT search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search config: {0}")]
    InvalidConfig(&'static str),

    #[error("search produced no root children after {iterations} iterations")]
    DegenerateSearch { iterations: u32 },

    #[error("move {mv} is not in the parent's untried list")]
    UntriedMoveMissing { mv: String },

    #[error("policy chose index {index} out of {len} moves")]
    InvalidPolicyChoice { index: usize, len: usize },

    #[error("search worker panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// Shared flag that stops a running search at its next iteration boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counters describing one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Iterations attempted, discarded ones included
    pub iterations: u32,
    /// Iterations thrown away because of an illegal move
    pub discarded: u32,
    /// Nodes in the tree (summed over workers for parallel search)
    pub tree_nodes: usize,
    /// Deepest node below the root
    pub max_depth: u32,
    /// Wall-clock time spent searching
    pub elapsed: Duration,
    /// Whether the search stopped because of cancellation
    pub cancelled: bool,
}

impl SearchStats {
    /// Iterations that reached backpropagation.
    pub fn completed(&self) -> u32 {
        self.iterations - self.discarded
    }
}

/// Result of a UCT search.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// Most visited root move
    pub best_move: M,

    /// Root children, most visited first
    pub children: Vec<ChildStats<M>>,

    pub stats: SearchStats,
}

/// What happened to a single iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    Completed,
    Discarded,
}

/// UCT search state for one decision.
pub struct UctSearch<'a, S: GameState, P: RolloutPolicy<S>> {
    tree: MctsTree<S::Move>,
    root_state: &'a S,
    policy: &'a P,
    config: MctsConfig,
    cancel: Option<CancelToken>,
    iterations: u32,
    discarded: u32,
}

impl<'a, S: GameState, P: RolloutPolicy<S>> UctSearch<'a, S, P> {
    /// Create a new search rooted at `root_state`.
    ///
    /// The state is only borrowed; every iteration works on its own clone.
    pub fn new(root_state: &'a S, policy: &'a P, config: MctsConfig) -> Result<Self, SearchError> {
        config.validate()?;
        if config.verify_adapter {
            verify_clone_independence(root_state)?;
        }

        Ok(Self {
            tree: MctsTree::new(root_state),
            root_state,
            policy,
            config,
            cancel: None,
            iterations: 0,
            discarded: 0,
        })
    }

    /// Builder pattern: stop early when `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Run iterations until the budget runs out or the search is cancelled,
    /// then pick the most visited root move.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult<S::Move>, SearchError> {
        let start = Instant::now();

        let root = self.tree.get(self.tree.root());
        if root.untried.is_empty() && root.children.is_empty() {
            return Err(SearchError::DegenerateSearch {
                iterations: self.iterations,
            });
        }

        let mut cancelled = false;
        loop {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                cancelled = true;
                break;
            }
            let exhausted = match self.config.budget {
                SearchBudget::Time(limit) => start.elapsed() >= limit,
                SearchBudget::Iterations(n) => self.iterations >= n,
            };
            if exhausted {
                break;
            }
            self.iterate(rng)?;
        }

        self.finish(start.elapsed(), cancelled)
    }

    /// Run a single iteration (select -> expand -> simulate -> backpropagate).
    pub fn iterate(&mut self, rng: &mut ChaCha20Rng) -> Result<IterationOutcome, SearchError> {
        self.iterations += 1;
        let mut state = self.root_state.clone();

        // Selection
        let mut node_id = self.tree.root();
        loop {
            let node = self.tree.get(node_id);
            if !node.untried.is_empty() || node.children.is_empty() {
                break;
            }
            let Some(child_id) = self.tree.select_child(node_id, self.config.exploration) else {
                break;
            };
            if let Some(mv) = self.tree.get(child_id).mv.clone() {
                match state.do_move(&mv) {
                    Ok(()) => {}
                    Err(e) if e.is_illegal_move() => return Ok(self.discard(&e)),
                    Err(e) => return Err(e.into()),
                }
            }
            node_id = child_id;
        }

        // Expansion
        let mut pending = None;
        let untried = &self.tree.get(node_id).untried;
        if !untried.is_empty() {
            let index = self.policy.choose_expansion(&state, untried, rng);
            let mv = untried
                .get(index)
                .cloned()
                .ok_or(SearchError::InvalidPolicyChoice {
                    index,
                    len: untried.len(),
                })?;
            match state.do_move(&mv) {
                Ok(()) => pending = Some(MctsNode::new_child(node_id, mv, &state)),
                Err(e) if e.is_illegal_move() => {
                    // The state refused a move it enumerated; never offer it again
                    self.tree.prune_untried(node_id, &mv);
                    return Ok(self.discard(&e));
                }
                Err(e) => return Err(e.into()),
            }
        }

        // Simulation
        let results = match self.rollout(&mut state, rng) {
            Ok(results) => results,
            Err(SearchError::Adapter(e)) if e.is_illegal_move() => return Ok(self.discard(&e)),
            Err(e) => return Err(e),
        };

        // Backpropagation
        let leaf = match pending {
            Some(child) => self.tree.attach(child)?,
            None => node_id,
        };
        self.tree.backpropagate(leaf, results);

        trace!(
            iteration = self.iterations,
            leaf = leaf.0,
            result_p1 = results[0],
            "UCT iteration complete"
        );

        Ok(IterationOutcome::Completed)
    }

    /// Play the rollout policy from `state` to the end of the game and return
    /// the terminal result for both players.
    fn rollout(&self, state: &mut S, rng: &mut ChaCha20Rng) -> Result<[f64; 2], SearchError> {
        let mut steps = 0u32;
        loop {
            let moves = state.legal_moves();
            if moves.is_empty() {
                break;
            }
            if steps >= self.config.max_rollout_moves {
                return Err(AdapterError::violation(format!(
                    "rollout exceeded {} moves without reaching a terminal state",
                    self.config.max_rollout_moves
                ))
                .into());
            }
            let index = self.policy.choose_rollout(state, &moves, rng);
            let mv = moves.get(index).ok_or(SearchError::InvalidPolicyChoice {
                index,
                len: moves.len(),
            })?;
            state.do_move(mv)?;
            steps += 1;
        }

        let mut results = [0.0; 2];
        for player in Player::ALL {
            let value = state.result(player);
            results[player.index()] = if self.config.verify_adapter {
                check_result(value, player)?
            } else {
                value
            };
        }
        if self.config.verify_adapter {
            check_terminal_consistency(state, &[])?;
        }
        Ok(results)
    }

    fn discard(&mut self, err: &AdapterError) -> IterationOutcome {
        self.discarded += 1;
        trace!(iteration = self.iterations, error = %err, "UCT iteration discarded");
        IterationOutcome::Discarded
    }

    fn finish(
        &self,
        elapsed: Duration,
        cancelled: bool,
    ) -> Result<SearchResult<S::Move>, SearchError> {
        let root = self.tree.root();
        let tree_stats = self.tree.stats();
        let stats = SearchStats {
            iterations: self.iterations,
            discarded: self.discarded,
            tree_nodes: tree_stats.total_nodes,
            max_depth: tree_stats.max_depth,
            elapsed,
            cancelled,
        };

        let best_move = self
            .tree
            .best_child_by_visits(root)
            .and_then(|id| self.tree.get(id).mv.clone())
            .ok_or(SearchError::DegenerateSearch {
                iterations: self.iterations,
            })?;

        let children = self
            .tree
            .ranked_children(root)
            .into_iter()
            .filter_map(|id| ChildStats::from_node(self.tree.get(id)))
            .collect();

        debug!(
            iterations = stats.iterations,
            discarded = stats.discarded,
            nodes = stats.tree_nodes,
            depth = stats.max_depth,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            best = ?best_move,
            "UCT search complete"
        );
        if tracing::enabled!(Level::TRACE) {
            trace!("search tree:\n{}", self.tree.dump(3, 200));
        }

        Ok(SearchResult {
            best_move,
            children,
            stats,
        })
    }

    /// Get a reference to the search tree.
    pub fn tree(&self) -> &MctsTree<S::Move> {
        &self.tree
    }

    /// Iterations attempted so far and how many of them were discarded.
    pub fn counts(&self) -> (u32, u32) {
        (self.iterations, self.discarded)
    }
}

/// Convenience function to choose a move for `root_state`.
///
/// Runs a single search, or `config.workers` independent root-parallel searches
/// whose root statistics are merged.
pub fn run_uct<S, P>(
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
    if config.workers > 1 {
        return parallel::run_root_parallel(root_state, policy, config, rng, cancel);
    }
    let mut search = UctSearch::new(root_state, policy, config)?;
    if let Some(token) = cancel {
        search = search.with_cancel(token.clone());
    }
    search.run(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollout::UniformRollout;
    use crate::test_games::{Branch, Endless, Fork, Minefield, Nim, Step, Take};
    use engine_core::GameMove;
    use games_tictactoe::{Cell, TicTacToe};
    use rand::SeedableRng;

    fn node_stats<M: GameMove>(tree: &MctsTree<M>) -> Vec<(u32, f64, usize)> {
        tree.arena()
            .iter()
            .map(|n| (n.visit_count, n.value_sum, n.children.len()))
            .collect()
    }

    #[test]
    fn test_basic_search() {
        let state = TicTacToe::new();
        let config = MctsConfig::for_testing();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = run_uct(&state, &UniformRollout, config, &mut rng, None).unwrap();

        assert!(state.legal_moves().contains(&result.best_move));
        assert_eq!(result.stats.iterations, 200);
        assert_eq!(result.stats.discarded, 0);
        assert_eq!(result.children.len(), 9);
        assert_eq!(result.children[0].mv, result.best_move);

        let visits: u32 = result.children.iter().map(|c| c.visits).sum();
        assert_eq!(visits, 200);
    }

    #[test]
    fn test_finds_winning_move() {
        // Board:
        // X | X | _
        // O | O | _
        // _ | _ | _
        //
        // X should play cell 2 to win
        let state = TicTacToe::from_cells(&[0, 3, 1, 4]).unwrap();
        let config = MctsConfig::for_testing().with_iterations(2_000);
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = run_uct(&state, &UniformRollout, config, &mut rng, None).unwrap();
        assert_eq!(result.best_move, Cell(2));
    }

    #[test]
    fn test_win_beats_loss_for_any_seed() {
        for seed in 0..20 {
            for budget in [3, 4, 10, 50] {
                let config = MctsConfig::for_testing().with_iterations(budget);
                let mut rng = ChaCha20Rng::seed_from_u64(seed);
                let result =
                    run_uct(&Fork::new(), &UniformRollout, config, &mut rng, None).unwrap();
                assert_eq!(result.best_move, Branch::Win, "seed {} budget {}", seed, budget);
            }
        }
    }

    #[test]
    fn test_visit_invariants_after_search() {
        let state = Nim::new(9);
        let mut search =
            UctSearch::new(&state, &UniformRollout, MctsConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        search.run(&mut rng).unwrap();

        let tree = search.tree();
        assert_eq!(tree.get(tree.root()).visit_count, 200);
        for node in tree.arena() {
            let child_sum: u32 = node
                .children
                .iter()
                .map(|&c| tree.get(c).visit_count)
                .sum();
            assert!(child_sum <= node.visit_count);
            for &c in &node.children {
                assert!(tree.get(c).visit_count >= 1);
            }
        }
    }

    #[test]
    fn test_determinism_with_fixed_seed() {
        let state = TicTacToe::from_cells(&[4]).unwrap();
        let run = || {
            let mut rng = ChaCha20Rng::seed_from_u64(99);
            run_uct(
                &state,
                &UniformRollout,
                MctsConfig::for_testing().with_iterations(500),
                &mut rng,
                None,
            )
            .unwrap()
        };

        let a = run();
        let b = run();
        assert_eq!(a.best_move, b.best_move);
        let visits = |r: &SearchResult<Cell>| {
            r.children
                .iter()
                .map(|c| (c.mv, c.visits))
                .collect::<Vec<_>>()
        };
        assert_eq!(visits(&a), visits(&b));
    }

    #[test]
    fn test_terminal_root_is_degenerate() {
        let mut state = Nim::new(2);
        state.do_move(&Take(2)).unwrap();
        assert!(state.is_terminal());

        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let err = run_uct(
            &state,
            &UniformRollout,
            MctsConfig::for_testing(),
            &mut rng,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::DegenerateSearch { iterations: 0 }));
    }

    #[test]
    fn test_illegal_rollout_move_leaves_statistics_untouched() {
        let state = Minefield::new();
        let mut search =
            UctSearch::new(&state, &UniformRollout, MctsConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let mut saw_discard = false;
        for _ in 0..20 {
            let before = node_stats(search.tree());
            let nodes_before = search.tree().len();
            if search.iterate(&mut rng).unwrap() == IterationOutcome::Discarded {
                saw_discard = true;
                assert_eq!(node_stats(search.tree()), before);
                assert_eq!(search.tree().len(), nodes_before);
            }
        }
        assert!(saw_discard);
    }

    #[test]
    fn test_search_continues_after_discards() {
        let state = Minefield::new();
        let config = MctsConfig::for_testing().with_iterations(50);
        let mut rng = ChaCha20Rng::seed_from_u64(11);

        let result = run_uct(&state, &UniformRollout, config, &mut rng, None).unwrap();

        assert_eq!(result.stats.iterations, 50);
        assert!(result.stats.discarded > 0);
        assert_eq!(result.best_move, Step::Safe);
        // Only the safe branch ever completes a simulation
        assert_eq!(result.children.len(), 1);
        assert_eq!(result.children[0].visits, result.stats.completed());
    }

    #[test]
    fn test_rejected_expansion_move_is_pruned() {
        let state = Minefield::new();
        let mut search = UctSearch::new(
            &state,
            &UniformRollout,
            MctsConfig::for_testing().with_iterations(30),
        )
        .unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        search.run(&mut rng).unwrap();

        let root = search.tree().get(search.tree().root());
        assert!(!root.untried.contains(&Step::Decoy));
        assert!(!root.untried.contains(&Step::Safe));
    }

    #[test]
    fn test_all_iterations_discarded_is_degenerate() {
        let state = Minefield::risky_only();
        let config = MctsConfig::for_testing().with_iterations(10);
        let mut rng = ChaCha20Rng::seed_from_u64(2);

        let err = run_uct(&state, &UniformRollout, config, &mut rng, None).unwrap_err();
        assert!(matches!(err, SearchError::DegenerateSearch { iterations: 10 }));
    }

    #[test]
    fn test_endless_rollout_is_fatal() {
        let config = MctsConfig::for_testing().with_max_rollout_moves(50);
        let mut rng = ChaCha20Rng::seed_from_u64(4);

        let err = run_uct(&Endless, &UniformRollout, config, &mut rng, None).unwrap_err();
        match err {
            SearchError::Adapter(e) => assert!(!e.is_illegal_move()),
            other => panic!("expected contract violation, got {:?}", other),
        }
    }

    #[test]
    fn test_cancelled_search_stops_immediately() {
        let token = CancelToken::new();
        token.cancel();
        let config = MctsConfig::for_testing().with_time_budget(Duration::from_secs(60));
        let mut rng = ChaCha20Rng::seed_from_u64(4);

        // No iteration runs, so there is no child to pick
        let err = run_uct(&Nim::new(5), &UniformRollout, config, &mut rng, Some(&token))
            .unwrap_err();
        assert!(matches!(err, SearchError::DegenerateSearch { iterations: 0 }));
    }

    #[test]
    fn test_time_budget_returns_answer() {
        let config = MctsConfig::for_testing().with_time_budget(Duration::from_millis(20));
        let mut rng = ChaCha20Rng::seed_from_u64(4);

        let result = run_uct(&Nim::new(7), &UniformRollout, config, &mut rng, None).unwrap();
        assert!(result.stats.iterations > 0);
        assert!(!result.stats.cancelled);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = MctsConfig::for_testing().with_exploration(-1.0);
        let err = UctSearch::new(&Nim::new(3), &UniformRollout, config).err();
        assert!(matches!(err, Some(SearchError::InvalidConfig(_))));
    }

    struct OutOfRange;

    impl RolloutPolicy<Nim> for OutOfRange {
        fn choose_rollout(&self, _state: &Nim, moves: &[Take], _rng: &mut ChaCha20Rng) -> usize {
            moves.len()
        }
    }

    #[test]
    fn test_bad_policy_choice_is_an_error() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let err = run_uct(
            &Nim::new(3),
            &OutOfRange,
            MctsConfig::for_testing(),
            &mut rng,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SearchError::InvalidPolicyChoice { index: 3, len: 3 }
        ));
    }
}
