//! Rollout policies.
//!
//! A rollout policy picks moves during simulation (and, by default, which
//! untried move to expand). The search ships with a uniform random policy;
//! smarter policies can be plugged in without touching the tree code.

use engine_core::GameState;
use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// Trait for move selection inside the search.
///
/// Policies return an index into the slice they are given. An index out of
/// range is reported by the search as [`crate::SearchError::InvalidPolicyChoice`].
pub trait RolloutPolicy<S: GameState>: Send + Sync {
    /// Pick the next move of a rollout. `moves` is never empty.
    fn choose_rollout(&self, state: &S, moves: &[S::Move], rng: &mut ChaCha20Rng) -> usize;

    /// Pick which untried move to expand. `untried` is never empty.
    /// Default implementation defers to [`RolloutPolicy::choose_rollout`].
    fn choose_expansion(&self, state: &S, untried: &[S::Move], rng: &mut ChaCha20Rng) -> usize {
        self.choose_rollout(state, untried, rng)
    }
}

/// Uniform random policy over the offered moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRollout;

impl UniformRollout {
    pub fn new() -> Self {
        Self
    }
}

impl<S: GameState> RolloutPolicy<S> for UniformRollout {
    fn choose_rollout(&self, _state: &S, moves: &[S::Move], rng: &mut ChaCha20Rng) -> usize {
        rng.gen_range(0..moves.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_games::Nim;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_rollout_stays_in_range() {
        let state = Nim::new(5);
        let moves = state.legal_moves();
        let policy = UniformRollout::new();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let mut seen = [false; 3];
        for _ in 0..200 {
            let idx = policy.choose_rollout(&state, &moves, &mut rng);
            assert!(idx < moves.len());
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s), "uniform policy should cover all moves");
    }

    #[test]
    fn test_expansion_defaults_to_rollout_choice() {
        let state = Nim::new(5);
        let moves = state.legal_moves();
        let policy = UniformRollout;

        let mut a = ChaCha20Rng::seed_from_u64(7);
        let mut b = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(
                policy.choose_expansion(&state, &moves, &mut a),
                policy.choose_rollout(&state, &moves, &mut b)
            );
        }
    }
}
