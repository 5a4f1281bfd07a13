//! Shared utilities for two-player game implementations
//!
//! Common result bookkeeping used across rules engines so that every game
//! reports outcomes on the same scale.

use crate::game::Player;

/// Result value for a win.
pub const WIN: f64 = 1.0;
/// Result value for a draw (and the neutral value for unfinished games).
pub const DRAW: f64 = 0.5;
/// Result value for a loss.
pub const LOSS: f64 = 0.0;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Winner(Player),
    Draw,
}

impl Outcome {
    /// The winning player, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Winner(player) => Some(player),
            Outcome::Draw => None,
        }
    }
}

/// Calculate the result of a two-player zero-sum game.
///
/// # Arguments
/// * `outcome` - `None` while the game is still running
/// * `perspective` - The player whose result is requested
///
/// # Returns
/// * `1.0` if `perspective` won
/// * `0.0` if `perspective` lost
/// * `0.5` for draws or unfinished games
///
/// # Example
/// ```
/// use engine_core::game_utils::{result_for, Outcome};
/// use engine_core::Player;
///
/// assert_eq!(result_for(Some(Outcome::Winner(Player::One)), Player::One), 1.0);
/// assert_eq!(result_for(Some(Outcome::Winner(Player::One)), Player::Two), 0.0);
/// assert_eq!(result_for(Some(Outcome::Draw), Player::Two), 0.5);
/// assert_eq!(result_for(None, Player::One), 0.5);
/// ```
#[inline]
pub fn result_for(outcome: Option<Outcome>, perspective: Player) -> f64 {
    match outcome {
        Some(Outcome::Winner(winner)) if winner == perspective => WIN,
        Some(Outcome::Winner(_)) => LOSS,
        Some(Outcome::Draw) | None => DRAW,
    }
}

/// Classify a result value as reported by [`crate::GameState::result`].
///
/// Values above one half count as a win for `perspective`, below as a loss.
pub fn outcome_from_result(value: f64, perspective: Player) -> Outcome {
    if value > DRAW {
        Outcome::Winner(perspective)
    } else if value < DRAW {
        Outcome::Winner(perspective.opponent())
    } else {
        Outcome::Draw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_are_zero_sum_complements() {
        let outcomes = [
            Some(Outcome::Winner(Player::One)),
            Some(Outcome::Winner(Player::Two)),
            Some(Outcome::Draw),
        ];
        for outcome in outcomes {
            let one = result_for(outcome, Player::One);
            let two = result_for(outcome, Player::Two);
            assert!((one + two - 1.0).abs() < f64::EPSILON);
            assert!([WIN, DRAW, LOSS].contains(&one));
        }
    }

    #[test]
    fn test_outcome_from_result() {
        assert_eq!(
            outcome_from_result(1.0, Player::Two),
            Outcome::Winner(Player::Two)
        );
        assert_eq!(
            outcome_from_result(0.0, Player::Two),
            Outcome::Winner(Player::One)
        );
        assert_eq!(outcome_from_result(0.5, Player::One), Outcome::Draw);
        assert_eq!(Outcome::Draw.winner(), None);
    }
}
