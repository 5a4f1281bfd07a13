//! Runtime checks for the guarantees the search relies on.
//!
//! These are cheap enough to run once per search (clone independence) or once
//! per rollout (terminal consistency, result range). Every failure is an
//! [`AdapterError::ContractViolation`], which the search treats as fatal.

use crate::error::AdapterError;
use crate::game::{GameState, Player};

/// Verify that a clone is content-identical to its source and fully independent.
///
/// The clone must report the same legal moves in the same order. After one move
/// is applied to the clone, the source must still report its original moves and
/// current player. A rejected probe move is fine (the clone is simply dropped);
/// only observable aliasing is a violation.
pub fn verify_clone_independence<S: GameState>(state: &S) -> Result<(), AdapterError> {
    let before = state.legal_moves();
    let player_before = state.current_player();
    let mut probe = state.clone();

    if probe.legal_moves() != before {
        return Err(AdapterError::violation(
            "clone reports different legal moves than its source",
        ));
    }
    if probe.current_player() != player_before {
        return Err(AdapterError::violation(
            "clone reports a different current player than its source",
        ));
    }

    if let Some(mv) = before.first() {
        match probe.do_move(mv) {
            Ok(()) => {}
            Err(e) if e.is_illegal_move() => {
                return Err(AdapterError::violation(format!(
                    "first enumerated move was rejected: {}",
                    e
                )))
            }
            Err(e) => return Err(e),
        }
        if state.legal_moves() != before || state.current_player() != player_before {
            return Err(AdapterError::violation(
                "mutating a clone changed its source",
            ));
        }
    }

    Ok(())
}

/// Check that `is_terminal()` agrees with an already enumerated move list.
pub fn check_terminal_consistency<S: GameState>(
    state: &S,
    moves: &[S::Move],
) -> Result<(), AdapterError> {
    let terminal = state.is_terminal();
    if terminal != moves.is_empty() {
        return Err(AdapterError::violation(format!(
            "is_terminal() = {} but {} legal moves were enumerated",
            terminal,
            moves.len()
        )));
    }
    Ok(())
}

/// Check that a terminal result lies in `[0.0, 1.0]`.
pub fn check_result(value: f64, perspective: Player) -> Result<f64, AdapterError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(AdapterError::violation(format!(
            "result for {} out of range: {}",
            perspective, value
        )))
    }
}
