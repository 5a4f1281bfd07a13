//! Tests for the contract checks

use super::contract::{check_result, check_terminal_consistency, verify_clone_independence};
use super::*;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Take(u8);

impl GameMove for Take {}

// Subtraction game: players alternately take 1 or 2 counters, taking the last one wins.
#[derive(Debug, Clone)]
struct Counters {
    left: u8,
    just_moved: Player,
}

impl GameState for Counters {
    type Move = Take;

    fn current_player(&self) -> Player {
        self.just_moved.opponent()
    }

    fn player_just_moved(&self) -> Player {
        self.just_moved
    }

    fn legal_moves(&self) -> Vec<Take> {
        (1..=2u8).filter(|&n| n <= self.left).map(Take).collect()
    }

    fn do_move(&mut self, mv: &Take) -> Result<(), AdapterError> {
        if mv.0 == 0 || mv.0 > 2 || mv.0 > self.left {
            return Err(AdapterError::illegal(mv, "not enough counters"));
        }
        self.left -= mv.0;
        self.just_moved = self.just_moved.opponent();
        Ok(())
    }

    fn result(&self, perspective: Player) -> f64 {
        if self.left == 0 && self.just_moved == perspective {
            1.0
        } else {
            0.0
        }
    }
}

// Same game, but the counter pile is shared between clones.
#[derive(Debug, Clone)]
struct SharedCounters {
    left: Arc<Mutex<u8>>,
    just_moved: Player,
}

impl GameState for SharedCounters {
    type Move = Take;

    fn current_player(&self) -> Player {
        self.just_moved.opponent()
    }

    fn player_just_moved(&self) -> Player {
        self.just_moved
    }

    fn legal_moves(&self) -> Vec<Take> {
        let left = *self.left.lock().unwrap();
        (1..=2u8).filter(|&n| n <= left).map(Take).collect()
    }

    fn do_move(&mut self, mv: &Take) -> Result<(), AdapterError> {
        let mut left = self.left.lock().unwrap();
        if mv.0 > *left {
            return Err(AdapterError::illegal(mv, "not enough counters"));
        }
        *left -= mv.0;
        Ok(())
    }

    fn result(&self, _perspective: Player) -> f64 {
        0.5
    }
}

// Claims to be over while still offering moves.
#[derive(Debug, Clone)]
struct EagerEnd;

impl GameState for EagerEnd {
    type Move = Take;

    fn current_player(&self) -> Player {
        Player::One
    }

    fn player_just_moved(&self) -> Player {
        Player::Two
    }

    fn legal_moves(&self) -> Vec<Take> {
        vec![Take(1)]
    }

    fn do_move(&mut self, _mv: &Take) -> Result<(), AdapterError> {
        Ok(())
    }

    fn result(&self, _perspective: Player) -> f64 {
        0.5
    }

    fn is_terminal(&self) -> bool {
        true
    }
}

#[test]
fn test_clone_has_identical_moves() {
    let state = Counters {
        left: 5,
        just_moved: Player::Two,
    };
    let clone = state.clone();
    assert_eq!(clone.legal_moves(), state.legal_moves());
    assert_eq!(clone.current_player(), state.current_player());
}

#[test]
fn test_independent_clone_passes() {
    let state = Counters {
        left: 5,
        just_moved: Player::Two,
    };
    assert!(verify_clone_independence(&state).is_ok());
}

#[test]
fn test_terminal_state_passes_clone_check() {
    let state = Counters {
        left: 0,
        just_moved: Player::One,
    };
    assert!(verify_clone_independence(&state).is_ok());
}

#[test]
fn test_aliasing_clone_is_detected() {
    // Taking one of two counters through the clone shrinks the source's move list.
    let state = SharedCounters {
        left: Arc::new(Mutex::new(2)),
        just_moved: Player::Two,
    };
    let err = verify_clone_independence(&state).unwrap_err();
    assert!(!err.is_illegal_move());
    assert!(err.to_string().contains("changed its source"));
}

#[test]
fn test_terminal_consistency() {
    let state = Counters {
        left: 3,
        just_moved: Player::Two,
    };
    let moves = state.legal_moves();
    assert!(check_terminal_consistency(&state, &moves).is_ok());

    let eager = EagerEnd;
    let moves = eager.legal_moves();
    let err = check_terminal_consistency(&eager, &moves).unwrap_err();
    assert!(matches!(err, AdapterError::ContractViolation(_)));
}

#[test]
fn test_do_move_is_atomic_on_rejection() {
    let mut state = Counters {
        left: 1,
        just_moved: Player::Two,
    };
    let err = state.do_move(&Take(2)).unwrap_err();
    assert!(err.is_illegal_move());
    assert_eq!(state.left, 1);
    assert_eq!(state.player_just_moved(), Player::Two);
}

#[test]
fn test_check_result_range() {
    assert_eq!(check_result(1.0, Player::One).unwrap(), 1.0);
    assert_eq!(check_result(0.5, Player::One).unwrap(), 0.5);
    assert!(check_result(1.5, Player::Two).is_err());
    assert!(check_result(-0.1, Player::Two).is_err());
    assert!(check_result(f64::NAN, Player::One).is_err());
}

#[test]
fn test_terminal_results_are_discrete() {
    let mut state = Counters {
        left: 2,
        just_moved: Player::Two,
    };
    state.do_move(&Take(2)).unwrap();
    assert!(state.is_terminal());
    for player in Player::ALL {
        let value = state.result(player);
        assert!([0.0, 0.5, 1.0].contains(&value));
    }
    assert_eq!(state.result(Player::One), 1.0);
    assert_eq!(state.result(Player::Two), 0.0);
}
