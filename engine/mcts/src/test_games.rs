//! Tiny games for exercising the search.

use std::fmt;

use engine_core::{AdapterError, GameMove, GameState, Player};

/// Take `n` counters from the pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Take(pub u8);

impl GameMove for Take {}

impl fmt::Display for Take {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "take {}", self.0)
    }
}

/// Subtraction game: take 1 to 3 counters, taking the last one wins.
#[derive(Debug, Clone)]
pub struct Nim {
    left: u8,
    just_moved: Player,
}

impl Nim {
    pub fn new(left: u8) -> Self {
        Self {
            left,
            just_moved: Player::Two,
        }
    }
}

impl GameState for Nim {
    type Move = Take;

    fn current_player(&self) -> Player {
        self.just_moved.opponent()
    }

    fn player_just_moved(&self) -> Player {
        self.just_moved
    }

    fn legal_moves(&self) -> Vec<Take> {
        (1..=3u8).filter(|&n| n <= self.left).map(Take).collect()
    }

    fn do_move(&mut self, mv: &Take) -> Result<(), AdapterError> {
        if mv.0 == 0 || mv.0 > 3 || mv.0 > self.left {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Lose,
    Win,
}

impl GameMove for Branch {}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One decision: the first player either wins or loses on the spot.
#[derive(Debug, Clone, Default)]
pub struct Fork {
    taken: Option<Branch>,
}

impl Fork {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameState for Fork {
    type Move = Branch;

    fn current_player(&self) -> Player {
        self.player_just_moved().opponent()
    }

    fn player_just_moved(&self) -> Player {
        if self.taken.is_some() {
            Player::One
        } else {
            Player::Two
        }
    }

    fn legal_moves(&self) -> Vec<Branch> {
        match self.taken {
            None => vec![Branch::Lose, Branch::Win],
            Some(_) => Vec::new(),
        }
    }

    fn do_move(&mut self, mv: &Branch) -> Result<(), AdapterError> {
        if self.taken.is_some() {
            return Err(AdapterError::illegal(mv, "game is over"));
        }
        self.taken = Some(*mv);
        Ok(())
    }

    fn result(&self, perspective: Player) -> f64 {
        let one_wins = self.taken == Some(Branch::Win);
        if one_wins == (perspective == Player::One) {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Safe,
    Risky,
    Decoy,
    Boom,
}

impl GameMove for Step {}

/// A game whose adapter enumerates moves it then refuses.
///
/// `Safe` wins immediately for the first player. `Risky` leads to a state whose
/// only move, `Boom`, is rejected. `Decoy` is rejected right away.
#[derive(Debug, Clone)]
pub struct Minefield {
    last: Option<Step>,
    opening: Vec<Step>,
}

impl Minefield {
    pub fn new() -> Self {
        Self {
            last: None,
            opening: vec![Step::Safe, Step::Risky, Step::Decoy],
        }
    }

    /// Only the risky path is offered, so no iteration can complete.
    pub fn risky_only() -> Self {
        Self {
            last: None,
            opening: vec![Step::Risky],
        }
    }
}

impl GameState for Minefield {
    type Move = Step;

    fn current_player(&self) -> Player {
        self.player_just_moved().opponent()
    }

    fn player_just_moved(&self) -> Player {
        match self.last {
            None | Some(Step::Boom) => Player::Two,
            Some(_) => Player::One,
        }
    }

    fn legal_moves(&self) -> Vec<Step> {
        match self.last {
            None => self.opening.clone(),
            Some(Step::Risky) => vec![Step::Boom],
            Some(_) => Vec::new(),
        }
    }

    fn do_move(&mut self, mv: &Step) -> Result<(), AdapterError> {
        match (self.last, mv) {
            (None, Step::Safe | Step::Risky) => {
                self.last = Some(*mv);
                Ok(())
            }
            (_, Step::Decoy) => Err(AdapterError::illegal(mv, "decoy")),
            (_, Step::Boom) => Err(AdapterError::illegal(mv, "mine")),
            _ => Err(AdapterError::illegal(mv, "not available")),
        }
    }

    fn result(&self, perspective: Player) -> f64 {
        if (self.last == Some(Step::Safe)) == (perspective == Player::One) {
            1.0
        } else {
            0.0
        }
    }
}

/// Never ends.
#[derive(Debug, Clone, Copy)]
pub struct Endless;

impl GameState for Endless {
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
}
