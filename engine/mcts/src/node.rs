//! MCTS tree node representation.
//!
//! Each node represents a game state reached by applying a move from the parent.
//! Nodes store visit statistics used for UCB1 selection and the moves that have
//! not been expanded yet. States themselves are never stored: the search replays
//! moves on a clone of the root.

use engine_core::{GameMove, GameState, Player};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode<M> {
    /// Parent node index (NONE for root). Only followed during backpropagation.
    pub parent: NodeId,

    /// Move that led to this node from parent (None for root)
    pub mv: Option<M>,

    /// Player who made `mv`; statistics are kept from this player's point of view
    pub player_just_moved: Player,

    /// Children in expansion order
    pub children: Vec<NodeId>,

    /// Number of completed simulations through this node
    pub visit_count: u32,

    /// Sum of results backpropagated through this node.
    /// Q = value_sum / visit_count
    pub value_sum: f64,

    /// Legal moves not expanded yet
    pub untried: Vec<M>,
}

impl<M: GameMove> MctsNode<M> {
    /// Create a new root node for `state`.
    pub fn new_root<S: GameState<Move = M>>(state: &S) -> Self {
        Self {
            parent: NodeId::NONE,
            mv: None,
            player_just_moved: state.player_just_moved(),
            children: Vec::new(),
            visit_count: 0,
            value_sum: 0.0,
            untried: state.legal_moves(),
        }
    }

    /// Create a child node reached by `mv`, where `state` is the state right
    /// after `mv` was applied.
    ///
    /// Moves that close a decision context get no untried moves: the node stays
    /// a leaf that is evaluated by rollouts only.
    pub fn new_child<S: GameState<Move = M>>(parent: NodeId, mv: M, state: &S) -> Self {
        let untried = if mv.closes_decision() {
            Vec::new()
        } else {
            state.legal_moves()
        };
        Self {
            parent,
            mv: Some(mv),
            player_just_moved: state.player_just_moved(),
            children: Vec::new(),
            visit_count: 0,
            value_sum: 0.0,
            untried,
        }
    }

    /// Record one completed simulation.
    #[inline]
    pub fn update(&mut self, result: f64) {
        self.visit_count += 1;
        self.value_sum += result;
    }

    /// Calculate mean value Q = value_sum / visit_count.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f64
        }
    }

    /// Calculate UCB1 score for child selection.
    /// UCB1 = Q + c * sqrt(2 * ln(N_parent) / N)
    ///
    /// Q is already from the perspective of the player choosing among siblings,
    /// because every child stores results for the player who moved into it.
    ///
    /// Takes pre-computed ln(parent_visits) to avoid redundant log calls when
    /// comparing multiple children. Unvisited nodes score +inf.
    #[inline]
    pub fn ucb1_score(&self, ln_parent_visits: f64, exploration: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        let n = self.visit_count as f64;
        self.mean_value() + exploration * (2.0 * ln_parent_visits / n).sqrt()
    }

    /// Check if every legal move has been expanded.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Check if the node has been expanded at least once.
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Remove `mv` from the untried list, keeping the order of the rest.
    /// Returns false if it was not there.
    pub fn take_untried(&mut self, mv: &M) -> bool {
        match self.untried.iter().position(|m| m == mv) {
            Some(pos) => {
                self.untried.remove(pos);
                true
            }
            None => false,
        }
    }
}
