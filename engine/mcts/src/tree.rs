//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. Parents are plain indices, so
//! dropping the tree never walks ownership cycles.

use engine_core::{GameMove, GameState, Player};

use crate::node::{MctsNode, NodeId};
use crate::search::SearchError;

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree<M> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<M>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<M: GameMove> MctsTree<M> {
    /// Create a new tree whose root describes `root_state`.
    pub fn new<S: GameState<Move = M>>(root_state: &S) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_state)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<M> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<M> {
        &mut self.nodes[id.0 as usize]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode<M>] {
        &self.nodes
    }

    /// Select the child of `node_id` with the highest UCB1 score.
    ///
    /// Ties go to the earliest-expanded child. Children that have not
    /// completed a simulation are skipped; the search never attaches one, so
    /// this only matters for hand-built trees.
    pub fn select_child(&self, node_id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per-child comparison
        let ln_parent = (node.visit_count.max(1) as f64).ln();

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &node.children {
            let child = self.get(child_id);
            if child.visit_count == 0 {
                continue;
            }
            let score = child.ucb1_score(ln_parent, exploration);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Expand `parent` with `mv`, where `state` is the state after `mv`.
    ///
    /// Removes `mv` from the parent's untried list and links the new child.
    pub fn expand<S: GameState<Move = M>>(
        &mut self,
        parent: NodeId,
        mv: M,
        state: &S,
    ) -> Result<NodeId, SearchError> {
        let child = MctsNode::new_child(parent, mv, state);
        self.attach(child)
    }

    /// Link a node built with [`MctsNode::new_child`] under its parent.
    ///
    /// The node's move must still be in the parent's untried list, otherwise
    /// the tree would end up with two children for one move.
    pub fn attach(&mut self, node: MctsNode<M>) -> Result<NodeId, SearchError> {
        let parent = node.parent;
        let Some(mv) = node.mv.as_ref() else {
            return Err(SearchError::UntriedMoveMissing {
                mv: "<none>".to_string(),
            });
        };
        if parent.is_none() || !self.get_mut(parent).take_untried(mv) {
            return Err(SearchError::UntriedMoveMissing {
                mv: format!("{:?}", mv),
            });
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.get_mut(parent).children.push(id);
        Ok(id)
    }

    /// Drop `mv` from a node's untried list without creating a child.
    pub fn prune_untried(&mut self, node_id: NodeId, mv: &M) -> bool {
        self.get_mut(node_id).take_untried(mv)
    }

    /// Backpropagate one simulation result from `leaf_id` up to the root.
    ///
    /// `results` holds the terminal result for each player, indexed by
    /// [`Player::index`]. Each node is credited from the point of view of the
    /// player who moved into it.
    pub fn backpropagate(&mut self, leaf_id: NodeId, results: [f64; 2]) {
        let mut current_id = leaf_id;
        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.update(results[node.player_just_moved.index()]);
            current_id = node.parent;
        }
    }

    /// Robust child: the child of `node_id` with the most visits.
    /// Ties go to the earliest-expanded child.
    pub fn best_child_by_visits(&self, node_id: NodeId) -> Option<NodeId> {
        let mut best: Option<(NodeId, u32)> = None;
        for &child_id in &self.get(node_id).children {
            let visits = self.get(child_id).visit_count;
            match best {
                Some((_, best_visits)) if visits <= best_visits => {}
                _ => best = Some((child_id, visits)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Children of `node_id` sorted by visit count, most visited first.
    /// The sort is stable, so equal counts keep expansion order.
    pub fn ranked_children(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut ranked = self.get(node_id).children.clone();
        ranked.sort_by_key(|&id| std::cmp::Reverse(self.get(id).visit_count));
        ranked
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|id| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }

    /// Render the tree as indented text, one node per line.
    ///
    /// Nodes deeper than `max_depth` are skipped and output stops after
    /// `max_nodes` lines. Children are listed most visited first.
    pub fn dump(&self, max_depth: u32, max_nodes: usize) -> String {
        let mut lines = Vec::new();
        let mut stack = vec![(self.root, 0u32)];
        let mut omitted = 0usize;

        while let Some((id, depth)) = stack.pop() {
            if lines.len() >= max_nodes {
                omitted += 1;
                continue;
            }
            let node = self.get(id);
            let label = match &node.mv {
                Some(mv) => format!("{:?}", mv),
                None => "root".to_string(),
            };
            lines.push(format!(
                "{}{} [{}] N={} W={:.1} Q={:.3} untried={}",
                "  ".repeat(depth as usize),
                label,
                player_tag(node.player_just_moved),
                node.visit_count,
                node.value_sum,
                node.mean_value(),
                node.untried.len(),
            ));
            if depth < max_depth {
                // Reverse so the most visited child is popped first
                for child in self.ranked_children(id).into_iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }

        if omitted > 0 {
            lines.push(format!("... {} more nodes", omitted));
        }
        lines.join("\n")
    }
}

fn player_tag(player: Player) -> &'static str {
    match player {
        Player::One => "P1",
        Player::Two => "P2",
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}
