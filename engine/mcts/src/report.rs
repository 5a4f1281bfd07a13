//! Per-decision diagnostics.
//!
//! [`SearchResult`] renders as a short multi-line report: search counters,
//! then the root children most visited first, then the chosen move.

use std::fmt;

use engine_core::GameMove;

use crate::node::MctsNode;
use crate::search::SearchResult;

/// Root child statistics copied out of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<M> {
    pub mv: M,
    pub visits: u32,
    pub value_sum: f64,
}

impl<M: GameMove> ChildStats<M> {
    /// Copy statistics out of a node. Returns None for the root.
    pub fn from_node(node: &MctsNode<M>) -> Option<Self> {
        node.mv.clone().map(|mv| Self {
            mv,
            visits: node.visit_count,
            value_sum: node.value_sum,
        })
    }
}

impl<M> ChildStats<M> {
    /// Mean result for the player making this move.
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / self.visits as f64
        }
    }
}

/// Root children listed in a report before the rest are summarized.
const REPORT_CHILDREN: usize = 8;

impl<M: fmt::Display> fmt::Display for SearchResult<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        writeln!(
            f,
            "{} iterations ({} discarded), {} nodes, depth {}, {:.1} ms{}",
            stats.iterations,
            stats.discarded,
            stats.tree_nodes,
            stats.max_depth,
            stats.elapsed.as_secs_f64() * 1000.0,
            if stats.cancelled { ", cancelled" } else { "" },
        )?;
        for (rank, child) in self.children.iter().take(REPORT_CHILDREN).enumerate() {
            writeln!(
                f,
                "  {:>2}. {:<32} N={:<6} Q={:.3}",
                rank + 1,
                child.mv.to_string(),
                child.visits,
                child.mean_value(),
            )?;
        }
        if self.children.len() > REPORT_CHILDREN {
            writeln!(f, "      ... {} more", self.children.len() - REPORT_CHILDREN)?;
        }
        write!(f, "chosen: {}", self.best_move)
    }
}
