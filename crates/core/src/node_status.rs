//! Derived node status and per-rule progress.
//!
//! Status is never stored. It is computed from the node's active flag, the
//! actor scope's completed nodes, and which of the arrows leading into the
//! node the scope has resolved.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::graph::ArrowEdge;
use crate::types::DbId;

pub const NODE_STATUS_LOCKED: &str = "locked";
pub const NODE_STATUS_IN_PROGRESS: &str = "in_progress";
pub const NODE_STATUS_COMPLETED: &str = "completed";
pub const NODE_STATUS_DEACTIVATED: &str = "deactivated";

/// Status of a node, or of a question on one of its arrows, for one actor
/// scope.
///
/// Precedence: `Deactivated` > `Completed` > `InProgress` > `Locked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Locked,
    InProgress,
    Completed,
    Deactivated,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => NODE_STATUS_LOCKED,
            Self::InProgress => NODE_STATUS_IN_PROGRESS,
            Self::Completed => NODE_STATUS_COMPLETED,
            Self::Deactivated => NODE_STATUS_DEACTIVATED,
        }
    }
}

/// Group arrows by the node their rule targets. Self-loops are kept.
pub fn incoming_arrows<'a>(
    arrows: impl IntoIterator<Item = &'a ArrowEdge>,
) -> HashMap<DbId, Vec<ArrowEdge>> {
    let mut incoming: HashMap<DbId, Vec<ArrowEdge>> = HashMap::new();
    for arrow in arrows {
        incoming.entry(arrow.target_node_id).or_default().push(*arrow);
    }
    incoming
}

/// A node whose incoming arrows are all self-loops (or that has none) is an
/// entry point of the map.
pub fn is_entry_node(incoming: &[ArrowEdge]) -> bool {
    incoming.iter().all(ArrowEdge::is_self_loop)
}

/// Derive the status of one node from the arrows leading into it.
///
/// The node opens once the scope resolved any incoming arrow. Entry nodes
/// are open from the start.
pub fn derive_status(
    is_active: bool,
    node_id: DbId,
    completed_node_ids: &HashSet<DbId>,
    incoming: &[ArrowEdge],
    resolved_arrow_ids: &HashSet<DbId>,
) -> NodeStatus {
    if !is_active {
        return NodeStatus::Deactivated;
    }
    if completed_node_ids.contains(&node_id) {
        return NodeStatus::Completed;
    }
    if incoming.iter().any(|a| resolved_arrow_ids.contains(&a.id)) || is_entry_node(incoming) {
        return NodeStatus::InProgress;
    }
    NodeStatus::Locked
}

/// Status of the question on `arrow`, an incoming arrow of a node.
///
/// A solved question is `Completed` even on a deactivated node. Otherwise
/// the question can be answered on an entry node, once the arrow's start
/// node is completed, or on a self-loop of a node that is in progress.
pub fn question_status(
    arrow: &ArrowEdge,
    question_solved: bool,
    node_is_active: bool,
    node_status: NodeStatus,
    entry_node: bool,
    completed_node_ids: &HashSet<DbId>,
) -> NodeStatus {
    if question_solved {
        NodeStatus::Completed
    } else if !node_is_active {
        NodeStatus::Deactivated
    } else if entry_node
        || completed_node_ids.contains(&arrow.start_node_id)
        || (arrow.is_self_loop() && node_status == NodeStatus::InProgress)
    {
        NodeStatus::InProgress
    } else {
        NodeStatus::Locked
    }
}

/// How far an actor scope is through one completion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleProgress {
    pub completed: usize,
    pub total: usize,
    /// Whole percent, rounded down. Zero for a rule without arrows.
    pub percentage: u8,
}

pub fn rule_progress(
    rule_arrow_ids: &BTreeSet<DbId>,
    resolved_arrow_ids: &HashSet<DbId>,
) -> RuleProgress {
    let total = rule_arrow_ids.len();
    let completed = rule_arrow_ids
        .iter()
        .filter(|id| resolved_arrow_ids.contains(id))
        .count();
    let percentage = if total == 0 {
        0
    } else {
        (completed * 100 / total) as u8
    };
    RuleProgress {
        completed,
        total,
        percentage,
    }
}
