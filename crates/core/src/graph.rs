//! In-memory graph snapshot for one map and one actor scope.
//!
//! The snapshot is built once per propagation call from rows loaded by the
//! caller (see `trailmap_db::repositories::GraphSnapshotRepo`) and is never
//! shared across requests. It indexes arrows and completion rules by the
//! keys the rule aggregator and propagation engine look up, together with
//! the progress the actor scope has already recorded.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Graph rows
// ---------------------------------------------------------------------------

/// An arrow with its target node resolved through its completion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrowEdge {
    pub id: DbId,
    pub map_id: DbId,
    pub start_node_id: DbId,
    pub rule_id: DbId,
    /// `node_complete_rules.node_id` of the arrow's rule.
    pub target_node_id: DbId,
}

impl ArrowEdge {
    /// A self-referencing arrow is a starting condition, not a prerequisite.
    pub fn is_self_loop(&self) -> bool {
        self.start_node_id == self.target_node_id
    }
}

/// A completion rule: an AND-group of arrows that unlocks `node_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRule {
    pub id: DbId,
    pub map_id: DbId,
    pub node_id: DbId,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Indexed view of one map's graph plus the actor scope's recorded progress.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub map_id: DbId,
    /// Outgoing arrows per start node, ordered by arrow id.
    pub arrows_by_start_node_id: HashMap<DbId, Vec<ArrowEdge>>,
    /// Live rules per target node.
    pub rules_by_node_id: HashMap<DbId, Vec<CompletionRule>>,
    /// Member arrow ids per rule.
    pub arrows_by_rule_id: HashMap<DbId, BTreeSet<DbId>>,
    /// Live rules keyed by id, iterated in id order for full scans.
    pub rules: BTreeMap<DbId, CompletionRule>,
    pub completed_arrow_ids: HashSet<DbId>,
    pub completed_node_ids: HashSet<DbId>,
    pub completed_rule_ids: HashSet<DbId>,
}

impl GraphSnapshot {
    /// A snapshot with no arrows, rules or progress.
    pub fn empty(map_id: DbId) -> Self {
        Self {
            map_id,
            ..Self::default()
        }
    }

    /// Build the indexes from pre-loaded rows.
    ///
    /// Rows belonging to other maps are ignored. `completed_histories` are
    /// `(node_id, rule_id)` pairs from the actor scope's completion history.
    pub fn build(
        map_id: DbId,
        arrows: impl IntoIterator<Item = ArrowEdge>,
        rules: impl IntoIterator<Item = CompletionRule>,
        resolved_arrow_ids: impl IntoIterator<Item = DbId>,
        completed_histories: impl IntoIterator<Item = (DbId, DbId)>,
    ) -> Self {
        let mut snapshot = Self::empty(map_id);

        let mut arrows: Vec<ArrowEdge> = arrows.into_iter().filter(|a| a.map_id == map_id).collect();
        arrows.sort_by_key(|a| a.id);

        for arrow in arrows {
            snapshot
                .arrows_by_rule_id
                .entry(arrow.rule_id)
                .or_default()
                .insert(arrow.id);
            snapshot
                .arrows_by_start_node_id
                .entry(arrow.start_node_id)
                .or_default()
                .push(arrow);
        }

        for rule in rules.into_iter().filter(|r| r.map_id == map_id) {
            snapshot.rules.insert(rule.id, rule);
        }
        for rule in snapshot.rules.values() {
            snapshot
                .rules_by_node_id
                .entry(rule.node_id)
                .or_default()
                .push(*rule);
        }

        snapshot.completed_arrow_ids = resolved_arrow_ids.into_iter().collect();
        for (node_id, rule_id) in completed_histories {
            snapshot.completed_node_ids.insert(node_id);
            snapshot.completed_rule_ids.insert(rule_id);
        }

        snapshot
    }

    /// Outgoing arrows of a node (empty if none).
    pub fn outgoing_arrows(&self, node_id: DbId) -> &[ArrowEdge] {
        self.arrows_by_start_node_id
            .get(&node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Arrow ids belonging to a rule, if the rule has any arrows.
    pub fn rule_arrow_ids(&self, rule_id: DbId) -> Option<&BTreeSet<DbId>> {
        self.arrows_by_rule_id.get(&rule_id)
    }

    pub fn is_arrow_resolved(&self, arrow_id: DbId) -> bool {
        self.completed_arrow_ids.contains(&arrow_id)
    }

    pub fn is_node_completed(&self, node_id: DbId) -> bool {
        self.completed_node_ids.contains(&node_id)
    }

    /// All arrows of the snapshot, in no particular order.
    pub fn arrows(&self) -> impl Iterator<Item = &ArrowEdge> {
        self.arrows_by_start_node_id.values().flatten()
    }
}
