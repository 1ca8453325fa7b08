//! Completion propagation over an in-memory graph snapshot.
//!
//! Starting from one or more seed nodes, every outgoing arrow of a
//! processed node is resolved, the rules touched by those arrows are
//! evaluated, and the target node of each newly satisfied rule is queued
//! for processing in turn. The traversal is breadth-first with an explicit
//! queue and a processed set, so each node is handled at most once per call
//! and stack depth never depends on graph size.
//!
//! Nothing here touches the database. The caller persists the returned
//! [`CompletionPlan`] (see `trailmap_api::engine::completion`).

use std::collections::{BTreeSet, HashSet, VecDeque};

use serde::Serialize;

use crate::actor::ActorScope;
use crate::graph::{ArrowEdge, GraphSnapshot};
use crate::lookahead::find_activatable_node_ids;
use crate::rules::{all_newly_satisfied_rules, newly_satisfied_rules, SatisfiedRule};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Plan rows
// ---------------------------------------------------------------------------

/// An arrow the actor scope resolves as part of this propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewArrowProgress {
    pub map_id: DbId,
    pub arrow_id: DbId,
    pub member_id: DbId,
    pub map_play_member_id: Option<DbId>,
    pub resolved_at: Timestamp,
}

/// A node completed through one specific rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNodeCompletedHistory {
    pub map_id: DbId,
    pub node_id: DbId,
    pub node_complete_rule_id: DbId,
    pub member_id: DbId,
    pub map_play_member_id: Option<DbId>,
    pub completed_at: Timestamp,
}

/// Everything one propagation call wants to persist, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompletionPlan {
    pub new_arrow_progresses: Vec<NewArrowProgress>,
    pub new_completed_node_histories: Vec<NewNodeCompletedHistory>,
    /// Nodes that gained an incoming path from a newly completed node and
    /// are not completed themselves.
    pub activated_node_ids: BTreeSet<DbId>,
}

impl CompletionPlan {
    pub fn is_empty(&self) -> bool {
        self.new_arrow_progresses.is_empty() && self.new_completed_node_histories.is_empty()
    }

    /// Distinct ids of nodes completed by this plan, in discovery order.
    pub fn completed_node_ids(&self) -> Vec<DbId> {
        let mut seen = HashSet::new();
        self.new_completed_node_histories
            .iter()
            .map(|h| h.node_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Propagate completion from `seed_node_ids` through `snapshot`.
///
/// The snapshot is updated in place with every arrow, rule and node the
/// plan records, so running `propagate` again with the same seeds on the
/// same snapshot yields an empty plan.
///
/// The first processed node triggers a full scan of every rule in the
/// snapshot, which also picks up rules left satisfiable by earlier calls.
/// After that only rules owning a freshly resolved arrow can change state,
/// so later iterations evaluate just those.
pub fn propagate(
    snapshot: &mut GraphSnapshot,
    seed_node_ids: &[DbId],
    scope: &ActorScope,
    now: Timestamp,
) -> CompletionPlan {
    let mut plan = CompletionPlan::default();
    let mut queue: VecDeque<DbId> = seed_node_ids.iter().copied().collect();
    let mut processed: HashSet<DbId> = HashSet::new();
    let mut full_scan_done = false;

    while let Some(node_id) = queue.pop_front() {
        if !processed.insert(node_id) {
            continue;
        }

        let fresh: Vec<ArrowEdge> = snapshot
            .outgoing_arrows(node_id)
            .iter()
            .filter(|arrow| !snapshot.is_arrow_resolved(arrow.id))
            .copied()
            .collect();

        let mut touched_rule_ids = BTreeSet::new();
        for arrow in fresh {
            snapshot.completed_arrow_ids.insert(arrow.id);
            touched_rule_ids.insert(arrow.rule_id);
            plan.new_arrow_progresses.push(NewArrowProgress {
                map_id: arrow.map_id,
                arrow_id: arrow.id,
                member_id: scope.member_id(),
                map_play_member_id: scope.map_play_member_id(),
                resolved_at: now,
            });
        }

        let satisfied = if full_scan_done {
            newly_satisfied_rules(snapshot, touched_rule_ids)
        } else {
            full_scan_done = true;
            all_newly_satisfied_rules(snapshot)
        };

        for SatisfiedRule { node_id, rule_id } in satisfied {
            snapshot.completed_rule_ids.insert(rule_id);
            snapshot.completed_node_ids.insert(node_id);
            plan.new_completed_node_histories.push(NewNodeCompletedHistory {
                map_id: snapshot.map_id,
                node_id,
                node_complete_rule_id: rule_id,
                member_id: scope.member_id(),
                map_play_member_id: scope.map_play_member_id(),
                completed_at: now,
            });
            queue.push_back(node_id);
        }
    }

    plan.activated_node_ids = find_activatable_node_ids(
        snapshot.arrows(),
        &plan.completed_node_ids(),
        &snapshot.completed_node_ids,
    );
    plan
}
