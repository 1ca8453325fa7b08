//! Activatable-node lookahead.
//!
//! After a completion, the UI wants to know which nodes just gained
//! progress and will show as `in_progress`. This does not mean their rules
//! are satisfied, only that an incoming arrow now starts at a completed
//! node.

use std::collections::{BTreeSet, HashSet};

use crate::graph::ArrowEdge;
use crate::types::DbId;

/// Targets of non-self-loop arrows leaving `completed_node_ids`, minus the
/// nodes the actor has already completed.
pub fn find_activatable_node_ids<'a>(
    arrows: impl IntoIterator<Item = &'a ArrowEdge>,
    completed_node_ids: &[DbId],
    already_completed_node_ids: &HashSet<DbId>,
) -> BTreeSet<DbId> {
    if completed_node_ids.is_empty() {
        return BTreeSet::new();
    }
    let completed: HashSet<DbId> = completed_node_ids.iter().copied().collect();

    arrows
        .into_iter()
        .filter(|arrow| completed.contains(&arrow.start_node_id))
        .filter(|arrow| !arrow.is_self_loop())
        .map(|arrow| arrow.target_node_id)
        .filter(|node_id| !already_completed_node_ids.contains(node_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrow(id: DbId, start: DbId, target: DbId) -> ArrowEdge {
        ArrowEdge {
            id,
            map_id: 1,
            start_node_id: start,
            rule_id: 100 + target,
            target_node_id: target,
        }
    }

    #[test]
    fn collects_distinct_targets_of_completed_nodes() {
        let arrows = vec![arrow(1, 1, 2), arrow(2, 1, 3), arrow(3, 4, 3), arrow(4, 5, 6)];
        let result = find_activatable_node_ids(&arrows, &[1, 4], &HashSet::new());
        assert_eq!(result.into_iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn self_loops_are_excluded() {
        let arrows = vec![arrow(1, 1, 1), arrow(2, 1, 2)];
        let result = find_activatable_node_ids(&arrows, &[1], &HashSet::new());
        assert_eq!(result.into_iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn already_completed_targets_are_subtracted() {
        let arrows = vec![arrow(1, 1, 2), arrow(2, 1, 3)];
        let done: HashSet<DbId> = [3].into_iter().collect();
        let result = find_activatable_node_ids(&arrows, &[1], &done);
        assert_eq!(result.into_iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn no_completed_nodes_yields_nothing() {
        let arrows = vec![arrow(1, 1, 2)];
        assert!(find_activatable_node_ids(&arrows, &[], &HashSet::new()).is_empty());
    }
}
