//! Completion rule aggregation.
//!
//! A rule is satisfied once every arrow grouped under it has been resolved
//! by the actor scope. A node with several rules unlocks through any one
//! of them, and each satisfied rule is recorded separately.

use serde::Serialize;

use crate::graph::GraphSnapshot;
use crate::types::DbId;

/// A rule that is satisfied but not yet recorded in the completion history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SatisfiedRule {
    pub node_id: DbId,
    pub rule_id: DbId,
}

/// Whether every arrow of the rule is resolved.
///
/// A rule without arrows is never satisfied: there is nothing the actor
/// could have done to earn it.
pub fn is_rule_satisfied(snapshot: &GraphSnapshot, rule_id: DbId) -> bool {
    match snapshot.rule_arrow_ids(rule_id) {
        Some(arrow_ids) if !arrow_ids.is_empty() => arrow_ids
            .iter()
            .all(|arrow_id| snapshot.is_arrow_resolved(*arrow_id)),
        _ => false,
    }
}

/// Evaluate the given candidate rules and return those newly satisfied.
///
/// Unknown rule ids (deleted or from another map) and rules already in
/// `completed_rule_ids` are skipped. Output is sorted by rule id and free
/// of duplicates.
pub fn newly_satisfied_rules(
    snapshot: &GraphSnapshot,
    candidate_rule_ids: impl IntoIterator<Item = DbId>,
) -> Vec<SatisfiedRule> {
    let mut candidates: Vec<DbId> = candidate_rule_ids.into_iter().collect();
    candidates.sort_unstable();
    candidates.dedup();

    candidates
        .into_iter()
        .filter_map(|rule_id| snapshot.rules.get(&rule_id))
        .filter(|rule| !snapshot.completed_rule_ids.contains(&rule.id))
        .filter(|rule| is_rule_satisfied(snapshot, rule.id))
        .map(|rule| SatisfiedRule {
            node_id: rule.node_id,
            rule_id: rule.id,
        })
        .collect()
}

/// Evaluate every live rule of the snapshot.
pub fn all_newly_satisfied_rules(snapshot: &GraphSnapshot) -> Vec<SatisfiedRule> {
    newly_satisfied_rules(snapshot, snapshot.rules.keys().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ArrowEdge, CompletionRule};

    fn arrow(id: DbId, start: DbId, rule_id: DbId, target: DbId) -> ArrowEdge {
        ArrowEdge {
            id,
            map_id: 1,
            start_node_id: start,
            rule_id,
            target_node_id: target,
        }
    }

    fn rule(id: DbId, node_id: DbId) -> CompletionRule {
        CompletionRule {
            id,
            map_id: 1,
            node_id,
        }
    }

    /// Node 3 has rule 100 = {10, 11} and rule 101 = {12}.
    fn two_rule_snapshot(resolved: Vec<DbId>, recorded: Vec<(DbId, DbId)>) -> GraphSnapshot {
        GraphSnapshot::build(
            1,
            vec![arrow(10, 1, 100, 3), arrow(11, 2, 100, 3), arrow(12, 4, 101, 3)],
            vec![rule(100, 3), rule(101, 3)],
            resolved,
            recorded,
        )
    }

    #[test]
    fn rule_requires_all_arrows() {
        let snapshot = two_rule_snapshot(vec![10], vec![]);
        assert!(!is_rule_satisfied(&snapshot, 100));
        assert!(newly_satisfied_rules(&snapshot, [100]).is_empty());
    }

    #[test]
    fn rule_satisfied_when_all_arrows_resolved() {
        let snapshot = two_rule_snapshot(vec![10, 11], vec![]);
        assert_eq!(
            newly_satisfied_rules(&snapshot, [100, 101]),
            vec![SatisfiedRule {
                node_id: 3,
                rule_id: 100
            }]
        );
    }

    #[test]
    fn each_alternative_rule_reported_separately() {
        let snapshot = two_rule_snapshot(vec![10, 11, 12], vec![]);
        let satisfied = all_newly_satisfied_rules(&snapshot);
        assert_eq!(satisfied.len(), 2);
        assert!(satisfied.iter().all(|s| s.node_id == 3));
    }

    #[test]
    fn recorded_rule_is_not_reported_again() {
        let snapshot = two_rule_snapshot(vec![10, 11, 12], vec![(3, 100)]);
        assert_eq!(
            all_newly_satisfied_rules(&snapshot),
            vec![SatisfiedRule {
                node_id: 3,
                rule_id: 101
            }]
        );
    }

    #[test]
    fn rule_without_arrows_is_never_satisfied() {
        let snapshot = GraphSnapshot::build(
            1,
            Vec::new(),
            vec![rule(200, 9)],
            Vec::new(),
            Vec::new(),
        );
        assert!(!is_rule_satisfied(&snapshot, 200));
        assert!(all_newly_satisfied_rules(&snapshot).is_empty());
    }

    #[test]
    fn unknown_and_duplicate_candidates_are_ignored() {
        let snapshot = two_rule_snapshot(vec![10, 11], vec![]);
        let satisfied = newly_satisfied_rules(&snapshot, [100, 100, 999]);
        assert_eq!(satisfied.len(), 1);
    }
}
