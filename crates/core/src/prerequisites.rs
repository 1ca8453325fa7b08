//! Prerequisite check before a member may answer a question.

use std::collections::{BTreeSet, HashSet};

use crate::graph::ArrowEdge;
use crate::types::DbId;

/// Start nodes that feed into `arrow_start_node_id` and are not completed.
///
/// The answered arrow leaves `arrow_start_node_id`; every non-self-loop
/// arrow that targets that node must start at a completed node before the
/// member may answer. An empty result means the member may answer.
pub fn missing_prerequisite_node_ids<'a>(
    arrow_start_node_id: DbId,
    arrows: impl IntoIterator<Item = &'a ArrowEdge>,
    completed_node_ids: &HashSet<DbId>,
) -> BTreeSet<DbId> {
    arrows
        .into_iter()
        .filter(|arrow| arrow.target_node_id == arrow_start_node_id)
        .filter(|arrow| !arrow.is_self_loop())
        .map(|arrow| arrow.start_node_id)
        .filter(|node_id| !completed_node_ids.contains(node_id))
        .collect()
}
