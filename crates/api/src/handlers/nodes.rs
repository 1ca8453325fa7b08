//! Per-node progress detail.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use trailmap_core::error::CoreError;
use trailmap_core::graph::ArrowEdge;
use trailmap_core::node_status::{
    derive_status, is_entry_node, question_status, rule_progress, NodeStatus, RuleProgress,
};
use trailmap_core::types::DbId;
use trailmap_db::models::graph::ArrowEdgeRow;
use trailmap_db::repositories::{
    ArrowProgressRepo, ArrowRepo, NodeHistoryRepo, NodeRepo, RuleRepo, UserAnswerRepo,
};

use crate::engine::answer::MemberAnswerService;
use crate::error::AppResult;
use crate::middleware::auth::AuthMember;
use crate::query::ActorParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Progress through one completion rule of a node.
#[derive(Debug, Serialize)]
pub struct RuleProgressEntry {
    pub rule_id: DbId,
    pub name: String,
    /// Whether the actor completed the node through this rule.
    pub is_completed: bool,
    pub progress: RuleProgress,
    pub questions: Vec<QuestionProgressEntry>,
}

/// A question on one of the rule's arrows.
#[derive(Debug, Serialize)]
pub struct QuestionProgressEntry {
    pub arrow_id: DbId,
    pub question_id: DbId,
    /// Whether the actor may answer it now, or has already solved it.
    pub status: NodeStatus,
}

#[derive(Debug, Serialize)]
pub struct NodeProgressResponse {
    pub node_id: DbId,
    pub status: NodeStatus,
    pub rules: Vec<RuleProgressEntry>,
}

/// GET /api/v1/nodes/{node_id}/progress
///
/// Status of a node and how far the actor is through each of its rules.
pub async fn get_progress(
    State(state): State<AppState>,
    member: AuthMember,
    Path(node_id): Path<DbId>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<NodeProgressResponse>>> {
    let node = NodeRepo::find_by_id(&state.pool, node_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Node",
            id: node_id,
        })?;
    let scope = MemberAnswerService::resolve_actor(
        &state.pool,
        member.member_id,
        node.map_id,
        params.map_play_member_id,
    )
    .await?;

    let rules = RuleRepo::list_by_node(&state.pool, node.id).await?;
    let rows: Vec<ArrowEdgeRow> = ArrowRepo::list_edges_into_node(&state.pool, node.id).await?;
    let incoming: Vec<ArrowEdge> = rows.iter().copied().map(ArrowEdge::from).collect();

    let mut arrows_by_rule: BTreeMap<DbId, BTreeSet<DbId>> = BTreeMap::new();
    for arrow in &incoming {
        arrows_by_rule.entry(arrow.rule_id).or_default().insert(arrow.id);
    }
    let question_ids: Vec<DbId> = rows.iter().filter_map(|r| r.question_id).collect();
    let solved: HashSet<DbId> =
        UserAnswerRepo::solved_question_ids(&state.pool, &question_ids, &scope)
            .await?
            .into_iter()
            .collect();
    let incoming_ids: Vec<DbId> = incoming.iter().map(|a| a.id).collect();
    let resolved: HashSet<DbId> =
        ArrowProgressRepo::resolved_among(&state.pool, &incoming_ids, &scope)
            .await?
            .into_iter()
            .collect();

    let pairs = NodeHistoryRepo::completed_pairs(&state.pool, node.map_id, &scope).await?;
    let completed_nodes: HashSet<DbId> = pairs.iter().map(|(node_id, _)| *node_id).collect();
    let completed_rules: HashSet<DbId> = pairs
        .iter()
        .filter(|(n, _)| *n == node.id)
        .map(|(_, rule_id)| *rule_id)
        .collect();

    let status = derive_status(node.is_active, node.id, &completed_nodes, &incoming, &resolved);
    let entry_node = is_entry_node(&incoming);

    let empty = BTreeSet::new();
    let rules = rules
        .into_iter()
        .map(|rule| {
            let arrow_ids = arrows_by_rule.get(&rule.id).unwrap_or(&empty);
            let questions = rows
                .iter()
                .filter(|row| row.rule_id == rule.id)
                .filter_map(|row| {
                    let question_id = row.question_id?;
                    Some(QuestionProgressEntry {
                        arrow_id: row.id,
                        question_id,
                        status: question_status(
                            &ArrowEdge::from(*row),
                            solved.contains(&question_id),
                            node.is_active,
                            status,
                            entry_node,
                            &completed_nodes,
                        ),
                    })
                })
                .collect();
            RuleProgressEntry {
                rule_id: rule.id,
                is_completed: completed_rules.contains(&rule.id),
                progress: rule_progress(arrow_ids, &resolved),
                name: rule.name,
                questions,
            }
        })
        .collect();

    Ok(Json(DataResponse {
        data: NodeProgressResponse {
            node_id: node.id,
            status,
            rules,
        },
    }))
}
