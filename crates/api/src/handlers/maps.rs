//! Map-level progress views.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use trailmap_core::error::CoreError;
use trailmap_core::graph::ArrowEdge;
use trailmap_core::node_status::{derive_status, incoming_arrows, NodeStatus};
use trailmap_core::types::DbId;
use trailmap_db::models::map::Node;
use trailmap_db::repositories::{ArrowProgressRepo, ArrowRepo, MapRepo, NodeHistoryRepo, NodeRepo};

use crate::engine::answer::MemberAnswerService;
use crate::error::AppResult;
use crate::middleware::auth::AuthMember;
use crate::query::ActorParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A node with its status for the requesting actor.
#[derive(Debug, Serialize)]
pub struct NodeWithStatus {
    #[serde(flatten)]
    pub node: Node,
    pub status: NodeStatus,
}

/// GET /api/v1/maps/{map_id}/nodes
///
/// List the live nodes of a map with their derived status.
pub async fn list_nodes(
    State(state): State<AppState>,
    member: AuthMember,
    Path(map_id): Path<DbId>,
    Query(params): Query<ActorParams>,
) -> AppResult<Json<DataResponse<Vec<NodeWithStatus>>>> {
    let map = MapRepo::find_by_id(&state.pool, map_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Map",
            id: map_id,
        })?;
    let scope = MemberAnswerService::resolve_actor(
        &state.pool,
        member.member_id,
        map.id,
        params.map_play_member_id,
    )
    .await?;

    let nodes = NodeRepo::list_by_map(&state.pool, map.id).await?;
    let arrows: Vec<ArrowEdge> = ArrowRepo::list_edges_by_map(&state.pool, map.id)
        .await?
        .into_iter()
        .map(ArrowEdge::from)
        .collect();
    let completed: HashSet<DbId> =
        NodeHistoryRepo::completed_node_ids(&state.pool, map.id, &scope)
            .await?
            .into_iter()
            .collect();
    let resolved: HashSet<DbId> =
        ArrowProgressRepo::resolved_arrow_ids(&state.pool, map.id, &scope)
            .await?
            .into_iter()
            .collect();
    let incoming = incoming_arrows(&arrows);

    let data = nodes
        .into_iter()
        .map(|node| {
            let into_node = incoming.get(&node.id).map(Vec::as_slice).unwrap_or_default();
            let status =
                derive_status(node.is_active, node.id, &completed, into_node, &resolved);
            NodeWithStatus { node, status }
        })
        .collect();
    Ok(Json(DataResponse { data }))
}
