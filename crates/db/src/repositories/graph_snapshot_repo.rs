//! Loads the rows a propagation call needs into a [`GraphSnapshot`].

use sqlx::PgConnection;
use trailmap_core::actor::{Actor, ActorScope};
use trailmap_core::graph::{ArrowEdge, CompletionRule, GraphSnapshot};
use trailmap_core::types::DbId;

use super::{ArrowProgressRepo, ArrowRepo, NodeHistoryRepo, RuleRepo};

pub struct GraphSnapshotRepo;

impl GraphSnapshotRepo {
    /// Load live arrows and rules of a map plus the scope's progress.
    ///
    /// Read-only. Runs on the caller's connection so it sees rows written
    /// earlier in the same transaction.
    pub async fn load(
        conn: &mut PgConnection,
        map_id: DbId,
        scope: &ActorScope,
    ) -> Result<GraphSnapshot, sqlx::Error> {
        let arrows = ArrowRepo::list_edges_by_map(&mut *conn, map_id).await?;
        let rules = RuleRepo::list_live_by_map(&mut *conn, map_id).await?;
        let resolved = ArrowProgressRepo::resolved_arrow_ids(&mut *conn, map_id, scope).await?;
        let histories = NodeHistoryRepo::completed_pairs(&mut *conn, map_id, scope).await?;

        tracing::debug!(
            map_id,
            arrows = arrows.len(),
            rules = rules.len(),
            resolved_arrows = resolved.len(),
            histories = histories.len(),
            "Loaded graph snapshot"
        );

        Ok(GraphSnapshot::build(
            map_id,
            arrows.into_iter().map(ArrowEdge::from),
            rules.into_iter().map(CompletionRule::from),
            resolved,
            histories,
        ))
    }

    /// Like [`load`](Self::load), but an actor without a resolvable scope
    /// gets an empty snapshot instead of an error.
    pub async fn load_for_actor(
        conn: &mut PgConnection,
        map_id: DbId,
        actor: &Actor,
    ) -> Result<GraphSnapshot, sqlx::Error> {
        match actor.scope() {
            Some(scope) => Self::load(conn, map_id, &scope).await,
            None => Ok(GraphSnapshot::empty(map_id)),
        }
    }
}
