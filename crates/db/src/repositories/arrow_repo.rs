//! Repository for the `arrows` table.

use sqlx::PgExecutor;
use trailmap_core::types::DbId;

use crate::models::graph::{Arrow, ArrowEdgeRow};

const COLUMNS: &str = "id, map_id, start_node_id, node_complete_rule_id, question_id, \
    deleted_at, created_at, updated_at";

/// Live arrows joined with the target node of their (live) rule.
const EDGE_SELECT: &str = "SELECT a.id, a.map_id, a.start_node_id, \
        a.node_complete_rule_id AS rule_id, r.node_id AS target_node_id, a.question_id \
     FROM arrows a \
     JOIN node_complete_rules r ON r.id = a.node_complete_rule_id \
     WHERE a.deleted_at IS NULL AND r.deleted_at IS NULL";

pub struct ArrowRepo;

impl ArrowRepo {
    /// The live arrow a question is attached to, if any.
    ///
    /// A question is expected to sit on at most one arrow; when several
    /// exist the lowest id wins.
    pub async fn find_by_question<'e>(
        executor: impl PgExecutor<'e>,
        question_id: DbId,
    ) -> Result<Option<Arrow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM arrows
             WHERE question_id = $1 AND deleted_at IS NULL
             ORDER BY id
             LIMIT 1"
        );
        sqlx::query_as::<_, Arrow>(&query)
            .bind(question_id)
            .fetch_optional(executor)
            .await
    }

    /// Every live arrow of a map with its target node.
    pub async fn list_edges_by_map<'e>(
        executor: impl PgExecutor<'e>,
        map_id: DbId,
    ) -> Result<Vec<ArrowEdgeRow>, sqlx::Error> {
        let query = format!("{EDGE_SELECT} AND a.map_id = $1 ORDER BY a.id");
        sqlx::query_as::<_, ArrowEdgeRow>(&query)
            .bind(map_id)
            .fetch_all(executor)
            .await
    }

    /// Live arrows leaving any of `node_ids`.
    pub async fn list_targets_from_nodes<'e>(
        executor: impl PgExecutor<'e>,
        node_ids: &[DbId],
    ) -> Result<Vec<ArrowEdgeRow>, sqlx::Error> {
        if node_ids.is_empty() {
            return Ok(vec![]);
        }
        let query = format!("{EDGE_SELECT} AND a.start_node_id = ANY($1) ORDER BY a.id");
        sqlx::query_as::<_, ArrowEdgeRow>(&query)
            .bind(node_ids)
            .fetch_all(executor)
            .await
    }

    /// Live arrows whose rule targets `node_id`.
    pub async fn list_edges_into_node<'e>(
        executor: impl PgExecutor<'e>,
        node_id: DbId,
    ) -> Result<Vec<ArrowEdgeRow>, sqlx::Error> {
        let query = format!("{EDGE_SELECT} AND r.node_id = $1 ORDER BY a.id");
        sqlx::query_as::<_, ArrowEdgeRow>(&query)
            .bind(node_id)
            .fetch_all(executor)
            .await
    }

    /// Ids of the live arrows grouped under a rule.
    pub async fn list_ids_by_rule<'e>(
        executor: impl PgExecutor<'e>,
        rule_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM arrows
             WHERE node_complete_rule_id = $1 AND deleted_at IS NULL
             ORDER BY id",
        )
        .bind(rule_id)
        .fetch_all(executor)
        .await
    }
}
