//! Repository for the `node_complete_rules` table.

use sqlx::PgExecutor;
use trailmap_core::types::DbId;

use crate::models::graph::{CompletionRuleRow, NodeCompleteRule};

const COLUMNS: &str = "id, map_id, node_id, name, deleted_at, created_at, updated_at";

pub struct RuleRepo;

impl RuleRepo {
    /// Key columns of every live rule in a map.
    pub async fn list_live_by_map<'e>(
        executor: impl PgExecutor<'e>,
        map_id: DbId,
    ) -> Result<Vec<CompletionRuleRow>, sqlx::Error> {
        sqlx::query_as::<_, CompletionRuleRow>(
            "SELECT id, map_id, node_id FROM node_complete_rules
             WHERE map_id = $1 AND deleted_at IS NULL
             ORDER BY id",
        )
        .bind(map_id)
        .fetch_all(executor)
        .await
    }

    /// Live rules that unlock a node, ordered by id.
    pub async fn list_by_node<'e>(
        executor: impl PgExecutor<'e>,
        node_id: DbId,
    ) -> Result<Vec<NodeCompleteRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM node_complete_rules
             WHERE node_id = $1 AND deleted_at IS NULL
             ORDER BY id"
        );
        sqlx::query_as::<_, NodeCompleteRule>(&query)
            .bind(node_id)
            .fetch_all(executor)
            .await
    }
}
