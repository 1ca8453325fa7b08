//! Repository for the `nodes` table.

use sqlx::PgExecutor;
use trailmap_core::types::DbId;

use crate::models::map::Node;

const COLUMNS: &str = "id, map_id, name, title, description, is_active, \
    deleted_at, created_at, updated_at";

pub struct NodeRepo;

impl NodeRepo {
    /// Find a node by id. Excludes soft-deleted rows.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Node>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nodes WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Node>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Live nodes among `ids`, ordered by id.
    pub async fn find_by_ids<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
    ) -> Result<Vec<Node>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let query = format!(
            "SELECT {COLUMNS} FROM nodes
             WHERE id = ANY($1) AND deleted_at IS NULL
             ORDER BY id"
        );
        sqlx::query_as::<_, Node>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// Live nodes of a map, ordered by id.
    pub async fn list_by_map<'e>(
        executor: impl PgExecutor<'e>,
        map_id: DbId,
    ) -> Result<Vec<Node>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM nodes
             WHERE map_id = $1 AND deleted_at IS NULL
             ORDER BY id"
        );
        sqlx::query_as::<_, Node>(&query)
            .bind(map_id)
            .fetch_all(executor)
            .await
    }
}
