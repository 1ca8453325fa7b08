//! Repository for the `maps` table.

use sqlx::PgExecutor;
use trailmap_core::types::DbId;

use crate::models::map::Map;

const COLUMNS: &str = "id, name, is_private, created_by, deleted_at, created_at, updated_at";

pub struct MapRepo;

impl MapRepo {
    /// Find a map by id. Excludes soft-deleted rows.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Map>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maps WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Map>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
