//! Repository for the `map_play_members` table.

use sqlx::PgExecutor;
use trailmap_core::types::DbId;

use crate::models::play::MapPlayMember;

pub struct MapPlayMemberRepo;

impl MapPlayMemberRepo {
    /// Find a seat by id together with its play's map.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<MapPlayMember>, sqlx::Error> {
        sqlx::query_as::<_, MapPlayMember>(
            "SELECT m.id, m.map_play_id, m.member_id, m.role, m.deactivated, p.map_id,
                    m.created_at, m.updated_at
             FROM map_play_members m
             JOIN map_plays p ON p.id = m.map_play_id
             WHERE m.id = $1 AND p.deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }
}
