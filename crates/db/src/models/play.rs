//! Play session models.

use serde::Serialize;
use sqlx::FromRow;
use trailmap_core::types::{DbId, Timestamp};

/// A row from the `map_play_members` table joined with its play's map.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MapPlayMember {
    pub id: DbId,
    pub map_play_id: DbId,
    pub member_id: DbId,
    pub role: String,
    pub deactivated: bool,
    /// `map_plays.map_id` of the seat's play session.
    pub map_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
