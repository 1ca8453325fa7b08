//! Append-only progress rows: resolved arrows and completed nodes.

use serde::Serialize;
use sqlx::FromRow;
use trailmap_core::types::{DbId, Timestamp};

/// A row from the `arrow_progresses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArrowProgress {
    pub id: DbId,
    pub map_id: DbId,
    pub arrow_id: DbId,
    pub member_id: DbId,
    pub map_play_member_id: Option<DbId>,
    pub is_resolved: bool,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `node_completed_histories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NodeCompletedHistory {
    pub id: DbId,
    pub map_id: DbId,
    pub node_id: DbId,
    pub node_complete_rule_id: DbId,
    pub member_id: DbId,
    pub map_play_member_id: Option<DbId>,
    pub completed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
