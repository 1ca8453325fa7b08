//! Map and node entity models.

use serde::Serialize;
use sqlx::FromRow;
use trailmap_core::types::{DbId, Timestamp};

/// A row from the `maps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Map {
    pub id: DbId,
    pub name: String,
    pub is_private: bool,
    pub created_by: DbId,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `nodes` table. Status is derived, never stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Node {
    pub id: DbId,
    pub map_id: DbId,
    pub name: String,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
