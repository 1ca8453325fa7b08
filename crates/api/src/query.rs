//! Shared query parameter types for API handlers.

use serde::Deserialize;
use trailmap_core::types::DbId;

/// Optional seat selection (`?map_play_member_id=`).
///
/// Read endpoints use it to choose between a member's solo progress and
/// the progress of a play session they are seated in.
#[derive(Debug, Deserialize)]
pub struct ActorParams {
    pub map_play_member_id: Option<DbId>,
}
