//! Route definitions for the `/maps` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::maps;
use crate::state::AppState;

/// Routes mounted at `/maps`.
///
/// ```text
/// GET    /{map_id}/nodes               -> list_nodes  (?map_play_member_id=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{map_id}/nodes", get(maps::list_nodes))
}
