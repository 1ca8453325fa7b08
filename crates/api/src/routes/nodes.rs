//! Route definitions for the `/nodes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::nodes;
use crate::state::AppState;

/// Routes mounted at `/nodes`.
///
/// ```text
/// GET    /{node_id}/progress           -> get_progress  (?map_play_member_id=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{node_id}/progress", get(nodes::get_progress))
}
