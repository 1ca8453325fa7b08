pub mod admin;
pub mod health;
pub mod maps;
pub mod nodes;
pub mod questions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /questions/{question_id}/answers                 submit answer (POST, auth)
///
/// /admin/answers/{answer_id}/feedback              review answer (POST, admin only)
///
/// /maps/{map_id}/nodes                             nodes with status (GET, auth)
///
/// /nodes/{node_id}/progress                        rule progress (GET, auth)
/// ```
///
/// Read endpoints accept `?map_play_member_id=` to view a play session's
/// progress instead of the member's solo progress.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Answer submission and completion propagation.
        .nest("/questions", questions::router())
        // Manual review.
        .nest("/admin", admin::router())
        // Progress views.
        .nest("/maps", maps::router())
        .nest("/nodes", nodes::router())
}
