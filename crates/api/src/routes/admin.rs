//! Route definitions for admin-only endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /answers/{answer_id}/feedback -> submit_feedback
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/answers/{answer_id}/feedback",
        post(feedback::submit_feedback),
    )
}
