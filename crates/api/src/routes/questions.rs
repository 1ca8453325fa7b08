//! Route definitions for the `/questions` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::answers;
use crate::state::AppState;

/// Routes mounted at `/questions`.
///
/// ```text
/// POST   /{question_id}/answers        -> submit_answer
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{question_id}/answers", post(answers::submit_answer))
}
