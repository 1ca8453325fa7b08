//! Admin review of submitted answers.

use std::collections::BTreeSet;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use trailmap_core::answer_validation::AnswerStatus;
use trailmap_core::types::DbId;
use trailmap_db::models::answer::{ReviewUserQuestionAnswer, UserQuestionAnswer};

use crate::engine::feedback::AnswerReviewService;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnswerReviewResponse {
    pub answer: UserQuestionAnswer,
    pub status: AnswerStatus,
    pub completed_node_ids: Vec<DbId>,
    pub activatable_node_ids: BTreeSet<DbId>,
    pub new_arrow_progress_count: usize,
}

/// POST /api/v1/admin/answers/{answer_id}/feedback
///
/// Record a verdict and feedback for an answer. Accepting an answer
/// propagates completion for the member (or play session) that submitted it.
pub async fn submit_feedback(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(answer_id): Path<DbId>,
    Json(input): Json<ReviewUserQuestionAnswer>,
) -> AppResult<Json<DataResponse<AnswerReviewResponse>>> {
    let outcome =
        AnswerReviewService::review(&state.pool, admin.member_id, answer_id, input).await?;
    AnswerReviewService::publish(&state.event_bus, &outcome);

    let data = AnswerReviewResponse {
        status: AnswerStatus::from_result(outcome.answer.is_correct),
        completed_node_ids: outcome.resolution.completion.completed_node_ids(),
        new_arrow_progress_count: outcome.resolution.new_arrow_progress_count(),
        answer: outcome.answer,
        activatable_node_ids: outcome.resolution.completion.activated_node_ids,
    };
    Ok(Json(DataResponse { data }))
}
