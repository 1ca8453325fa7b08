//! Handlers for answering questions.

use std::collections::BTreeSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use trailmap_core::answer_validation::AnswerStatus;
use trailmap_core::types::DbId;
use trailmap_db::models::answer::{UserQuestionAnswer, UserQuestionAnswerFile};

use crate::engine::answer::{MemberAnswerService, SubmitAnswer};
use crate::error::AppResult;
use crate::middleware::auth::AuthMember;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a submission as returned to the client.
#[derive(Debug, Serialize)]
pub struct AnswerSubmissionResponse {
    pub answer: UserQuestionAnswer,
    pub files: Vec<UserQuestionAnswerFile>,
    pub status: AnswerStatus,
    /// Nodes completed by this answer, in unlock order.
    pub completed_node_ids: Vec<DbId>,
    /// Nodes that now show as in progress.
    pub activatable_node_ids: BTreeSet<DbId>,
    pub new_arrow_progress_count: usize,
}

/// POST /api/v1/questions/{question_id}/answers
///
/// Submit an answer. A correct answer resolves the question's arrow and
/// propagates node completion before responding.
pub async fn submit_answer(
    State(state): State<AppState>,
    member: AuthMember,
    Path(question_id): Path<DbId>,
    Json(input): Json<SubmitAnswer>,
) -> AppResult<(StatusCode, Json<DataResponse<AnswerSubmissionResponse>>)> {
    let outcome =
        MemberAnswerService::submit(&state.pool, member.member_id, question_id, input).await?;
    MemberAnswerService::publish(&state.event_bus, &outcome);

    let data = AnswerSubmissionResponse {
        completed_node_ids: outcome.resolution.completion.completed_node_ids(),
        new_arrow_progress_count: outcome.resolution.new_arrow_progress_count(),
        answer: outcome.answer,
        files: outcome.files,
        status: outcome.status,
        activatable_node_ids: outcome.resolution.completion.activated_node_ids,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}
