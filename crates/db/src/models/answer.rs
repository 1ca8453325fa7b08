//! Submitted answer models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trailmap_core::types::{DbId, Timestamp};

/// A row from the `user_question_answers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserQuestionAnswer {
    pub id: DbId,
    pub map_id: DbId,
    pub question_id: DbId,
    pub member_id: DbId,
    pub map_play_member_id: Option<DbId>,
    pub answer: String,
    /// `None` while the answer waits for manual review.
    pub is_correct: Option<bool>,
    pub feedback: Option<String>,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a submitted answer.
#[derive(Debug, Clone)]
pub struct CreateUserQuestionAnswer {
    pub map_id: DbId,
    pub question_id: DbId,
    pub member_id: DbId,
    pub map_play_member_id: Option<DbId>,
    pub answer: String,
    pub is_correct: Option<bool>,
    pub feedback: Option<String>,
    pub reviewed_at: Option<Timestamp>,
}

/// DTO for an admin review of an answer.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewUserQuestionAnswer {
    pub is_correct: bool,
    pub feedback: Option<String>,
}

/// A row from the `user_question_answer_files` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserQuestionAnswerFile {
    pub id: DbId,
    pub user_question_answer_id: DbId,
    pub name: String,
    pub file: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A file reference attached to a submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnswerFile {
    pub name: String,
    /// Storage path or URL supplied by the client.
    pub file: String,
}
