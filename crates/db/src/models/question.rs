//! Question model.

use serde::Serialize;
use sqlx::FromRow;
use trailmap_core::answer_validation::QuestionRules;
use trailmap_core::error::CoreError;
use trailmap_core::types::{DbId, Timestamp};

/// A row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub map_id: DbId,
    pub title: String,
    pub description: String,
    /// Subset of `text`, `file`.
    pub question_types: Vec<String>,
    /// One of `text_exact`, `text_contains`, `regex`, `manual`.
    pub answer_validation_type: String,
    pub is_by_pass: bool,
    pub default_success_feedback: Option<String>,
    pub default_failure_feedback: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Question {
    /// Parse the validation-related columns.
    pub fn rules(&self) -> Result<QuestionRules, CoreError> {
        QuestionRules::from_columns(
            self.is_by_pass,
            &self.question_types,
            &self.answer_validation_type,
        )
    }
}
