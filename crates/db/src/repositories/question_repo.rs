//! Repository for the `questions` and `question_answers` tables.

use sqlx::PgExecutor;
use trailmap_core::types::DbId;

use crate::models::question::Question;

const COLUMNS: &str = "id, map_id, title, description, question_types, answer_validation_type, \
    is_by_pass, default_success_feedback, default_failure_feedback, \
    deleted_at, created_at, updated_at";

pub struct QuestionRepo;

impl QuestionRepo {
    /// Find a question by id. Excludes soft-deleted rows.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questions WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Live accepted answers (or patterns) of a question, in id order.
    pub async fn list_correct_answers<'e>(
        executor: impl PgExecutor<'e>,
        question_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT answer FROM question_answers
             WHERE question_id = $1 AND deleted_at IS NULL
             ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(executor)
        .await
    }
}
