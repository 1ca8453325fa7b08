//! Repository for the `user_question_answers` and
//! `user_question_answer_files` tables.

use sqlx::PgExecutor;
use trailmap_core::actor::ActorScope;
use trailmap_core::types::{DbId, Timestamp};

use super::scope::{scope_binds, scope_clause};

use crate::models::answer::{
    CreateAnswerFile, CreateUserQuestionAnswer, UserQuestionAnswer, UserQuestionAnswerFile,
};

const COLUMNS: &str = "id, map_id, question_id, member_id, map_play_member_id, answer, \
    is_correct, feedback, reviewed_by, reviewed_at, created_at, updated_at";

const FILE_COLUMNS: &str = "id, user_question_answer_id, name, file, created_at, updated_at";

pub struct UserAnswerRepo;

impl UserAnswerRepo {
    /// Insert a submitted answer, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateUserQuestionAnswer,
    ) -> Result<UserQuestionAnswer, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_question_answers
                (map_id, question_id, member_id, map_play_member_id, answer,
                 is_correct, feedback, reviewed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserQuestionAnswer>(&query)
            .bind(input.map_id)
            .bind(input.question_id)
            .bind(input.member_id)
            .bind(input.map_play_member_id)
            .bind(&input.answer)
            .bind(input.is_correct)
            .bind(&input.feedback)
            .bind(input.reviewed_at)
            .fetch_one(executor)
            .await
    }

    /// Attach file references to an answer in one statement.
    pub async fn create_files<'e>(
        executor: impl PgExecutor<'e>,
        answer_id: DbId,
        files: &[CreateAnswerFile],
    ) -> Result<Vec<UserQuestionAnswerFile>, sqlx::Error> {
        if files.is_empty() {
            return Ok(vec![]);
        }
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        let paths: Vec<&str> = files.iter().map(|f| f.file.as_str()).collect();

        let query = format!(
            "INSERT INTO user_question_answer_files (user_question_answer_id, name, file)
             SELECT $1, t.name, t.file
             FROM UNNEST($2::TEXT[], $3::TEXT[]) AS t(name, file)
             RETURNING {FILE_COLUMNS}"
        );
        sqlx::query_as::<_, UserQuestionAnswerFile>(&query)
            .bind(answer_id)
            .bind(&names)
            .bind(&paths)
            .fetch_all(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<UserQuestionAnswer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_question_answers WHERE id = $1");
        sqlx::query_as::<_, UserQuestionAnswer>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Files attached to an answer, in id order.
    pub async fn list_files<'e>(
        executor: impl PgExecutor<'e>,
        answer_id: DbId,
    ) -> Result<Vec<UserQuestionAnswerFile>, sqlx::Error> {
        let query = format!(
            "SELECT {FILE_COLUMNS} FROM user_question_answer_files
             WHERE user_question_answer_id = $1
             ORDER BY id"
        );
        sqlx::query_as::<_, UserQuestionAnswerFile>(&query)
            .bind(answer_id)
            .fetch_all(executor)
            .await
    }

    /// Which of `question_ids` the scope has answered correctly.
    pub async fn solved_question_ids<'e>(
        executor: impl PgExecutor<'e>,
        question_ids: &[DbId],
        scope: &ActorScope,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if question_ids.is_empty() {
            return Ok(vec![]);
        }
        let query = format!(
            "SELECT DISTINCT a.question_id FROM user_question_answers a
             WHERE a.question_id = ANY($1) AND a.is_correct AND {}
             ORDER BY a.question_id",
            scope_clause("a", 2, 3)
        );
        let (play, member) = scope_binds(scope);
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(question_ids)
            .bind(play)
            .bind(member)
            .fetch_all(executor)
            .await
    }

    /// Record a manual review. Returns `None` if the answer does not exist.
    pub async fn review<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        is_correct: bool,
        feedback: Option<&str>,
        reviewed_by: DbId,
        reviewed_at: Timestamp,
    ) -> Result<Option<UserQuestionAnswer>, sqlx::Error> {
        let query = format!(
            "UPDATE user_question_answers SET
                is_correct = $2,
                feedback = $3,
                reviewed_by = $4,
                reviewed_at = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserQuestionAnswer>(&query)
            .bind(id)
            .bind(is_correct)
            .bind(feedback)
            .bind(reviewed_by)
            .bind(reviewed_at)
            .fetch_optional(executor)
            .await
    }
}
