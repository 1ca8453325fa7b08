//! Manual review of answers awaiting a decision.
//!
//! A review records the verdict and, when the answer is accepted, resolves
//! the question's arrow for the answer's original actor scope and runs
//! completion seeded with the arrow's start node.

use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use trailmap_core::actor::{Actor, ActorScope};
use trailmap_core::answer_validation::default_feedback;
use trailmap_core::error::CoreError;
use trailmap_core::types::DbId;
use trailmap_db::models::answer::{ReviewUserQuestionAnswer, UserQuestionAnswer};
use trailmap_db::repositories::{ArrowRepo, MapPlayMemberRepo, QuestionRepo, UserAnswerRepo};
use trailmap_events::EventBus;

use super::completion::{ArrowResolution, NodeCompletionService};
use super::events::{completion_events, review_event};
use crate::error::AppError;

#[derive(Debug)]
pub struct ReviewOutcome {
    pub answer: UserQuestionAnswer,
    pub scope: ActorScope,
    pub resolution: ArrowResolution,
}

pub struct AnswerReviewService;

impl AnswerReviewService {
    /// Rebuild the scope an answer was submitted under.
    async fn answer_scope(
        conn: &mut PgConnection,
        answer: &UserQuestionAnswer,
    ) -> Result<ActorScope, AppError> {
        let actor = match answer.map_play_member_id {
            None => Actor::member(answer.member_id),
            Some(seat_id) => {
                let seat = MapPlayMemberRepo::find_by_id(&mut *conn, seat_id)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "MapPlayMember",
                        id: seat_id,
                    })?;
                Actor::play_session(answer.member_id, seat.id, seat.map_play_id)
            }
        };
        actor
            .scope()
            .ok_or_else(|| CoreError::UnresolvedActor.into())
    }

    /// Record a review and propagate an accepted answer.
    ///
    /// Without explicit feedback the question's default feedback for the
    /// verdict is stored.
    pub async fn review(
        pool: &PgPool,
        reviewer_id: DbId,
        answer_id: DbId,
        input: ReviewUserQuestionAnswer,
    ) -> Result<ReviewOutcome, AppError> {
        let mut tx = pool.begin().await?;

        let existing = UserAnswerRepo::find_by_id(&mut *tx, answer_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "UserQuestionAnswer",
                id: answer_id,
            })?;

        let feedback = match input.feedback {
            Some(feedback) => Some(feedback),
            None => {
                let question = QuestionRepo::find_by_id(&mut *tx, existing.question_id).await?;
                question.and_then(|q| {
                    default_feedback(
                        Some(input.is_correct),
                        q.default_success_feedback.as_deref(),
                        q.default_failure_feedback.as_deref(),
                    )
                })
            }
        };

        let answer = UserAnswerRepo::review(
            &mut *tx,
            answer_id,
            input.is_correct,
            feedback.as_deref(),
            reviewer_id,
            Utc::now(),
        )
        .await?
        .ok_or(CoreError::NotFound {
            entity: "UserQuestionAnswer",
            id: answer_id,
        })?;

        let scope = Self::answer_scope(&mut *tx, &answer).await?;

        let resolution = if answer.is_correct == Some(true) {
            match ArrowRepo::find_by_question(&mut *tx, answer.question_id).await? {
                Some(arrow) => {
                    NodeCompletionService::accept_arrow(&mut *tx, &arrow, &scope).await?
                }
                None => ArrowResolution::default(),
            }
        } else {
            ArrowResolution::default()
        };

        tx.commit().await?;

        tracing::info!(
            answer_id,
            reviewer_id,
            is_correct = input.is_correct,
            completed_nodes = resolution.completion.new_completed_node_histories.len(),
            "Answer reviewed"
        );

        Ok(ReviewOutcome {
            answer,
            scope,
            resolution,
        })
    }

    /// Publish the events of a committed review.
    pub fn publish(event_bus: &EventBus, outcome: &ReviewOutcome) {
        event_bus.publish(review_event(&outcome.answer, &outcome.scope));
        event_bus.publish_all(completion_events(&outcome.resolution.completion, &outcome.scope));
    }
}
