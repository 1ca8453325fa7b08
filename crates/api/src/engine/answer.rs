//! Member answer submission.
//!
//! A submission is validated against its question, stored, and when it is
//! correct resolves the question's arrow and propagates completion, all in
//! one transaction. Events go out after commit.

use std::collections::HashSet;

use chrono::Utc;
use serde::Deserialize;
use sqlx::{PgConnection, PgExecutor, PgPool};
use trailmap_core::actor::{Actor, ActorScope};
use trailmap_core::answer_validation::{
    default_feedback, invalid_regex_patterns, validate_answer, validate_submission,
    AnswerStatus, AnswerValidationType,
};
use trailmap_core::error::CoreError;
use trailmap_core::graph::ArrowEdge;
use trailmap_core::prerequisites::missing_prerequisite_node_ids;
use trailmap_core::types::DbId;
use trailmap_db::models::answer::{
    CreateAnswerFile, CreateUserQuestionAnswer, UserQuestionAnswer, UserQuestionAnswerFile,
};
use trailmap_db::models::graph::Arrow;
use trailmap_db::repositories::{
    ArrowRepo, MapPlayMemberRepo, NodeHistoryRepo, NodeRepo, QuestionRepo, UserAnswerRepo,
};
use trailmap_events::{EventBus, MapEvent};

use super::completion::{ArrowResolution, NodeCompletionService};
use super::events::{completion_events, submission_events};
use crate::error::AppError;

/// Request body for `POST /questions/{id}/answers`.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswer {
    pub answer: Option<String>,
    #[serde(default)]
    pub files: Vec<CreateAnswerFile>,
    /// Seat to answer from. Omit to play solo.
    pub map_play_member_id: Option<DbId>,
}

/// Everything a submission produced.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub answer: UserQuestionAnswer,
    pub files: Vec<UserQuestionAnswerFile>,
    pub status: AnswerStatus,
    pub scope: ActorScope,
    pub resolution: ArrowResolution,
}

pub struct MemberAnswerService;

impl MemberAnswerService {
    /// Resolve who is answering on `map_id`.
    ///
    /// Without a seat the member plays solo. A seat must belong to the
    /// member, be active, and sit in a play of the same map.
    pub async fn resolve_actor<'e>(
        executor: impl PgExecutor<'e>,
        member_id: DbId,
        map_id: DbId,
        map_play_member_id: Option<DbId>,
    ) -> Result<ActorScope, AppError> {
        let Some(seat_id) = map_play_member_id else {
            return Ok(ActorScope::Member { member_id });
        };

        let seat = MapPlayMemberRepo::find_by_id(executor, seat_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "MapPlayMember",
                id: seat_id,
            })?;
        if seat.member_id != member_id {
            return Err(CoreError::Forbidden("Seat belongs to another member".into()).into());
        }
        if seat.deactivated {
            return Err(CoreError::Forbidden("Seat is deactivated".into()).into());
        }
        if seat.map_id != map_id {
            return Err(CoreError::Forbidden("Seat belongs to another map".into()).into());
        }

        Actor::play_session(member_id, seat.id, seat.map_play_id)
            .scope()
            .ok_or_else(|| CoreError::UnresolvedActor.into())
    }

    /// Reject answering when the nodes leading into the arrow's start node
    /// are not all completed by the scope.
    ///
    /// Questions not attached to an arrow always pass.
    pub async fn check_permission(
        conn: &mut PgConnection,
        arrow: Option<&Arrow>,
        scope: &ActorScope,
    ) -> Result<(), AppError> {
        let Some(arrow) = arrow else {
            return Ok(());
        };

        let incoming: Vec<ArrowEdge> =
            ArrowRepo::list_edges_into_node(&mut *conn, arrow.start_node_id)
                .await?
                .into_iter()
                .map(ArrowEdge::from)
                .collect();
        let completed: HashSet<DbId> =
            NodeHistoryRepo::completed_node_ids(&mut *conn, arrow.map_id, scope)
                .await?
                .into_iter()
                .collect();

        let missing = missing_prerequisite_node_ids(arrow.start_node_id, &incoming, &completed);
        if missing.is_empty() {
            return Ok(());
        }

        let ids: Vec<DbId> = missing.into_iter().collect();
        let names = NodeRepo::find_by_ids(&mut *conn, &ids)
            .await?
            .into_iter()
            .map(|node| node.name)
            .collect();
        Err(CoreError::PrerequisitesIncomplete(names).into())
    }

    /// Validate, store and propagate one answer.
    pub async fn submit(
        pool: &PgPool,
        member_id: DbId,
        question_id: DbId,
        input: SubmitAnswer,
    ) -> Result<SubmissionOutcome, AppError> {
        let question = QuestionRepo::find_by_id(pool, question_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Question",
                id: question_id,
            })?;
        let rules = question.rules()?;

        let scope =
            Self::resolve_actor(pool, member_id, question.map_id, input.map_play_member_id).await?;
        let arrow = ArrowRepo::find_by_question(pool, question.id).await?;

        let mut conn = pool.acquire().await?;
        Self::check_permission(&mut *conn, arrow.as_ref(), &scope).await?;
        drop(conn);

        validate_submission(&rules, input.answer.as_deref(), input.files.len())?;

        let correct_answers = QuestionRepo::list_correct_answers(pool, question.id).await?;
        if rules.validation_type == AnswerValidationType::Regex {
            for pattern in invalid_regex_patterns(&correct_answers) {
                tracing::warn!(question_id, pattern, "Invalid answer pattern never matches");
            }
        }
        let is_correct = validate_answer(&rules, input.answer.as_deref(), &correct_answers);
        let status = AnswerStatus::from_result(is_correct);

        let mut tx = pool.begin().await?;

        let answer = UserAnswerRepo::create(
            &mut *tx,
            &CreateUserQuestionAnswer {
                map_id: question.map_id,
                question_id: question.id,
                member_id,
                map_play_member_id: scope.map_play_member_id(),
                answer: input.answer.unwrap_or_default(),
                is_correct,
                feedback: default_feedback(
                    is_correct,
                    question.default_success_feedback.as_deref(),
                    question.default_failure_feedback.as_deref(),
                ),
                reviewed_at: is_correct.map(|_| Utc::now()),
            },
        )
        .await?;
        let files = UserAnswerRepo::create_files(&mut *tx, answer.id, &input.files).await?;

        let resolution = match (&arrow, is_correct) {
            (Some(arrow), Some(true)) => {
                NodeCompletionService::resolve_arrow(&mut *tx, arrow, &scope).await?
            }
            _ => ArrowResolution::default(),
        };

        tx.commit().await?;

        tracing::info!(
            answer_id = answer.id,
            question_id,
            member_id,
            status = status.as_str(),
            completed_nodes = resolution.completion.new_completed_node_histories.len(),
            "Answer submitted"
        );

        Ok(SubmissionOutcome {
            answer,
            files,
            status,
            scope,
            resolution,
        })
    }

    /// Publish the events of a committed submission.
    pub fn publish(event_bus: &EventBus, outcome: &SubmissionOutcome) {
        let events: Vec<MapEvent> =
            submission_events(&outcome.answer, outcome.status, &outcome.scope)
                .into_iter()
                .chain(completion_events(&outcome.resolution.completion, &outcome.scope))
                .collect();
        event_bus.publish_all(events);
    }
}
