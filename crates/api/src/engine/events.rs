//! Bus events for answers and completions.
//!
//! Built from committed rows only. Callers publish the returned events
//! after their transaction commits.

use serde_json::json;
use trailmap_core::actor::ActorScope;
use trailmap_core::answer_validation::AnswerStatus;
use trailmap_db::models::answer::UserQuestionAnswer;
use trailmap_events::types::{
    ANSWER_PENDING_REVIEW, ANSWER_REVIEWED, ANSWER_SUBMITTED, NODE_COMPLETED, QUESTION_SOLVED,
    SOURCE_ANSWER, SOURCE_NODE, SOURCE_QUESTION,
};
use trailmap_events::MapEvent;

use super::completion::CompletionResult;

/// `answer.submitted` plus the follow-up for the answer's status.
///
/// Failed answers get no follow-up event.
pub fn submission_events(
    answer: &UserQuestionAnswer,
    status: AnswerStatus,
    scope: &ActorScope,
) -> Vec<MapEvent> {
    let mut events = vec![MapEvent::new(ANSWER_SUBMITTED, answer.map_id)
        .with_actor(scope)
        .with_source(SOURCE_ANSWER, answer.id)
        .with_payload(json!({
            "question_id": answer.question_id,
            "status": status.as_str(),
        }))];

    match status {
        AnswerStatus::Pending => events.push(
            MapEvent::new(ANSWER_PENDING_REVIEW, answer.map_id)
                .with_actor(scope)
                .with_source(SOURCE_ANSWER, answer.id)
                .with_payload(json!({ "question_id": answer.question_id })),
        ),
        AnswerStatus::Success => events.push(
            MapEvent::new(QUESTION_SOLVED, answer.map_id)
                .with_actor(scope)
                .with_source(SOURCE_QUESTION, answer.question_id)
                .with_payload(json!({ "user_question_answer_id": answer.id })),
        ),
        AnswerStatus::Failed => {}
    }
    events
}

/// `answer.reviewed` for a manually reviewed answer.
pub fn review_event(answer: &UserQuestionAnswer, scope: &ActorScope) -> MapEvent {
    MapEvent::new(ANSWER_REVIEWED, answer.map_id)
        .with_actor(scope)
        .with_source(SOURCE_ANSWER, answer.id)
        .with_payload(json!({
            "question_id": answer.question_id,
            "is_correct": answer.is_correct,
            "reviewed_by": answer.reviewed_by,
        }))
}

/// One `node.completed` per new history row.
pub fn completion_events(result: &CompletionResult, scope: &ActorScope) -> Vec<MapEvent> {
    result
        .new_completed_node_histories
        .iter()
        .map(|history| {
            let already_completed = result.already_completed_node_ids.contains(&history.node_id);
            MapEvent::new(NODE_COMPLETED, history.map_id)
                .with_actor(scope)
                .with_source(SOURCE_NODE, history.node_id)
                .with_payload(json!({
                    "node_complete_rule_id": history.node_complete_rule_id,
                    "already_completed": already_completed,
                }))
        })
        .collect()
}
