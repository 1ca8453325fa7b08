//! HTTP-level tests for manual review via
//! `POST /api/v1/admin/answers/{id}/feedback`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use sqlx::PgPool;
use trailmap_events::EventBus;

/// Submit a manual-review answer and return its id.
async fn submit_pending(pool: &PgPool, map: &TwoNodeMap) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/questions/{}/answers", map.question_id),
        json!({ "answer": "my essay" }),
        Some(&token(map.member_id, "member")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    json["data"]["answer"]["id"].as_i64().unwrap()
}

fn feedback_uri(answer_id: i64) -> String {
    format!("/api/v1/admin/answers/{answer_id}/feedback")
}

// ---------------------------------------------------------------------------
// Test: manual answers wait for review and leave no progress
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn manual_answer_is_pending(pool: PgPool) {
    let map = two_node_map(&pool, "manual").await;
    let answer_id = submit_pending(&pool, &map).await;

    let reviewed_at: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT reviewed_at FROM user_question_answers WHERE id = $1")
            .bind(answer_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(reviewed_at.is_none());
    assert_eq!(count(&pool, "arrow_progresses").await, 0);
}

// ---------------------------------------------------------------------------
// Test: accepting a pending answer propagates completion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn accepted_review_propagates(pool: PgPool) {
    let map = two_node_map(&pool, "manual").await;
    let answer_id = submit_pending(&pool, &map).await;
    let admin = insert_member(&pool, "root").await;

    let bus = Arc::new(EventBus::default());
    let mut rx = bus.subscribe();
    let response = post_json(
        build_test_app_with_bus(pool.clone(), Arc::clone(&bus)),
        &feedback_uri(answer_id),
        json!({ "is_correct": true, "feedback": "Nice" }),
        Some(&token(admin, "admin")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["status"], "success");
    assert_eq!(data["answer"]["feedback"], "Nice");
    assert_eq!(data["answer"]["reviewed_by"], admin);
    assert_eq!(data["completed_node_ids"], json!([map.node1, map.node2]));
    assert_eq!(count(&pool, "node_completed_histories").await, 2);

    let reviewed = rx.try_recv().unwrap();
    assert_eq!(reviewed.event_type, "answer.reviewed");
    assert_eq!(reviewed.member_id, Some(map.member_id));
    assert_eq!(rx.try_recv().unwrap().event_type, "node.completed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn accepted_review_propagates_from_the_start_node(pool: PgPool) {
    // S opens through a self-loop and alone feeds M. N needs both X (from S,
    // carrying the manual question) and Y (from entry node T).
    let member_id = insert_member(&pool, "ada").await;
    let map_id = insert_map(&pool, member_id).await;
    let s = insert_node(&pool, map_id, "S").await;
    let m = insert_node(&pool, map_id, "M").await;
    let n = insert_node(&pool, map_id, "N").await;
    let t = insert_node(&pool, map_id, "T").await;
    let rule_s = insert_rule(&pool, map_id, s).await;
    insert_arrow(&pool, map_id, s, rule_s, None).await;
    let rule_m = insert_rule(&pool, map_id, m).await;
    insert_arrow(&pool, map_id, s, rule_m, None).await;
    let rule_n = insert_rule(&pool, map_id, n).await;
    let question_id = insert_question(&pool, map_id, "manual", &[]).await;
    insert_arrow(&pool, map_id, s, rule_n, Some(question_id)).await;
    insert_arrow(&pool, map_id, t, rule_n, None).await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/questions/{question_id}/answers"),
        json!({ "answer": "my essay" }),
        Some(&token(member_id, "member")),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    let answer_id = json["data"]["answer"]["id"].as_i64().unwrap();

    let admin = insert_member(&pool, "root").await;
    let response = post_json(
        build_test_app(pool.clone()),
        &feedback_uri(answer_id),
        json!({ "is_correct": true }),
        Some(&token(admin, "admin")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // N's rule still waits for Y, but S and M complete from the seed.
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["completed_node_ids"], json!([s, m]));
    assert_eq!(data["new_arrow_progress_count"], 3);
    assert_eq!(data["activatable_node_ids"], json!([n]));
    assert_eq!(count(&pool, "node_completed_histories").await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_review_uses_default_feedback(pool: PgPool) {
    let map = two_node_map(&pool, "manual").await;
    sqlx::query("UPDATE questions SET default_failure_feedback = 'Try again' WHERE id = $1")
        .bind(map.question_id)
        .execute(&pool)
        .await
        .unwrap();
    let answer_id = submit_pending(&pool, &map).await;
    let admin = insert_member(&pool, "root").await;

    let response = post_json(
        build_test_app(pool.clone()),
        &feedback_uri(answer_id),
        json!({ "is_correct": false }),
        Some(&token(admin, "admin")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "failed");
    assert_eq!(json["data"]["answer"]["feedback"], "Try again");
    assert_eq!(count(&pool, "arrow_progresses").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn seated_answer_review_keeps_the_play_scope(pool: PgPool) {
    let map = two_node_map(&pool, "manual").await;
    let (_, seat) = insert_play_seat(&pool, map.map_id, map.member_id).await;
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/questions/{}/answers", map.question_id),
        json!({ "answer": "essay", "map_play_member_id": seat }),
        Some(&token(map.member_id, "member")),
    )
    .await;
    let answer_id = body_json(response).await["data"]["answer"]["id"]
        .as_i64()
        .unwrap();
    let admin = insert_member(&pool, "root").await;

    let response = post_json(
        build_test_app(pool.clone()),
        &feedback_uri(answer_id),
        json!({ "is_correct": true }),
        Some(&token(admin, "admin")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let seats: Vec<Option<i64>> =
        sqlx::query_scalar("SELECT DISTINCT map_play_member_id FROM arrow_progresses")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(seats, vec![Some(seat)]);
}

// ---------------------------------------------------------------------------
// Test: access control and lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn members_cannot_review(pool: PgPool) {
    let map = two_node_map(&pool, "manual").await;
    let answer_id = submit_pending(&pool, &map).await;

    let response = post_json(
        build_test_app(pool),
        &feedback_uri(answer_id),
        json!({ "is_correct": true }),
        Some(&token(map.member_id, "member")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Admin role required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_answer_is_not_found(pool: PgPool) {
    let admin = insert_member(&pool, "root").await;

    let response = post_json(
        build_test_app(pool),
        &feedback_uri(424_242),
        json!({ "is_correct": true }),
        Some(&token(admin, "admin")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
