//! HTTP-level tests for the node status and rule progress views.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use sqlx::PgPool;

async fn answer_correctly(pool: &PgPool, map: &TwoNodeMap, seat: Option<i64>) {
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/questions/{}/answers", map.question_id),
        json!({ "answer": "42", "map_play_member_id": seat }),
        Some(&token(map.member_id, "member")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

fn status_of(json: &serde_json::Value, node_id: i64) -> String {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"].as_i64() == Some(node_id))
        .map(|n| n["status"].as_str().unwrap().to_string())
        .unwrap()
}

// ---------------------------------------------------------------------------
// GET /api/v1/maps/{id}/nodes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn fresh_map_opens_at_the_entry_node(pool: PgPool) {
    let map = two_node_map(&pool, "text_exact").await;

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/maps/{}/nodes", map.map_id),
        Some(&token(map.member_id, "member")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(status_of(&json, map.node1), "in_progress");
    assert_eq!(status_of(&json, map.node2), "locked");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completed_nodes_and_deactivated_nodes(pool: PgPool) {
    let map = two_node_map(&pool, "text_exact").await;
    let hidden = insert_node(&pool, map.map_id, "Hidden").await;
    sqlx::query("UPDATE nodes SET is_active = FALSE WHERE id = $1")
        .bind(hidden)
        .execute(&pool)
        .await
        .unwrap();
    answer_correctly(&pool, &map, None).await;

    let response = get(
        build_test_app(pool),
        &format!("/api/v1/maps/{}/nodes", map.map_id),
        Some(&token(map.member_id, "member")),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(status_of(&json, map.node1), "completed");
    assert_eq!(status_of(&json, map.node2), "completed");
    assert_eq!(status_of(&json, hidden), "deactivated");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn teammates_share_play_session_progress(pool: PgPool) {
    let map = two_node_map(&pool, "text_exact").await;
    let (play_id, seat) = insert_play_seat(&pool, map.map_id, map.member_id).await;
    let teammate = insert_member(&pool, "grace").await;
    let teammate_seat = join_play(&pool, play_id, teammate).await;
    answer_correctly(&pool, &map, Some(seat)).await;

    let uri = format!(
        "/api/v1/maps/{}/nodes?map_play_member_id={teammate_seat}",
        map.map_id
    );
    let teammate_token = token(teammate, "member");
    let response = get(build_test_app(pool.clone()), &uri, Some(&teammate_token)).await;
    assert_eq!(status_of(&body_json(response).await, map.node2), "completed");

    // Solo progress of the teammate is untouched.
    let uri = format!("/api/v1/maps/{}/nodes", map.map_id);
    let response = get(build_test_app(pool), &uri, Some(&teammate_token)).await;
    assert_eq!(status_of(&body_json(response).await, map.node2), "locked");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_map_is_not_found(pool: PgPool) {
    let member = insert_member(&pool, "ada").await;

    let response = get(
        build_test_app(pool),
        "/api/v1/maps/999999/nodes",
        Some(&token(member, "member")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// GET /api/v1/nodes/{id}/progress
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rule_progress_tracks_resolved_arrows(pool: PgPool) {
    let map = two_node_map(&pool, "text_exact").await;
    let uri = format!("/api/v1/nodes/{}/progress", map.node2);
    let token = token(map.member_id, "member");

    let json = body_json(get(build_test_app(pool.clone()), &uri, Some(&token)).await).await;
    assert_eq!(json["data"]["status"], "locked");
    let rule = &json["data"]["rules"][0];
    assert_eq!(rule["rule_id"], map.rule_a);
    assert_eq!(rule["is_completed"], false);
    assert_eq!(rule["progress"], json!({ "completed": 0, "total": 1, "percentage": 0 }));

    answer_correctly(&pool, &map, None).await;

    let json = body_json(get(build_test_app(pool), &uri, Some(&token)).await).await;
    assert_eq!(json["data"]["status"], "completed");
    let rule = &json["data"]["rules"][0];
    assert_eq!(rule["is_completed"], true);
    assert_eq!(rule["progress"]["percentage"], 100);
}

// ---------------------------------------------------------------------------
// Partially resolved rules
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn resolved_arrow_opens_node_before_its_rule_completes(pool: PgPool) {
    // Entry nodes S and T feed one rule of N: X from S carries a question,
    // Y from T does not.
    let member_id = insert_member(&pool, "ada").await;
    let map_id = insert_map(&pool, member_id).await;
    let s = insert_node(&pool, map_id, "S").await;
    let t = insert_node(&pool, map_id, "T").await;
    let n = insert_node(&pool, map_id, "N").await;
    let rule_n = insert_rule(&pool, map_id, n).await;
    let question_id = insert_question(&pool, map_id, "text_exact", &["42"]).await;
    let x = insert_arrow(&pool, map_id, s, rule_n, Some(question_id)).await;
    insert_arrow(&pool, map_id, t, rule_n, None).await;
    let token = token(member_id, "member");

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/questions/{question_id}/answers"),
        json!({ "answer": "42" }),
        Some(&token),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "success");
    assert_eq!(json["data"]["new_arrow_progress_count"], 1);
    assert_eq!(json["data"]["completed_node_ids"], json!([]));

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/maps/{map_id}/nodes"),
        Some(&token),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(status_of(&json, n), "in_progress");
    assert_eq!(status_of(&json, s), "in_progress");
    assert_eq!(status_of(&json, t), "in_progress");

    let uri = format!("/api/v1/nodes/{n}/progress");
    let json = body_json(get(build_test_app(pool), &uri, Some(&token)).await).await;
    assert_eq!(json["data"]["status"], "in_progress");
    let rule = &json["data"]["rules"][0];
    assert_eq!(rule["progress"], json!({ "completed": 1, "total": 2, "percentage": 50 }));
    assert_eq!(
        rule["questions"],
        json!([{ "arrow_id": x, "question_id": question_id, "status": "completed" }])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn question_opens_once_its_start_node_completes(pool: PgPool) {
    let map = two_node_map(&pool, "text_exact").await;
    let uri = format!("/api/v1/nodes/{}/progress", map.node2);
    let token = token(map.member_id, "member");
    let question_entry = json!({
        "arrow_id": map.arrow1,
        "question_id": map.question_id,
        "status": "locked",
    });

    let json = body_json(get(build_test_app(pool.clone()), &uri, Some(&token)).await).await;
    assert_eq!(json["data"]["rules"][0]["questions"], json!([question_entry]));

    // With Node1 completed the question on Arrow1 becomes answerable, even
    // though Arrow1 itself is not resolved yet.
    sqlx::query(
        "INSERT INTO node_completed_histories (map_id, node_id, node_complete_rule_id, member_id)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(map.map_id)
    .bind(map.node1)
    .bind(map.self_rule)
    .bind(map.member_id)
    .execute(&pool)
    .await
    .unwrap();

    let json = body_json(get(build_test_app(pool), &uri, Some(&token)).await).await;
    assert_eq!(json["data"]["rules"][0]["questions"][0]["status"], "in_progress");
}
