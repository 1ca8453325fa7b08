//! Shared helpers for API integration tests: app construction, request
//! helpers and raw-SQL graph fixtures.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use trailmap_api::auth::jwt::{generate_access_token, JwtConfig};
use trailmap_api::config::ServerConfig;
use trailmap_api::router::build_app_router;
use trailmap_api::state::AppState;
use trailmap_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router on `pool` with a fresh event bus.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool, Arc::new(EventBus::default()))
}

/// Like [`build_test_app`], but publishing to a caller-held bus so tests
/// can subscribe before sending requests.
pub fn build_test_app_with_bus(pool: PgPool, event_bus: Arc<EventBus>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
    };
    build_app_router(state, &config)
}

/// Signed bearer token for a member.
pub fn token(member_id: i64, role: &str) -> String {
    generate_access_token(member_id, role, &test_config().jwt).unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn insert_member(pool: &PgPool, nickname: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO members (nickname) VALUES ($1) RETURNING id")
        .bind(nickname)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn insert_map(pool: &PgPool, created_by: i64) -> i64 {
    sqlx::query_scalar("INSERT INTO maps (name, created_by) VALUES ('Map', $1) RETURNING id")
        .bind(created_by)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn insert_node(pool: &PgPool, map_id: i64, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO nodes (map_id, name) VALUES ($1, $2) RETURNING id")
        .bind(map_id)
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn insert_rule(pool: &PgPool, map_id: i64, node_id: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO node_complete_rules (map_id, node_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(map_id)
    .bind(node_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_arrow(
    pool: &PgPool,
    map_id: i64,
    start_node_id: i64,
    rule_id: i64,
    question_id: Option<i64>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO arrows (map_id, start_node_id, node_complete_rule_id, question_id)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(map_id)
    .bind(start_node_id)
    .bind(rule_id)
    .bind(question_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// A text question with the given validation type and accepted answers.
pub async fn insert_question(
    pool: &PgPool,
    map_id: i64,
    validation_type: &str,
    answers: &[&str],
) -> i64 {
    let question_id: i64 = sqlx::query_scalar(
        "INSERT INTO questions (map_id, title, answer_validation_type, default_success_feedback)
         VALUES ($1, 'Question', $2, 'Well done') RETURNING id",
    )
    .bind(map_id)
    .bind(validation_type)
    .fetch_one(pool)
    .await
    .unwrap();
    for answer in answers {
        sqlx::query("INSERT INTO question_answers (question_id, answer) VALUES ($1, $2)")
            .bind(question_id)
            .bind(answer)
            .execute(pool)
            .await
            .unwrap();
    }
    question_id
}

pub async fn insert_play_seat(pool: &PgPool, map_id: i64, member_id: i64) -> (i64, i64) {
    let play_id: i64 = sqlx::query_scalar(
        "INSERT INTO map_plays (map_id, created_by) VALUES ($1, $2) RETURNING id",
    )
    .bind(map_id)
    .bind(member_id)
    .fetch_one(pool)
    .await
    .unwrap();
    let seat_id = join_play(pool, play_id, member_id).await;
    (play_id, seat_id)
}

pub async fn join_play(pool: &PgPool, play_id: i64, member_id: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO map_play_members (map_play_id, member_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(play_id)
    .bind(member_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Node1 starts the map through a self-loop rule. Arrow1 leads from Node1
/// to Node2 through Rule_A and carries a question answered with `"42"`.
pub struct TwoNodeMap {
    pub member_id: i64,
    pub map_id: i64,
    pub node1: i64,
    pub node2: i64,
    pub self_rule: i64,
    pub rule_a: i64,
    pub self_arrow: i64,
    pub arrow1: i64,
    pub question_id: i64,
}

pub async fn two_node_map(pool: &PgPool, validation_type: &str) -> TwoNodeMap {
    let member_id = insert_member(pool, "ada").await;
    let map_id = insert_map(pool, member_id).await;
    let node1 = insert_node(pool, map_id, "Node1").await;
    let node2 = insert_node(pool, map_id, "Node2").await;
    let self_rule = insert_rule(pool, map_id, node1).await;
    let rule_a = insert_rule(pool, map_id, node2).await;
    let self_arrow = insert_arrow(pool, map_id, node1, self_rule, None).await;
    let question_id = insert_question(pool, map_id, validation_type, &["42"]).await;
    let arrow1 = insert_arrow(pool, map_id, node1, rule_a, Some(question_id)).await;
    TwoNodeMap {
        member_id,
        map_id,
        node1,
        node2,
        self_rule,
        rule_a,
        self_arrow,
        arrow1,
        question_id,
    }
}
