//! Graph fixtures inserted with raw SQL. Map authoring has no repository
//! of its own, so tests build maps directly.

#![allow(dead_code)]

use sqlx::PgPool;

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

/// Node1 (self-loop rule) --Arrow1--> Rule_A --> Node2.
pub struct TwoNodeMap {
    pub member_id: i64,
    pub map_id: i64,
    pub node1: i64,
    pub node2: i64,
    pub self_rule: i64,
    pub rule_a: i64,
    pub self_arrow: i64,
    pub arrow1: i64,
}

pub async fn two_node_map(pool: &PgPool) -> TwoNodeMap {
    let member_id = insert_member(pool, "ada").await;
    let map_id = insert_map(pool, member_id).await;
    let node1 = insert_node(pool, map_id, "Node1").await;
    let node2 = insert_node(pool, map_id, "Node2").await;
    let self_rule = insert_rule(pool, map_id, node1).await;
    let rule_a = insert_rule(pool, map_id, node2).await;
    let self_arrow = insert_arrow(pool, map_id, node1, self_rule, None).await;
    let arrow1 = insert_arrow(pool, map_id, node1, rule_a, None).await;
    TwoNodeMap {
        member_id,
        map_id,
        node1,
        node2,
        self_rule,
        rule_a,
        self_arrow,
        arrow1,
    }
}
