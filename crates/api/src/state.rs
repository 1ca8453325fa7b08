use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: trailmap_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Event bus for answer and completion events. Published after commit.
    pub event_bus: Arc<trailmap_events::EventBus>,
}
