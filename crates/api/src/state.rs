use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pmo_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Audit event bus; every successful mutation publishes here.
    pub event_bus: Arc<pmo_events::EventBus>,
}
