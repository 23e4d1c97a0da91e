//! Route definitions for the PMO `/dashboard`.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /advanced   -> advanced (PMO and admins)
/// GET /alerts     -> alerts (PMO and admins)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/advanced", get(dashboard::advanced))
        .route("/alerts", get(dashboard::alerts))
}
