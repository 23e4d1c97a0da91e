//! Route definitions for `/reports`.

use axum::routing::get;
use axum::Router;

use crate::handlers::report;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET /dashboard   -> dashboard (PMO and admins)
/// GET /projects    -> projects (roles with the `reports` capability)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(report::dashboard))
        .route("/projects", get(report::projects))
}
