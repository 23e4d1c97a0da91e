//! Route definitions for `/reference`.

use axum::routing::get;
use axum::Router;

use crate::handlers::reference;
use crate::state::AppState;

/// Routes mounted at `/reference`.
///
/// ```text
/// GET /all          -> all
/// GET /org-units    -> org_units
/// GET /statuses     -> statuses
/// GET /users        -> users
/// GET /roles        -> roles
/// GET /priorities   -> priorities
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/all", get(reference::all))
        .route("/org-units", get(reference::org_units))
        .route("/statuses", get(reference::statuses))
        .route("/users", get(reference::users))
        .route("/roles", get(reference::roles))
        .route("/priorities", get(reference::priorities))
}
