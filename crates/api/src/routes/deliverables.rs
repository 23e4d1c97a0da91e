//! Route definitions for the `/deliverables` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::deliverable;
use crate::state::AppState;

/// Routes mounted at `/deliverables`.
///
/// ```text
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(deliverable::get_by_id)
            .put(deliverable::update)
            .delete(deliverable::delete),
    )
}
