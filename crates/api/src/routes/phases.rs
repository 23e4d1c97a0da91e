//! Route definitions for the `/phases` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::phase;
use crate::state::AppState;

/// Routes mounted at `/phases`.
///
/// ```text
/// GET    /{id}                       -> get_by_id
/// PUT    /{id}                       -> update
/// DELETE /{id}                       -> delete
/// POST   /{id}/recompute-progress    -> recompute_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(phase::get_by_id).put(phase::update).delete(phase::delete),
        )
        .route("/{id}/recompute-progress", post(phase::recompute_progress))
}
