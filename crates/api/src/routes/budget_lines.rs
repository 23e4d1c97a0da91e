//! Route definitions for the `/budget-lines` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::budget;
use crate::state::AppState;

/// Routes mounted at `/budget-lines`.
///
/// ```text
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(budget::update).delete(budget::delete))
}
