//! Route definitions for the `/contracts` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::contract;
use crate::state::AppState;

/// Routes mounted at `/contracts`.
///
/// ```text
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(contract::get_by_id)
            .put(contract::update)
            .delete(contract::delete),
    )
}
