//! Route definitions for the `/providers` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::provider;
use crate::state::AppState;

/// Routes mounted at `/providers`.
///
/// ```text
/// GET    /                  -> list (?status=&search=&provider_type=)
/// POST   /                  -> create
/// GET    /stats             -> stats
/// GET    /types             -> types
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// PUT    /{id}/status       -> set_status
/// GET    /{id}/contracts    -> contracts
/// GET    /{id}/projects     -> projects
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(provider::list).post(provider::create))
        .route("/stats", get(provider::stats))
        .route("/types", get(provider::types))
        .route(
            "/{id}",
            get(provider::get_by_id)
                .put(provider::update)
                .delete(provider::delete),
        )
        .route("/{id}/status", put(provider::set_status))
        .route("/{id}/contracts", get(provider::contracts))
        .route("/{id}/projects", get(provider::projects))
}
