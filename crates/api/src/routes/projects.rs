//! Route definitions for the `/projects` resource.
//!
//! Also nests the project-scoped collections (phases, deliverables,
//! contracts, documents, budget, providers) under `/projects/{id}/...`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{budget, contract, deliverable, document, phase, project, provider};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                   -> list (?search=&status=)
/// POST   /                                   -> create
/// GET    /stats                              -> stats
/// GET    /recent                             -> recent (?limit=)
/// GET    /dashboard                          -> dashboard
/// GET    /{id}                               -> get_by_id
/// PUT    /{id}                               -> update
/// DELETE /{id}                               -> delete
/// GET    /{id}/details                       -> details
/// POST   /{id}/recompute-progress            -> recompute_progress
///
/// GET    /{id}/phases                        -> phase::list_by_project
/// POST   /{id}/phases                        -> phase::create
/// GET    /{id}/deliverables                  -> deliverable::list_by_project
/// POST   /{id}/deliverables                  -> deliverable::create
/// GET    /{id}/contracts                     -> contract::list_by_project
/// POST   /{id}/contracts                     -> contract::create
/// GET    /{id}/documents                     -> document::list_by_project
/// POST   /{id}/documents                     -> document::create
/// GET    /{id}/budget                        -> budget::list_by_project
/// POST   /{id}/budget                        -> budget::create
/// PUT    /{id}/budget                        -> budget::replace
/// GET    /{id}/budget/summary                -> budget::summary
/// GET    /{id}/providers                     -> provider::list_for_project
/// POST   /{id}/providers                     -> provider::associate
/// DELETE /{id}/providers/{provider_id}       -> provider::dissociate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/stats", get(project::stats))
        .route("/recent", get(project::recent))
        .route("/dashboard", get(project::dashboard))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/details", get(project::details))
        .route("/{id}/recompute-progress", post(project::recompute_progress))
        .route(
            "/{id}/phases",
            get(phase::list_by_project).post(phase::create),
        )
        .route(
            "/{id}/deliverables",
            get(deliverable::list_by_project).post(deliverable::create),
        )
        .route(
            "/{id}/contracts",
            get(contract::list_by_project).post(contract::create),
        )
        .route(
            "/{id}/documents",
            get(document::list_by_project).post(document::create),
        )
        .route(
            "/{id}/budget",
            get(budget::list_by_project)
                .post(budget::create)
                .put(budget::replace),
        )
        .route("/{id}/budget/summary", get(budget::summary))
        .route(
            "/{id}/providers",
            get(provider::list_for_project).post(provider::associate),
        )
        .route(
            "/{id}/providers/{provider_id}",
            delete(provider::dissociate),
        )
}
