pub mod auth;
pub mod budget_lines;
pub mod contracts;
pub mod dashboard;
pub mod deliverables;
pub mod documents;
pub mod health;
pub mod phases;
pub mod projects;
pub mod providers;
pub mod reference;
pub mod reports;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
/// /auth/me                                     current user
/// /auth/logout                                 logout
///
/// /users                                       list, create (admin only)
/// /users/stats                                 counts by role and status
/// /users/me/profile                            own profile (any user)
/// /users/{id}                                  get, update, soft delete
/// /users/{id}/password                         set password
///
/// /projects                                    list (visibility-filtered), create
/// /projects/stats | /recent | /dashboard       portfolio roll-ups for the caller
/// /projects/{id}                               get, update, delete
/// /projects/{id}/details                       project with every child list
/// /projects/{id}/recompute-progress            recompute completion
/// /projects/{id}/phases                        list, create
/// /projects/{id}/deliverables                  list, create
/// /projects/{id}/contracts                     list, create
/// /projects/{id}/documents                     list, register
/// /projects/{id}/budget                        list, add line, replace all
/// /projects/{id}/budget/summary                budget roll-up
/// /projects/{id}/providers                     list, associate
/// /projects/{id}/providers/{provider_id}       dissociate
///
/// /phases/{id}                                 get, update, delete
/// /phases/{id}/recompute-progress              recompute completion
/// /deliverables/{id}                           get, update, delete
/// /contracts/{id}                              get, update, delete
/// /documents/{id}                              get, delete
/// /budget-lines/{id}                           update, delete
///
/// /providers                                   list, create
/// /providers/stats | /types                    registry roll-ups
/// /providers/{id}                              get, update, delete
/// /providers/{id}/status                       set status
/// /providers/{id}/contracts | /projects        provider engagements
///
/// /dashboard/advanced | /alerts                PMO dashboard
/// /reports/dashboard                           PMO report
/// /reports/projects                            flat project export
/// /reference/*                                 lookup lists
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        // Projects and their nested collections.
        .nest("/projects", projects::router())
        // Item routes for project children.
        .nest("/phases", phases::router())
        .nest("/deliverables", deliverables::router())
        .nest("/contracts", contracts::router())
        .nest("/documents", documents::router())
        .nest("/budget-lines", budget_lines::router())
        .nest("/providers", providers::router())
        // Portfolio-wide views.
        .nest("/dashboard", dashboard::router())
        .nest("/reports", reports::router())
        .nest("/reference", reference::router())
}
