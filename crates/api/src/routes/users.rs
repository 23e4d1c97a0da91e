//! Route definitions for the `/users` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /                 -> list (admin)
/// POST   /                 -> create (admin)
/// GET    /stats            -> stats (admin)
/// GET    /me/profile       -> my_profile (any authenticated user)
/// GET    /{id}             -> get_by_id (admin)
/// PUT    /{id}             -> update (admin)
/// DELETE /{id}             -> delete, soft (admin)
/// PUT    /{id}/password    -> set_password (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list).post(user::create))
        .route("/stats", get(user::stats))
        .route("/me/profile", get(user::my_profile))
        .route(
            "/{id}",
            get(user::get_by_id).put(user::update).delete(user::delete),
        )
        .route("/{id}/password", put(user::set_password))
}
