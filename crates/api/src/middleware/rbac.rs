//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects callers whose role is too
//! low for the whole route. Per-project ownership checks stay in the
//! handlers, which call `pmo_core::access` with the loaded scope.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pmo_core::error::CoreError;
use pmo_core::roles::{Role, ROLE_FUNCTIONAL_ADMIN, ROLE_PORTFOLIO_DIRECTOR};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `functional_admin` role. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::FunctionalAdmin {
            return Err(AppError::Core(CoreError::forbidden(
                "Access reserved for functional administrators",
                ROLE_FUNCTIONAL_ADMIN,
                user.role.as_str(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `functional_admin` or `portfolio_director`. Rejects with 403
/// otherwise.
///
/// ```ignore
/// async fn pmo_view(RequirePortfolioManager(user): RequirePortfolioManager) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequirePortfolioManager(pub AuthUser);

impl FromRequestParts<AppState> for RequirePortfolioManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.manages_portfolio() {
            return Err(AppError::Core(CoreError::forbidden(
                "Access reserved for PMO and administrators",
                format!("{ROLE_FUNCTIONAL_ADMIN} or {ROLE_PORTFOLIO_DIRECTOR}"),
                user.role.as_str(),
            )));
        }
        Ok(RequirePortfolioManager(user))
    }
}

/// Requires any authenticated user.
///
/// Equivalent to [`AuthUser`], named explicitly where "this route requires
/// authentication" should read at the signature.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
