//! JWT-based authentication extractor for Axum handlers.

use std::collections::HashMap;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pmo_core::access::Principal;
use pmo_core::error::CoreError;
use pmo_core::roles::Role;
use pmo_core::types::DbId;
use pmo_core::vocab::USER_STATUS_ACTIVE;
use pmo_db::repositories::{RoleRepo, UserRepo};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller.
///
/// The bearer token only proves identity; role and account status are read
/// from the database on every request so a role change or deactivation
/// takes effect immediately.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
    /// Capability map of the user's role, e.g. `{"reports": true}`.
    pub capabilities: HashMap<String, bool>,
}

impl AuthUser {
    pub fn principal(&self) -> Principal {
        Principal::new(self.user_id, self.role)
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| unauthorized("User no longer exists"))?;
        if user.status != USER_STATUS_ACTIVE {
            tracing::warn!(user_id = user.id, "Rejected token of inactive user");
            return Err(unauthorized("Account is inactive"));
        }

        let role = RoleRepo::find_by_id(&state.pool, user.role_id).await?;
        let (role, capabilities) = match role {
            Some(row) => (Role::from_name(&row.name), row.capabilities.0),
            None => (Role::Contributor, HashMap::new()),
        };

        Ok(AuthUser {
            user_id: user.id,
            role,
            capabilities,
        })
    }
}
