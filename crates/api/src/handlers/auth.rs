//! Handlers for the `/auth` resource (login, me, logout).

use axum::extract::State;
use axum::Json;
use pmo_core::error::CoreError;
use pmo_core::validation::require_non_blank;
use pmo_core::vocab::USER_STATUS_ACTIVE;
use pmo_db::models::user::UserResponse;
use pmo_db::repositories::{RoleRepo, UserRepo};
use pmo_events::bus::EVENT_LOGIN;
use pmo_events::DomainEvent;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Shared by every credential failure so the response never reveals which
/// part was wrong.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password and receive an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    require_non_blank("email", &input.email)?;
    require_non_blank("password", &input.password)?;

    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if user.status != USER_STATUS_ACTIVE {
        tracing::warn!(user_id = user.id, "Login attempt on inactive account");
        return Err(invalid());
    }

    // A hash that does not parse counts as a mismatch rather than a 500.
    let valid = verify_password(&input.password, &user.password_hash).unwrap_or_else(|e| {
        tracing::error!(user_id = user.id, error = %e, "Stored password hash is malformed");
        false
    });
    if !valid {
        tracing::info!(user_id = user.id, "Failed login");
        return Err(invalid());
    }

    UserRepo::touch_last_access(&state.pool, user.id).await?;

    let role_name = RoleRepo::find_by_id(&state.pool, user.role_id)
        .await?
        .map(|r| r.name)
        .unwrap_or_default();

    let token = generate_access_token(user.id, &role_name, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    let profile = UserRepo::find_response(&state.pool, user.id)
        .await?
        .ok_or(AppError::not_found("User", user.id))?;

    state
        .event_bus
        .publish(DomainEvent::new(EVENT_LOGIN).by(user.id));
    tracing::info!(user_id = user.id, role = %role_name, "User logged in");

    Ok(Json(ApiResponse::ok(
        LoginResponse {
            token,
            expires_in: state.config.jwt.expires_in_secs(),
            user: profile,
        },
        "Login successful",
    )))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let profile = UserRepo::find_response(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::not_found("User", user.user_id))?;
    Ok(Json(ApiResponse::ok(profile, "Current user")))
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("Logged out"))
}
