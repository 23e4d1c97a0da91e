//! Handlers for the `/users` resource.
//!
//! User management is reserved to functional administrators; only
//! `GET /users/me/profile` is open to every authenticated user. Deletion is
//! a soft delete that flips `status` to `inactive`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pmo_core::access::ResourceKind;
use pmo_core::error::CoreError;
use pmo_core::types::DbId;
use pmo_core::validation::validate_input;
use pmo_core::vocab::{validate_opt_one_of, VALID_USER_STATUSES};
use pmo_db::models::user::{
    CreateUser, CreateUserRequest, SetPasswordRequest, UpdateUser, UserResponse, UserStats,
};
use pmo_db::repositories::{RoleRepo, UserRepo};
use pmo_events::bus::{EVENT_CREATED, EVENT_DELETED, EVENT_UPDATED};
use serde_json::json;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::handlers::publish;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

async fn ensure_role_exists(state: &AppState, role_id: DbId) -> AppResult<()> {
    if RoleRepo::find_by_id(&state.pool, role_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown role_id {role_id}"
        ))));
    }
    Ok(())
}

fn hash(state: &AppState, password: &str) -> AppResult<String> {
    validate_password_strength(password, state.config.password_min_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let message = format!("{} users retrieved", users.len());
    Ok(Json(ApiResponse::with_count(users, message)))
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    validate_input(&input)?;
    ensure_role_exists(&state, input.role_id).await?;
    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email already exists".into(),
        )));
    }

    let password_hash = hash(&state, &input.password)?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            password_hash,
            role_id: input.role_id,
            org_unit_id: input.org_unit_id,
        },
    )
    .await?;

    publish(&state, &admin, ResourceKind::User, user.id, EVENT_CREATED, json!({}));
    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created");

    let body = UserRepo::find_response(&state.pool, user.id)
        .await?
        .ok_or(AppError::not_found("User", user.id))?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(body, "User created")),
    ))
}

/// GET /api/v1/users/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ApiResponse<UserStats>>> {
    let stats = UserRepo::stats(&state.pool).await?;
    Ok(Json(ApiResponse::ok(stats, "User statistics")))
}

/// GET /api/v1/users/me/profile
pub async fn my_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let profile = UserRepo::find_response(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::not_found("User", user.user_id))?;
    Ok(Json(ApiResponse::ok(profile, "Profile retrieved")))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = UserRepo::find_response(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;
    Ok(Json(ApiResponse::ok(user, "User retrieved")))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<ApiResponse<Option<UserResponse>>>> {
    if UserRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found("User", id));
    }
    validate_input(&input)?;
    validate_opt_one_of("status", input.status.as_deref(), VALID_USER_STATUSES)?;
    if let Some(role_id) = input.role_id {
        ensure_role_exists(&state, role_id).await?;
    }

    if UserRepo::update(&state.pool, id, &input).await? == 0 {
        return Ok(Json(ApiResponse::ok(None, "Nothing to update")));
    }

    publish(&state, &admin, ResourceKind::User, id, EVENT_UPDATED, json!({}));
    let user = UserRepo::find_response(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(user, "User updated")))
}

/// DELETE /api/v1/users/{id}
///
/// Soft delete. Administrators cannot deactivate their own account.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".into(),
        ));
    }
    if UserRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::not_found("User", id));
    }

    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Ok(Json(ApiResponse::message("User already inactive")));
    }

    publish(&state, &admin, ResourceKind::User, id, EVENT_DELETED, json!({"soft": true}));
    tracing::info!(user_id = id, deleted_by = admin.user_id, "User deactivated");
    Ok(Json(ApiResponse::message("User deactivated")))
}

/// PUT /api/v1/users/{id}/password
pub async fn set_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<SetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let password_hash = hash(&state, &input.password)?;
    if !UserRepo::update_password(&state.pool, id, &password_hash).await? {
        return Err(AppError::not_found("User", id));
    }

    publish(
        &state,
        &admin,
        ResourceKind::User,
        id,
        EVENT_UPDATED,
        json!({"fields": ["password"]}),
    );
    Ok(Json(ApiResponse::message("Password updated")))
}
