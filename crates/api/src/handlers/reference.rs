//! Handlers for `/reference`: lookup lists that feed forms.

use axum::extract::State;
use axum::Json;
use pmo_core::vocab::{priority_color, VALID_PRIORITIES};
use pmo_db::models::reference::{OrgUnit, PriorityOption, ProjectStatus, UserOption};
use pmo_db::models::role::RoleRow;
use pmo_db::repositories::{ReferenceRepo, RoleRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Payload of `GET /reference/all`.
#[derive(Debug, Serialize)]
pub struct ReferenceData {
    pub org_units: Vec<OrgUnit>,
    pub statuses: Vec<ProjectStatus>,
    pub users: Vec<UserOption>,
    pub roles: Vec<RoleRow>,
    pub priorities: Vec<PriorityOption>,
}

fn priority_options() -> Vec<PriorityOption> {
    VALID_PRIORITIES
        .iter()
        .map(|&value| PriorityOption {
            value,
            color: priority_color(value),
        })
        .collect()
}

/// GET /api/v1/reference/all
pub async fn all(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ApiResponse<ReferenceData>>> {
    let data = ReferenceData {
        org_units: ReferenceRepo::org_units(&state.pool).await?,
        statuses: ReferenceRepo::statuses(&state.pool).await?,
        users: ReferenceRepo::active_users(&state.pool).await?,
        roles: RoleRepo::list(&state.pool).await?,
        priorities: priority_options(),
    };
    Ok(Json(ApiResponse::ok(data, "Reference data")))
}

/// GET /api/v1/reference/org-units
pub async fn org_units(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ApiResponse<Vec<OrgUnit>>>> {
    let units = ReferenceRepo::org_units(&state.pool).await?;
    Ok(Json(ApiResponse::with_count(units, "Org units")))
}

/// GET /api/v1/reference/statuses
pub async fn statuses(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ApiResponse<Vec<ProjectStatus>>>> {
    let statuses = ReferenceRepo::statuses(&state.pool).await?;
    Ok(Json(ApiResponse::with_count(statuses, "Project statuses")))
}

/// GET /api/v1/reference/users
pub async fn users(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ApiResponse<Vec<UserOption>>>> {
    let users = ReferenceRepo::active_users(&state.pool).await?;
    Ok(Json(ApiResponse::with_count(users, "Active users")))
}

/// GET /api/v1/reference/roles
pub async fn roles(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<ApiResponse<Vec<RoleRow>>>> {
    let roles = RoleRepo::list(&state.pool).await?;
    Ok(Json(ApiResponse::with_count(roles, "Roles")))
}

/// GET /api/v1/reference/priorities
pub async fn priorities(
    RequireAuth(_user): RequireAuth,
) -> Json<ApiResponse<Vec<PriorityOption>>> {
    Json(ApiResponse::with_count(priority_options(), "Priorities"))
}
