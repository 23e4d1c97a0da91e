//! Handlers for project phases.
//!
//! Collection routes live under `/projects/{id}/phases`; item routes under
//! `/phases/{id}`. Access is decided on the owning project's scope.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pmo_core::access::{require_create, require_delete, require_modify, require_view, ResourceKind};
use pmo_core::error::CoreError;
use pmo_core::types::DbId;
use pmo_core::validation::{
    validate_amount, validate_date_range, validate_input, validate_percentage,
};
use pmo_core::vocab::{validate_opt_one_of, VALID_PHASE_STATUSES};
use pmo_db::models::phase::{CreatePhase, Phase, PhaseView, UpdatePhase};
use pmo_db::repositories::PhaseRepo;
use pmo_events::bus::{EVENT_CREATED, EVENT_DELETED, EVENT_PROGRESS_RECOMPUTED, EVENT_UPDATED};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::project::ProgressResult;
use crate::handlers::{project_scope, publish};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

async fn load(state: &AppState, id: DbId) -> AppResult<Phase> {
    PhaseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Phase", id))
}

/// GET /api/v1/projects/{project_id}/phases
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<PhaseView>>>> {
    let scope = project_scope(&state, project_id).await?;
    require_view(ResourceKind::Phase, &user.principal(), &scope)?;

    let phases = PhaseRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(ApiResponse::with_count(phases, "Phases retrieved")))
}

/// POST /api/v1/projects/{project_id}/phases
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreatePhase>,
) -> AppResult<(StatusCode, Json<ApiResponse<Phase>>)> {
    let scope = project_scope(&state, project_id).await?;
    require_create(ResourceKind::Phase, &user.principal(), &scope)?;

    validate_input(&input)?;
    validate_opt_one_of("status", input.status.as_deref(), VALID_PHASE_STATUSES)?;
    if let Some(amount) = input.budget_allocated {
        validate_amount("budget_allocated", amount)?;
    }
    validate_date_range(input.start_date, input.target_end_date)?;

    let phase = PhaseRepo::create(&state.pool, project_id, &input).await?;
    publish(
        &state,
        &user,
        ResourceKind::Phase,
        phase.id,
        EVENT_CREATED,
        json!({"project_id": project_id}),
    );
    tracing::info!(phase_id = phase.id, project_id, "Phase created");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(phase, "Phase created"))))
}

/// GET /api/v1/phases/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Phase>>> {
    let phase = load(&state, id).await?;
    let scope = project_scope(&state, phase.project_id).await?;
    require_view(ResourceKind::Phase, &user.principal(), &scope)?;
    Ok(Json(ApiResponse::ok(phase, "Phase retrieved")))
}

/// PUT /api/v1/phases/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePhase>,
) -> AppResult<Json<ApiResponse<Option<Phase>>>> {
    let existing = load(&state, id).await?;
    let scope = project_scope(&state, existing.project_id).await?;
    require_modify(ResourceKind::Phase, &user.principal(), &scope)?;

    validate_input(&input)?;
    validate_opt_one_of("status", input.status.as_deref(), VALID_PHASE_STATUSES)?;
    if let Some(amount) = input.budget_allocated {
        validate_amount("budget_allocated", amount)?;
    }
    if let Some(amount) = input.budget_consumed {
        validate_amount("budget_consumed", amount)?;
    }
    if let Some(pct) = input.completion_pct {
        validate_percentage("completion_pct", pct)?;
    }
    validate_date_range(
        input.start_date.or(existing.start_date),
        input.target_end_date.or(existing.target_end_date),
    )?;

    if PhaseRepo::update(&state.pool, id, &input).await? == 0 {
        return Ok(Json(ApiResponse::ok(None, "Nothing to update")));
    }

    publish(&state, &user, ResourceKind::Phase, id, EVENT_UPDATED, json!({}));
    let phase = PhaseRepo::find_by_id(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(phase, "Phase updated")))
}

/// DELETE /api/v1/phases/{id}
///
/// Refused while deliverables still reference the phase.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let phase = load(&state, id).await?;
    let scope = project_scope(&state, phase.project_id).await?;
    require_delete(ResourceKind::Phase, &user.principal(), &scope)?;

    let deliverables = PhaseRepo::count_deliverables(&state.pool, id).await?;
    if deliverables > 0 {
        return Err(AppError::Core(CoreError::Dependency(format!(
            "Cannot delete phase: {deliverables} deliverable(s) attached"
        ))));
    }

    if !PhaseRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Phase", id));
    }

    publish(
        &state,
        &user,
        ResourceKind::Phase,
        id,
        EVENT_DELETED,
        json!({"project_id": phase.project_id}),
    );
    Ok(Json(ApiResponse::message("Phase deleted")))
}

/// POST /api/v1/phases/{id}/recompute-progress
pub async fn recompute_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ProgressResult>>> {
    let phase = load(&state, id).await?;
    let scope = project_scope(&state, phase.project_id).await?;
    require_modify(ResourceKind::Phase, &user.principal(), &scope)?;

    let completion_pct = PhaseRepo::recompute_progress(&state.pool, id).await?;
    publish(
        &state,
        &user,
        ResourceKind::Phase,
        id,
        EVENT_PROGRESS_RECOMPUTED,
        json!({"completion_pct": completion_pct}),
    );

    Ok(Json(ApiResponse::ok(
        ProgressResult { id, completion_pct },
        "Progress recomputed",
    )))
}
