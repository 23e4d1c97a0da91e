//! Handlers for deliverables.
//!
//! Every write recomputes the progress of the affected phases and of the
//! owning project, so `completion_pct` always reflects validated weight.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pmo_core::access::{require_create, require_delete, require_modify, require_view, ResourceKind};
use pmo_core::types::DbId;
use pmo_core::validation::{validate_input, validate_weight};
use pmo_core::vocab::{
    is_review_outcome, validate_opt_one_of, VALID_DELIVERABLE_KINDS, VALID_DELIVERABLE_STATUSES,
};
use pmo_db::models::deliverable::{
    CreateDeliverable, Deliverable, DeliverableView, UpdateDeliverable,
};
use pmo_db::repositories::{DeliverableRepo, PhaseRepo, ProjectRepo};
use pmo_events::bus::{EVENT_CREATED, EVENT_DELETED, EVENT_UPDATED};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{project_scope, publish, ProjectLinks};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

async fn load(state: &AppState, id: DbId) -> AppResult<Deliverable> {
    DeliverableRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Deliverable", id))
}

/// Recompute each distinct phase in `phases`, then the project.
async fn refresh_progress(
    state: &AppState,
    project_id: DbId,
    phases: &[Option<DbId>],
) -> AppResult<()> {
    let mut done: Vec<DbId> = Vec::with_capacity(phases.len());
    for phase_id in phases.iter().flatten() {
        if done.contains(phase_id) {
            continue;
        }
        PhaseRepo::recompute_progress(&state.pool, *phase_id).await?;
        done.push(*phase_id);
    }
    ProjectRepo::recompute_progress(&state.pool, project_id).await?;
    Ok(())
}

/// GET /api/v1/projects/{project_id}/deliverables
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<DeliverableView>>>> {
    let scope = project_scope(&state, project_id).await?;
    require_view(ResourceKind::Deliverable, &user.principal(), &scope)?;

    let deliverables = DeliverableRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(ApiResponse::with_count(deliverables, "Deliverables retrieved")))
}

/// POST /api/v1/projects/{project_id}/deliverables
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateDeliverable>,
) -> AppResult<(StatusCode, Json<ApiResponse<Deliverable>>)> {
    let scope = project_scope(&state, project_id).await?;
    require_create(ResourceKind::Deliverable, &user.principal(), &scope)?;

    validate_input(&input)?;
    validate_opt_one_of("kind", input.kind.as_deref(), VALID_DELIVERABLE_KINDS)?;
    validate_opt_one_of("status", input.status.as_deref(), VALID_DELIVERABLE_STATUSES)?;
    if let Some(weight) = input.weight {
        validate_weight(weight)?;
    }
    ProjectLinks {
        phase_id: input.phase_id,
        contract_id: input.contract_id,
        ..Default::default()
    }
    .check(&state, project_id)
    .await?;

    let deliverable = DeliverableRepo::create(&state.pool, project_id, &input).await?;
    refresh_progress(&state, project_id, &[deliverable.phase_id]).await?;

    publish(
        &state,
        &user,
        ResourceKind::Deliverable,
        deliverable.id,
        EVENT_CREATED,
        json!({"project_id": project_id}),
    );
    tracing::info!(deliverable_id = deliverable.id, project_id, "Deliverable created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(deliverable, "Deliverable created")),
    ))
}

/// GET /api/v1/deliverables/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Deliverable>>> {
    let deliverable = load(&state, id).await?;
    let scope = project_scope(&state, deliverable.project_id).await?;
    require_view(ResourceKind::Deliverable, &user.principal(), &scope)?;
    Ok(Json(ApiResponse::ok(deliverable, "Deliverable retrieved")))
}

/// PUT /api/v1/deliverables/{id}
///
/// Moving a deliverable between phases recomputes both phases. A review
/// outcome without an explicit validator records the caller.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateDeliverable>,
) -> AppResult<Json<ApiResponse<Option<Deliverable>>>> {
    let existing = load(&state, id).await?;
    let scope = project_scope(&state, existing.project_id).await?;
    require_modify(ResourceKind::Deliverable, &user.principal(), &scope)?;

    validate_input(&input)?;
    validate_opt_one_of("kind", input.kind.as_deref(), VALID_DELIVERABLE_KINDS)?;
    validate_opt_one_of("status", input.status.as_deref(), VALID_DELIVERABLE_STATUSES)?;
    if let Some(weight) = input.weight {
        validate_weight(weight)?;
    }
    ProjectLinks {
        phase_id: input.phase_id,
        contract_id: input.contract_id,
        ..Default::default()
    }
    .check(&state, existing.project_id)
    .await?;

    if input.status.as_deref().is_some_and(is_review_outcome) && input.validator_id.is_none() {
        input.validator_id = Some(user.user_id);
    }

    if DeliverableRepo::update(&state.pool, id, &input).await? == 0 {
        return Ok(Json(ApiResponse::ok(None, "Nothing to update")));
    }

    let new_phase = input.phase_id.or(existing.phase_id);
    refresh_progress(&state, existing.project_id, &[existing.phase_id, new_phase]).await?;

    publish(
        &state,
        &user,
        ResourceKind::Deliverable,
        id,
        EVENT_UPDATED,
        json!({"status": input.status}),
    );

    let deliverable = DeliverableRepo::find_by_id(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(deliverable, "Deliverable updated")))
}

/// DELETE /api/v1/deliverables/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let deliverable = load(&state, id).await?;
    let scope = project_scope(&state, deliverable.project_id).await?;
    require_delete(ResourceKind::Deliverable, &user.principal(), &scope)?;

    if !DeliverableRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Deliverable", id));
    }
    refresh_progress(&state, deliverable.project_id, &[deliverable.phase_id]).await?;

    publish(
        &state,
        &user,
        ResourceKind::Deliverable,
        id,
        EVENT_DELETED,
        json!({"project_id": deliverable.project_id}),
    );
    Ok(Json(ApiResponse::message("Deliverable deleted")))
}
