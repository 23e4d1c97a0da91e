//! Handlers for budget lines and the per-project budget summary.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pmo_core::access::{require_create, require_delete, require_modify, require_view, ResourceKind};
use pmo_core::types::DbId;
use pmo_core::validation::{validate_input, validate_opt_amount};
use pmo_core::vocab::{
    validate_one_of, validate_opt_one_of, VALID_BUDGET_CATEGORIES, VALID_BUDGET_STATUSES,
};
use pmo_db::models::budget::{
    BudgetLine, BudgetLineView, BudgetSummary, CreateBudgetLine, ReplaceBudget, UpdateBudgetLine,
};
use pmo_db::repositories::BudgetRepo;
use pmo_events::bus::{EVENT_CREATED, EVENT_DELETED, EVENT_UPDATED};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{project_scope, publish, ProjectLinks};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

fn validate_line(line: &CreateBudgetLine) -> AppResult<()> {
    validate_input(line)?;
    validate_one_of("category", &line.category, VALID_BUDGET_CATEGORIES)?;
    validate_opt_one_of("status", line.status.as_deref(), VALID_BUDGET_STATUSES)?;
    validate_opt_amount("planned_amount", line.planned_amount)?;
    validate_opt_amount("consumed_amount", line.consumed_amount)?;
    Ok(())
}

fn links_of(phase_id: Option<DbId>, contract_id: Option<DbId>) -> ProjectLinks {
    ProjectLinks {
        phase_id,
        contract_id,
        ..Default::default()
    }
}

async fn load(state: &AppState, id: DbId) -> AppResult<BudgetLine> {
    BudgetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("BudgetLine", id))
}

/// GET /api/v1/projects/{project_id}/budget
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<BudgetLineView>>>> {
    let scope = project_scope(&state, project_id).await?;
    require_view(ResourceKind::BudgetLine, &user.principal(), &scope)?;

    let lines = BudgetRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(ApiResponse::with_count(lines, "Budget lines retrieved")))
}

/// POST /api/v1/projects/{project_id}/budget
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateBudgetLine>,
) -> AppResult<(StatusCode, Json<ApiResponse<BudgetLine>>)> {
    let scope = project_scope(&state, project_id).await?;
    require_create(ResourceKind::BudgetLine, &user.principal(), &scope)?;
    validate_line(&input)?;
    links_of(input.phase_id, input.contract_id)
        .check(&state, project_id)
        .await?;

    let line = BudgetRepo::create(&state.pool, project_id, user.user_id, &input).await?;
    publish(
        &state,
        &user,
        ResourceKind::BudgetLine,
        line.id,
        EVENT_CREATED,
        json!({"project_id": project_id, "category": line.category}),
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(line, "Budget line created")),
    ))
}

/// PUT /api/v1/projects/{project_id}/budget
///
/// Replaces the whole line set. Every line is validated before anything is
/// written, and the swap runs in one transaction.
pub async fn replace(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<ReplaceBudget>,
) -> AppResult<Json<ApiResponse<Vec<BudgetLineView>>>> {
    let scope = project_scope(&state, project_id).await?;
    require_modify(ResourceKind::BudgetLine, &user.principal(), &scope)?;

    for line in &input.lines {
        validate_line(line)?;
        links_of(line.phase_id, line.contract_id)
            .check(&state, project_id)
            .await?;
    }

    let written =
        BudgetRepo::replace_for_project(&state.pool, project_id, user.user_id, &input.lines)
            .await?;
    publish(
        &state,
        &user,
        ResourceKind::Project,
        project_id,
        "budget_replaced",
        json!({"lines": written}),
    );
    tracing::info!(project_id, lines = written, "Budget replaced");

    let lines = BudgetRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(ApiResponse::with_count(lines, "Budget replaced")))
}

/// GET /api/v1/projects/{project_id}/budget/summary
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<BudgetSummary>>> {
    let scope = project_scope(&state, project_id).await?;
    require_view(ResourceKind::BudgetLine, &user.principal(), &scope)?;

    let summary = BudgetRepo::summary(&state.pool, project_id)
        .await?
        .ok_or(AppError::not_found("Project", project_id))?;
    Ok(Json(ApiResponse::ok(summary, "Budget summary")))
}

/// PUT /api/v1/budget-lines/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBudgetLine>,
) -> AppResult<Json<ApiResponse<Option<BudgetLine>>>> {
    let existing = load(&state, id).await?;
    let scope = project_scope(&state, existing.project_id).await?;
    require_modify(ResourceKind::BudgetLine, &user.principal(), &scope)?;

    validate_input(&input)?;
    validate_opt_one_of("category", input.category.as_deref(), VALID_BUDGET_CATEGORIES)?;
    validate_opt_one_of("status", input.status.as_deref(), VALID_BUDGET_STATUSES)?;
    validate_opt_amount("planned_amount", input.planned_amount)?;
    validate_opt_amount("consumed_amount", input.consumed_amount)?;
    links_of(input.phase_id, input.contract_id)
        .check(&state, existing.project_id)
        .await?;

    if BudgetRepo::update(&state.pool, id, &input).await? == 0 {
        return Ok(Json(ApiResponse::ok(None, "Nothing to update")));
    }

    publish(&state, &user, ResourceKind::BudgetLine, id, EVENT_UPDATED, json!({}));
    let line = BudgetRepo::find_by_id(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(line, "Budget line updated")))
}

/// DELETE /api/v1/budget-lines/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let line = load(&state, id).await?;
    let scope = project_scope(&state, line.project_id).await?;
    require_delete(ResourceKind::BudgetLine, &user.principal(), &scope)?;

    if !BudgetRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("BudgetLine", id));
    }

    publish(
        &state,
        &user,
        ResourceKind::BudgetLine,
        id,
        EVENT_DELETED,
        json!({"project_id": line.project_id}),
    );
    Ok(Json(ApiResponse::message("Budget line deleted")))
}
