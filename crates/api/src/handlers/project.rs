//! Handlers for the `/projects` resource.
//!
//! Reads are filtered by the caller's [`ProjectVisibility`]; writes go
//! through the `pmo_core::access` predicates against the project's scope.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pmo_core::access::{
    project_visibility, require_create, require_delete, require_modify, require_view,
    ProjectScope, ProjectVisibility, ResourceKind,
};
use pmo_core::error::CoreError;
use pmo_core::roles::Role;
use pmo_core::types::DbId;
use pmo_core::validation::{
    clamp_limit, validate_amount, validate_date_range, validate_input, validate_opt_amount,
    validate_percentage,
};
use pmo_core::vocab::{validate_opt_one_of, VALID_HEALTH, VALID_PRIORITIES};
use pmo_db::models::budget::BudgetLineView;
use pmo_db::models::contract::ContractView;
use pmo_db::models::dashboard::PortfolioStats;
use pmo_db::models::deliverable::DeliverableView;
use pmo_db::models::document::DocumentView;
use pmo_db::models::phase::PhaseView;
use pmo_db::models::project::{CreateProject, ProjectFilter, ProjectView, UpdateProject};
use pmo_db::models::provider::ProjectProviderView;
use pmo_db::repositories::{
    BudgetRepo, ContractRepo, DeliverableRepo, DocumentRepo, PhaseRepo, ProjectRepo,
    ProviderRepo,
};
use pmo_events::bus::{EVENT_CREATED, EVENT_DELETED, EVENT_PROGRESS_RECOMPUTED, EVENT_UPDATED};
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{project_scope, publish};
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Default and maximum size of the recent projects list.
const RECENT_DEFAULT: i64 = 5;
const RECENT_MAX: i64 = 50;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Payload of `GET /projects/dashboard`.
#[derive(Debug, Serialize)]
pub struct ProjectDashboard {
    pub stats: PortfolioStats,
    pub recent_projects: Vec<ProjectView>,
    /// Projects the caller leads; empty for other roles.
    pub my_projects: Vec<ProjectView>,
    pub user_role: Role,
}

/// Payload of `GET /projects/{id}/details`: the project with every child
/// collection.
#[derive(Debug, Serialize)]
pub struct ProjectDetails {
    pub project: ProjectView,
    pub phases: Vec<PhaseView>,
    pub deliverables: Vec<DeliverableView>,
    pub contracts: Vec<ContractView>,
    pub documents: Vec<DocumentView>,
    pub providers: Vec<ProjectProviderView>,
    pub budget_lines: Vec<BudgetLineView>,
}

/// Result of an explicit progress recomputation.
#[derive(Debug, Serialize)]
pub struct ProgressResult {
    pub id: DbId,
    pub completion_pct: i32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects?search=&status=
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<ApiResponse<Vec<ProjectView>>>> {
    let visibility = project_visibility(&user.principal());
    let projects = ProjectRepo::list(&state.pool, visibility, &filter).await?;
    let message = format!("{} projects retrieved", projects.len());
    Ok(Json(ApiResponse::with_count(projects, message)))
}

/// POST /api/v1/projects
///
/// The caller becomes the lead unless `lead_id` is given.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProjectView>>)> {
    require_create(ResourceKind::Project, &user.principal(), &ProjectScope::unscoped())?;

    validate_input(&input)?;
    validate_opt_one_of("priority", input.priority.as_deref(), VALID_PRIORITIES)?;
    validate_opt_one_of("health", input.health.as_deref(), VALID_HEALTH)?;
    validate_opt_amount("budget", input.budget)?;
    validate_date_range(input.start_date, input.target_end_date)?;

    let lead_id = input.lead_id.unwrap_or(user.user_id);
    let project = ProjectRepo::create(&state.pool, &input, lead_id).await?;

    publish(
        &state,
        &user,
        ResourceKind::Project,
        project.id,
        EVENT_CREATED,
        json!({"code": project.code}),
    );
    tracing::info!(project_id = project.id, lead_id, user_id = user.user_id, "Project created");

    let view = ProjectRepo::find_view(&state.pool, project.id)
        .await?
        .ok_or(AppError::not_found("Project", project.id))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(view, "Project created"))))
}

/// GET /api/v1/projects/stats
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PortfolioStats>>> {
    let visibility = project_visibility(&user.principal());
    let stats = ProjectRepo::portfolio_stats(&state.pool, visibility).await?;
    Ok(Json(ApiResponse::ok(stats, "Project statistics")))
}

/// GET /api/v1/projects/recent?limit=
pub async fn recent(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<ApiResponse<Vec<ProjectView>>>> {
    let limit = clamp_limit(params.limit, RECENT_DEFAULT, RECENT_MAX);
    let visibility = project_visibility(&user.principal());
    let projects = ProjectRepo::recent(&state.pool, visibility, limit).await?;
    Ok(Json(ApiResponse::with_count(projects, "Recent projects")))
}

/// GET /api/v1/projects/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProjectDashboard>>> {
    let visibility = project_visibility(&user.principal());
    let stats = ProjectRepo::portfolio_stats(&state.pool, visibility).await?;
    let recent_projects = ProjectRepo::recent(&state.pool, visibility, RECENT_DEFAULT).await?;
    let my_projects = if user.role == Role::ProjectLead {
        ProjectRepo::list(
            &state.pool,
            ProjectVisibility::LedBy(user.user_id),
            &ProjectFilter::default(),
        )
        .await?
    } else {
        Vec::new()
    };

    Ok(Json(ApiResponse::ok(
        ProjectDashboard {
            stats,
            recent_projects,
            my_projects,
            user_role: user.role,
        },
        "Dashboard retrieved",
    )))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ProjectView>>> {
    let scope = project_scope(&state, id).await?;
    require_view(ResourceKind::Project, &user.principal(), &scope)?;

    let project = ProjectRepo::find_view(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    Ok(Json(ApiResponse::ok(project, "Project retrieved")))
}

/// PUT /api/v1/projects/{id}
///
/// Partial update: only the fields present in the body are written.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<ApiResponse<Option<ProjectView>>>> {
    let scope = project_scope(&state, id).await?;
    require_modify(ResourceKind::Project, &user.principal(), &scope)?;

    let existing = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;

    validate_input(&input)?;
    validate_opt_one_of("priority", input.priority.as_deref(), VALID_PRIORITIES)?;
    validate_opt_one_of("health", input.health.as_deref(), VALID_HEALTH)?;
    validate_opt_amount("budget", input.budget)?;
    if let Some(consumed) = input.budget_consumed {
        validate_amount("budget_consumed", consumed)?;
    }
    if let Some(pct) = input.completion_pct {
        validate_percentage("completion_pct", pct)?;
    }
    validate_date_range(
        input.start_date.or(existing.start_date),
        input.target_end_date.or(existing.target_end_date),
    )?;

    if ProjectRepo::update(&state.pool, id, &input).await? == 0 {
        return Ok(Json(ApiResponse::ok(None, "Nothing to update")));
    }

    publish(&state, &user, ResourceKind::Project, id, EVENT_UPDATED, json!({}));
    tracing::info!(project_id = id, user_id = user.user_id, "Project updated");

    let project = ProjectRepo::find_view(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(project, "Project updated")))
}

/// DELETE /api/v1/projects/{id}
///
/// Refused while the project still has deliverables.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let scope = project_scope(&state, id).await?;
    require_delete(ResourceKind::Project, &user.principal(), &scope)?;

    let deliverables = ProjectRepo::count_deliverables(&state.pool, id).await?;
    if deliverables > 0 {
        return Err(AppError::Core(CoreError::Dependency(format!(
            "Cannot delete project: {deliverables} deliverable(s) attached"
        ))));
    }

    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Project", id));
    }

    publish(&state, &user, ResourceKind::Project, id, EVENT_DELETED, json!({}));
    tracing::info!(project_id = id, user_id = user.user_id, "Project deleted");
    Ok(Json(ApiResponse::message("Project deleted")))
}

/// GET /api/v1/projects/{id}/details
pub async fn details(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ProjectDetails>>> {
    let scope = project_scope(&state, id).await?;
    require_view(ResourceKind::Project, &user.principal(), &scope)?;

    let project = ProjectRepo::find_view(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    let details = ProjectDetails {
        project,
        phases: PhaseRepo::list_by_project(&state.pool, id).await?,
        deliverables: DeliverableRepo::list_by_project(&state.pool, id).await?,
        contracts: ContractRepo::list_by_project(&state.pool, id).await?,
        documents: DocumentRepo::list_by_project(&state.pool, id).await?,
        providers: ProviderRepo::list_for_project(&state.pool, id).await?,
        budget_lines: BudgetRepo::list_by_project(&state.pool, id).await?,
    };

    tracing::debug!(
        project_id = id,
        phases = details.phases.len(),
        deliverables = details.deliverables.len(),
        contracts = details.contracts.len(),
        "Project details loaded"
    );
    Ok(Json(ApiResponse::ok(details, "Project details retrieved")))
}

/// POST /api/v1/projects/{id}/recompute-progress
pub async fn recompute_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ProgressResult>>> {
    let scope = project_scope(&state, id).await?;
    require_modify(ResourceKind::Project, &user.principal(), &scope)?;

    let completion_pct = ProjectRepo::recompute_progress(&state.pool, id).await?;
    publish(
        &state,
        &user,
        ResourceKind::Project,
        id,
        EVENT_PROGRESS_RECOMPUTED,
        json!({"completion_pct": completion_pct}),
    );

    Ok(Json(ApiResponse::ok(
        ProgressResult { id, completion_pct },
        "Progress recomputed",
    )))
}
