//! Handlers for the provider registry and project/provider association.
//!
//! Providers are not tied to a project: access is checked with an unscoped
//! [`ProjectScope`]. Attaching a provider to a project counts as modifying
//! that project, so a project lead may staff their own projects.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pmo_core::access::{
    require_create, require_delete, require_modify, require_view, ProjectScope, ResourceKind,
};
use pmo_core::error::CoreError;
use pmo_core::types::DbId;
use pmo_core::validation::{validate_date_range, validate_input};
use pmo_core::vocab::{
    validate_one_of, validate_opt_one_of, PROVIDER_TYPES, VALID_ASSOCIATION_STATUSES,
    VALID_PROVIDER_STATUSES,
};
use pmo_db::models::contract::ContractView;
use pmo_db::models::provider::{
    AssociateProvider, CreateProvider, ProjectProviderView, Provider, ProviderFilter,
    ProviderProject, ProviderStats, ProviderTypeCount, ProviderView, UpdateProvider,
    UpdateProviderStatus,
};
use pmo_db::repositories::{ContractRepo, ProviderRepo};
use pmo_events::bus::{EVENT_CREATED, EVENT_DELETED, EVENT_UPDATED};
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{project_scope, publish};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Payload of `GET /providers/types`.
#[derive(Debug, Serialize)]
pub struct ProviderTypes {
    /// Suggested values for the free-text `provider_type` field.
    pub suggested: &'static [&'static str],
    /// Types actually in use, with their provider counts.
    pub in_use: Vec<ProviderTypeCount>,
}

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<Provider> {
    ProviderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Provider", id))
}

/// GET /api/v1/providers?status=&search=&provider_type=
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(filter): Query<ProviderFilter>,
) -> AppResult<Json<ApiResponse<Vec<ProviderView>>>> {
    require_view(ResourceKind::Provider, &user.principal(), &ProjectScope::unscoped())?;

    let providers = ProviderRepo::list(&state.pool, &filter).await?;
    let message = format!("{} providers retrieved", providers.len());
    Ok(Json(ApiResponse::with_count(providers, message)))
}

/// POST /api/v1/providers
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProvider>,
) -> AppResult<(StatusCode, Json<ApiResponse<Provider>>)> {
    require_create(ResourceKind::Provider, &user.principal(), &ProjectScope::unscoped())?;

    validate_input(&input)?;
    validate_opt_one_of("status", input.status.as_deref(), VALID_PROVIDER_STATUSES)?;

    let provider = ProviderRepo::create(&state.pool, &input).await?;
    publish(
        &state,
        &user,
        ResourceKind::Provider,
        provider.id,
        EVENT_CREATED,
        json!({"name": provider.name}),
    );
    tracing::info!(provider_id = provider.id, user_id = user.user_id, "Provider created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(provider, "Provider created")),
    ))
}

/// GET /api/v1/providers/stats
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProviderStats>>> {
    require_view(ResourceKind::Provider, &user.principal(), &ProjectScope::unscoped())?;
    let stats = ProviderRepo::stats(&state.pool).await?;
    Ok(Json(ApiResponse::ok(stats, "Provider statistics")))
}

/// GET /api/v1/providers/types
pub async fn types(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProviderTypes>>> {
    require_view(ResourceKind::Provider, &user.principal(), &ProjectScope::unscoped())?;
    let in_use = ProviderRepo::type_counts(&state.pool).await?;
    Ok(Json(ApiResponse::ok(
        ProviderTypes {
            suggested: PROVIDER_TYPES,
            in_use,
        },
        "Provider types",
    )))
}

/// GET /api/v1/providers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ProviderView>>> {
    require_view(ResourceKind::Provider, &user.principal(), &ProjectScope::unscoped())?;
    let provider = ProviderRepo::find_view(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Provider", id))?;
    Ok(Json(ApiResponse::ok(provider, "Provider retrieved")))
}

/// PUT /api/v1/providers/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProvider>,
) -> AppResult<Json<ApiResponse<Option<ProviderView>>>> {
    require_modify(ResourceKind::Provider, &user.principal(), &ProjectScope::unscoped())?;
    ensure_exists(&state, id).await?;

    validate_input(&input)?;
    validate_opt_one_of("status", input.status.as_deref(), VALID_PROVIDER_STATUSES)?;

    if ProviderRepo::update(&state.pool, id, &input).await? == 0 {
        return Ok(Json(ApiResponse::ok(None, "Nothing to update")));
    }

    publish(&state, &user, ResourceKind::Provider, id, EVENT_UPDATED, json!({}));
    let provider = ProviderRepo::find_view(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(provider, "Provider updated")))
}

/// DELETE /api/v1/providers/{id}
///
/// Refused while contracts still reference the provider.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    require_delete(ResourceKind::Provider, &user.principal(), &ProjectScope::unscoped())?;
    ensure_exists(&state, id).await?;

    let contracts = ProviderRepo::count_contracts(&state.pool, id).await?;
    if contracts > 0 {
        return Err(AppError::Core(CoreError::Dependency(format!(
            "Cannot delete provider: {contracts} contract(s) attached"
        ))));
    }

    if !ProviderRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Provider", id));
    }

    publish(&state, &user, ResourceKind::Provider, id, EVENT_DELETED, json!({}));
    tracing::info!(provider_id = id, user_id = user.user_id, "Provider deleted");
    Ok(Json(ApiResponse::message("Provider deleted")))
}

/// PUT /api/v1/providers/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProviderStatus>,
) -> AppResult<Json<ApiResponse<Option<ProviderView>>>> {
    require_modify(ResourceKind::Provider, &user.principal(), &ProjectScope::unscoped())?;
    validate_one_of("status", &input.status, VALID_PROVIDER_STATUSES)?;

    if !ProviderRepo::update_status(&state.pool, id, &input.status).await? {
        return Err(AppError::not_found("Provider", id));
    }

    publish(
        &state,
        &user,
        ResourceKind::Provider,
        id,
        EVENT_UPDATED,
        json!({"status": input.status}),
    );
    let provider = ProviderRepo::find_view(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(provider, "Provider status updated")))
}

/// GET /api/v1/providers/{id}/contracts
pub async fn contracts(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<ContractView>>>> {
    require_view(ResourceKind::Provider, &user.principal(), &ProjectScope::unscoped())?;
    ensure_exists(&state, id).await?;

    let contracts = ContractRepo::list_by_provider(&state.pool, id).await?;
    Ok(Json(ApiResponse::with_count(contracts, "Provider contracts")))
}

/// GET /api/v1/providers/{id}/projects
pub async fn projects(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<ProviderProject>>>> {
    require_view(ResourceKind::Provider, &user.principal(), &ProjectScope::unscoped())?;
    ensure_exists(&state, id).await?;

    let projects = ProviderRepo::projects_of(&state.pool, id).await?;
    Ok(Json(ApiResponse::with_count(projects, "Provider projects")))
}

// ---------------------------------------------------------------------------
// Project association
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{project_id}/providers
pub async fn list_for_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<ProjectProviderView>>>> {
    let scope = project_scope(&state, project_id).await?;
    require_view(ResourceKind::Project, &user.principal(), &scope)?;

    let providers = ProviderRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(ApiResponse::with_count(providers, "Project providers")))
}

/// POST /api/v1/projects/{project_id}/providers
///
/// Re-associating an already linked provider updates the link in place.
pub async fn associate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<AssociateProvider>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProjectProviderView>>)> {
    let scope = project_scope(&state, project_id).await?;
    require_modify(ResourceKind::Project, &user.principal(), &scope)?;

    validate_opt_one_of("status", input.status.as_deref(), VALID_ASSOCIATION_STATUSES)?;
    validate_date_range(input.start_date, input.end_date)?;
    ensure_exists(&state, input.provider_id).await?;

    let link = ProviderRepo::associate(&state.pool, project_id, &input).await?;
    publish(
        &state,
        &user,
        ResourceKind::Project,
        project_id,
        "provider_associated",
        json!({"provider_id": input.provider_id}),
    );
    tracing::info!(project_id, provider_id = input.provider_id, "Provider associated");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(link, "Provider associated")),
    ))
}

/// DELETE /api/v1/projects/{project_id}/providers/{provider_id}
pub async fn dissociate(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, provider_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let scope = project_scope(&state, project_id).await?;
    require_modify(ResourceKind::Project, &user.principal(), &scope)?;

    if !ProviderRepo::dissociate(&state.pool, project_id, provider_id).await? {
        return Err(AppError::not_found("ProjectProvider", provider_id));
    }

    publish(
        &state,
        &user,
        ResourceKind::Project,
        project_id,
        "provider_dissociated",
        json!({"provider_id": provider_id}),
    );
    Ok(Json(ApiResponse::message("Provider removed from project")))
}
