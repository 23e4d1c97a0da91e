//! Handlers for contracts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pmo_core::access::{require_create, require_delete, require_modify, require_view, ResourceKind};
use pmo_core::types::DbId;
use pmo_core::validation::{validate_date_range, validate_input, validate_opt_amount};
use pmo_core::vocab::{validate_opt_one_of, VALID_CONTRACT_STATUSES};
use pmo_db::models::contract::{Contract, ContractView, CreateContract, UpdateContract};
use pmo_db::repositories::{ContractRepo, ProviderRepo};
use pmo_events::bus::{EVENT_CREATED, EVENT_DELETED, EVENT_UPDATED};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{project_scope, publish};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

async fn load(state: &AppState, id: DbId) -> AppResult<Contract> {
    ContractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Contract", id))
}

async fn ensure_provider(state: &AppState, provider_id: Option<DbId>) -> AppResult<()> {
    if let Some(id) = provider_id {
        if ProviderRepo::find_by_id(&state.pool, id).await?.is_none() {
            return Err(AppError::not_found("Provider", id));
        }
    }
    Ok(())
}

/// GET /api/v1/projects/{project_id}/contracts
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<ContractView>>>> {
    let scope = project_scope(&state, project_id).await?;
    require_view(ResourceKind::Contract, &user.principal(), &scope)?;

    let contracts = ContractRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(ApiResponse::with_count(contracts, "Contracts retrieved")))
}

/// POST /api/v1/projects/{project_id}/contracts
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateContract>,
) -> AppResult<(StatusCode, Json<ApiResponse<Contract>>)> {
    let scope = project_scope(&state, project_id).await?;
    require_create(ResourceKind::Contract, &user.principal(), &scope)?;

    validate_input(&input)?;
    validate_opt_one_of("status", input.status.as_deref(), VALID_CONTRACT_STATUSES)?;
    validate_opt_amount("amount", input.amount)?;
    validate_date_range(input.start_date, input.end_date)?;
    ensure_provider(&state, input.provider_id).await?;

    let contract = ContractRepo::create(&state.pool, project_id, user.user_id, &input).await?;
    publish(
        &state,
        &user,
        ResourceKind::Contract,
        contract.id,
        EVENT_CREATED,
        json!({"project_id": project_id, "contract_number": contract.contract_number}),
    );
    tracing::info!(contract_id = contract.id, project_id, "Contract created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(contract, "Contract created")),
    ))
}

/// GET /api/v1/contracts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ContractView>>> {
    let contract = ContractRepo::find_view(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Contract", id))?;
    let scope = project_scope(&state, contract.contract.project_id).await?;
    require_view(ResourceKind::Contract, &user.principal(), &scope)?;
    Ok(Json(ApiResponse::ok(contract, "Contract retrieved")))
}

/// PUT /api/v1/contracts/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContract>,
) -> AppResult<Json<ApiResponse<Option<ContractView>>>> {
    let existing = load(&state, id).await?;
    let scope = project_scope(&state, existing.project_id).await?;
    require_modify(ResourceKind::Contract, &user.principal(), &scope)?;

    validate_input(&input)?;
    validate_opt_one_of("status", input.status.as_deref(), VALID_CONTRACT_STATUSES)?;
    validate_opt_amount("amount", input.amount)?;
    validate_date_range(
        input.start_date.or(existing.start_date),
        input.end_date.or(existing.end_date),
    )?;
    ensure_provider(&state, input.provider_id).await?;

    if ContractRepo::update(&state.pool, id, &input).await? == 0 {
        return Ok(Json(ApiResponse::ok(None, "Nothing to update")));
    }

    publish(&state, &user, ResourceKind::Contract, id, EVENT_UPDATED, json!({}));
    let contract = ContractRepo::find_view(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok(contract, "Contract updated")))
}

/// DELETE /api/v1/contracts/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let contract = load(&state, id).await?;
    let scope = project_scope(&state, contract.project_id).await?;
    require_delete(ResourceKind::Contract, &user.principal(), &scope)?;

    if !ContractRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Contract", id));
    }

    publish(
        &state,
        &user,
        ResourceKind::Contract,
        id,
        EVENT_DELETED,
        json!({"project_id": contract.project_id}),
    );
    Ok(Json(ApiResponse::message("Contract deleted")))
}
