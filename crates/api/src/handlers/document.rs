//! Handlers for document metadata.
//!
//! The service stores metadata only. The file itself is already in storage
//! when `POST /projects/{id}/documents` is called.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pmo_core::access::{require_create, require_delete, require_view, ResourceKind};
use pmo_core::documents::validate_document_metadata;
use pmo_core::types::DbId;
use pmo_core::validation::validate_input;
use pmo_core::vocab::{validate_opt_one_of, VALID_DOCUMENT_CATEGORIES};
use pmo_db::models::document::{CreateDocument, Document, DocumentView};
use pmo_db::repositories::DocumentRepo;
use pmo_events::bus::{EVENT_CREATED, EVENT_DELETED};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::{project_scope, publish, ProjectLinks};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/documents
pub async fn list_by_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<DocumentView>>>> {
    let scope = project_scope(&state, project_id).await?;
    require_view(ResourceKind::Document, &user.principal(), &scope)?;

    let documents = DocumentRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(ApiResponse::with_count(documents, "Documents retrieved")))
}

/// POST /api/v1/projects/{project_id}/documents
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateDocument>,
) -> AppResult<(StatusCode, Json<ApiResponse<Document>>)> {
    let scope = project_scope(&state, project_id).await?;
    require_create(ResourceKind::Document, &user.principal(), &scope)?;

    validate_input(&input)?;
    validate_document_metadata(&input.original_name, input.size_bytes)?;
    validate_opt_one_of("category", input.category.as_deref(), VALID_DOCUMENT_CATEGORIES)?;
    ProjectLinks {
        phase_id: input.phase_id,
        contract_id: input.contract_id,
        deliverable_id: input.deliverable_id,
    }
    .check(&state, project_id)
    .await?;

    let document = DocumentRepo::create(&state.pool, project_id, user.user_id, &input).await?;
    publish(
        &state,
        &user,
        ResourceKind::Document,
        document.id,
        EVENT_CREATED,
        json!({"project_id": project_id, "original_name": document.original_name}),
    );
    tracing::info!(
        document_id = document.id,
        project_id,
        size_bytes = document.size_bytes,
        "Document registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(document, "Document registered")),
    ))
}

/// GET /api/v1/documents/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Document>>> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Document", id))?;
    let scope = project_scope(&state, document.project_id).await?;
    require_view(ResourceKind::Document, &user.principal(), &scope)?;
    Ok(Json(ApiResponse::ok(document, "Document retrieved")))
}

/// DELETE /api/v1/documents/{id}
///
/// Removes the metadata row; the stored file is left to the storage owner.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Document", id))?;
    let scope = project_scope(&state, document.project_id).await?;
    require_delete(ResourceKind::Document, &user.principal(), &scope)?;

    if !DocumentRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Document", id));
    }

    publish(
        &state,
        &user,
        ResourceKind::Document,
        id,
        EVENT_DELETED,
        json!({"storage_path": document.storage_path}),
    );
    Ok(Json(ApiResponse::message("Document deleted")))
}
