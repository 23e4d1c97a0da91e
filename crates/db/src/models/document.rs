//! Document metadata model and DTOs.

use pmo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub project_id: DbId,
    pub phase_id: Option<DbId>,
    pub deliverable_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub file_name: String,
    pub original_name: String,
    pub storage_path: String,
    pub size_bytes: i64,
    pub mime_type: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub version: String,
    pub uploaded_by: DbId,
    pub uploaded_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A document with the names of what it is attached to.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub document: Document,
    pub phase_name: Option<String>,
    pub deliverable_name: Option<String>,
    pub contract_title: Option<String>,
    pub uploaded_by_name: Option<String>,
}

/// Metadata for a file already placed in storage.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDocument {
    pub phase_id: Option<DbId>,
    pub deliverable_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(min = 1, max = 255))]
    pub original_name: String,
    #[validate(length(min = 1, max = 1024))]
    pub storage_path: String,
    pub size_bytes: i64,
    pub mime_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub version: Option<String>,
}
