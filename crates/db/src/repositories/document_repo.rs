//! Repository for the `documents` table (metadata only).

use pmo_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document, DocumentView};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, phase_id, deliverable_id, contract_id, file_name, \
                       original_name, storage_path, size_bytes, mime_type, category, \
                       description, version, uploaded_by, uploaded_at, created_at, updated_at";

/// Provides create, list and delete operations for document metadata.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Record a stored file against a project. Category defaults to `other`
    /// and version to `1.0`.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        uploaded_by: DbId,
        input: &CreateDocument,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents
                (project_id, phase_id, deliverable_id, contract_id, file_name, original_name,
                 storage_path, size_bytes, mime_type, category, description, version,
                 uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'other'), $11,
                     COALESCE($12, '1.0'), $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(project_id)
            .bind(input.phase_id)
            .bind(input.deliverable_id)
            .bind(input.contract_id)
            .bind(&input.file_name)
            .bind(&input.original_name)
            .bind(&input.storage_path)
            .bind(input.size_bytes)
            .bind(&input.mime_type)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.version)
            .bind(uploaded_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Documents of a project, most recent upload first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DocumentView>, sqlx::Error> {
        sqlx::query_as::<_, DocumentView>(
            "SELECT doc.id, doc.project_id, doc.phase_id, doc.deliverable_id, doc.contract_id,
                    doc.file_name, doc.original_name, doc.storage_path, doc.size_bytes,
                    doc.mime_type, doc.category, doc.description, doc.version, doc.uploaded_by,
                    doc.uploaded_at, doc.created_at, doc.updated_at,
                    ph.name AS phase_name,
                    d.name AS deliverable_name,
                    c.title AS contract_title,
                    u.name AS uploaded_by_name
             FROM documents doc
             LEFT JOIN phases ph ON ph.id = doc.phase_id
             LEFT JOIN deliverables d ON d.id = doc.deliverable_id
             LEFT JOIN contracts c ON c.id = doc.contract_id
             LEFT JOIN users u ON u.id = doc.uploaded_by
             WHERE doc.project_id = $1
             ORDER BY doc.uploaded_at DESC, doc.id DESC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
