//! Repository for the `deliverables` table.

use pmo_core::types::DbId;
use pmo_core::vocab::{DELIVERABLE_KIND_DOCUMENT, DELIVERABLE_STATUS_PLANNED};
use sqlx::PgPool;

use crate::models::deliverable::{
    CreateDeliverable, Deliverable, DeliverableProgressRow, DeliverableView, UpdateDeliverable,
};
use crate::patch::UpdateAssembler;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, phase_id, contract_id, name, description, kind, due_date, \
                       delivered_date, status, responsible_id, validator_id, weight, comments, \
                       created_at, updated_at";

/// Provides CRUD operations for deliverables.
pub struct DeliverableRepo;

impl DeliverableRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateDeliverable,
    ) -> Result<Deliverable, sqlx::Error> {
        let query = format!(
            "INSERT INTO deliverables
                (project_id, phase_id, contract_id, name, description, kind, due_date,
                 status, responsible_id, weight, comments)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, $7), $8, COALESCE($9, $10), $11,
                     COALESCE($12, 0::DOUBLE PRECISION), $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deliverable>(&query)
            .bind(project_id)
            .bind(input.phase_id)
            .bind(input.contract_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.kind)
            .bind(DELIVERABLE_KIND_DOCUMENT)
            .bind(input.due_date)
            .bind(&input.status)
            .bind(DELIVERABLE_STATUS_PLANNED)
            .bind(input.responsible_id)
            .bind(input.weight)
            .bind(&input.comments)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Deliverable>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM deliverables WHERE id = $1");
        sqlx::query_as::<_, Deliverable>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Deliverables of a project ordered by due date (undated last).
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DeliverableView>, sqlx::Error> {
        sqlx::query_as::<_, DeliverableView>(
            "SELECT d.id, d.project_id, d.phase_id, d.contract_id, d.name, d.description, d.kind,
                    d.due_date, d.delivered_date, d.status, d.responsible_id, d.validator_id,
                    d.weight, d.comments, d.created_at, d.updated_at,
                    ph.name AS phase_name,
                    r.name AS responsible_name,
                    v.name AS validator_name
             FROM deliverables d
             LEFT JOIN phases ph ON ph.id = d.phase_id
             LEFT JOIN users r ON r.id = d.responsible_id
             LEFT JOIN users v ON v.id = d.validator_id
             WHERE d.project_id = $1
             ORDER BY d.due_date NULLS LAST, d.id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Apply the `Some` fields of `input`. Returns the number of rows written.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDeliverable,
    ) -> Result<u64, sqlx::Error> {
        let mut patch = UpdateAssembler::new("deliverables");
        patch
            .set("name", input.name.as_deref())
            .set("description", input.description.as_deref())
            .set("phase_id", input.phase_id)
            .set("contract_id", input.contract_id)
            .set("kind", input.kind.as_deref())
            .set("due_date", input.due_date)
            .set("delivered_date", input.delivered_date)
            .set("status", input.status.as_deref())
            .set("responsible_id", input.responsible_id)
            .set("validator_id", input.validator_id)
            .set("weight", input.weight)
            .set("comments", input.comments.as_deref());
        patch.execute(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM deliverables WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Weight and status of every deliverable in a phase.
    pub async fn progress_inputs_for_phase(
        pool: &PgPool,
        phase_id: DbId,
    ) -> Result<Vec<DeliverableProgressRow>, sqlx::Error> {
        sqlx::query_as::<_, DeliverableProgressRow>(
            "SELECT weight, status FROM deliverables WHERE phase_id = $1",
        )
        .bind(phase_id)
        .fetch_all(pool)
        .await
    }

    /// Weight and status of every deliverable in a project.
    pub async fn progress_inputs_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DeliverableProgressRow>, sqlx::Error> {
        sqlx::query_as::<_, DeliverableProgressRow>(
            "SELECT weight, status FROM deliverables WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
