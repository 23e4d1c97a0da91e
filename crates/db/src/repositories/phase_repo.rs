//! Repository for the `phases` table.

use pmo_core::progress::weighted_progress;
use pmo_core::types::DbId;
use pmo_core::vocab::PHASE_STATUS_PLANNED;
use sqlx::PgPool;

use crate::models::phase::{CreatePhase, Phase, PhaseView, UpdatePhase};
use crate::patch::UpdateAssembler;
use crate::repositories::deliverable_repo::DeliverableRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, description, sort_order, start_date, \
                       target_end_date, actual_end_date, status, budget_allocated, \
                       budget_consumed, completion_pct, responsible_id, created_at, updated_at";

/// Provides CRUD and progress operations for project phases.
pub struct PhaseRepo;

impl PhaseRepo {
    /// Insert a phase. Without an explicit `sort_order` the phase is placed
    /// after the project's current last phase.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreatePhase,
    ) -> Result<Phase, sqlx::Error> {
        let query = format!(
            "INSERT INTO phases
                (project_id, name, description, sort_order, start_date, target_end_date,
                 status, budget_allocated, responsible_id)
             VALUES ($1, $2, $3,
                     COALESCE($4, (SELECT COALESCE(MAX(sort_order), 0) + 1
                                   FROM phases WHERE project_id = $1)),
                     $5, $6, COALESCE($7, $8), COALESCE($9, 0::DOUBLE PRECISION), $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Phase>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.sort_order)
            .bind(input.start_date)
            .bind(input.target_end_date)
            .bind(&input.status)
            .bind(PHASE_STATUS_PLANNED)
            .bind(input.budget_allocated)
            .bind(input.responsible_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Phase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM phases WHERE id = $1");
        sqlx::query_as::<_, Phase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Phases of a project in display order, with deliverable counts.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<PhaseView>, sqlx::Error> {
        sqlx::query_as::<_, PhaseView>(
            "SELECT ph.id, ph.project_id, ph.name, ph.description, ph.sort_order, ph.start_date,
                    ph.target_end_date, ph.actual_end_date, ph.status, ph.budget_allocated,
                    ph.budget_consumed, ph.completion_pct, ph.responsible_id, ph.created_at,
                    ph.updated_at,
                    u.name AS responsible_name,
                    (SELECT COUNT(*) FROM deliverables d WHERE d.phase_id = ph.id)
                        AS deliverable_count
             FROM phases ph
             LEFT JOIN users u ON u.id = ph.responsible_id
             WHERE ph.project_id = $1
             ORDER BY ph.sort_order, ph.id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Apply the `Some` fields of `input`. Returns the number of rows written.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdatePhase) -> Result<u64, sqlx::Error> {
        let mut patch = UpdateAssembler::new("phases");
        patch
            .set("name", input.name.as_deref())
            .set("description", input.description.as_deref())
            .set("sort_order", input.sort_order)
            .set("start_date", input.start_date)
            .set("target_end_date", input.target_end_date)
            .set("actual_end_date", input.actual_end_date)
            .set("status", input.status.as_deref())
            .set("budget_allocated", input.budget_allocated)
            .set("budget_consumed", input.budget_consumed)
            .set("completion_pct", input.completion_pct)
            .set("responsible_id", input.responsible_id);
        patch.execute(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM phases WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of deliverables attached to the phase.
    pub async fn count_deliverables(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM deliverables WHERE phase_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Recompute `completion_pct` from the phase's deliverables and persist
    /// it. Returns the new percentage.
    pub async fn recompute_progress(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        let rows = DeliverableRepo::progress_inputs_for_phase(pool, id).await?;
        let weights: Vec<_> = rows.iter().map(|r| r.as_weight()).collect();
        let pct = weighted_progress(&weights);

        let mut patch = UpdateAssembler::new("phases");
        patch.set("completion_pct", Some(pct));
        patch.execute(pool, id).await?;

        tracing::debug!(phase_id = id, completion_pct = pct, "Recomputed phase progress");
        Ok(pct)
    }
}
