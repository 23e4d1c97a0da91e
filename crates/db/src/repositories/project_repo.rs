//! Repository for the `projects` table.

use pmo_core::access::{ProjectScope, ProjectVisibility};
use pmo_core::progress::weighted_progress;
use pmo_core::types::DbId;
use pmo_core::vocab::{HEALTH_GREEN, PRIORITY_NORMAL, PROJECT_STATUS_PLANNING};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::dashboard::PortfolioStats;
use crate::models::project::{CreateProject, Project, ProjectFilter, ProjectView, UpdateProject};
use crate::patch::UpdateAssembler;
use crate::repositories::deliverable_repo::DeliverableRepo;
use crate::repositories::visibility::push_visibility;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, code, description, lead_id, org_unit_id, status_id, budget, \
                       budget_consumed, start_date, target_end_date, completion_pct, priority, \
                       health, created_at, updated_at";

/// Joined columns for [`ProjectView`]; expects aliases `p`, `u`, `o`, `s`.
const VIEW_COLUMNS: &str = "p.id, p.name, p.code, p.description, p.lead_id, \
     u.name AS lead_name, u.email AS lead_email, p.org_unit_id, o.name AS org_unit_name, \
     p.status_id, s.code AS status_code, s.name AS status_name, s.color AS status_color, \
     p.budget, p.budget_consumed, p.start_date, p.target_end_date, p.completion_pct, \
     p.priority, p.health, p.created_at, p.updated_at";

const VIEW_FROM: &str = "FROM projects p \
     JOIN users u ON u.id = p.lead_id \
     LEFT JOIN org_units o ON o.id = p.org_unit_id \
     JOIN project_statuses s ON s.id = p.status_id";

/// Provides CRUD, scoping and roll-up operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project led by `lead_id`, returning the created row.
    ///
    /// A missing `status_id` defaults to the `planning` status.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
        lead_id: DbId,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (name, code, description, lead_id, org_unit_id, status_id, budget,
                 start_date, target_end_date, priority, health)
             VALUES ($1, $2, $3, $4, $5,
                     COALESCE($6, (SELECT id FROM project_statuses WHERE code = $7)),
                     $8, $9, $10, COALESCE($11, $12), COALESCE($13, $14))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.description)
            .bind(lead_id)
            .bind(input.org_unit_id)
            .bind(input.status_id)
            .bind(PROJECT_STATUS_PLANNING)
            .bind(input.budget)
            .bind(input.start_date)
            .bind(input.target_end_date)
            .bind(&input.priority)
            .bind(PRIORITY_NORMAL)
            .bind(&input.health)
            .bind(HEALTH_GREEN)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project joined with its lead, org unit and status.
    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<ProjectView>, sqlx::Error> {
        let query = format!("SELECT {VIEW_COLUMNS} {VIEW_FROM} WHERE p.id = $1");
        sqlx::query_as::<_, ProjectView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects visible under `visibility`, newest first.
    ///
    /// `search` matches name, code or description case-insensitively;
    /// `status` is a status code.
    pub async fn list(
        pool: &PgPool,
        visibility: ProjectVisibility,
        filter: &ProjectFilter,
    ) -> Result<Vec<ProjectView>, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {VIEW_COLUMNS} {VIEW_FROM} WHERE TRUE"));
        push_visibility(&mut builder, visibility, "p");

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            builder
                .push(" AND (p.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.code ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            builder.push(" AND s.code = ").push_bind(status.to_string());
        }
        builder.push(" ORDER BY p.created_at DESC, p.id DESC");

        builder.build_query_as::<ProjectView>().fetch_all(pool).await
    }

    /// Most recently updated projects visible under `visibility`.
    pub async fn recent(
        pool: &PgPool,
        visibility: ProjectVisibility,
        limit: i64,
    ) -> Result<Vec<ProjectView>, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {VIEW_COLUMNS} {VIEW_FROM} WHERE TRUE"));
        push_visibility(&mut builder, visibility, "p");
        builder
            .push(" ORDER BY p.updated_at DESC, p.id DESC LIMIT ")
            .push_bind(limit);
        builder.build_query_as::<ProjectView>().fetch_all(pool).await
    }

    /// Apply the `Some` fields of `input`. Returns the number of rows
    /// written; `0` when `input` carries no field.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<u64, sqlx::Error> {
        let mut patch = UpdateAssembler::new("projects");
        patch
            .set("name", input.name.as_deref())
            .set("code", input.code.as_deref())
            .set("description", input.description.as_deref())
            .set("lead_id", input.lead_id)
            .set("org_unit_id", input.org_unit_id)
            .set("status_id", input.status_id)
            .set("budget", input.budget)
            .set("budget_consumed", input.budget_consumed)
            .set("start_date", input.start_date)
            .set("target_end_date", input.target_end_date)
            .set("completion_pct", input.completion_pct)
            .set("priority", input.priority.as_deref())
            .set("health", input.health.as_deref());
        patch.execute(pool, id).await
    }

    /// Permanently delete a project; children cascade. Returns `true` if a
    /// row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of deliverables attached to the project.
    pub async fn count_deliverables(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM deliverables WHERE project_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Access scope
    // -----------------------------------------------------------------------

    /// Users named responsible, validator or uploader anywhere in the project.
    pub async fn participant_ids(pool: &PgPool, id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT responsible_id FROM phases
                 WHERE project_id = $1 AND responsible_id IS NOT NULL
             UNION
             SELECT responsible_id FROM deliverables
                 WHERE project_id = $1 AND responsible_id IS NOT NULL
             UNION
             SELECT validator_id FROM deliverables
                 WHERE project_id = $1 AND validator_id IS NOT NULL
             UNION
             SELECT uploaded_by FROM documents WHERE project_id = $1",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }

    /// Ownership of a project for access checks. `None` if it does not exist.
    pub async fn scope_of(pool: &PgPool, id: DbId) -> Result<Option<ProjectScope>, sqlx::Error> {
        let lead: Option<DbId> = sqlx::query_scalar("SELECT lead_id FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        let Some(lead_id) = lead else {
            return Ok(None);
        };
        let participants = Self::participant_ids(pool, id).await?;
        Ok(Some(
            ProjectScope::led_by(lead_id).with_participants(participants),
        ))
    }

    // -----------------------------------------------------------------------
    // Derived metrics
    // -----------------------------------------------------------------------

    /// Recompute `completion_pct` from every deliverable of the project and
    /// persist it. Returns the new percentage.
    pub async fn recompute_progress(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        let rows = DeliverableRepo::progress_inputs_for_project(pool, id).await?;
        let weights: Vec<_> = rows.iter().map(|r| r.as_weight()).collect();
        let pct = weighted_progress(&weights);

        let mut patch = UpdateAssembler::new("projects");
        patch.set("completion_pct", Some(pct));
        patch.execute(pool, id).await?;

        tracing::debug!(project_id = id, completion_pct = pct, "Recomputed project progress");
        Ok(pct)
    }

    /// Status counts, average completion and budget sums over the projects
    /// visible under `visibility`.
    pub async fn portfolio_stats(
        pool: &PgPool,
        visibility: ProjectVisibility,
    ) -> Result<PortfolioStats, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE s.code = 'in_progress') AS in_progress,
                COUNT(*) FILTER (WHERE s.code = 'completed') AS completed,
                COUNT(*) FILTER (WHERE s.code = 'on_hold') AS on_hold,
                COUNT(*) FILTER (WHERE s.code = 'planning') AS planning,
                COALESCE(AVG(p.completion_pct), 0)::DOUBLE PRECISION AS average_completion,
                COALESCE(SUM(p.budget), 0)::DOUBLE PRECISION AS total_budget,
                COALESCE(SUM(p.budget_consumed), 0)::DOUBLE PRECISION AS total_consumed
             FROM projects p
             JOIN project_statuses s ON s.id = p.status_id
             WHERE TRUE",
        );
        push_visibility(&mut builder, visibility, "p");
        builder.build_query_as::<PortfolioStats>().fetch_one(pool).await
    }
}
