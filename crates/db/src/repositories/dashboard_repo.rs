//! Aggregate read queries behind the PMO dashboard and reports.
//!
//! Every query here is portfolio-wide; callers gate access by role before
//! reaching this repository.

use pmo_core::alerts::{ATTENTION_WINDOW_DAYS, AT_RISK_COMPLETION_PCT, NEARLY_DONE_PCT};
use sqlx::PgPool;

use crate::models::dashboard::{
    AlertCandidate, AttentionProject, LeadWorkload, MonthlyProjects, OrgUnitBreakdown,
    OverdueDeliverable, PortfolioKpis, ProjectExportRow, ProviderActivity, StatusBreakdown,
    TopProject,
};

/// Maximum rows in the provider activity ranking.
pub const PROVIDER_ACTIVITY_LIMIT: i64 = 10;

/// Maximum rows in the overdue deliverables list.
pub const OVERDUE_DELIVERABLES_LIMIT: i64 = 20;

/// Maximum rows in the most-advanced projects list.
pub const TOP_PROJECTS_LIMIT: i64 = 5;

/// Provides portfolio-wide aggregate queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Headline figures over every non-cancelled project.
    pub async fn kpis(pool: &PgPool) -> Result<PortfolioKpis, sqlx::Error> {
        sqlx::query_as::<_, PortfolioKpis>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE p.target_end_date < CURRENT_DATE
                                   AND s.code <> 'completed') AS overdue,
                COUNT(*) FILTER (WHERE p.completion_pct >= $1) AS nearly_done,
                COALESCE(ROUND(AVG(p.completion_pct)::NUMERIC, 1), 0)::DOUBLE PRECISION
                    AS average_completion,
                COALESCE(SUM(p.budget), 0)::DOUBLE PRECISION AS total_budget,
                COALESCE(SUM(p.budget_consumed), 0)::DOUBLE PRECISION AS total_consumed,
                COUNT(*) FILTER (WHERE p.health = 'red') AS health_red
             FROM projects p
             JOIN project_statuses s ON s.id = p.status_id
             WHERE s.code <> 'cancelled'",
        )
        .bind(NEARLY_DONE_PCT)
        .fetch_one(pool)
        .await
    }

    /// Planning and in-progress projects per lead, busiest first.
    pub async fn lead_workload(pool: &PgPool) -> Result<Vec<LeadWorkload>, sqlx::Error> {
        sqlx::query_as::<_, LeadWorkload>(
            "SELECT u.id AS lead_id, u.name AS lead_name,
                    COUNT(p.id) AS active_projects,
                    COALESCE(ROUND(AVG(p.completion_pct)::NUMERIC, 1), 0)::DOUBLE PRECISION
                        AS average_completion,
                    COALESCE(SUM(p.budget), 0)::DOUBLE PRECISION AS managed_budget
             FROM users u
             JOIN projects p ON p.lead_id = u.id
             JOIN project_statuses s ON s.id = p.status_id
             WHERE s.code IN ('in_progress', 'planning')
             GROUP BY u.id, u.name
             ORDER BY active_projects DESC, u.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Projects created per month over the last `months` months, oldest
    /// month first. Months without projects are omitted.
    pub async fn monthly(pool: &PgPool, months: i32) -> Result<Vec<MonthlyProjects>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyProjects>(
            "SELECT to_char(date_trunc('month', p.created_at), 'YYYY-MM') AS month,
                    COUNT(*) AS created,
                    COUNT(*) FILTER (WHERE s.code = 'completed') AS completed,
                    COALESCE(SUM(p.budget), 0)::DOUBLE PRECISION AS budget
             FROM projects p
             JOIN project_statuses s ON s.id = p.status_id
             WHERE p.created_at >= NOW() - make_interval(months => $1)
             GROUP BY 1
             ORDER BY 1",
        )
        .bind(months)
        .fetch_all(pool)
        .await
    }

    /// Active providers engaged on at least one project, by contracted amount.
    pub async fn provider_activity(pool: &PgPool) -> Result<Vec<ProviderActivity>, sqlx::Error> {
        sqlx::query_as::<_, ProviderActivity>(
            "SELECT pr.id AS provider_id, pr.name AS provider_name,
                    (SELECT COUNT(DISTINCT pp.project_id) FROM project_providers pp
                        WHERE pp.provider_id = pr.id) AS project_count,
                    (SELECT COUNT(*) FROM contracts c WHERE c.provider_id = pr.id)
                        AS contract_count,
                    (SELECT COALESCE(SUM(c.amount), 0)::DOUBLE PRECISION FROM contracts c
                        WHERE c.provider_id = pr.id) AS contracted_amount
             FROM providers pr
             WHERE pr.status = 'active'
               AND EXISTS (SELECT 1 FROM project_providers pp WHERE pp.provider_id = pr.id)
             ORDER BY contracted_amount DESC, pr.name
             LIMIT $1",
        )
        .bind(PROVIDER_ACTIVITY_LIMIT)
        .fetch_all(pool)
        .await
    }

    /// Deliverables past due and not yet delivered, most late first.
    pub async fn overdue_deliverables(
        pool: &PgPool,
    ) -> Result<Vec<OverdueDeliverable>, sqlx::Error> {
        sqlx::query_as::<_, OverdueDeliverable>(
            "SELECT d.id AS deliverable_id, d.name AS deliverable_name,
                    p.id AS project_id, p.name AS project_name,
                    d.due_date,
                    (CURRENT_DATE - d.due_date)::INTEGER AS days_late,
                    u.name AS responsible_name
             FROM deliverables d
             JOIN projects p ON p.id = d.project_id
             LEFT JOIN users u ON u.id = d.responsible_id
             WHERE d.status NOT IN ('delivered', 'validated')
               AND d.due_date < CURRENT_DATE
             ORDER BY days_late DESC, d.id
             LIMIT $1",
        )
        .bind(OVERDUE_DELIVERABLES_LIMIT)
        .fetch_all(pool)
        .await
    }

    /// Open projects with the fields alert classification needs.
    pub async fn alert_candidates(pool: &PgPool) -> Result<Vec<AlertCandidate>, sqlx::Error> {
        sqlx::query_as::<_, AlertCandidate>(
            "SELECT p.id, p.name, p.code, u.name AS lead_name,
                    s.code AS status_code, s.name AS status_name,
                    p.health, p.completion_pct, p.target_end_date, p.created_at
             FROM projects p
             JOIN project_statuses s ON s.id = p.status_id
             LEFT JOIN users u ON u.id = p.lead_id
             WHERE s.code NOT IN ('completed', 'cancelled')
             ORDER BY p.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Every org unit with its project count, including empty ones.
    pub async fn by_org_unit(pool: &PgPool) -> Result<Vec<OrgUnitBreakdown>, sqlx::Error> {
        sqlx::query_as::<_, OrgUnitBreakdown>(
            "SELECT o.id AS org_unit_id, o.name AS org_unit_name,
                    COUNT(p.id) AS project_count,
                    COALESCE(SUM(p.budget), 0)::DOUBLE PRECISION AS total_budget,
                    COALESCE(AVG(p.completion_pct), 0)::DOUBLE PRECISION AS average_completion
             FROM org_units o
             LEFT JOIN projects p ON p.org_unit_id = o.id
             GROUP BY o.id, o.name
             ORDER BY project_count DESC, o.name",
        )
        .fetch_all(pool)
        .await
    }

    /// Every status with its project count, in workflow order.
    pub async fn by_status(pool: &PgPool) -> Result<Vec<StatusBreakdown>, sqlx::Error> {
        sqlx::query_as::<_, StatusBreakdown>(
            "SELECT s.code AS status_code, s.name AS status_name, s.color,
                    COUNT(p.id) AS project_count
             FROM project_statuses s
             LEFT JOIN projects p ON p.status_id = s.id
             GROUP BY s.id, s.code, s.name, s.color, s.sort_order
             ORDER BY s.sort_order",
        )
        .fetch_all(pool)
        .await
    }

    /// Most advanced projects that are not yet completed.
    pub async fn top_projects(pool: &PgPool) -> Result<Vec<TopProject>, sqlx::Error> {
        sqlx::query_as::<_, TopProject>(
            "SELECT p.id, p.name, p.completion_pct, u.name AS lead_name, s.name AS status_name
             FROM projects p
             JOIN project_statuses s ON s.id = p.status_id
             LEFT JOIN users u ON u.id = p.lead_id
             WHERE s.code <> 'completed'
             ORDER BY p.completion_pct DESC, p.id
             LIMIT $1",
        )
        .bind(TOP_PROJECTS_LIMIT)
        .fetch_all(pool)
        .await
    }

    /// In-progress projects already late, or due within the attention
    /// window while below the at-risk completion threshold.
    pub async fn attention_list(pool: &PgPool) -> Result<Vec<AttentionProject>, sqlx::Error> {
        sqlx::query_as::<_, AttentionProject>(
            "SELECT p.id, p.name, p.target_end_date, p.completion_pct, u.name AS lead_name
             FROM projects p
             JOIN project_statuses s ON s.id = p.status_id
             LEFT JOIN users u ON u.id = p.lead_id
             WHERE s.code = 'in_progress'
               AND (p.target_end_date < CURRENT_DATE
                    OR (p.target_end_date <= CURRENT_DATE + $1::INTEGER
                        AND p.completion_pct < $2))
             ORDER BY p.target_end_date, p.id",
        )
        .bind(ATTENTION_WINDOW_DAYS as i32)
        .bind(AT_RISK_COMPLETION_PCT)
        .fetch_all(pool)
        .await
    }

    /// Flat export of every project with child counts, newest first.
    pub async fn export_rows(pool: &PgPool) -> Result<Vec<ProjectExportRow>, sqlx::Error> {
        sqlx::query_as::<_, ProjectExportRow>(
            "SELECT p.id, p.code, p.name, p.description,
                    u.name AS lead_name, u.email AS lead_email,
                    o.name AS org_unit_name, s.name AS status_name,
                    p.budget, p.budget_consumed, p.completion_pct, p.priority,
                    p.start_date, p.target_end_date,
                    (SELECT COUNT(*) FROM phases WHERE project_id = p.id) AS phase_count,
                    (SELECT COUNT(*) FROM deliverables WHERE project_id = p.id)
                        AS deliverable_count,
                    (SELECT COUNT(*) FROM contracts WHERE project_id = p.id) AS contract_count,
                    (SELECT COUNT(*) FROM documents WHERE project_id = p.id) AS document_count
             FROM projects p
             JOIN project_statuses s ON s.id = p.status_id
             LEFT JOIN users u ON u.id = p.lead_id
             LEFT JOIN org_units o ON o.id = p.org_unit_id
             ORDER BY p.created_at DESC, p.id DESC",
        )
        .fetch_all(pool)
        .await
    }
}
