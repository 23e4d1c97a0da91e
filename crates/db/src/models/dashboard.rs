//! Read-only aggregate rows for dashboards and reports.

use pmo_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Portfolio roll-up over the projects a caller can see.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct PortfolioStats {
    pub total: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub on_hold: i64,
    pub planning: i64,
    pub average_completion: f64,
    pub total_budget: f64,
    pub total_consumed: f64,
}

/// Portfolio KPIs for the advanced PMO dashboard. Cancelled projects are
/// excluded.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PortfolioKpis {
    pub total: i64,
    pub overdue: i64,
    pub nearly_done: i64,
    pub average_completion: f64,
    pub total_budget: f64,
    pub total_consumed: f64,
    pub health_red: i64,
}

/// Active project load carried by one lead.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeadWorkload {
    pub lead_id: DbId,
    pub lead_name: String,
    pub active_projects: i64,
    pub average_completion: f64,
    pub managed_budget: f64,
}

/// Projects created in one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyProjects {
    pub month: String,
    pub created: i64,
    pub completed: i64,
    pub budget: f64,
}

/// Engagement figures for one active provider.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProviderActivity {
    pub provider_id: DbId,
    pub provider_name: String,
    pub project_count: i64,
    pub contract_count: i64,
    pub contracted_amount: f64,
}

/// A deliverable past its due date that is neither delivered nor validated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OverdueDeliverable {
    pub deliverable_id: DbId,
    pub deliverable_name: String,
    pub project_id: DbId,
    pub project_name: String,
    pub due_date: Date,
    pub days_late: i32,
    pub responsible_name: Option<String>,
}

/// Project fields needed to classify alerts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertCandidate {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub lead_name: Option<String>,
    pub status_code: String,
    pub status_name: String,
    pub health: String,
    pub completion_pct: i32,
    pub target_end_date: Option<Date>,
    pub created_at: Timestamp,
}

/// Project count and budget per org unit.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrgUnitBreakdown {
    pub org_unit_id: DbId,
    pub org_unit_name: String,
    pub project_count: i64,
    pub total_budget: f64,
    pub average_completion: f64,
}

/// Project count per status, in status order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusBreakdown {
    pub status_code: String,
    pub status_name: String,
    pub color: String,
    pub project_count: i64,
}

/// One entry of the most-advanced open projects list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopProject {
    pub id: DbId,
    pub name: String,
    pub completion_pct: i32,
    pub lead_name: Option<String>,
    pub status_name: String,
}

/// An in-progress project that is late or close to its deadline with low
/// completion.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttentionProject {
    pub id: DbId,
    pub name: String,
    pub target_end_date: Option<Date>,
    pub completion_pct: i32,
    pub lead_name: Option<String>,
}

/// Flat project export with child counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectExportRow {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub lead_name: Option<String>,
    pub lead_email: Option<String>,
    pub org_unit_name: Option<String>,
    pub status_name: String,
    pub budget: Option<f64>,
    pub budget_consumed: f64,
    pub completion_pct: i32,
    pub priority: String,
    pub start_date: Option<Date>,
    pub target_end_date: Option<Date>,
    pub phase_count: i64,
    pub deliverable_count: i64,
    pub contract_count: i64,
    pub document_count: i64,
}
