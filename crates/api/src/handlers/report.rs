//! Handlers for `/reports`.
//!
//! The report dashboard is PMO-only. The flat project export is open to any
//! role whose capability map grants `reports`.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use pmo_core::access::{has_capability, ProjectVisibility};
use pmo_core::error::CoreError;
use pmo_db::models::dashboard::{
    AttentionProject, MonthlyProjects, OrgUnitBreakdown, PortfolioStats, ProjectExportRow,
    StatusBreakdown, TopProject,
};
use pmo_db::repositories::{DashboardRepo, ProjectRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequirePortfolioManager;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Capability that unlocks the project export.
const REPORTS_CAPABILITY: &str = "reports";

/// Months of history on the report trend.
const REPORT_TREND_MONTHS: i32 = 12;

/// Payload of `GET /reports/dashboard`.
#[derive(Debug, Serialize)]
pub struct ReportDashboard {
    pub stats: PortfolioStats,
    pub by_org_unit: Vec<OrgUnitBreakdown>,
    pub by_status: Vec<StatusBreakdown>,
    pub monthly: Vec<MonthlyProjects>,
    pub top_projects: Vec<TopProject>,
    pub attention: Vec<AttentionProject>,
    pub generated_at: DateTime<Utc>,
}

/// GET /api/v1/reports/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequirePortfolioManager(_user): RequirePortfolioManager,
) -> AppResult<Json<ApiResponse<ReportDashboard>>> {
    let report = ReportDashboard {
        stats: ProjectRepo::portfolio_stats(&state.pool, ProjectVisibility::All).await?,
        by_org_unit: DashboardRepo::by_org_unit(&state.pool).await?,
        by_status: DashboardRepo::by_status(&state.pool).await?,
        monthly: DashboardRepo::monthly(&state.pool, REPORT_TREND_MONTHS).await?,
        top_projects: DashboardRepo::top_projects(&state.pool).await?,
        attention: DashboardRepo::attention_list(&state.pool).await?,
        generated_at: Utc::now(),
    };
    Ok(Json(ApiResponse::ok(report, "Report dashboard")))
}

/// GET /api/v1/reports/projects
pub async fn projects(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<ProjectExportRow>>>> {
    if !has_capability(user.role, &user.capabilities, REPORTS_CAPABILITY) {
        return Err(AppError::Core(CoreError::forbidden(
            "Your role does not grant access to reports",
            "reports capability",
            user.role.as_str(),
        )));
    }

    let rows = DashboardRepo::export_rows(&state.pool).await?;
    tracing::info!(user_id = user.user_id, rows = rows.len(), "Project export generated");
    Ok(Json(ApiResponse::with_count(rows, "Project export")))
}
