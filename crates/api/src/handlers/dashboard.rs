//! Handlers for the portfolio-wide PMO dashboard (`/dashboard`).
//!
//! Both routes are reserved to administrators and portfolio directors.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use pmo_core::alerts::{classify, days_remaining, sort_alerts, AlertKind, RiskInput};
use pmo_core::types::{Date, DbId};
use pmo_db::models::dashboard::{
    AlertCandidate, LeadWorkload, MonthlyProjects, OverdueDeliverable, PortfolioKpis,
    ProviderActivity,
};
use pmo_db::repositories::DashboardRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequirePortfolioManager;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Months of history on the advanced dashboard trend.
const ADVANCED_TREND_MONTHS: i32 = 6;

/// Payload of `GET /dashboard/advanced`.
#[derive(Debug, Serialize)]
pub struct AdvancedDashboard {
    pub kpis: PortfolioKpis,
    pub lead_workload: Vec<LeadWorkload>,
    pub monthly: Vec<MonthlyProjects>,
    pub provider_activity: Vec<ProviderActivity>,
    pub overdue_deliverables: Vec<OverdueDeliverable>,
    pub generated_at: DateTime<Utc>,
}

/// One classified project on the alert board.
#[derive(Debug, Serialize)]
pub struct ProjectAlert {
    pub project_id: DbId,
    pub name: String,
    pub code: String,
    pub lead_name: Option<String>,
    pub status_name: String,
    pub health: String,
    pub completion_pct: i32,
    pub target_end_date: Option<Date>,
    pub kind: AlertKind,
    pub message: &'static str,
    /// Negative once the target date has passed.
    pub days_remaining: Option<i64>,
}

/// Payload of `GET /dashboard/alerts`.
#[derive(Debug, Serialize)]
pub struct AlertBoard {
    pub alerts: Vec<ProjectAlert>,
    pub count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Keep the candidates that raise an alert on `today`, ordered by
/// precedence then urgency.
pub fn build_alerts(candidates: Vec<AlertCandidate>, today: Date) -> Vec<ProjectAlert> {
    let mut alerts: Vec<ProjectAlert> = candidates
        .into_iter()
        .filter_map(|c| {
            let kind = classify(
                &RiskInput {
                    status_code: &c.status_code,
                    health: &c.health,
                    completion_pct: c.completion_pct,
                    target_end_date: c.target_end_date,
                    created_at: c.created_at,
                },
                today,
            )?;
            Some(ProjectAlert {
                project_id: c.id,
                days_remaining: days_remaining(c.target_end_date, today),
                name: c.name,
                code: c.code,
                lead_name: c.lead_name,
                status_name: c.status_name,
                health: c.health,
                completion_pct: c.completion_pct,
                target_end_date: c.target_end_date,
                kind,
                message: kind.message(),
            })
        })
        .collect();
    sort_alerts(&mut alerts, |a| (a.kind, a.days_remaining));
    alerts
}

/// GET /api/v1/dashboard/advanced
pub async fn advanced(
    State(state): State<AppState>,
    RequirePortfolioManager(user): RequirePortfolioManager,
) -> AppResult<Json<ApiResponse<AdvancedDashboard>>> {
    let dashboard = AdvancedDashboard {
        kpis: DashboardRepo::kpis(&state.pool).await?,
        lead_workload: DashboardRepo::lead_workload(&state.pool).await?,
        monthly: DashboardRepo::monthly(&state.pool, ADVANCED_TREND_MONTHS).await?,
        provider_activity: DashboardRepo::provider_activity(&state.pool).await?,
        overdue_deliverables: DashboardRepo::overdue_deliverables(&state.pool).await?,
        generated_at: Utc::now(),
    };
    tracing::debug!(user_id = user.user_id, "Advanced dashboard generated");
    Ok(Json(ApiResponse::ok(dashboard, "Advanced dashboard")))
}

/// GET /api/v1/dashboard/alerts
pub async fn alerts(
    State(state): State<AppState>,
    RequirePortfolioManager(_user): RequirePortfolioManager,
) -> AppResult<Json<ApiResponse<AlertBoard>>> {
    let candidates = DashboardRepo::alert_candidates(&state.pool).await?;
    let alerts = build_alerts(candidates, Utc::now().date_naive());
    let count = alerts.len();
    Ok(Json(ApiResponse::ok(
        AlertBoard {
            alerts,
            count,
            generated_at: Utc::now(),
        },
        format!("{count} project alert(s)"),
    )))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, TimeZone};

    use super::*;

    fn today() -> Date {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn candidate(id: DbId, health: &str, pct: i32, due_in: Option<i64>) -> AlertCandidate {
        AlertCandidate {
            id,
            name: format!("Project {id}"),
            code: format!("P{id}"),
            lead_name: None,
            status_code: "in_progress".into(),
            status_name: "In progress".into(),
            health: health.into(),
            completion_pct: pct,
            target_end_date: due_in.map(|d| today() + Duration::days(d)),
            created_at: Utc.with_ymd_and_hms(2025, 5, 20, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn healthy_projects_are_dropped() {
        let alerts = build_alerts(vec![candidate(1, "green", 50, Some(90))], today());
        assert!(alerts.is_empty());
    }

    #[test]
    fn alerts_sorted_by_precedence_then_urgency() {
        let alerts = build_alerts(
            vec![
                candidate(1, "green", 10, Some(10)),
                candidate(2, "red", 50, None),
                candidate(3, "green", 10, Some(-2)),
                candidate(4, "green", 10, Some(-9)),
            ],
            today(),
        );
        let order: Vec<DbId> = alerts.iter().map(|a| a.project_id).collect();
        assert_eq!(order, vec![4, 3, 2, 1]);
        assert_eq!(alerts[0].kind, AlertKind::Overdue);
        assert_eq!(alerts[0].days_remaining, Some(-9));
        assert_eq!(alerts[2].kind, AlertKind::HealthCritical);
        assert_eq!(alerts[3].kind, AlertKind::AtRisk);
    }

    #[test]
    fn closed_projects_never_alert() {
        let mut done = candidate(1, "red", 100, Some(-5));
        done.status_code = "completed".into();
        assert!(build_alerts(vec![done], today()).is_empty());
    }
}
