//! Phase entity model and DTOs.

use pmo_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `phases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Phase {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub start_date: Option<Date>,
    pub target_end_date: Option<Date>,
    pub actual_end_date: Option<Date>,
    pub status: String,
    pub budget_allocated: f64,
    pub budget_consumed: f64,
    pub completion_pct: i32,
    pub responsible_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A phase with its responsible user's name and deliverable count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PhaseView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub phase: Phase,
    pub responsible_name: Option<String>,
    pub deliverable_count: i64,
}

/// DTO for creating a phase under a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePhase {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    /// Appended after the last phase when omitted.
    pub sort_order: Option<i32>,
    pub start_date: Option<Date>,
    pub target_end_date: Option<Date>,
    pub status: Option<String>,
    pub budget_allocated: Option<f64>,
    pub responsible_id: Option<DbId>,
}

/// DTO for updating a phase. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePhase {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub start_date: Option<Date>,
    pub target_end_date: Option<Date>,
    pub actual_end_date: Option<Date>,
    pub status: Option<String>,
    pub budget_allocated: Option<f64>,
    pub budget_consumed: Option<f64>,
    pub completion_pct: Option<i32>,
    pub responsible_id: Option<DbId>,
}
