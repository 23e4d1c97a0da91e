//! Project entity model and DTOs.

use pmo_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub lead_id: DbId,
    pub org_unit_id: Option<DbId>,
    pub status_id: DbId,
    pub budget: Option<f64>,
    pub budget_consumed: f64,
    pub start_date: Option<Date>,
    pub target_end_date: Option<Date>,
    pub completion_pct: i32,
    pub priority: String,
    pub health: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project joined with its lead, org unit and status for display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectView {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub lead_id: DbId,
    pub lead_name: String,
    pub lead_email: String,
    pub org_unit_id: Option<DbId>,
    pub org_unit_name: Option<String>,
    pub status_id: DbId,
    pub status_code: String,
    pub status_name: String,
    pub status_color: String,
    pub budget: Option<f64>,
    pub budget_consumed: f64,
    pub start_date: Option<Date>,
    pub target_end_date: Option<Date>,
    pub completion_pct: i32,
    pub priority: String,
    pub health: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    pub description: Option<String>,
    /// Defaults to the caller when omitted.
    pub lead_id: Option<DbId>,
    pub org_unit_id: Option<DbId>,
    /// Defaults to the `planning` status when omitted.
    pub status_id: Option<DbId>,
    pub budget: Option<f64>,
    pub start_date: Option<Date>,
    pub target_end_date: Option<Date>,
    pub priority: Option<String>,
    pub health: Option<String>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub code: Option<String>,
    pub description: Option<String>,
    pub lead_id: Option<DbId>,
    pub org_unit_id: Option<DbId>,
    pub status_id: Option<DbId>,
    pub budget: Option<f64>,
    pub budget_consumed: Option<f64>,
    pub start_date: Option<Date>,
    pub target_end_date: Option<Date>,
    pub completion_pct: Option<i32>,
    pub priority: Option<String>,
    pub health: Option<String>,
}

/// List filters for `GET /projects`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    /// Case-insensitive match on name, code or description.
    pub search: Option<String>,
    /// Status code, e.g. `in_progress`.
    pub status: Option<String>,
}
