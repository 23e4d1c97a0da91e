//! Budget line items and budget roll-ups.

use pmo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `budget_lines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BudgetLine {
    pub id: DbId,
    pub project_id: DbId,
    pub phase_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub category: String,
    pub label: String,
    pub planned_amount: f64,
    pub consumed_amount: f64,
    pub status: String,
    pub comments: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A budget line with phase and contract names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BudgetLineView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub line: BudgetLine,
    pub phase_name: Option<String>,
    pub contract_title: Option<String>,
}

/// DTO for adding one budget line.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBudgetLine {
    pub phase_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub category: String,
    #[validate(length(min = 1, max = 200))]
    pub label: String,
    pub planned_amount: Option<f64>,
    pub consumed_amount: Option<f64>,
    pub status: Option<String>,
    pub comments: Option<String>,
}

/// DTO for updating a budget line. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBudgetLine {
    pub phase_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub category: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub label: Option<String>,
    pub planned_amount: Option<f64>,
    pub consumed_amount: Option<f64>,
    pub status: Option<String>,
    pub comments: Option<String>,
}

/// Request body for `PUT /projects/{id}/budget`: the full new line set.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceBudget {
    pub lines: Vec<CreateBudgetLine>,
}

/// Planned and consumed totals for one category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub planned: f64,
    pub consumed: f64,
    pub line_count: i64,
}

/// Budget roll-up for one project.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetSummary {
    pub project_id: DbId,
    /// The project's approved budget, if set.
    pub approved_budget: Option<f64>,
    pub total_planned: f64,
    pub total_consumed: f64,
    /// `approved_budget - total_consumed`, when a budget is set.
    pub remaining: Option<f64>,
    /// Consumed share of the approved budget, 0-100+, when a budget is set.
    pub consumption_pct: Option<f64>,
    pub contracted_amount: f64,
    pub by_category: Vec<CategoryTotal>,
}
