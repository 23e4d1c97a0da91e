//! Deliverable entity model and DTOs.

use pmo_core::progress::DeliverableWeight;
use pmo_core::types::{Date, DbId, Timestamp};
use pmo_core::vocab::DELIVERABLE_STATUS_VALIDATED;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `deliverables` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deliverable {
    pub id: DbId,
    pub project_id: DbId,
    pub phase_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub due_date: Option<Date>,
    pub delivered_date: Option<Date>,
    pub status: String,
    pub responsible_id: Option<DbId>,
    pub validator_id: Option<DbId>,
    pub weight: f64,
    pub comments: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A deliverable with phase and people names resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeliverableView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub deliverable: Deliverable,
    pub phase_name: Option<String>,
    pub responsible_name: Option<String>,
    pub validator_name: Option<String>,
}

/// DTO for creating a deliverable under a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDeliverable {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub phase_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub kind: Option<String>,
    pub due_date: Option<Date>,
    pub status: Option<String>,
    pub responsible_id: Option<DbId>,
    pub weight: Option<f64>,
    pub comments: Option<String>,
}

/// DTO for updating a deliverable. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDeliverable {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub phase_id: Option<DbId>,
    pub contract_id: Option<DbId>,
    pub kind: Option<String>,
    pub due_date: Option<Date>,
    pub delivered_date: Option<Date>,
    pub status: Option<String>,
    pub responsible_id: Option<DbId>,
    pub validator_id: Option<DbId>,
    pub weight: Option<f64>,
    pub comments: Option<String>,
}

/// Weight and status of one deliverable, the input to progress roll-up.
#[derive(Debug, Clone, FromRow)]
pub struct DeliverableProgressRow {
    pub weight: f64,
    pub status: String,
}

impl DeliverableProgressRow {
    pub fn as_weight(&self) -> DeliverableWeight {
        DeliverableWeight::new(self.weight, self.status == DELIVERABLE_STATUS_VALIDATED)
    }
}
