//! Contract entity model and DTOs.

use pmo_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `contracts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contract {
    pub id: DbId,
    pub project_id: DbId,
    pub contract_number: String,
    pub title: String,
    pub provider_id: Option<DbId>,
    pub amount: Option<f64>,
    pub signed_on: Option<Date>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: String,
    pub special_terms: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A contract with provider, author and project names resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub contract: Contract,
    pub provider_name: Option<String>,
    pub created_by_name: Option<String>,
    pub project_name: String,
}

/// DTO for creating a contract under a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContract {
    #[validate(length(min = 1, max = 100))]
    pub contract_number: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub provider_id: Option<DbId>,
    pub amount: Option<f64>,
    pub signed_on: Option<Date>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: Option<String>,
    pub special_terms: Option<String>,
}

/// DTO for updating a contract. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateContract {
    #[validate(length(min = 1, max = 100))]
    pub contract_number: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub provider_id: Option<DbId>,
    pub amount: Option<f64>,
    pub signed_on: Option<Date>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: Option<String>,
    pub special_terms: Option<String>,
}
