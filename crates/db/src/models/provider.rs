//! Provider entity, project association and provider statistics.

use pmo_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `providers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Provider {
    pub id: DbId,
    pub name: String,
    pub registration_number: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub expertise: Option<String>,
    pub provider_type: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A provider with its contract and project counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProviderView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub provider: Provider,
    pub contract_count: i64,
    pub project_count: i64,
    pub contracted_amount: f64,
}

/// DTO for creating a provider.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProvider {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 50))]
    pub registration_number: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub expertise: Option<String>,
    pub provider_type: Option<String>,
    pub status: Option<String>,
}

/// DTO for updating a provider. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProvider {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub registration_number: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub expertise: Option<String>,
    pub provider_type: Option<String>,
    pub status: Option<String>,
}

/// Request body for `PUT /providers/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProviderStatus {
    pub status: String,
}

/// List filters for `GET /providers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderFilter {
    pub status: Option<String>,
    pub search: Option<String>,
    pub provider_type: Option<String>,
}

/// Aggregate counts across all providers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProviderStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub suspended: i64,
    pub with_contracts: i64,
    pub total_contracted: f64,
}

/// Number of providers of one type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProviderTypeCount {
    pub provider_type: String,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Project association
// ---------------------------------------------------------------------------

/// A row from `project_providers` joined with provider contact details.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectProviderView {
    pub id: DbId,
    pub project_id: DbId,
    pub provider_id: DbId,
    pub role_in_project: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: String,
    pub provider_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project a provider works on, seen from the provider side.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProviderProject {
    pub project_id: DbId,
    pub project_name: String,
    pub project_code: String,
    pub role_in_project: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: String,
}

/// Request body for `POST /projects/{id}/providers`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssociateProvider {
    pub provider_id: DbId,
    pub role_in_project: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: Option<String>,
}
