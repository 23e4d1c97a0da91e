//! Reference data used to populate forms.

use pmo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `org_units` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrgUnit {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `project_statuses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectStatus {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub color: String,
    pub sort_order: i32,
}

/// Active user as offered in lead/responsible pickers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserOption {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role_name: String,
}

/// Priority value with its display colour.
#[derive(Debug, Clone, Serialize)]
pub struct PriorityOption {
    pub value: &'static str,
    pub color: &'static str,
}
