//! Role lookup rows.

use std::collections::HashMap;

use pmo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleRow {
    pub id: DbId,
    pub name: String,
    pub label: String,
    /// Capability name to granted flag, e.g. `{"reports": true}`.
    pub capabilities: Json<HashMap<String, bool>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
