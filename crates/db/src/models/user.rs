//! User entity model and DTOs.

use pmo_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub org_unit_id: Option<DbId>,
    pub status: String,
    pub last_access_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role_id: DbId,
    /// Resolved role name (e.g. `"project_lead"`).
    pub role_name: String,
    pub role_label: String,
    pub org_unit_id: Option<DbId>,
    pub org_unit_name: Option<String>,
    pub status: String,
    pub last_access_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a user. The handler hashes `password`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub role_id: DbId,
    pub org_unit_id: Option<DbId>,
}

/// DTO for inserting a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub org_unit_id: Option<DbId>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role_id: Option<DbId>,
    pub org_unit_id: Option<DbId>,
    pub status: Option<String>,
}

/// Request body for `PUT /users/{id}/password`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
}

/// Head counts for the user administration screen.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct UserStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub admins: i64,
    pub portfolio_directors: i64,
    pub project_leads: i64,
    pub contributors: i64,
}
