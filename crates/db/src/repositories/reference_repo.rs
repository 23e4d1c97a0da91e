//! Read-only lookups for form reference data.

use sqlx::PgPool;

use crate::models::reference::{OrgUnit, ProjectStatus, UserOption};

/// Provides the seeded lookup lists.
pub struct ReferenceRepo;

impl ReferenceRepo {
    pub async fn org_units(pool: &PgPool) -> Result<Vec<OrgUnit>, sqlx::Error> {
        sqlx::query_as::<_, OrgUnit>(
            "SELECT id, name, code, description, created_at, updated_at
             FROM org_units ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn statuses(pool: &PgPool) -> Result<Vec<ProjectStatus>, sqlx::Error> {
        sqlx::query_as::<_, ProjectStatus>(
            "SELECT id, code, name, color, sort_order FROM project_statuses ORDER BY sort_order",
        )
        .fetch_all(pool)
        .await
    }

    /// Active users, for lead and responsible pickers.
    pub async fn active_users(pool: &PgPool) -> Result<Vec<UserOption>, sqlx::Error> {
        sqlx::query_as::<_, UserOption>(
            "SELECT u.id, u.name, u.email, r.name AS role_name
             FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE u.status = 'active'
             ORDER BY u.name",
        )
        .fetch_all(pool)
        .await
    }
}
