//! Repository for the `users` and `roles` tables.

use pmo_core::types::DbId;
use pmo_core::vocab::USER_STATUS_ACTIVE;
use sqlx::PgPool;

use crate::models::role::RoleRow;
use crate::models::user::{CreateUser, UpdateUser, User, UserResponse, UserStats};
use crate::patch::UpdateAssembler;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role_id, org_unit_id, status, \
                       last_access_at, created_at, updated_at";

const RESPONSE_SELECT: &str = "SELECT u.id, u.name, u.email, u.role_id,
        r.name AS role_name, r.label AS role_label,
        u.org_unit_id, o.name AS org_unit_name,
        u.status, u.last_access_at, u.created_at, u.updated_at
     FROM users u
     JOIN roles r ON r.id = u.role_id
     LEFT JOIN org_units o ON o.id = u.org_unit_id";

const ROLE_COLUMNS: &str = "id, name, label, capabilities, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role_id, org_unit_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .bind(input.org_unit_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email, ignoring case.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user with role and org unit names resolved.
    pub async fn find_response(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserResponse>, sqlx::Error> {
        let query = format!("{RESPONSE_SELECT} WHERE u.id = $1");
        sqlx::query_as::<_, UserResponse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserResponse>, sqlx::Error> {
        let query = format!("{RESPONSE_SELECT} ORDER BY u.name, u.id");
        sqlx::query_as::<_, UserResponse>(&query)
            .fetch_all(pool)
            .await
    }

    /// Apply the `Some` fields of `input`. Returns the number of rows written.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateUser) -> Result<u64, sqlx::Error> {
        let mut patch = UpdateAssembler::new("users");
        patch
            .set("name", input.name.as_deref())
            .set("email", input.email.as_deref())
            .set("role_id", input.role_id)
            .set("org_unit_id", input.org_unit_id)
            .set("status", input.status.as_deref());
        patch.execute(pool, id).await
    }

    /// Soft-deactivate a user by setting `status = 'inactive'`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET status = 'inactive', updated_at = NOW()
             WHERE id = $1 AND status = 'active'",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a successful login.
    pub async fn touch_last_access(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_access_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Head counts by status and role.
    pub async fn stats(pool: &PgPool) -> Result<UserStats, sqlx::Error> {
        sqlx::query_as::<_, UserStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE u.status = 'active') AS active,
                COUNT(*) FILTER (WHERE u.status = 'inactive') AS inactive,
                COUNT(*) FILTER (WHERE r.name = 'functional_admin') AS admins,
                COUNT(*) FILTER (WHERE r.name = 'portfolio_director') AS portfolio_directors,
                COUNT(*) FILTER (WHERE r.name = 'project_lead') AS project_leads,
                COUNT(*) FILTER (WHERE r.name = 'contributor') AS contributors
             FROM users u
             JOIN roles r ON r.id = u.role_id",
        )
        .fetch_one(pool)
        .await
    }

    /// Whether `id` is an active account.
    pub async fn is_active(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let status: Option<String> = sqlx::query_scalar("SELECT status FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(status.as_deref() == Some(USER_STATUS_ACTIVE))
    }
}

/// Read access to the seeded `roles` table.
pub struct RoleRepo;

impl RoleRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RoleRow>, sqlx::Error> {
        let query = format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1");
        sqlx::query_as::<_, RoleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<RoleRow>, sqlx::Error> {
        let query = format!("SELECT {ROLE_COLUMNS} FROM roles WHERE name = $1");
        sqlx::query_as::<_, RoleRow>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<RoleRow>, sqlx::Error> {
        let query = format!("SELECT {ROLE_COLUMNS} FROM roles ORDER BY id");
        sqlx::query_as::<_, RoleRow>(&query).fetch_all(pool).await
    }
}
