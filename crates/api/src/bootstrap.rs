//! First-run administrator provisioning.

use pmo_core::roles::ROLE_FUNCTIONAL_ADMIN;
use pmo_core::types::DbId;
use pmo_db::models::user::CreateUser;
use pmo_db::repositories::{RoleRepo, UserRepo};
use pmo_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured functional administrator unless a user with that
/// email already exists. Returns the new user's id, or `None` when nothing
/// was created.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<Option<DbId>> {
    if UserRepo::find_by_email(pool, &admin.email).await?.is_some() {
        tracing::debug!(email = %admin.email, "Bootstrap admin already present");
        return Ok(None);
    }

    let role = RoleRepo::find_by_name(pool, ROLE_FUNCTIONAL_ADMIN)
        .await?
        .ok_or_else(|| AppError::InternalError("functional_admin role is not seeded".into()))?;

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Administrator".to_string(),
            email: admin.email.clone(),
            password_hash,
            role_id: role.id,
            org_unit_id: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap administrator created");
    Ok(Some(user.id))
}
