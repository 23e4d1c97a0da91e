//! Repository for the append-only `audit_events` table.

use pmo_core::types::DbId;
use sqlx::PgPool;

use crate::models::audit::AuditEvent;

const COLUMNS: &str = "id, event_type, entity_type, entity_id, actor_user_id, payload, created_at";

/// Provides insert and lookup operations for the audit trail.
pub struct AuditRepo;

impl AuditRepo {
    /// Append one event, returning its id.
    pub async fn insert(
        pool: &PgPool,
        event_type: &str,
        entity_type: Option<&str>,
        entity_id: Option<DbId>,
        actor_user_id: Option<DbId>,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO audit_events (event_type, entity_type, entity_id, actor_user_id, payload)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(event_type)
        .bind(entity_type)
        .bind(entity_id)
        .bind(actor_user_id)
        .bind(payload)
        .fetch_one(pool)
        .await
    }

    /// Events recorded against one entity, newest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<AuditEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_events
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, AuditEvent>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}
