//! Durable audit trail writer.
//!
//! [`EventPersistence`] drains the [`EventBus`](crate::bus::EventBus) and
//! appends each [`DomainEvent`] to `audit_events`. It exits once every
//! bus sender has been dropped.

use pmo_core::types::DbId;
use pmo_db::repositories::AuditRepo;
use pmo_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::DomainEvent;

/// Background service that persists domain events.
pub struct EventPersistence;

impl EventPersistence {
    /// Run until the channel closes. Failed writes are logged and skipped.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to persist audit event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Audit persistence lagged, events were lost");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, audit persistence shutting down");
                    break;
                }
            }
        }
    }

    async fn persist(pool: &DbPool, event: &DomainEvent) -> Result<DbId, sqlx::Error> {
        AuditRepo::insert(
            pool,
            &event.event_type,
            event.entity_type.as_deref(),
            event.entity_id,
            event.actor_user_id,
            &event.payload,
        )
        .await
    }
}
