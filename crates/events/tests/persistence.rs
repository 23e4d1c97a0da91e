use pmo_core::access::ResourceKind;
use pmo_db::repositories::AuditRepo;
use pmo_events::bus::{EVENT_CREATED, EVENT_DELETED};
use pmo_events::{DomainEvent, EventBus, EventPersistence};
use sqlx::PgPool;

/// Events published before the bus is dropped all reach `audit_events`.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_events_are_persisted_until_bus_closes(pool: PgPool) {
    let bus = EventBus::default();
    let handle = tokio::spawn(EventPersistence::run(pool.clone(), bus.subscribe()));

    bus.publish(DomainEvent::on(ResourceKind::Project, 5, EVENT_CREATED).by(1));
    bus.publish(
        DomainEvent::on(ResourceKind::Project, 5, EVENT_DELETED)
            .by(1)
            .with_payload(serde_json::json!({"code": "ERP-1"})),
    );
    drop(bus);
    handle.await.unwrap();

    let events = AuditRepo::list_for_entity(&pool, "project", 5).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event_type, "project.deleted");
    assert_eq!(events[0].payload["code"], "ERP-1");
    assert_eq!(events[1].actor_user_id, Some(1));
}
