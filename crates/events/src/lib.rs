//! Audit trail plumbing for the portfolio backend.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DomainEvent`]: a mutation performed by a user on an entity.
//! - [`EventPersistence`]: background service appending every event to
//!   the `audit_events` table.

pub mod bus;
pub mod persistence;

pub use bus::{DomainEvent, EventBus};
pub use persistence::EventPersistence;
