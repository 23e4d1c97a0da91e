//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! `*View` structs carry the same row joined with display names.

pub mod audit;
pub mod budget;
pub mod contract;
pub mod dashboard;
pub mod deliverable;
pub mod document;
pub mod phase;
pub mod project;
pub mod provider;
pub mod reference;
pub mod role;
pub mod user;
