//! Domain logic for the project-portfolio backend.
//!
//! Nothing in this crate touches the database: callers load rows and pass
//! plain values in, which keeps every rule unit-testable.

pub mod access;
pub mod alerts;
pub mod documents;
pub mod error;
pub mod progress;
pub mod roles;
pub mod types;
pub mod validation;
pub mod vocab;
