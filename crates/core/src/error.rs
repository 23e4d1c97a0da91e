use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A delete was refused because dependent rows still exist.
    #[error("Dependency: {0}")]
    Dependency(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An access-control predicate failed. Carries the permission that was
    /// required and the caller's actual role for diagnostic responses.
    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
        required: String,
        actual_role: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn forbidden(
        message: impl Into<String>,
        required: impl Into<String>,
        actual_role: impl Into<String>,
    ) -> Self {
        Self::Forbidden {
            message: message.into(),
            required: required.into(),
            actual_role: actual_role.into(),
        }
    }
}
