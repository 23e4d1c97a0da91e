use std::sync::OnceLock;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pmo_core::error::CoreError;
use serde_json::json;

/// Whether 500 bodies may carry the underlying error text. Set once at
/// startup from [`ServerConfig::diagnostics_enabled`](crate::config::ServerConfig::diagnostics_enabled).
static DIAGNOSTICS: OnceLock<bool> = OnceLock::new();

pub fn enable_diagnostics(enabled: bool) {
    let _ = DIAGNOSTICS.set(enabled);
}

fn diagnostics() -> bool {
    DIAGNOSTICS.get().copied().unwrap_or(false)
}

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{ success: false, ... }`
/// error envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `pmo_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for a missing entity.
    pub fn not_found(entity: &'static str, id: pmo_core::types::DbId) -> Self {
        AppError::Core(CoreError::NotFound { entity, id })
    }
}

/// Status, machine code and message of one error response.
struct Classified {
    status: StatusCode,
    code: &'static str,
    message: String,
    /// Internal text, only exposed with diagnostics on.
    detail: Option<String>,
}

impl Classified {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            detail: None,
        }
    }

    fn internal(message: &str, detail: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: message.to_string(),
            detail: Some(detail),
        }
    }

    fn store_unavailable(detail: String) -> Self {
        Self {
            code: "STORE_UNAVAILABLE",
            ..Self::internal("Store unavailable", detail)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut forbidden_roles: Option<(String, String)> = None;

        let classified = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => Classified::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    Classified::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => {
                    Classified::new(StatusCode::CONFLICT, "CONFLICT", msg.clone())
                }
                CoreError::Dependency(msg) => {
                    Classified::new(StatusCode::BAD_REQUEST, "DEPENDENCY_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    Classified::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden {
                    message,
                    required,
                    actual_role,
                } => {
                    forbidden_roles = Some((required.clone(), actual_role.clone()));
                    Classified::new(StatusCode::FORBIDDEN, "FORBIDDEN", message.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    Classified::internal("An internal error occurred", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                Classified::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Classified::internal("An internal error occurred", msg.clone())
            }
        };

        let mut body = json!({
            "success": false,
            "message": classified.message,
            "code": classified.code,
        });
        if let Some((required, actual)) = forbidden_roles {
            body["required_role"] = json!(required);
            body["user_role"] = json!(actual);
        }
        if let Some(detail) = classified.detail.filter(|_| diagnostics()) {
            body["detail"] = json!(detail);
        }

        (classified.status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (`23505`) map to 409.
/// - Foreign key violations (`23503`) map to 400.
/// - Pool exhaustion, a closed pool, I/O failure or a statement cancelled by
///   `statement_timeout` (`57014`) read as "store unavailable".
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => {
            Classified::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                Classified::new(
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                )
            }
            Some("23503") => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                Classified::new(
                    StatusCode::BAD_REQUEST,
                    "INVALID_REFERENCE",
                    format!("Invalid reference: {constraint}"),
                )
            }
            Some("57014") => {
                tracing::error!(error = %db_err, "Store unavailable");
                Classified::store_unavailable(db_err.to_string())
            }
            _ => {
                tracing::error!(error = %db_err, "Database error");
                Classified::internal("An internal error occurred", db_err.to_string())
            }
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::error!(error = %err, "Store unavailable");
            Classified::store_unavailable(err.to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            Classified::internal("An internal error occurred", other.to_string())
        }
    }
}
