//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?limit=` for short "most recent" lists. Clamped by the handler via
/// `clamp_limit`.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
