//! Shared response envelope for API handlers.
//!
//! Every successful response is `{ "success": true, "data"?: T,
//! "message": "...", "count"?: n }`. Use [`ApiResponse`] instead of ad-hoc
//! `json!` bodies so the envelope stays uniform.

use serde::Serialize;

/// Standard success envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::with_count(projects, "Projects retrieved")))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            count: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// A list payload with its length in `count`.
    pub fn with_count(data: Vec<T>, message: impl Into<String>) -> Self {
        let count = data.len();
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            count: Some(count),
        }
    }
}

impl ApiResponse<()> {
    /// A message-only success, e.g. after a delete.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: message.into(),
            count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_carries_count() {
        let body = serde_json::to_value(ApiResponse::with_count(vec![1, 2, 3], "ok")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 3);
        assert_eq!(body["data"][2], 3);
    }

    #[test]
    fn message_envelope_omits_data_and_count() {
        let body = serde_json::to_value(ApiResponse::message("Deleted")).unwrap();
        assert_eq!(body["message"], "Deleted");
        assert!(body.get("data").is_none());
        assert!(body.get("count").is_none());
    }
}
