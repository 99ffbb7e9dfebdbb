//! Error types for the HireChain API client

use thiserror::Error;

/// Default message shown when the backend gives us nothing usable.
pub const DEFAULT_ERROR_MESSAGE: &str = "Unable to complete requested action";

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API client error
///
/// The `Display` form is always a non-empty, user-presentable message.
/// Transport failures and server rejections are intentionally collapsed
/// into the same shape; callers that need to special-case a status code
/// (e.g. 404) can use [`ApiError::status`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never produced a response
    #[error("{message}")]
    Network { message: String },

    /// Server answered with a non-success status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Response body did not decode into the expected type
    #[error("{message}")]
    Decode { message: String },
}

impl ApiError {
    /// The HTTP status code, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network { .. } | ApiError::Decode { .. } => None,
        }
    }

    /// Whether this is a 404 from the server.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Extract a user-presentable message from a failed response body.
///
/// The backend reports errors in several historical shapes; the lookup
/// order is `message`, then `err` (first element if an array), then
/// `detail` (first element if an array), then the supplied fallback.
pub(crate) fn extract_error_message(body: &str, fallback: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return fallback.to_string(),
    };

    for field in ["message", "err", "detail"] {
        match value.get(field) {
            Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(serde_json::Value::Array(items)) => {
                if let Some(serde_json::Value::String(s)) = items.first() {
                    if !s.is_empty() {
                        return s.clone();
                    }
                }
            }
            _ => {}
        }
    }

    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins() {
        let body = r#"{"message":"Gig not found","err":["other"],"detail":["ignored"]}"#;
        assert_eq!(extract_error_message(body, "fallback"), "Gig not found");
    }

    #[test]
    fn err_array_takes_first_element() {
        let body = r#"{"err":["budget is required","duration is required"]}"#;
        assert_eq!(extract_error_message(body, "fallback"), "budget is required");
    }

    #[test]
    fn err_plain_string() {
        let body = r#"{"err":"invalid account id"}"#;
        assert_eq!(extract_error_message(body, "fallback"), "invalid account id");
    }

    #[test]
    fn detail_array_used_last() {
        let body = r#"{"detail":["not permitted"]}"#;
        assert_eq!(extract_error_message(body, "fallback"), "not permitted");
    }

    #[test]
    fn unparseable_body_falls_back() {
        assert_eq!(extract_error_message("<html>502</html>", "fallback"), "fallback");
        assert_eq!(extract_error_message("", "fallback"), "fallback");
    }

    #[test]
    fn display_is_never_empty() {
        let err = ApiError::Server {
            status: 500,
            message: extract_error_message("{}", DEFAULT_ERROR_MESSAGE),
        };
        assert!(!err.to_string().is_empty());
        assert_eq!(err.status(), Some(500));
    }
}
