//! Scoring service error type.
//!
//! `message` is the text shown to the user: the service-provided `error`
//! field when there is one, otherwise a generic description.

/// Error from a scoring service call.
#[derive(Debug, Clone)]
pub struct ServiceError {
    /// The kind of error
    pub kind: ServiceErrorKind,
    /// HTTP status code, if a response was received
    pub status_code: Option<u16>,
    /// User-facing message
    pub message: String,
}

impl ServiceError {
    /// The service answered with a non-2xx status.
    pub fn status(status_code: u16, message: String) -> Self {
        Self {
            kind: ServiceErrorKind::Status,
            status_code: Some(status_code),
            message,
        }
    }

    /// The request never produced a response.
    pub fn transport(message: String) -> Self {
        Self {
            kind: ServiceErrorKind::Transport,
            status_code: None,
            message,
        }
    }

    /// A 2xx response whose body did not match the contract.
    pub fn decode(message: String) -> Self {
        Self {
            kind: ServiceErrorKind::Decode,
            status_code: None,
            message,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "{} (HTTP {}): {}", self.kind, code, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Classification of scoring service errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// Connection refused, reset, DNS failure, ...
    Transport,
    /// Non-2xx response
    Status,
    /// Response body could not be decoded
    Decode,
}

impl std::fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceErrorKind::Transport => write!(f, "Transport error"),
            ServiceErrorKind::Status => write!(f, "Service error"),
            ServiceErrorKind::Decode => write!(f, "Decode error"),
        }
    }
}

/// Pull the `error` field out of a failure body, if the body is JSON and has one.
pub fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(
            error_message_from_body(r#"{"error": "bad strategy"}"#),
            Some("bad strategy".to_string())
        );
        assert_eq!(error_message_from_body(r#"{"error": ""}"#), None);
        assert_eq!(error_message_from_body(r#"{"detail": "x"}"#), None);
        assert_eq!(error_message_from_body("<html>502</html>"), None);
    }

    #[test]
    fn test_display_includes_status() {
        let err = ServiceError::status(400, "bad strategy".to_string());
        assert_eq!(err.to_string(), "Service error (HTTP 400): bad strategy");

        let err = ServiceError::transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }
}
