//! Domain-level error types for crisp-exporter.
//!
//! All errors are typed with `thiserror` and provide meaningful context
//! without exposing internal details to end users.

use thiserror::Error;

/// Fallback text shown when the upstream payload carries no usable detail.
pub const GENERIC_API_ERROR: &str = "Crisp API error";

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more credential values are absent; nothing was sent upstream.
    #[error("Crisp credentials are missing: {}", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    /// The remote API rejected a request or could not be reached.
    #[error("{}", describe_fetch_failure(.status, .reason, .message))]
    Fetch {
        status: Option<u16>,
        reason: Option<String>,
        message: Option<String>,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Caller-side precondition failure.
    #[error("{message}")]
    Usage { message: String },

    /// Invalid or unexpected data.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// JSON parsing or serialization failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Writing the spreadsheet package failed.
    #[error("Export error: {message}")]
    Export {
        message: String,
        #[source]
        source: Option<zip::result::ZipError>,
    },

    /// System clipboard unavailable or rejected the text.
    #[error("Clipboard error: {message}")]
    Clipboard { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a fetch error from a transport-level reqwest failure.
    pub fn http(err: reqwest::Error) -> Self {
        Self::Fetch {
            status: err.status().map(|s| s.as_u16()),
            reason: None,
            message: Some(err.to_string()),
            source: Some(err),
        }
    }

    /// Create a fetch error from an upstream error payload.
    pub fn upstream(status: u16, reason: Option<String>, message: Option<String>) -> Self {
        Self::Fetch {
            status: Some(status),
            reason,
            message,
            source: None,
        }
    }

    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a spreadsheet export error with context.
    pub fn export(message: impl Into<String>, err: zip::result::ZipError) -> Self {
        Self::Export {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Create a clipboard error, keeping the whole context chain.
    pub fn clipboard(err: &anyhow::Error) -> Self {
        Self::Clipboard {
            message: format!("{err:#}"),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Whether this error came from the remote API.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// Builds the short user-facing text for a failed API call.
fn describe_fetch_failure(
    status: &Option<u16>,
    reason: &Option<String>,
    message: &Option<String>,
) -> String {
    let message = message.as_deref().filter(|m| !m.trim().is_empty());
    let reason = reason.as_deref().filter(|r| !r.trim().is_empty());

    match (message, reason, status) {
        (Some(message), Some(reason), _) => {
            format!("{GENERIC_API_ERROR}: {message} (reason: {reason})")
        }
        (Some(message), None, _) => format!("{GENERIC_API_ERROR}: {message}"),
        (None, Some(reason), _) => format!("{GENERIC_API_ERROR} (reason): {reason}"),
        (None, None, Some(status)) => format!("{GENERIC_API_ERROR} (HTTP {status})"),
        (None, None, None) => GENERIC_API_ERROR.to_string(),
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_message_and_reason() {
        let err = AppError::upstream(
            401,
            Some("invalid_session".into()),
            Some("Session is invalid".into()),
        );
        assert_eq!(
            err.to_string(),
            "Crisp API error: Session is invalid (reason: invalid_session)"
        );
    }

    #[test]
    fn test_fetch_reason_only() {
        let err = AppError::upstream(404, Some("not_found".into()), None);
        assert_eq!(err.to_string(), "Crisp API error (reason): not_found");
    }

    #[test]
    fn test_fetch_fallbacks() {
        let err = AppError::upstream(500, None, Some("  ".into()));
        assert_eq!(err.to_string(), "Crisp API error (HTTP 500)");

        let err = AppError::Fetch {
            status: None,
            reason: None,
            message: None,
            source: None,
        };
        assert_eq!(err.to_string(), GENERIC_API_ERROR);
        assert!(err.is_fetch());
    }

    #[test]
    fn test_missing_credentials_lists_fields() {
        let err = AppError::MissingCredentials {
            missing: vec!["identifier", "website_id"],
        };
        assert_eq!(
            err.to_string(),
            "Crisp credentials are missing: identifier, website_id"
        );
        assert!(!err.is_fetch());
    }
}
