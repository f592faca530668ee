//! Error types for Jira client operations

use compact_str::CompactString;
use thiserror::Error;

/// Structured error types for Jira client operations
///
/// Every variant raised while talking to the server carries the name of the
/// operation that issued the request.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received (connection refused, DNS, timeout, ...)
    #[error("{operation}: request failed: {source}")]
    Transport {
        operation: CompactString,
        #[source]
        source: reqwest::Error,
    },

    /// 400: the request carried an invalid parameter
    #[error("{operation}: invalid parameter provided")]
    InvalidParameter { operation: CompactString },

    /// 401: the calling user is not authenticated
    #[error("{operation}: the calling user is not authenticated")]
    Unauthenticated { operation: CompactString },

    /// 403: the calling user lacks permission for the resource
    #[error("{operation}: the calling user does not have permission to get this data")]
    Forbidden { operation: CompactString },

    /// 404: the resource does not exist
    #[error("{operation}: requested data does not exist")]
    NotFound { operation: CompactString },

    /// Any other non-200 status
    #[error("{operation}: unknown status code: {status}")]
    UnknownStatus { operation: CompactString, status: u16 },

    /// JSON parsing error with endpoint context
    #[error("{operation}: failed to parse JSON response from {endpoint}")]
    JsonParse {
        operation: CompactString,
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Pagination metadata missing or of the wrong type
    #[error("{operation}: malformed page, {field} {reason}")]
    MalformedPage {
        operation: CompactString,
        field: CompactString,
        reason: &'static str,
    },

    /// The server never signalled the end of the collection
    #[error("{operation}: gave up after {pages} pages without reaching the end")]
    PageLimitExceeded { operation: CompactString, pages: u32 },

    /// Invalid URL format
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration field validation failed
    #[error("Invalid {field}: {message}")]
    ConfigValidation { field: String, message: String },
}

impl ClientError {
    /// Classify a non-200 HTTP status
    pub fn from_status(operation: impl Into<CompactString>, status: u16) -> Self {
        let operation = operation.into();
        match status {
            400 => Self::InvalidParameter { operation },
            401 => Self::Unauthenticated { operation },
            403 => Self::Forbidden { operation },
            404 => Self::NotFound { operation },
            _ => Self::UnknownStatus { operation, status },
        }
    }

    /// Create a transport error
    pub fn transport(operation: impl Into<CompactString>, source: reqwest::Error) -> Self {
        Self::Transport { operation: operation.into(), source }
    }

    /// Create a JSON parsing error with endpoint context
    pub fn json_parse(
        operation: impl Into<CompactString>,
        endpoint: impl Into<String>,
        source: serde_json::Error,
    ) -> Self {
        Self::JsonParse {
            operation: operation.into(),
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Create a malformed page error
    pub fn malformed_page(
        operation: impl Into<CompactString>,
        field: impl Into<CompactString>,
        reason: &'static str,
    ) -> Self {
        Self::MalformedPage {
            operation: operation.into(),
            field: field.into(),
            reason,
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a configuration field validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation { field: field.into(), message: message.into() }
    }

    /// HTTP status that caused this error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::InvalidParameter { .. } => Some(400),
            ClientError::Unauthenticated { .. } => Some(401),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::NotFound { .. } => Some(404),
            ClientError::UnknownStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Name of the operation that failed, if the error came from a request
    pub fn operation(&self) -> Option<&str> {
        match self {
            ClientError::Transport { operation, .. }
            | ClientError::InvalidParameter { operation }
            | ClientError::Unauthenticated { operation }
            | ClientError::Forbidden { operation }
            | ClientError::NotFound { operation }
            | ClientError::UnknownStatus { operation, .. }
            | ClientError::JsonParse { operation, .. }
            | ClientError::MalformedPage { operation, .. }
            | ClientError::PageLimitExceeded { operation, .. } => Some(operation.as_str()),
            ClientError::InvalidUrl { .. }
            | ClientError::Config(_)
            | ClientError::ConfigValidation { .. } => None,
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
