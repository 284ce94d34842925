//! Error types module
//!
//! This module provides the error taxonomy used by the upload components.
//! Validation failures happen before any network activity, transport failures
//! happen while talking to the upload endpoint, and render failures happen when
//! a resolved URL cannot be displayed. All of them are unified under `AppError`.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a failed upload
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Describes how an error should be presented to the user and to the logs.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error can be recovered from by retrying or picking another file
    fn is_recoverable(&self) -> bool;

    /// Human-readable message surfaced inline next to the field
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Reasons a candidate file is rejected before upload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid file type. Accepted types: {}", .accepted_extensions.join(", "))]
    UnsupportedType {
        content_type: String,
        accepted_extensions: Vec<String>,
    },

    #[error("File size exceeds {limit_mb}MB limit")]
    FileTooLarge { size: u64, max: u64, limit_mb: String },

    #[error("Please drop an image file")]
    NotAnImage { content_type: String },

    #[error("Upload constraints are misconfigured: {0}")]
    Misconfigured(String),
}

/// Failures while delivering a file to the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Upload failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed upload response: {0}")]
    MalformedResponse(String),

    #[error("Invalid upload request: {0}")]
    InvalidRequest(String),

    #[error("Upload interrupted before completion")]
    Interrupted,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Image failed to load: {url}")]
    Render { url: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias used across the upload crates.
pub type AppResult<T> = Result<T, AppError>;

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Validation error: {}", err))
    }
}

impl From<envy::Error> for AppError {
    fn from(err: envy::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl ErrorMetadata for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            ValidationError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ValidationError::NotAnImage { .. } => "NOT_AN_IMAGE",
            ValidationError::Misconfigured(_) => "MISCONFIGURED",
        }
    }

    fn is_recoverable(&self) -> bool {
        !matches!(self, ValidationError::Misconfigured(_))
    }

    fn client_message(&self) -> String {
        self.to_string()
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ValidationError::Misconfigured(_) => LogLevel::Error,
            _ => LogLevel::Debug,
        }
    }
}

impl ErrorMetadata for TransportError {
    fn error_code(&self) -> &'static str {
        match self {
            TransportError::Network(_) => "NETWORK_ERROR",
            TransportError::Status { .. } => "UPLOAD_REJECTED",
            TransportError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            TransportError::InvalidRequest(_) => "INVALID_REQUEST",
            TransportError::Interrupted => "UPLOAD_INTERRUPTED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            TransportError::Status { status, .. } => *status >= 500 || *status == 429,
            TransportError::InvalidRequest(_) => false,
            _ => true,
        }
    }

    fn client_message(&self) -> String {
        match self {
            TransportError::Network(_) => {
                "Upload failed: could not reach the server. Please try again.".to_string()
            }
            TransportError::Status { status: 413, .. } => {
                "Upload failed: the server rejected the file as too large.".to_string()
            }
            TransportError::Status { status, .. } => {
                format!("Upload failed with status {}.", status)
            }
            TransportError::MalformedResponse(_) => {
                "Upload failed: the server returned an unexpected response.".to_string()
            }
            TransportError::InvalidRequest(msg) => format!("Upload failed: {}", msg),
            TransportError::Interrupted => {
                "Upload was interrupted. Please try again.".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            TransportError::MalformedResponse(_) => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(e) => e.error_code(),
            AppError::Transport(e) => e.error_code(),
            AppError::Render { .. } => "RENDER_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            AppError::Validation(e) => e.is_recoverable(),
            AppError::Transport(e) => e.is_recoverable(),
            AppError::Render { .. } | AppError::InvalidInput(_) => true,
            AppError::Config(_) | AppError::Internal(_) => false,
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.client_message(),
            AppError::Transport(e) => e.client_message(),
            AppError::Render { .. } => "Failed to load image".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Config(_) | AppError::Internal(_) => {
                "Something went wrong. Please try again later.".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::Validation(e) => e.log_level(),
            AppError::Transport(e) => e.log_level(),
            AppError::Render { .. } | AppError::InvalidInput(_) => LogLevel::Debug,
            AppError::Config(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

/// Emit a tracing event for `err` at the level its metadata asks for.
pub fn log_error<E: ErrorMetadata + std::fmt::Display>(err: &E, context: &str) {
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(code = err.error_code(), error = %err, "{}", context)
        }
        LogLevel::Warn => {
            tracing::warn!(code = err.error_code(), error = %err, "{}", context)
        }
        LogLevel::Error => {
            tracing::error!(code = err.error_code(), error = %err, "{}", context)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_message_lists_extensions() {
        let err = ValidationError::UnsupportedType {
            content_type: "text/plain".to_string(),
            accepted_extensions: vec!["PNG".to_string(), "JPEG".to_string()],
        };
        assert_eq!(err.to_string(), "Invalid file type. Accepted types: PNG, JPEG");
        assert_eq!(err.client_message(), err.to_string());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_file_too_large_message() {
        let err = ValidationError::FileTooLarge {
            size: 10,
            max: 5,
            limit_mb: "5".to_string(),
        };
        assert_eq!(err.to_string(), "File size exceeds 5MB limit");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_transport_client_messages() {
        let err = TransportError::Status {
            status: 413,
            body: "too big".to_string(),
        };
        assert!(err.client_message().contains("too large"));
        assert!(!err.is_recoverable());

        let err = TransportError::Status {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.error_code(), "UPLOAD_REJECTED");
    }

    #[test]
    fn test_app_error_delegates_metadata() {
        let err: AppError = TransportError::Network("connection refused".to_string()).into();
        assert_eq!(err.error_code(), "NETWORK_ERROR");
        assert!(err.is_recoverable());

        let err = AppError::Config("bad".to_string());
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_interrupted_upload_is_recoverable() {
        let err = TransportError::Interrupted;
        assert_eq!(err.error_code(), "UPLOAD_INTERRUPTED");
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert!(err.client_message().contains("try again"));
    }

    #[test]
    fn test_render_error_metadata() {
        let err = AppError::Render {
            url: "https://x/broken.png".to_string(),
        };
        assert_eq!(err.error_code(), "RENDER_ERROR");
        assert_eq!(err.client_message(), "Failed to load image");
        assert_eq!(err.log_level(), LogLevel::Debug);
        assert!(err.to_string().contains("https://x/broken.png"));
    }

    #[test]
    fn test_io_error_becomes_internal_error() {
        let err: AppError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, AppError::Internal(ref msg) if msg.starts_with("IO error")));
    }
}
