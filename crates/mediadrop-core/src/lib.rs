//! Mediadrop Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! pre-upload validation shared by the transport, the upload state machine and
//! the command-line client.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{AuthScheme, ClientConfig, SizeHint, UploadConfig, DEFAULT_ACCEPTED_TYPES};
pub use error::{
    log_error, AppError, AppResult, ErrorMetadata, LogLevel, TransportError, ValidationError,
};
pub use models::{
    CandidateFile, FileDescriptor, FileInfo, ImageMetadata, ImageVariants, MediaValue,
    UploadResult,
};
pub use validation::{validate, MediaValidator, ValidationResult};
