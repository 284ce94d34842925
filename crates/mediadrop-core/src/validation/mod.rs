//! Pre-upload validation
//!
//! Checks a candidate file against the type and size constraints of an upload
//! field before any network activity. The checks never panic: every rejection,
//! including misconfigured constraints, comes back as a value.

use serde::Serialize;

use crate::error::ValidationError;
use crate::models::FileInfo;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Outcome of validating a candidate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::invalid(e.to_string()),
        }
    }
}

/// Validate `file` against a size limit and a set of accepted MIME types.
///
/// The type rule runs before the size rule and only the first failure is reported.
pub fn validate<F: FileInfo + ?Sized>(
    file: &F,
    max_size_bytes: u64,
    accepted_types: &[String],
) -> ValidationResult {
    MediaValidator::new(max_size_bytes, accepted_types.to_vec())
        .validate_all(file)
        .into()
}

/// Upper-cased subtype of each MIME type (`image/svg+xml` -> `SVG+XML`).
pub fn accepted_extensions(accepted_types: &[String]) -> Vec<String> {
    accepted_types
        .iter()
        .map(|ct| {
            ct.split_once('/')
                .map(|(_, subtype)| subtype)
                .unwrap_or(ct)
                .to_uppercase()
        })
        .collect()
}

/// Megabyte figure used in size messages: two decimals, or more when a
/// non-zero limit would otherwise round to 0. No trailing zeros.
pub fn format_megabytes(bytes: u64) -> String {
    let mb = bytes as f64 / BYTES_PER_MB;
    let mut scale = 100.0;
    let mut rounded = (mb * scale).round() / scale;
    while rounded == 0.0 && bytes > 0 && scale < 1e6 {
        scale *= 10.0;
        rounded = (mb * scale).round() / scale;
    }
    format!("{}", rounded)
}

/// MIME type for a known image file extension.
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        _ => return None,
    };
    Some(content_type)
}

/// Reject anything that is not an `image/*` type. Used by the drop path only.
pub fn ensure_image(content_type: &str) -> Result<(), ValidationError> {
    if content_type.to_lowercase().starts_with("image/") {
        Ok(())
    } else {
        Err(ValidationError::NotAnImage {
            content_type: content_type.to_string(),
        })
    }
}

/// Type and size constraints of one upload field.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: u64,
    accepted_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: u64, accepted_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            accepted_types,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn accepted_types(&self) -> &[String] {
        &self.accepted_types
    }

    fn check_constraints(&self) -> Result<(), ValidationError> {
        if self.max_file_size == 0 {
            return Err(ValidationError::Misconfigured(
                "maximum file size must be positive".to_string(),
            ));
        }
        if self.accepted_types.is_empty() {
            return Err(ValidationError::Misconfigured(
                "no accepted file types".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate content type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.trim().to_lowercase();

        if !self
            .accepted_types
            .iter()
            .any(|ct| ct.trim().to_lowercase() == normalized)
        {
            return Err(ValidationError::UnsupportedType {
                content_type: content_type.to_string(),
                accepted_extensions: accepted_extensions(&self.accepted_types),
            });
        }

        Ok(())
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
                limit_mb: format_megabytes(self.max_file_size),
            });
        }

        Ok(())
    }

    /// Validate type then size, stopping at the first failure
    pub fn validate_all<F: FileInfo + ?Sized>(&self, file: &F) -> Result<(), ValidationError> {
        self.check_constraints()?;
        self.validate_content_type(file.content_type())?;
        self.validate_file_size(file.size())?;
        Ok(())
    }
}
