//! Configuration module
//!
//! Upload fields and the HTTP client are configured with explicit structs passed
//! at construction time. Both can be loaded from the environment (after reading a
//! `.env` file when present) or built directly in code.

use std::env;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::validation::MediaValidator;

const MAX_FILE_SIZE_MB: f64 = 5.0;
const UPLOAD_ENDPOINT: &str = "/api/upload";
const API_URL: &str = "http://localhost:3000";
const TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_ACCEPTED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

/// Presentation hint for the rendered field. Has no effect on behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeHint {
    Small,
    #[default]
    Medium,
    Large,
}

/// Constraints and switches of one image upload field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UploadConfig {
    #[validate(range(min = 0.001, message = "Maximum file size must be positive"))]
    pub max_size_mb: f64,
    #[validate(length(min = 1, message = "At least one accepted type is required"))]
    pub accepted_types: Vec<String>,
    #[validate(length(
        min = 1,
        max = 2048,
        message = "Upload endpoint must be between 1 and 2048 characters"
    ))]
    pub upload_endpoint: String,
    pub disabled: bool,
    pub required: bool,
    pub size: SizeHint,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_mb: MAX_FILE_SIZE_MB,
            accepted_types: DEFAULT_ACCEPTED_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            upload_endpoint: UPLOAD_ENDPOINT.to_string(),
            disabled: false,
            required: false,
            size: SizeHint::default(),
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from a variable lookup, falling back to defaults for missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let defaults = Self::default();

        let max_size_mb = lookup("MEDIADROP_MAX_FILE_SIZE_MB")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(defaults.max_size_mb);
        if !max_size_mb.is_finite() {
            return Err(AppError::Config(format!(
                "MEDIADROP_MAX_FILE_SIZE_MB must be a finite number, got {}",
                max_size_mb
            )));
        }

        let accepted_types = lookup("MEDIADROP_ACCEPTED_TYPES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.accepted_types);

        let upload_endpoint =
            lookup("MEDIADROP_UPLOAD_ENDPOINT").unwrap_or(defaults.upload_endpoint);

        let config = Self {
            max_size_mb,
            accepted_types,
            upload_endpoint,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    pub fn max_size_bytes(&self) -> u64 {
        (self.max_size_mb * 1024.0 * 1024.0) as u64
    }

    pub fn validator(&self) -> MediaValidator {
        MediaValidator::new(self.max_size_bytes(), self.accepted_types.clone())
    }
}

/// How the client authenticates against the upload endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// `X-API-Key: {key}`
    #[default]
    ApiKey,
    /// `Authorization: Bearer {token}`
    Bearer,
}

fn default_api_url() -> String {
    API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    TIMEOUT_SECS
}

/// HTTP client settings, read from `MEDIADROP_*` variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub auth_scheme: AuthScheme,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            auth_scheme: AuthScheme::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(env::vars())
    }

    pub fn from_vars<I>(vars: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed("MEDIADROP_").from_iter(vars)?)
    }
}
