//! State of one image upload field.

use mediadrop_core::MediaValue;
use serde::Serialize;

/// Which acquisition method is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Url,
    #[default]
    File,
}

/// Upload lifecycle.
///
/// Progress only exists while uploading and the error text only exists in the
/// error phase, so neither can leak into another phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Uploading {
        progress: u8,
    },
    Success,
    Error {
        message: String,
    },
}

impl Phase {
    pub fn is_uploading(&self) -> bool {
        matches!(self, Phase::Uploading { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UploadState {
    pub mode: InputMode,
    pub phase: Phase,
    pub is_dragging: bool,
    pub image_load_failed: bool,
    /// Raw text of the URL field; committed only on apply.
    pub url_input: String,
    /// Committed media value.
    pub value: Option<MediaValue>,
}

impl UploadState {
    /// Initial state for a freshly mounted field.
    pub fn new(initial: Option<MediaValue>) -> Self {
        Self {
            url_input: initial
                .as_ref()
                .map(|v| v.url().to_string())
                .unwrap_or_default(),
            value: initial,
            ..Self::default()
        }
    }

    /// Percentage while uploading, 100 after a successful upload, 0 otherwise.
    pub fn progress(&self) -> u8 {
        match self.phase {
            Phase::Uploading { progress } => progress,
            Phase::Success => 100,
            Phase::Idle | Phase::Error { .. } => 0,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error { message } => Some(message),
            _ => None,
        }
    }

    /// URL of the committed value, or an empty string.
    pub fn resolved_url(&self) -> &str {
        self.value.as_ref().map(MediaValue::url).unwrap_or("")
    }
}
