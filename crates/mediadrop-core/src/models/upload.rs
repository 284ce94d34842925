use serde::{Deserialize, Serialize};

/// Resized renditions produced by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVariants {
    pub thumbnail: String,
    pub medium: String,
    pub large: String,
}

/// Intrinsic dimensions reported by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
}

/// Value handed back to the owning form after a successful upload.
///
/// Matches the JSON body of the upload endpoint: `url` is required, the rest is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<ImageVariants>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
}

impl UploadResult {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            variants: None,
            metadata: None,
        }
    }
}

/// Committed media reference: either a plain URL or a full upload descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaValue {
    Url(String),
    Media(UploadResult),
}

impl MediaValue {
    pub fn url(&self) -> &str {
        match self {
            MediaValue::Url(url) => url,
            MediaValue::Media(result) => &result.url,
        }
    }
}

impl From<UploadResult> for MediaValue {
    fn from(result: UploadResult) -> Self {
        MediaValue::Media(result)
    }
}
