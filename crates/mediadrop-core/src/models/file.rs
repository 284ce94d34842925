use std::path::{Component, Path};

use bytes::Bytes;

use crate::error::{AppError, AppResult};
use crate::validation::content_type_for_extension;

/// Fallback MIME type for files whose extension is unknown.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// What the validator needs to know about a candidate file.
pub trait FileInfo {
    fn name(&self) -> &str;

    /// MIME type as reported by the picker or inferred from the extension
    fn content_type(&self) -> &str;

    /// Size in bytes
    fn size(&self) -> u64;
}

/// Type and size of a file without its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size,
        }
    }
}

impl FileInfo for FileDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// A file picked or dropped by the user, with its bytes.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Load a file from disk, inferring its MIME type from the extension.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(AppError::InvalidInput(format!(
                "Invalid path: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid path: {}", path.display())))?
            .to_string();

        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(content_type_for_extension)
            .unwrap_or(OCTET_STREAM);

        let data = std::fs::read(path)?;
        tracing::debug!(file = %name, content_type, size = data.len(), "Loaded candidate file");

        Ok(Self::new(name, content_type, data))
    }

    pub fn descriptor(&self) -> FileDescriptor {
        FileDescriptor::new(self.name.clone(), self.content_type.clone(), self.size())
    }
}

impl FileInfo for CandidateFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
