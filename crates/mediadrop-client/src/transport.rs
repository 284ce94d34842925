//! Transport adapter between the upload state machine and the network.

use std::sync::Arc;

use async_trait::async_trait;
use mediadrop_core::{CandidateFile, FileInfo, TransportError, UploadResult};
use reqwest::multipart::{Form, Part};

use crate::progress::{progress_body, ProgressCallback, ProgressTracker, DEFAULT_CHUNK_SIZE};
use crate::ApiClient;

/// Sends a file to an upload endpoint and reports progress.
///
/// Implementations call `on_progress` zero or more times with non-decreasing
/// percentages, ending at 100 when the upload succeeds. Every failure is
/// returned as a `TransportError`; nothing is cached, so retrying sends the
/// file again from scratch.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn upload(
        &self,
        file: &CandidateFile,
        endpoint: &str,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadResult, TransportError>;
}

/// Multipart HTTP upload with a single `file` part.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: ApiClient,
    chunk_size: usize,
}

impl HttpTransport {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Granularity of progress reports, in bytes.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn upload(
        &self,
        file: &CandidateFile,
        endpoint: &str,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadResult, TransportError> {
        let total = file.size();
        let tracker = Arc::new(ProgressTracker::new(total, on_progress));
        let body = progress_body(file.data.clone(), self.chunk_size, tracker.clone());

        let part = Part::stream_with_length(body, total)
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| {
                TransportError::InvalidRequest(format!(
                    "invalid content type {}: {}",
                    file.content_type, e
                ))
            })?;
        let form = Form::new().part("file", part);

        tracing::debug!(
            file = %file.name,
            size = total,
            endpoint = %endpoint,
            "Sending upload"
        );

        let result: UploadResult = self.client.post_multipart(endpoint, form).await?;
        if result.url.trim().is_empty() {
            return Err(TransportError::MalformedResponse(
                "response is missing a url".to_string(),
            ));
        }

        tracker.finish();
        tracing::info!(file = %file.name, url = %result.url, "Upload completed");
        Ok(result)
    }
}
