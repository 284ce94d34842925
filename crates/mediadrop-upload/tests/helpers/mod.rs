#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mediadrop_client::{ProgressCallback, UploadTransport};
use mediadrop_core::{CandidateFile, TransportError, UploadConfig, UploadResult};
use mediadrop_upload::{ImageUpload, Notification, NotificationSink, OwnerChange};
use tokio::sync::Notify;

/// Records every notification it receives.
#[derive(Default)]
pub struct RecordingSink {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn changes(&self) -> Vec<OwnerChange> {
        self.all()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Changed(change) => Some(change),
                _ => None,
            })
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Replays fixed progress ticks, then returns a fixed outcome.
pub struct ScriptedTransport {
    ticks: Vec<u8>,
    outcome: Result<UploadResult, TransportError>,
    calls: AtomicUsize,
    endpoints: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn succeeding(ticks: &[u8], url: &str) -> Self {
        Self::new(ticks, Ok(UploadResult::from_url(url)))
    }

    pub fn failing(ticks: &[u8], error: TransportError) -> Self {
        Self::new(ticks, Err(error))
    }

    fn new(ticks: &[u8], outcome: Result<UploadResult, TransportError>) -> Self {
        Self {
            ticks: ticks.to_vec(),
            outcome,
            calls: AtomicUsize::new(0),
            endpoints: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.endpoints.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadTransport for ScriptedTransport {
    async fn upload(
        &self,
        _file: &CandidateFile,
        endpoint: &str,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadResult, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.endpoints.lock().unwrap().push(endpoint.to_string());
        if let Some(progress) = &on_progress {
            for tick in &self.ticks {
                progress(*tick);
            }
        }
        self.outcome.clone()
    }
}

/// Blocks inside `upload` until released, then reports progress and succeeds.
#[derive(Default)]
pub struct GatedTransport {
    pub started: Notify,
    pub release: Notify,
}

#[async_trait]
impl UploadTransport for GatedTransport {
    async fn upload(
        &self,
        _file: &CandidateFile,
        _endpoint: &str,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadResult, TransportError> {
        self.started.notify_one();
        self.release.notified().await;
        if let Some(progress) = &on_progress {
            progress(50);
            progress(100);
        }
        Ok(UploadResult::from_url("https://cdn.example.com/late.png"))
    }
}

pub fn png(size: usize) -> CandidateFile {
    CandidateFile::new("photo.png", "image/png", vec![0u8; size])
}

pub fn mount(
    config: UploadConfig,
    transport: Arc<dyn UploadTransport>,
) -> (ImageUpload, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let upload = ImageUpload::new(config, None, transport, sink.clone());
    (upload, sink)
}
