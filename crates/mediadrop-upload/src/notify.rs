//! Owner notification contract.
//!
//! Every transition returns the notifications it produced as a plain list, and
//! a `NotificationSink` delivers them. The owner's change callback only sees
//! committed outcomes; the lifecycle notifications mirror the upload phases.

use std::fmt;

use mediadrop_core::UploadResult;
use serde::Serialize;
use tokio::sync::mpsc;

/// A committed change of the field's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum OwnerChange {
    /// A file finished uploading
    Uploaded(UploadResult),
    /// A URL was applied from the URL field
    Url(String),
    /// The value was removed
    Cleared,
}

impl OwnerChange {
    /// The plain URL the owner stores: empty after a clear.
    pub fn url(&self) -> &str {
        match self {
            OwnerChange::Uploaded(result) => &result.url,
            OwnerChange::Url(url) => url,
            OwnerChange::Cleared => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    Changed(OwnerChange),
    UploadStarted { file_name: String },
    UploadProgress { progress: u8 },
    UploadSucceeded(UploadResult),
    UploadFailed { message: String },
}

/// Receives the notifications produced by the state machine.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl NotificationSink for () {
    fn notify(&self, _notification: Notification) {}
}

impl NotificationSink for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if self.send(notification).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }
}

type Handler<T> = Option<Box<dyn Fn(T) + Send + Sync>>;

/// Independently optional owner callbacks.
#[derive(Default)]
pub struct Callbacks {
    on_change: Handler<OwnerChange>,
    on_upload_start: Handler<String>,
    on_upload_progress: Handler<u8>,
    on_upload_success: Handler<UploadResult>,
    on_upload_error: Handler<String>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(mut self, f: impl Fn(OwnerChange) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn on_upload_start(mut self, f: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_upload_start = Some(Box::new(f));
        self
    }

    pub fn on_upload_progress(mut self, f: impl Fn(u8) + Send + Sync + 'static) -> Self {
        self.on_upload_progress = Some(Box::new(f));
        self
    }

    pub fn on_upload_success(mut self, f: impl Fn(UploadResult) + Send + Sync + 'static) -> Self {
        self.on_upload_success = Some(Box::new(f));
        self
    }

    pub fn on_upload_error(mut self, f: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_upload_error = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_change", &self.on_change.is_some())
            .field("on_upload_start", &self.on_upload_start.is_some())
            .field("on_upload_progress", &self.on_upload_progress.is_some())
            .field("on_upload_success", &self.on_upload_success.is_some())
            .field("on_upload_error", &self.on_upload_error.is_some())
            .finish()
    }
}

impl NotificationSink for Callbacks {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Changed(change) => {
                if let Some(f) = &self.on_change {
                    f(change);
                }
            }
            Notification::UploadStarted { file_name } => {
                if let Some(f) = &self.on_upload_start {
                    f(file_name);
                }
            }
            Notification::UploadProgress { progress } => {
                if let Some(f) = &self.on_upload_progress {
                    f(progress);
                }
            }
            Notification::UploadSucceeded(result) => {
                if let Some(f) = &self.on_upload_success {
                    f(result);
                }
            }
            Notification::UploadFailed { message } => {
                if let Some(f) = &self.on_upload_error {
                    f(message);
                }
            }
        }
    }
}
