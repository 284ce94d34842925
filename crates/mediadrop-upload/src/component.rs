//! Component driver for an image upload field.
//!
//! `ImageUpload` wires the transition table to an injected transport and
//! notification sink. File triggers hand back an `UploadJob`; the job keeps only
//! a weak reference to the field, so once the field is unmounted any late
//! progress or completion from the orphaned transport call is dropped. A job
//! dropped before it finishes fails its upload, leaving the field retryable.
//!
//! Notifications are queued while the machine lock is held and delivered in
//! transition order by whichever caller drains the outbox first. Sinks may call
//! back into the field.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use mediadrop_client::{ProgressCallback, UploadTransport};
use mediadrop_core::{CandidateFile, MediaValue, TransportError, UploadConfig};
use tokio::task::JoinHandle;

use crate::machine::{Effects, UploadMachine, UploadTicket};
use crate::notify::{Notification, NotificationSink};
use crate::state::{InputMode, UploadState};

#[derive(Default)]
struct Outbox {
    queue: VecDeque<Notification>,
    draining: bool,
}

struct Shared {
    machine: Mutex<UploadMachine>,
    outbox: Mutex<Outbox>,
    sink: Arc<dyn NotificationSink>,
}

/// Releases the outbox if a sink panics mid-delivery.
struct DrainGuard<'a> {
    shared: &'a Shared,
    armed: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.shared.outbox().draining = false;
        }
    }
}

impl Shared {
    fn new(machine: UploadMachine, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            machine: Mutex::new(machine),
            outbox: Mutex::new(Outbox::default()),
            sink,
        }
    }

    fn lock(&self) -> MutexGuard<'_, UploadMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn outbox(&self) -> MutexGuard<'_, Outbox> {
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one trigger, then deliver pending notifications outside the machine lock.
    fn apply(&self, trigger: impl FnOnce(&mut UploadMachine) -> Effects) -> Option<UploadTicket> {
        let start = {
            let mut machine = self.lock();
            let effects = trigger(&mut machine);
            if !effects.notifications.is_empty() {
                self.outbox().queue.extend(effects.notifications);
            }
            effects.start
        };
        self.drain();
        start
    }

    fn drain(&self) {
        {
            let mut outbox = self.outbox();
            if outbox.draining {
                return;
            }
            outbox.draining = true;
        }

        let mut guard = DrainGuard {
            shared: self,
            armed: true,
        };
        loop {
            let next = {
                let mut outbox = self.outbox();
                match outbox.queue.pop_front() {
                    Some(notification) => notification,
                    None => {
                        outbox.draining = false;
                        guard.armed = false;
                        return;
                    }
                }
            };
            self.sink.notify(next);
        }
    }
}

pub struct ImageUpload {
    shared: Arc<Shared>,
    transport: Arc<dyn UploadTransport>,
}

impl ImageUpload {
    /// Mount a field with its configuration, initial value and collaborators.
    pub fn new(
        config: UploadConfig,
        initial: Option<MediaValue>,
        transport: Arc<dyn UploadTransport>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared::new(UploadMachine::new(config, initial), sink)),
            transport,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> UploadState {
        self.shared.lock().state().clone()
    }

    pub fn missing_required(&self) -> bool {
        self.shared.lock().missing_required()
    }

    fn job(&self, ticket: Option<UploadTicket>, file: CandidateFile) -> Option<UploadJob> {
        let ticket = ticket?;
        let endpoint = self.shared.lock().config().upload_endpoint.clone();
        Some(UploadJob {
            ticket,
            file,
            endpoint,
            transport: self.transport.clone(),
            shared: Arc::downgrade(&self.shared),
            completed: false,
        })
    }

    /// A file was picked. Returns the upload to run when it passed validation.
    #[must_use = "dropping the job fails the upload it started"]
    pub fn select_file(&self, file: CandidateFile) -> Option<UploadJob> {
        let ticket = self.shared.apply(|m| m.select_file(&file));
        self.job(ticket, file)
    }

    /// A file was dropped. Returns the upload to run when it passed validation.
    #[must_use = "dropping the job fails the upload it started"]
    pub fn drop_file(&self, file: CandidateFile) -> Option<UploadJob> {
        let ticket = self.shared.apply(|m| m.drop_file(&file));
        self.job(ticket, file)
    }

    /// Pick a file and run its upload to completion.
    pub async fn upload(&self, file: CandidateFile) -> UploadState {
        if let Some(job) = self.select_file(file) {
            job.run().await;
        }
        self.state()
    }

    /// Pick a file and run its upload on the tokio runtime.
    pub fn spawn_upload(&self, file: CandidateFile) -> Option<JoinHandle<()>> {
        self.select_file(file).map(|job| tokio::spawn(job.run()))
    }

    pub fn set_mode(&self, mode: InputMode) {
        self.shared.apply(|m| m.set_mode(mode));
    }

    pub fn drag_enter(&self) {
        self.shared.apply(|m| m.drag_enter());
    }

    pub fn drag_leave(&self) {
        self.shared.apply(|m| m.drag_leave());
    }

    pub fn set_url_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared.apply(move |m| m.set_url_input(text));
    }

    pub fn apply_url(&self) {
        self.shared.apply(|m| m.apply_url());
    }

    pub fn retry(&self) {
        self.shared.apply(|m| m.retry());
    }

    pub fn clear(&self) {
        self.shared.apply(|m| m.clear());
    }

    pub fn image_failed(&self) {
        self.shared.apply(|m| m.image_failed());
    }

    pub fn image_loaded(&self) {
        self.shared.apply(|m| m.image_loaded());
    }

    /// Reflect a value pushed down by the owner.
    pub fn set_value(&self, value: Option<MediaValue>) {
        self.shared.lock().set_value(value);
    }

    /// Tear the field down. Uploads still running are orphaned.
    pub fn unmount(self) {
        tracing::debug!(
            in_flight = self.shared.lock().in_flight().is_some(),
            "Unmounting upload field"
        );
    }
}

/// One upload handed out by a file trigger.
///
/// Dropping the job before `run` completes (never run, aborted, or the
/// transport panicked) fails the upload with `TransportError::Interrupted`.
#[must_use = "an upload job does nothing unless run"]
pub struct UploadJob {
    ticket: UploadTicket,
    file: CandidateFile,
    endpoint: String,
    transport: Arc<dyn UploadTransport>,
    shared: Weak<Shared>,
    completed: bool,
}

impl UploadJob {
    pub fn ticket(&self) -> UploadTicket {
        self.ticket
    }

    pub fn file(&self) -> &CandidateFile {
        &self.file
    }

    /// Run the transport and feed progress and the outcome back to the field.
    pub async fn run(mut self) {
        let ticket = self.ticket;
        let progress_target = self.shared.clone();
        let on_progress: ProgressCallback = Arc::new(move |percent| {
            if let Some(shared) = progress_target.upgrade() {
                shared.apply(|m| m.upload_progress(ticket, percent));
            }
        });

        let outcome = self
            .transport
            .upload(&self.file, &self.endpoint, Some(on_progress))
            .await;
        self.completed = true;

        match self.shared.upgrade() {
            Some(shared) => {
                shared.apply(|m| m.upload_finished(ticket, outcome));
            }
            None => {
                tracing::debug!(
                    file = %self.file.name,
                    ok = outcome.is_ok(),
                    "Upload finished after unmount, ignoring"
                );
            }
        }
    }
}

impl Drop for UploadJob {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        if let Some(shared) = self.shared.upgrade() {
            tracing::debug!(file = %self.file.name, "Upload job dropped before completion");
            let ticket = self.ticket;
            shared.apply(|m| m.upload_finished(ticket, Err(TransportError::Interrupted)));
        }
    }
}
