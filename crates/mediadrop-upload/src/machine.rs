//! Transition table of an image upload field.
//!
//! `UploadMachine` owns the `UploadState` and applies one trigger at a time.
//! Each trigger returns the `Effects` it produced: the notifications to deliver
//! and, when a file passed validation, the ticket of the upload to start. The
//! machine never performs I/O itself.

use mediadrop_core::validation::ensure_image;
use mediadrop_core::{
    log_error, AppError, ErrorMetadata, FileInfo, MediaValidator, MediaValue, TransportError,
    UploadConfig, UploadResult, ValidationError,
};

use crate::notify::{Notification, OwnerChange};
use crate::state::{InputMode, Phase, UploadState};

/// Identifies one in-flight upload. Callbacks carrying a stale ticket are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadTicket(u64);

/// What a trigger produced.
#[derive(Debug, Default, PartialEq)]
pub struct Effects {
    pub notifications: Vec<Notification>,
    /// Set when the trigger started an upload that the caller must run
    pub start: Option<UploadTicket>,
}

impl Effects {
    fn none() -> Self {
        Self::default()
    }

    fn notify(notification: Notification) -> Self {
        Self {
            notifications: vec![notification],
            start: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() && self.start.is_none()
    }
}

#[derive(Debug)]
pub struct UploadMachine {
    state: UploadState,
    config: UploadConfig,
    validator: MediaValidator,
    next_ticket: u64,
    in_flight: Option<UploadTicket>,
}

impl UploadMachine {
    pub fn new(config: UploadConfig, initial: Option<MediaValue>) -> Self {
        Self {
            state: UploadState::new(initial),
            validator: config.validator(),
            config,
            next_ticket: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Ticket of the upload currently in flight, if any.
    pub fn in_flight(&self) -> Option<UploadTicket> {
        self.in_flight
    }

    /// True when the field is required and holds no value.
    pub fn missing_required(&self) -> bool {
        self.config.required && self.state.value.is_none()
    }

    fn accepts(&self, trigger: &'static str) -> bool {
        if self.config.disabled {
            tracing::debug!(trigger, "Ignoring trigger on disabled upload field");
            return false;
        }
        true
    }

    fn accepts_file(&self, trigger: &'static str) -> bool {
        if !self.accepts(trigger) {
            return false;
        }
        if self.state.phase.is_uploading() {
            tracing::debug!(trigger, "Ignoring file while an upload is in flight");
            return false;
        }
        true
    }

    pub fn set_mode(&mut self, mode: InputMode) -> Effects {
        if self.accepts("set_mode") {
            self.state.mode = mode;
        }
        Effects::none()
    }

    pub fn drag_enter(&mut self) -> Effects {
        if self.accepts("drag_enter") {
            self.state.is_dragging = true;
        }
        Effects::none()
    }

    pub fn drag_leave(&mut self) -> Effects {
        self.state.is_dragging = false;
        Effects::none()
    }

    /// A file was picked through the file dialog.
    pub fn select_file<F: FileInfo + ?Sized>(&mut self, file: &F) -> Effects {
        if !self.accepts_file("select_file") {
            return Effects::none();
        }

        if let Err(e) = self.validator.validate_all(file) {
            return self.reject(e);
        }

        let ticket = UploadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        self.state.phase = Phase::Uploading { progress: 0 };
        self.state.image_load_failed = false;

        tracing::debug!(
            file = file.name(),
            size = file.size(),
            content_type = file.content_type(),
            "Upload started"
        );

        Effects {
            notifications: vec![Notification::UploadStarted {
                file_name: file.name().to_string(),
            }],
            start: Some(ticket),
        }
    }

    /// A file was dropped on the dropzone. Non-images are rejected before validation.
    pub fn drop_file<F: FileInfo + ?Sized>(&mut self, file: &F) -> Effects {
        self.state.is_dragging = false;
        if !self.accepts_file("drop_file") {
            return Effects::none();
        }

        if let Err(e) = ensure_image(file.content_type()) {
            return self.reject(e);
        }

        self.select_file(file)
    }

    fn reject(&mut self, error: ValidationError) -> Effects {
        log_error(&error, "File rejected");
        self.state.phase = Phase::Error {
            message: error.client_message(),
        };
        Effects::none()
    }

    fn is_current(&self, ticket: UploadTicket) -> bool {
        self.in_flight == Some(ticket) && self.state.phase.is_uploading()
    }

    pub fn upload_progress(&mut self, ticket: UploadTicket, percent: u8) -> Effects {
        if !self.is_current(ticket) {
            return Effects::none();
        }

        if let Phase::Uploading { progress } = &mut self.state.phase {
            let next = percent.min(100).max(*progress);
            if next != *progress {
                *progress = next;
                return Effects::notify(Notification::UploadProgress { progress: next });
            }
        }
        Effects::none()
    }

    pub fn upload_finished(
        &mut self,
        ticket: UploadTicket,
        outcome: Result<UploadResult, TransportError>,
    ) -> Effects {
        if !self.is_current(ticket) {
            tracing::debug!(?ticket, "Ignoring result of a stale upload");
            return Effects::none();
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                self.state.phase = Phase::Success;
                self.state.image_load_failed = false;
                self.state.value = Some(MediaValue::Media(result.clone()));
                Effects {
                    notifications: vec![
                        Notification::UploadSucceeded(result.clone()),
                        Notification::Changed(OwnerChange::Uploaded(result)),
                    ],
                    start: None,
                }
            }
            Err(e) => {
                log_error(&e, "Upload failed");
                let message = e.client_message();
                self.state.phase = Phase::Error {
                    message: message.clone(),
                };
                Effects::notify(Notification::UploadFailed { message })
            }
        }
    }

    /// Leave the error phase. The URL field keeps its text.
    pub fn retry(&mut self) -> Effects {
        if self.accepts("retry") && matches!(self.state.phase, Phase::Error { .. }) {
            self.state.phase = Phase::Idle;
        }
        Effects::none()
    }

    /// Typing into the URL field. Never reaches the owner.
    pub fn set_url_input(&mut self, text: impl Into<String>) -> Effects {
        if self.accepts("set_url_input") {
            self.state.url_input = text.into();
        }
        Effects::none()
    }

    /// Commit the URL field as the value, bypassing the transport.
    pub fn apply_url(&mut self) -> Effects {
        if !self.accepts("apply_url") {
            return Effects::none();
        }

        let url = self.state.url_input.trim().to_string();
        if url.is_empty() {
            return Effects::none();
        }

        self.state.value = Some(MediaValue::Url(url.clone()));
        self.state.image_load_failed = false;
        Effects::notify(Notification::Changed(OwnerChange::Url(url)))
    }

    /// Remove the value. An upload still in flight is orphaned.
    pub fn clear(&mut self) -> Effects {
        if !self.accepts("clear") {
            return Effects::none();
        }

        self.in_flight = None;
        self.state.phase = Phase::Idle;
        self.state.value = None;
        self.state.url_input.clear();
        self.state.image_load_failed = false;
        self.state.is_dragging = false;
        Effects::notify(Notification::Changed(OwnerChange::Cleared))
    }

    /// The committed URL could not be rendered.
    pub fn image_failed(&mut self) -> Effects {
        if let Some(value) = &self.state.value {
            let err = AppError::Render {
                url: value.url().to_string(),
            };
            log_error(&err, "Image failed to load");
            self.state.image_load_failed = true;
        }
        Effects::none()
    }

    pub fn image_loaded(&mut self) -> Effects {
        self.state.image_load_failed = false;
        Effects::none()
    }

    /// Reflect a new value from the owner without notifying it back.
    pub fn set_value(&mut self, value: Option<MediaValue>) {
        self.state.url_input = value
            .as_ref()
            .map(|v| v.url().to_string())
            .unwrap_or_default();
        self.state.value = value;
        self.state.image_load_failed = false;
    }
}
