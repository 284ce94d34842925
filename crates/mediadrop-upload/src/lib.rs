//! Image upload field logic.
//!
//! A field acquires an image either from a URL typed by the user or from a file
//! that is picked or dropped. Files are validated locally, sent through an
//! `UploadTransport`, and the outcome is reported to the owner through a
//! `NotificationSink`. Presentation is left to the caller: render `UploadState`
//! however fits.

pub mod component;
pub mod field;
pub mod machine;
pub mod notify;
pub mod state;

pub use component::{ImageUpload, UploadJob};
pub use field::{CommitField, FieldError};
pub use machine::{Effects, UploadMachine, UploadTicket};
pub use notify::{Callbacks, Notification, NotificationSink, OwnerChange};
pub use state::{InputMode, Phase, UploadState};
