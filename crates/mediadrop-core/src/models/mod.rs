//! Domain models shared by the validator, the transport and the state machine.

pub mod file;
pub mod upload;

pub use file::{CandidateFile, FileDescriptor, FileInfo, OCTET_STREAM};
pub use upload::{ImageMetadata, ImageVariants, MediaValue, UploadResult};
