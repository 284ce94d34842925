//! Upload progress reporting.
//!
//! Request bodies are streamed in chunks; every chunk handed to the connection
//! advances a tracker that turns byte counts into percentages. Reported values
//! never decrease, stay below 100 while bytes are in flight, and reach 100 only
//! once the server has accepted the upload.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;

/// Receives upload progress as a percentage (0-100).
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Default chunk size for streamed request bodies.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

const IN_FLIGHT_CEILING: u8 = 99;

pub struct ProgressTracker {
    total: u64,
    sent: AtomicU64,
    last: AtomicU8,
    callback: Option<ProgressCallback>,
}

impl ProgressTracker {
    pub fn new(total: u64, callback: Option<ProgressCallback>) -> Self {
        Self {
            total,
            sent: AtomicU64::new(0),
            last: AtomicU8::new(0),
            callback,
        }
    }

    /// Record `bytes` more handed to the connection.
    pub fn advance(&self, bytes: u64) {
        let sent = self.sent.fetch_add(bytes, Ordering::Relaxed) + bytes;
        let percent = if self.total == 0 {
            IN_FLIGHT_CEILING
        } else {
            (sent.saturating_mul(100) / self.total).min(IN_FLIGHT_CEILING as u64) as u8
        };
        self.report(percent);
    }

    /// Report completion.
    pub fn finish(&self) {
        self.report(100);
    }

    pub fn last_reported(&self) -> u8 {
        self.last.load(Ordering::Relaxed)
    }

    fn report(&self, percent: u8) {
        let percent = percent.min(100);
        let previous = self.last.fetch_max(percent, Ordering::Relaxed);
        if percent > previous {
            if let Some(callback) = &self.callback {
                callback(percent);
            }
        }
    }
}

/// Wrap `data` in a streaming body that advances `tracker` chunk by chunk.
pub fn progress_body(
    data: Bytes,
    chunk_size: usize,
    tracker: Arc<ProgressTracker>,
) -> reqwest::Body {
    let chunk_size = chunk_size.max(1);
    let chunks: Vec<Bytes> = (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect();

    let stream = futures::stream::iter(chunks).map(move |chunk| {
        tracker.advance(chunk.len() as u64);
        Ok::<Bytes, std::io::Error>(chunk)
    });

    reqwest::Body::wrap_stream(stream)
}
