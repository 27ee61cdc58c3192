//! Log sinks - publishers that write to the log stream
//!
//! Used by the CLI when no real transport is wired in; every emission is a
//! debug line, so `-v` shows the stream without flooding stdout.

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{CameraInfo, ImageMessage, ImageMetadata, ImagePublisher, MetadataPublisher};
use tracing::debug;

/// Image publisher that logs emissions
#[derive(Debug, Default)]
pub struct LogImageSink {
    published: AtomicU64,
}

impl LogImageSink {
    /// Create a new log image sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of images emitted so far
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl ImagePublisher for LogImageSink {
    fn subscriber_count(&self) -> usize {
        1
    }

    fn publish(&self, image: ImageMessage, _info: CameraInfo) {
        self.published.fetch_add(1, Ordering::Relaxed);
        debug!(
            width = image.width,
            height = image.height,
            encoding = %image.encoding,
            stamp_ns = image.stamp_ns,
            "image published"
        );
    }
}

/// Metadata publisher that logs emissions
#[derive(Debug, Default)]
pub struct LogMetadataSink {
    published: AtomicU64,
}

impl LogMetadataSink {
    /// Create a new log metadata sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of metadata messages emitted so far
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl MetadataPublisher for LogMetadataSink {
    fn subscriber_count(&self) -> usize {
        1
    }

    fn publish(&self, meta: ImageMetadata) {
        self.published.fetch_add(1, Ordering::Relaxed);
        debug!(
            brightness = meta.brightness,
            exposure_time_us = meta.exposure_time_us,
            gain = meta.gain,
            "metadata published"
        );
    }
}
