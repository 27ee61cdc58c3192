//! Counting sinks - publishers for tests
//!
//! Record emissions and keep the last message; the subscriber count is
//! adjustable so tests can exercise the skip-when-unsubscribed path.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use contracts::{CameraInfo, ImageMessage, ImageMetadata, ImagePublisher, MetadataPublisher};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Image publisher that counts emissions and stores the last message
#[derive(Debug, Default)]
pub struct CountingImageSink {
    subscribers: AtomicUsize,
    published: AtomicU64,
    last: Mutex<Option<ImageMessage>>,
}

impl CountingImageSink {
    /// Create with an initial subscriber count
    pub fn with_subscribers(subscribers: usize) -> Self {
        Self {
            subscribers: AtomicUsize::new(subscribers),
            ..Default::default()
        }
    }

    /// Change the subscriber count
    pub fn set_subscribers(&self, subscribers: usize) {
        self.subscribers.store(subscribers, Ordering::Relaxed);
    }

    /// Number of images emitted
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Last emitted image, if any
    pub fn last(&self) -> Option<ImageMessage> {
        lock(&self.last).clone()
    }
}

impl ImagePublisher for CountingImageSink {
    fn subscriber_count(&self) -> usize {
        self.subscribers.load(Ordering::Relaxed)
    }

    fn publish(&self, image: ImageMessage, _info: CameraInfo) {
        self.published.fetch_add(1, Ordering::Relaxed);
        *lock(&self.last) = Some(image);
    }
}

/// Metadata publisher that counts emissions and stores the last message
#[derive(Debug, Default)]
pub struct CountingMetadataSink {
    subscribers: AtomicUsize,
    published: AtomicU64,
    last: Mutex<Option<ImageMetadata>>,
}

impl CountingMetadataSink {
    /// Create with an initial subscriber count
    pub fn with_subscribers(subscribers: usize) -> Self {
        Self {
            subscribers: AtomicUsize::new(subscribers),
            ..Default::default()
        }
    }

    /// Change the subscriber count
    pub fn set_subscribers(&self, subscribers: usize) {
        self.subscribers.store(subscribers, Ordering::Relaxed);
    }

    /// Number of metadata messages emitted
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Last emitted metadata, if any
    pub fn last(&self) -> Option<ImageMetadata> {
        lock(&self.last).clone()
    }
}

impl MetadataPublisher for CountingMetadataSink {
    fn subscriber_count(&self) -> usize {
        self.subscribers.load(Ordering::Relaxed)
    }

    fn publish(&self, meta: ImageMetadata) {
        self.published.fetch_add(1, Ordering::Relaxed);
        *lock(&self.last) = Some(meta);
    }
}
