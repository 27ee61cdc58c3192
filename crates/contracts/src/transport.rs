//! Transport traits - host publish-subscribe interface
//!
//! Defines the abstract interface the bridge publishes through. The real
//! transport is owned by the host framework; `publish` provides logging and
//! counting implementations.

use crate::{CameraInfo, ImageMessage, ImageMetadata};

/// Image topic publisher
///
/// Implementations are called from the dedicated publishing thread and must
/// not block on the acquisition path.
pub trait ImagePublisher: Send + Sync {
    /// Number of current subscribers; 0 lets the bridge skip the copy
    fn subscriber_count(&self) -> usize;

    /// Emit an image with its paired calibration info
    fn publish(&self, image: ImageMessage, info: CameraInfo);
}

/// Metadata topic publisher
pub trait MetadataPublisher: Send + Sync {
    /// Number of current subscribers
    fn subscriber_count(&self) -> usize;

    /// Emit per-frame metadata
    fn publish(&self, meta: ImageMetadata);
}

/// Acknowledgment returned for a parameter change batch
///
/// The bridge always acknowledges the batch; individual setting failures
/// are logged, not surfaced, so one bad field cannot reject a whole batch.
#[derive(Debug, Clone)]
pub struct BatchAck {
    /// Whether the batch was accepted
    pub accepted: bool,

    /// Human-readable reason
    pub reason: String,
}

impl BatchAck {
    /// The standard always-accepted acknowledgment
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            reason: "all good".to_string(),
        }
    }
}
