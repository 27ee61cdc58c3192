//! Output message types
//!
//! Wire-format structures handed to the host publish-subscribe transport.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Outgoing image message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMessage {
    /// Coordinate frame identifier
    pub frame_id: String,

    /// Capture timestamp (nanoseconds since UNIX epoch)
    pub stamp_ns: u64,

    /// Image height in pixels
    pub height: u32,

    /// Image width in pixels
    pub width: u32,

    /// Row stride in bytes
    pub stride: u32,

    /// Wire encoding ("bayer_rggb8", "rgb8", "mono8", or "INVALID")
    pub encoding: String,

    /// Pixel payload
    pub data: Bytes,
}

/// Calibration info message paired with every image
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraInfo {
    /// Coordinate frame identifier
    pub frame_id: String,

    /// Capture timestamp (nanoseconds since UNIX epoch)
    pub stamp_ns: u64,

    /// Calibrated image width
    pub width: u32,

    /// Calibrated image height
    pub height: u32,

    /// Intrinsic matrix, row-major 3x3
    pub intrinsics: [f64; 9],

    /// Distortion coefficients
    pub distortion: Vec<f64>,
}

impl CameraInfo {
    /// Copy of this info stamped with a new capture time
    pub fn stamped(&self, stamp_ns: u64) -> Self {
        Self {
            stamp_ns,
            ..self.clone()
        }
    }
}

/// Lightweight per-frame metadata message
///
/// Published independently of the image so downstream exposure controllers
/// keep working even when nobody subscribes to pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Coordinate frame identifier
    pub frame_id: String,

    /// Publish timestamp (nanoseconds since UNIX epoch)
    pub stamp_ns: u64,

    /// Mean image brightness
    pub brightness: i16,

    /// Exposure time of the frame (microseconds)
    pub exposure_time_us: u32,

    /// Maximum exposure time currently allowed (microseconds)
    pub max_exposure_time_us: u32,

    /// Analog gain (dB)
    pub gain: f32,

    /// Device capture time (nanoseconds since UNIX epoch)
    pub camera_time_ns: u64,
}

/// Incoming control command
///
/// Sentinels mean "no change requested": 0 for exposure, the minimum
/// representable float for gain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraControl {
    /// Requested exposure time (microseconds, 0 = no change)
    pub exposure_time_us: u32,

    /// Requested gain (dB, f32::MIN = no change)
    pub gain: f32,
}

impl CameraControl {
    /// A command requesting no changes
    pub fn unset() -> Self {
        Self {
            exposure_time_us: 0,
            gain: f32::MIN,
        }
    }
}
