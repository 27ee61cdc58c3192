//! Frame - acquisition output
//!
//! Raw frame data as delivered by the device callback.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Frame delivery callback type
///
/// The device invokes this on its own acquisition thread for every captured
/// frame. Uses `Arc` so the frame reference can be shared between the queue
/// slot and an in-flight consumer without copying pixel data.
pub type FrameCallback = Arc<dyn Fn(Arc<Frame>) + Send + Sync>;

/// Device pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 8-bit Bayer pattern, red/green first row
    BayerRg8,

    /// 8-bit packed RGB
    Rgb8,

    /// 8-bit monochrome
    Mono8,

    /// Unrecognized device format
    Invalid,
}

impl PixelFormat {
    /// Wire encoding string for the outgoing image message.
    ///
    /// Unknown formats map to "INVALID" which is still emitted downstream,
    /// so a bad format is diagnosable instead of stalling the stream.
    pub fn wire_encoding(&self) -> &'static str {
        match self {
            PixelFormat::BayerRg8 => "bayer_rggb8",
            PixelFormat::Rgb8 => "rgb8",
            PixelFormat::Mono8 => "mono8",
            PixelFormat::Invalid => "INVALID",
        }
    }

    /// Bytes per pixel for the format (0 when unknown)
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::BayerRg8 | PixelFormat::Mono8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Invalid => 0,
        }
    }
}

/// Captured frame
///
/// Produced by the device, referenced (not copied) while queued. Pixel data
/// is a `Bytes` handle, so cloning the frame never duplicates the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Row stride in bytes
    pub stride: u32,

    /// Device pixel format
    pub pixel_format: PixelFormat,

    /// Device capture time (nanoseconds since UNIX epoch)
    pub timestamp_ns: u64,

    /// Mean image brightness as reported by the device
    pub brightness: i16,

    /// Exposure time used for this frame (microseconds)
    pub exposure_time_us: u32,

    /// Maximum exposure time currently allowed (microseconds)
    pub max_exposure_time_us: u32,

    /// Analog gain used for this frame (dB)
    pub gain: f32,

    /// Raw pixel data
    pub data: Bytes,
}
