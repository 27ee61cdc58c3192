//! CameraDevice trait - device driver abstraction
//!
//! Defines the interface of the vendor driver the bridge talks to. The real
//! driver lives outside this workspace; `camera::MockCamera` implements the
//! same surface for tests and development.

use crate::{DeviceError, FrameCallback, PixelFormat};

/// Camera device driver interface
///
/// Set operations write a node and return the value the device actually
/// holds afterwards, so callers can verify the write took effect. A soft
/// rejection (bad node, out-of-range value) is `DeviceError::Rejected`; a
/// driver-level failure is `DeviceError::Fault` and corresponds to the
/// vendor driver's structured exception.
///
/// Configuration calls must be safe to issue while streaming; the bridge
/// relies on the driver's own locking for that.
pub trait CameraDevice: Send + Sync {
    /// Initialize the camera with the given serial number
    fn init(&self, serial: &str) -> Result<(), DeviceError>;

    /// Release the camera
    fn deinit(&self);

    /// Start acquisition, delivering frames through the callback.
    ///
    /// Returns false when acquisition could not be started.
    fn start_streaming(&self, callback: FrameCallback) -> bool;

    /// Stop acquisition. Returns false when the camera was not streaming.
    fn stop_streaming(&self) -> bool;

    /// Write an enumeration node, returning the entry the device reports back
    fn set_enum(&self, node: &str, value: &str) -> Result<String, DeviceError>;

    /// Write a float node, returning the value the device reports back
    fn set_float(&self, node: &str, value: f64) -> Result<f64, DeviceError>;

    /// Write an integer node, returning the value the device reports back
    fn set_int(&self, node: &str, value: i64) -> Result<i64, DeviceError>;

    /// Write a boolean node, returning the value the device reports back
    fn set_bool(&self, node: &str, value: bool) -> Result<bool, DeviceError>;

    /// Enable on-device mean-brightness computation (no-op by default)
    fn set_compute_brightness(&self, _enable: bool) {}

    /// Per-frame acquisition timeout in seconds (no-op by default)
    fn set_acquisition_timeout(&self, _seconds: f64) {}

    /// Serial numbers of all currently visible cameras
    fn serial_numbers(&self) -> Vec<String>;

    /// Re-enumerate the device list
    fn refresh_device_list(&self);

    /// Frame rate the device reports on its receive side (Hz)
    fn receive_frame_rate(&self) -> f64;

    /// Pixel format the device is configured to deliver
    fn pixel_format(&self) -> PixelFormat;

    /// Full node map dump for diagnostics
    fn node_map(&self) -> String;

    /// Vendor library version string
    fn library_version(&self) -> String;
}
