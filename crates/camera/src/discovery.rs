//! Camera discovery with bounded retry
//!
//! The only retry policy in the bridge: everything else is attempt-once
//! with a logged failure.

use std::time::Duration;

use contracts::{BridgeError, CameraDevice};
use tracing::{info, warn};

/// Wait until a camera with the given serial shows up on the bus.
///
/// Refreshes the device list up to `attempts` times with `delay` between
/// tries. Every miss logs the serials that were visible, which is usually
/// enough to spot a cabling or enumeration problem.
///
/// # Errors
/// `BridgeError::CameraNotFound` when the retry budget is exhausted.
pub fn wait_for_camera(
    device: &dyn CameraDevice,
    serial: &str,
    attempts: u32,
    delay: Duration,
) -> Result<(), BridgeError> {
    for attempt in 1..=attempts {
        device.refresh_device_list();
        let serials = device.serial_numbers();
        if serials.iter().any(|s| s == serial) {
            info!(serial, attempt, "found camera");
            return Ok(());
        }

        warn!(serial, attempt, "no camera found with serial");
        for found in &serials {
            warn!(found = %found, "visible camera");
        }
        if attempt < attempts {
            std::thread::sleep(delay);
        }
    }

    Err(BridgeError::CameraNotFound {
        serial: serial.to_string(),
        attempts,
    })
}
