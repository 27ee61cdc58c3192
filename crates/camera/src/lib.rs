//! # Camera
//!
//! Device-side helpers: bounded-retry discovery and the mock camera driver.
//!
//! The mock implements the full `CameraDevice` surface so the bridge can be
//! developed and tested without vendor hardware; it generates frames from a
//! background thread through the same callback path the real driver uses.

mod discovery;
mod mock;

pub use discovery::wait_for_camera;
pub use mock::{MockCamera, MockCameraConfig};
