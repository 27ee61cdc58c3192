//! # Bridge
//!
//! The engine of the camera bridge: typed setting application with
//! round-trip verification, control-state synchronization, the bounded
//! frame handoff queue, and the `CameraBridge` lifecycle that ties the
//! device driver to the publication side.

mod applier;
mod config;
mod control;
mod engine;
mod queue;

pub use applier::SettingApplier;
pub use config::BridgeConfig;
pub use control::{ControlState, ControlSync};
pub use engine::CameraBridge;
pub use queue::FrameQueue;
