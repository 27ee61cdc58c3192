//! Control-state synchronization
//!
//! Tracks the last applied exposure/gain and writes the device only on
//! change. Each field has its own fault boundary, so a driver exception on
//! one field never blocks the other.

use contracts::{CameraControl, ParamValue};
use registry::ParamRegistry;
use tracing::{info, warn};

use crate::applier::SettingApplier;

/// Last applied control values
///
/// Sentinels mean nothing has been applied yet: 0 for exposure, the
/// minimum representable float for gain.
#[derive(Debug, Clone, Copy)]
pub struct ControlState {
    /// Last applied exposure time (microseconds)
    pub exposure_time_us: u32,

    /// Last applied gain (dB)
    pub gain: f32,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            exposure_time_us: 0,
            gain: f32::MIN,
        }
    }
}

/// Applies control commands against the tracked state
#[derive(Debug, Default)]
pub struct ControlSync {
    state: ControlState,
}

impl ControlSync {
    /// Create with unset state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Handle one control command.
    ///
    /// A field is written only when its value is non-sentinel and differs
    /// from the last applied one; repeated identical commands are no-ops.
    /// A missing registry entry skips the field with a warning.
    pub fn on_control(
        &mut self,
        applier: &SettingApplier,
        registry: &ParamRegistry,
        cmd: &CameraControl,
    ) {
        let exposure = cmd.exposure_time_us;
        if exposure > 0 && exposure != self.state.exposure_time_us {
            match registry.get("exposure_time") {
                Some(desc) => match applier.apply(desc, &ParamValue::Float(f64::from(exposure))) {
                    Ok(true) => {
                        self.state.exposure_time_us = exposure;
                        info!(exposure_time_us = exposure, "changed exposure time");
                    }
                    Ok(false) => {}
                    Err(err) => warn!(error = %err, "failed to control exposure time"),
                },
                None => {
                    warn!("no node name defined for exposure_time, check parameter map");
                }
            }
        }

        let gain = cmd.gain;
        if gain > f32::MIN && gain != self.state.gain {
            match registry.get("gain") {
                Some(desc) => match applier.apply(desc, &ParamValue::Float(f64::from(gain))) {
                    Ok(true) => {
                        self.state.gain = gain;
                        info!(gain, "changed gain");
                    }
                    Ok(false) => {}
                    Err(err) => warn!(error = %err, "failed to control gain"),
                },
                None => {
                    warn!("no node name defined for gain, check parameter map");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera::MockCamera;
    use std::sync::Arc;

    const MAP: &str = "exposure_time float ExposureTime\ngain float Gain\n";

    fn setup() -> (ControlSync, SettingApplier, ParamRegistry, Arc<MockCamera>) {
        let camera = Arc::new(MockCamera::with_serial("1"));
        let applier = SettingApplier::new(camera.clone());
        let registry = ParamRegistry::load_from_str(MAP);
        (ControlSync::new(), applier, registry, camera)
    }

    fn cmd(exposure_time_us: u32, gain: f32) -> CameraControl {
        CameraControl {
            exposure_time_us,
            gain,
        }
    }

    #[test]
    fn test_sentinels_touch_nothing() {
        let (mut sync, applier, registry, camera) = setup();
        sync.on_control(&applier, &registry, &CameraControl::unset());
        assert_eq!(camera.write_count("ExposureTime"), 0);
        assert_eq!(camera.write_count("Gain"), 0);
    }

    #[test]
    fn test_zero_exposure_means_no_change() {
        let (mut sync, applier, registry, camera) = setup();
        sync.on_control(&applier, &registry, &cmd(0, 2.5));
        assert_eq!(camera.write_count("ExposureTime"), 0);
        assert_eq!(camera.write_count("Gain"), 1);
        assert_eq!(sync.state().gain, 2.5);
    }

    #[test]
    fn test_repeated_command_writes_once() {
        let (mut sync, applier, registry, camera) = setup();
        sync.on_control(&applier, &registry, &cmd(5000, f32::MIN));
        sync.on_control(&applier, &registry, &cmd(5000, f32::MIN));
        assert_eq!(camera.write_count("ExposureTime"), 1);
        assert_eq!(sync.state().exposure_time_us, 5000);
    }

    #[test]
    fn test_unchanged_gain_not_reapplied() {
        let (mut sync, applier, registry, camera) = setup();
        sync.on_control(&applier, &registry, &cmd(5000, 3.0));
        sync.on_control(&applier, &registry, &cmd(6000, 3.0));
        assert_eq!(camera.write_count("Gain"), 1);
        assert_eq!(camera.write_count("ExposureTime"), 2);
    }

    #[test]
    fn test_missing_registry_entry_skips_field() {
        let camera = Arc::new(MockCamera::with_serial("1"));
        let applier = SettingApplier::new(camera.clone());
        let registry = ParamRegistry::load_from_str("gain float Gain\n");
        let mut sync = ControlSync::new();

        sync.on_control(&applier, &registry, &cmd(5000, 1.0));
        assert_eq!(camera.write_count("ExposureTime"), 0);
        assert_eq!(camera.write_count("Gain"), 1);
    }

    #[test]
    fn test_exposure_fault_does_not_block_gain() {
        let (mut sync, applier, registry, camera) = setup();
        camera.fault_node("ExposureTime");

        sync.on_control(&applier, &registry, &cmd(5000, 4.0));

        assert_eq!(sync.state().exposure_time_us, 0);
        assert_eq!(sync.state().gain, 4.0);
        assert_eq!(camera.write_count("Gain"), 1);
    }

    #[test]
    fn test_failed_apply_leaves_state_unset() {
        let (mut sync, applier, registry, camera) = setup();
        camera.reject_node("ExposureTime");

        sync.on_control(&applier, &registry, &cmd(5000, f32::MIN));
        assert_eq!(sync.state().exposure_time_us, 0);

        // a later identical command retries since nothing was applied
        sync.on_control(&applier, &registry, &cmd(5000, f32::MIN));
        assert_eq!(camera.write_count("ExposureTime"), 2);
    }
}
