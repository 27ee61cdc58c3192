//! Typed setting applier
//!
//! Converts an untyped host value into the device-appropriate type, writes
//! the node, and verifies the round trip. Float nodes pass within a 2.5%
//! relative tolerance band (device quantization); int, bool and enum nodes
//! must read back exactly.

use std::sync::Arc;

use contracts::{CameraDevice, DeviceError, ParamValue, SettingDescriptor, SettingKind};
use tracing::{info, warn};

/// Relative tolerance for float round-trip verification
const FLOAT_TOLERANCE: f64 = 0.025;

/// Applies typed settings to the device with round-trip verification
pub struct SettingApplier {
    device: Arc<dyn CameraDevice>,
}

impl SettingApplier {
    /// Create an applier for the given device
    pub fn new(device: Arc<dyn CameraDevice>) -> Self {
        Self { device }
    }

    /// Apply one setting.
    ///
    /// Returns `Ok(true)` on a verified write, `Ok(false)` on a rejected
    /// value, a failed verification, or a descriptor without an effective
    /// type. A driver fault propagates as `Err` so the caller can isolate
    /// it per setting.
    pub fn apply(
        &self,
        desc: &SettingDescriptor,
        value: &ParamValue,
    ) -> Result<bool, DeviceError> {
        match desc.kind {
            Some(SettingKind::Enum) => self.apply_enum(desc, value),
            Some(SettingKind::Float) => self.apply_float(desc, value),
            Some(SettingKind::Int) => self.apply_int(desc, value),
            Some(SettingKind::Bool) => self.apply_bool(desc, value),
            None => {
                warn!(name = %desc.name, "setting has no valid kind in parameter map");
                Ok(false)
            }
        }
    }

    fn apply_enum(
        &self,
        desc: &SettingDescriptor,
        value: &ParamValue,
    ) -> Result<bool, DeviceError> {
        let requested = value.as_enum_entry();
        info!(node = %desc.node, value = %requested, "setting enum");
        match self.device.set_enum(&desc.node, &requested) {
            Ok(actual) if actual == requested => Ok(true),
            Ok(actual) => {
                warn!(node = %desc.node, %actual, %requested, "set to different value");
                Ok(false)
            }
            Err(err @ DeviceError::Rejected { .. }) => {
                warn!(error = %err, "enum write rejected");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn apply_float(
        &self,
        desc: &SettingDescriptor,
        value: &ParamValue,
    ) -> Result<bool, DeviceError> {
        let Some(requested) = value.as_number() else {
            warn!(name = %desc.name, got = value.type_name(), "bad non-float value type");
            return Ok(false);
        };
        info!(node = %desc.node, value = requested, "setting float");
        match self.device.set_float(&desc.node, requested) {
            Ok(actual) => {
                if (requested - actual).abs() > FLOAT_TOLERANCE * (requested + actual).abs() {
                    warn!(node = %desc.node, actual, requested, "set to different value");
                    Ok(false)
                } else {
                    Ok(true)
                }
            }
            Err(err @ DeviceError::Rejected { .. }) => {
                warn!(error = %err, "float write rejected");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn apply_int(
        &self,
        desc: &SettingDescriptor,
        value: &ParamValue,
    ) -> Result<bool, DeviceError> {
        let Some(requested) = value.as_integer() else {
            warn!(name = %desc.name, got = value.type_name(), "bad non-int value type");
            return Ok(false);
        };
        info!(node = %desc.node, value = requested, "setting int");
        match self.device.set_int(&desc.node, requested) {
            Ok(actual) if actual == requested => Ok(true),
            Ok(actual) => {
                warn!(node = %desc.node, actual, requested, "set to different value");
                Ok(false)
            }
            Err(err @ DeviceError::Rejected { .. }) => {
                warn!(error = %err, "int write rejected");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn apply_bool(
        &self,
        desc: &SettingDescriptor,
        value: &ParamValue,
    ) -> Result<bool, DeviceError> {
        let Some(requested) = value.as_flag() else {
            warn!(name = %desc.name, got = value.type_name(), "bad non-bool value type");
            return Ok(false);
        };
        info!(node = %desc.node, value = requested, "setting bool");
        match self.device.set_bool(&desc.node, requested) {
            Ok(actual) if actual == requested => Ok(true),
            Ok(actual) => {
                warn!(node = %desc.node, actual, requested, "set to different value");
                Ok(false)
            }
            Err(err @ DeviceError::Rejected { .. }) => {
                warn!(error = %err, "bool write rejected");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera::{MockCamera, MockCameraConfig};

    fn applier_with(camera: MockCamera) -> (SettingApplier, Arc<MockCamera>) {
        let camera = Arc::new(camera);
        (SettingApplier::new(camera.clone()), camera)
    }

    fn float_desc() -> SettingDescriptor {
        SettingDescriptor::new("exposure_time", "float", "ExposureTime")
    }

    #[test]
    fn test_float_within_tolerance() {
        // quantum forces the device to land on 102.4 for a request of 100:
        // tolerance 2.5% of 202.4 = 5.06 >= 2.4
        let (applier, _) = applier_with(MockCamera::new(MockCameraConfig {
            float_quantum: Some(102.4),
            ..Default::default()
        }));
        assert!(applier
            .apply(&float_desc(), &ParamValue::Float(100.0))
            .unwrap());
    }

    #[test]
    fn test_float_outside_tolerance() {
        // device lands on 110 for a request of 100: 10 > 5.25
        let (applier, _) = applier_with(MockCamera::new(MockCameraConfig {
            float_quantum: Some(110.0),
            ..Default::default()
        }));
        assert!(!applier
            .apply(&float_desc(), &ParamValue::Float(100.0))
            .unwrap());
    }

    #[test]
    fn test_float_accepts_int_value() {
        let (applier, camera) = applier_with(MockCamera::with_serial("1"));
        assert!(applier.apply(&float_desc(), &ParamValue::Int(250)).unwrap());
        assert_eq!(
            camera.node_value("ExposureTime"),
            Some(ParamValue::Float(250.0))
        );
    }

    #[test]
    fn test_float_rejects_string_value() {
        let (applier, camera) = applier_with(MockCamera::with_serial("1"));
        assert!(!applier
            .apply(&float_desc(), &ParamValue::Str("250".into()))
            .unwrap());
        assert_eq!(camera.write_count("ExposureTime"), 0);
    }

    #[test]
    fn test_int_exact_match_only() {
        let (applier, _) = applier_with(MockCamera::with_serial("1"));
        let desc = SettingDescriptor::new("image_width", "int", "Width");
        assert!(applier.apply(&desc, &ParamValue::Int(640)).unwrap());
        // float input is truncated to the int node
        assert!(applier.apply(&desc, &ParamValue::Float(640.9)).unwrap());
    }

    #[test]
    fn test_bool_accepts_int_flag() {
        let (applier, camera) = applier_with(MockCamera::with_serial("1"));
        let desc = SettingDescriptor::new("chunk_mode", "bool", "ChunkModeActive");
        assert!(applier.apply(&desc, &ParamValue::Int(1)).unwrap());
        assert_eq!(
            camera.node_value("ChunkModeActive"),
            Some(ParamValue::Bool(true))
        );
        assert!(!applier.apply(&desc, &ParamValue::Float(1.0)).unwrap());
    }

    #[test]
    fn test_enum_strips_quotes() {
        let (applier, camera) = applier_with(MockCamera::with_serial("1"));
        let desc = SettingDescriptor::new("exposure_auto", "enum", "ExposureAuto");
        assert!(applier
            .apply(&desc, &ParamValue::Str("\"Continuous\"".into()))
            .unwrap());
        assert_eq!(
            camera.node_value("ExposureAuto"),
            Some(ParamValue::Str("Continuous".into()))
        );
    }

    #[test]
    fn test_unknown_kind_never_touches_device() {
        let (applier, camera) = applier_with(MockCamera::with_serial("1"));
        let desc = SettingDescriptor::new("weird", "double", "Weird");
        assert!(!applier.apply(&desc, &ParamValue::Float(1.0)).unwrap());
        assert_eq!(camera.write_count("Weird"), 0);
    }

    #[test]
    fn test_bool_mismatch_always_fails() {
        let (applier, camera) = applier_with(MockCamera::with_serial("1"));
        camera.pin_node("ChunkModeActive", ParamValue::Bool(false));
        let desc = SettingDescriptor::new("chunk_mode", "bool", "ChunkModeActive");
        assert!(!applier.apply(&desc, &ParamValue::Bool(true)).unwrap());
    }

    #[test]
    fn test_int_mismatch_always_fails() {
        let (applier, camera) = applier_with(MockCamera::with_serial("1"));
        camera.pin_node("Width", ParamValue::Int(639));
        let desc = SettingDescriptor::new("image_width", "int", "Width");
        assert!(!applier.apply(&desc, &ParamValue::Int(640)).unwrap());
    }

    #[test]
    fn test_enum_mismatch_fails() {
        let (applier, camera) = applier_with(MockCamera::with_serial("1"));
        camera.pin_node("ExposureAuto", ParamValue::Str("Once".into()));
        let desc = SettingDescriptor::new("exposure_auto", "enum", "ExposureAuto");
        assert!(!applier
            .apply(&desc, &ParamValue::Str("Continuous".into()))
            .unwrap());
    }

    #[test]
    fn test_rejected_write_is_soft_failure() {
        let (applier, camera) = applier_with(MockCamera::with_serial("1"));
        camera.reject_node("ExposureTime");
        assert!(!applier
            .apply(&float_desc(), &ParamValue::Float(100.0))
            .unwrap());
    }

    #[test]
    fn test_fault_propagates() {
        let (applier, camera) = applier_with(MockCamera::with_serial("1"));
        camera.fault_node("ExposureTime");
        assert!(applier
            .apply(&float_desc(), &ParamValue::Float(100.0))
            .is_err());
    }
}
