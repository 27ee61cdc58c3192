//! # Integration Tests
//!
//! End-to-end tests for the acquisition bridge, run entirely against the
//! mock device:
//! - startup/discovery behavior
//! - full frame flow from device callback to publishers
//! - configuration and control surfaces through the public bridge API

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // sanity check that the contracts crate links
        let _ = contracts::PixelFormat::Mono8;
        let _ = contracts::CameraControl::unset();
    }

    #[test]
    fn test_registry_snapshot() {
        let registry = registry::ParamRegistry::load_from_str(
            "exposure_time float ExposureTime\ngain float Gain\n",
        );
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("gain").unwrap().node, "Gain");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;

    use bridge::{BridgeConfig, CameraBridge};
    use camera::{MockCamera, MockCameraConfig};
    use contracts::{
        BridgeError, CameraControl, CameraInfo, ParamUpdate, ParamValue, PixelFormat,
    };
    use observability::BridgeMetrics;
    use publish::sinks::{CountingImageSink, CountingMetadataSink};
    use publish::PublicationDriver;

    const MAP: &str = "\
# device settings exposed to the host
exposure_auto enum ExposureAuto
exposure_time float ExposureTime
gain float Gain
chunk_mode_active bool ChunkModeActive
";

    struct TestRig {
        bridge: CameraBridge,
        camera: Arc<MockCamera>,
        image: Arc<CountingImageSink>,
        meta: Arc<CountingMetadataSink>,
        _map: tempfile::NamedTempFile,
    }

    fn init_test_logging() {
        // only the first test wins the subscriber; later calls are no-ops
        let _ = observability::init_with_config(observability::ObservabilityConfig {
            log_format: observability::LogFormat::Compact,
            metrics_port: None,
            default_log_level: "warn".to_string(),
        });
    }

    fn build_rig(camera_config: MockCameraConfig, image_subs: usize, meta_subs: usize) -> TestRig {
        init_test_logging();
        let mut map = tempfile::NamedTempFile::new().unwrap();
        map.write_all(MAP.as_bytes()).unwrap();

        let mut config = BridgeConfig::new(camera_config.serial.clone(), map.path());
        config.discovery_delay_ms = 0;

        let camera = Arc::new(MockCamera::new(camera_config));
        let image = Arc::new(CountingImageSink::with_subscribers(image_subs));
        let meta = Arc::new(CountingMetadataSink::with_subscribers(meta_subs));
        let metrics = Arc::new(BridgeMetrics::new());
        let driver = PublicationDriver::new(
            image.clone(),
            meta.clone(),
            CameraInfo::default(),
            config.frame_id.clone(),
            metrics.clone(),
        );
        let bridge = CameraBridge::new(config, camera.clone(), driver, metrics).unwrap();

        TestRig {
            bridge,
            camera,
            image,
            meta,
            _map: map,
        }
    }

    fn fast_camera(serial: &str) -> MockCameraConfig {
        MockCameraConfig {
            serial: serial.to_string(),
            frequency_hz: 200.0,
            width: 16,
            height: 16,
            pixel_format: PixelFormat::BayerRg8,
            ..Default::default()
        }
    }

    /// End-to-end: MockCamera -> FrameQueue -> PublicationDriver -> sinks
    #[tokio::test]
    async fn test_e2e_frame_flow() {
        let rig = build_rig(fast_camera("21543121"), 1, 1);

        rig.bridge.start().unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        rig.bridge.stop();

        assert!(rig.image.published() > 0);
        assert!(rig.meta.published() > 0);

        let image = rig.image.last().unwrap();
        assert_eq!(image.encoding, "bayer_rggb8");
        assert_eq!(image.width, 16);
        assert_eq!(image.data.len(), 16 * 16);

        let meta = rig.meta.last().unwrap();
        assert_eq!(meta.exposure_time_us, 10_000);
    }

    #[test]
    fn test_e2e_discovery_succeeds_on_fifth_attempt() {
        let mut camera_config = fast_camera("87000000");
        camera_config.appear_after_refreshes = 5;
        let rig = build_rig(camera_config, 1, 1);

        rig.bridge.start().unwrap();
        assert!(rig.bridge.is_streaming());
        rig.bridge.stop();
    }

    #[test]
    fn test_e2e_discovery_gives_up_cleanly() {
        let mut camera_config = fast_camera("87000000");
        camera_config.appear_after_refreshes = 6;
        let rig = build_rig(camera_config, 1, 1);

        let err = rig.bridge.start().unwrap_err();
        assert!(matches!(
            err,
            BridgeError::CameraNotFound { attempts: 5, .. }
        ));
        assert!(!rig.bridge.is_streaming());
        // stop on a never-started bridge must be a no-op
        rig.bridge.stop();
    }

    #[tokio::test]
    async fn test_e2e_metadata_without_image_subscriber() {
        let rig = build_rig(fast_camera("55"), 0, 1);

        rig.bridge.start().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let report = rig.bridge.status_report().unwrap();
        rig.bridge.stop();

        assert_eq!(rig.image.published(), 0);
        assert!(rig.meta.published() > 0);
        // nothing published -> drop rate reports 0, not NaN
        assert_eq!(report.published, 0);
        assert_eq!(report.drop_rate, 0.0);
    }

    #[tokio::test]
    async fn test_e2e_configuration_and_control_surface() {
        let rig = build_rig(fast_camera("77"), 1, 1);
        rig.bridge.start().unwrap();

        // parameter batch: unknown name ignored, bad value isolated, rest applied
        let ack = rig.bridge.on_parameters_changed(&[
            ParamUpdate::new("not_in_map", ParamValue::Int(1)),
            ParamUpdate::new("exposure_auto", ParamValue::Str("Off".into())),
            ParamUpdate::new("gain", ParamValue::Str("oops".into())),
            ParamUpdate::new("chunk_mode_active", ParamValue::Int(1)),
        ]);
        assert!(ack.accepted);
        assert_eq!(
            rig.camera.node_value("ExposureAuto"),
            Some(ParamValue::Str("Off".into()))
        );
        assert_eq!(
            rig.camera.node_value("ChunkModeActive"),
            Some(ParamValue::Bool(true))
        );
        assert_eq!(rig.camera.write_count("Gain"), 0);

        // control: second identical command is a no-op
        let cmd = CameraControl {
            exposure_time_us: 7_500,
            gain: 2.0,
        };
        rig.bridge.on_control(&cmd);
        rig.bridge.on_control(&cmd);
        assert_eq!(rig.camera.write_count("ExposureTime"), 1);
        assert_eq!(rig.camera.write_count("Gain"), 1);
        assert_eq!(rig.bridge.control_state().exposure_time_us, 7_500);

        tokio::time::sleep(Duration::from_millis(80)).await;
        rig.bridge.stop();
        assert!(rig.image.published() > 0);
    }

    #[tokio::test]
    async fn test_e2e_status_report_after_traffic() {
        let rig = build_rig(fast_camera("88"), 1, 1);
        rig.bridge.start().unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        let report = rig.bridge.status_report().unwrap();
        rig.bridge.stop();

        assert!(report.published > 0);
        assert!(report.output_rate_hz > 0.0);
        assert!((report.input_rate_hz - 200.0).abs() < f64::EPSILON);
    }
}
