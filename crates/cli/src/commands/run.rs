//! The `run` command - bring the bridge up against the mock device

use std::future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bridge::{BridgeConfig, CameraBridge};
use camera::{MockCamera, MockCameraConfig};
use contracts::{CameraInfo, HostCapabilities};
use observability::BridgeMetrics;
use publish::sinks::{LogImageSink, LogMetadataSink};
use publish::PublicationDriver;
use tracing::{debug, info};

use crate::cli::RunArgs;
use crate::error::CliError;

/// Run the bridge until ctrl-c or the configured duration elapses
pub async fn run_bridge(args: &RunArgs) -> Result<()> {
    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }
    let config = BridgeConfig::load_from_path(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    // No vendor driver in this workspace; the mock camera exercises the
    // identical callback and node surface.
    let device = Arc::new(MockCamera::new(MockCameraConfig {
        serial: config.serial.clone(),
        ..Default::default()
    }));

    let image = Arc::new(LogImageSink::new());
    let meta = Arc::new(LogMetadataSink::new());
    let metrics = Arc::new(BridgeMetrics::new());
    let driver = PublicationDriver::new(
        image.clone(),
        meta.clone(),
        CameraInfo {
            frame_id: config.frame_id.clone(),
            ..Default::default()
        },
        config.frame_id.clone(),
        metrics.clone(),
    );

    let bridge = CameraBridge::new(config, device, driver, metrics)?;

    for decl in bridge.declarations(&HostCapabilities::default()) {
        debug!(name = %decl.name, kind = ?decl.kind, "declared parameter");
    }

    bridge
        .start()
        .map_err(|e| CliError::startup(e.to_string()))?;

    let mut status = tokio::time::interval(bridge.status_interval());
    status.tick().await; // first tick fires immediately

    let deadline = async {
        if args.duration > 0 {
            tokio::time::sleep(Duration::from_secs(args.duration)).await;
        } else {
            future::pending::<()>().await;
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = status.tick() => {
                bridge.status_report();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
            _ = &mut deadline => {
                info!(seconds = args.duration, "run duration elapsed");
                break;
            }
        }
    }

    bridge.stop();
    info!(
        images = image.published(),
        metadata = meta.published(),
        "bridge stopped"
    );

    Ok(())
}
