//! CameraBridge - lifecycle orchestration
//!
//! Ties the device driver to the publication side: discovery with bounded
//! retry, init, descriptor registration, the publishing thread, parameter
//! and control callbacks, interval status reports, and cooperative
//! shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use camera::wait_for_camera;
use contracts::{
    BatchAck, BridgeError, CameraDevice, FrameCallback, HostCapabilities, ParamDeclaration,
    ParamUpdate,
};
use observability::{record_throughput, BridgeMetrics, ThroughputReport};
use publish::PublicationDriver;
use registry::{ParamRegistry, RegistryError};
use tracing::{debug, error, info, warn};

use crate::applier::SettingApplier;
use crate::config::BridgeConfig;
use crate::control::{ControlState, ControlSync};
use crate::queue::FrameQueue;

/// Wait bound for one consumer wake cycle
const POP_TIMEOUT: Duration = Duration::from_secs(1);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The camera acquisition bridge
pub struct CameraBridge {
    config: BridgeConfig,
    device: Arc<dyn CameraDevice>,
    registry: ParamRegistry,
    applier: SettingApplier,
    control: Mutex<ControlSync>,
    queue: Arc<FrameQueue>,
    driver: Arc<PublicationDriver>,
    metrics: Arc<BridgeMetrics>,
    consumer: Mutex<Option<JoinHandle<()>>>,
    streaming: AtomicBool,
    online: AtomicBool,
    last_status: Mutex<Instant>,
}

impl std::fmt::Debug for CameraBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraBridge")
            .field("config", &self.config)
            .field("streaming", &self.streaming)
            .field("online", &self.online)
            .finish_non_exhaustive()
    }
}

impl CameraBridge {
    /// Create the bridge, loading the parameter map.
    ///
    /// `metrics` must be the instance the publication driver was built
    /// with, so published and dropped counts land in the same report.
    ///
    /// # Errors
    /// An unreadable parameter map aborts construction.
    pub fn new(
        config: BridgeConfig,
        device: Arc<dyn CameraDevice>,
        driver: PublicationDriver,
        metrics: Arc<BridgeMetrics>,
    ) -> Result<Self, BridgeError> {
        let registry = ParamRegistry::load_from_path(&config.parameter_file).map_err(
            |RegistryError::Unreadable { path, source }| BridgeError::RegistryUnreadable {
                path,
                source,
            },
        )?;
        info!(
            settings = registry.len(),
            file = %config.parameter_file.display(),
            "parameter map loaded"
        );

        let queue = Arc::new(FrameQueue::new(config.queue_capacity));

        Ok(Self {
            applier: SettingApplier::new(device.clone()),
            config,
            device,
            registry,
            control: Mutex::new(ControlSync::new()),
            queue,
            driver: Arc::new(driver),
            metrics,
            consumer: Mutex::new(None),
            streaming: AtomicBool::new(false),
            online: AtomicBool::new(false),
            last_status: Mutex::new(Instant::now()),
        })
    }

    /// Bring the camera session up.
    ///
    /// Fatal failures (camera not found, init failure, acquisition start
    /// failure) abort startup and leave no thread running.
    pub fn start(&self) -> Result<(), BridgeError> {
        info!(version = %self.device.library_version(), "using device library");
        self.device
            .set_compute_brightness(self.config.compute_brightness);
        self.device
            .set_acquisition_timeout(self.config.acquisition_timeout_s);

        wait_for_camera(
            self.device.as_ref(),
            &self.config.serial,
            self.config.discovery_attempts,
            self.config.discovery_delay(),
        )?;

        self.device.init(&self.config.serial)?;
        self.online.store(true, Ordering::SeqCst);

        if self.config.dump_node_map {
            info!(node_map = %self.device.node_map(), "dumping node map");
        }

        self.spawn_consumer()?;

        let queue = self.queue.clone();
        let metrics = self.metrics.clone();
        let callback: FrameCallback = Arc::new(move |frame| {
            if !queue.push(frame) {
                metrics.record_dropped();
            }
        });

        if !self.device.start_streaming(callback) {
            error!(serial = %self.config.serial, "failed to start camera");
            self.join_consumer();
            self.device.deinit();
            self.online.store(false, Ordering::SeqCst);
            return Err(BridgeError::StreamingStart {
                serial: self.config.serial.clone(),
            });
        }
        self.streaming.store(true, Ordering::SeqCst);
        info!(pixel_format = ?self.device.pixel_format(), "camera streaming");

        *lock(&self.last_status) = Instant::now();
        Ok(())
    }

    /// Tear the session down. Safe to call more than once.
    ///
    /// Queued-but-unpublished frames are discarded.
    pub fn stop(&self) {
        if self.streaming.swap(false, Ordering::SeqCst) {
            self.device.stop_streaming();
        }
        if self.online.swap(false, Ordering::SeqCst) {
            self.device.deinit();
        }
        self.join_consumer();
    }

    fn spawn_consumer(&self) -> Result<(), BridgeError> {
        let queue = self.queue.clone();
        let driver = self.driver.clone();
        let handle = std::thread::Builder::new()
            .name("frame-publisher".to_string())
            .spawn(move || {
                debug!("publishing thread started");
                while queue.is_running() {
                    if let Some(frame) = queue.pop_latest(POP_TIMEOUT) {
                        driver.publish(&frame);
                    }
                }
                debug!("publishing thread stopped");
            })?;
        *lock(&self.consumer) = Some(handle);
        Ok(())
    }

    fn join_consumer(&self) {
        self.queue.shutdown();
        if let Some(handle) = lock(&self.consumer).take() {
            if handle.join().is_err() {
                error!("publishing thread panicked");
            }
        }
    }

    /// Host-facing declarations for every mapped setting, in map-file order
    pub fn declarations(&self, caps: &HostCapabilities) -> Vec<ParamDeclaration> {
        self.registry
            .descriptors()
            .map(|desc| desc.declaration(caps))
            .collect()
    }

    /// Handle a parameter change batch from the host.
    ///
    /// Unknown names are ignored, device faults are caught per setting, and
    /// the batch is always acknowledged; a bad field must never reject its
    /// neighbors.
    pub fn on_parameters_changed(&self, updates: &[ParamUpdate]) -> BatchAck {
        for update in updates {
            let Some(desc) = self.registry.get(&update.name) else {
                continue;
            };
            if !self.online.load(Ordering::SeqCst) {
                warn!(param = %update.name, "got parameter update while device is not ready");
                continue;
            }
            match self.applier.apply(desc, &update.value) {
                Ok(_) => {}
                Err(err) => warn!(param = %update.name, error = %err, "parameter update failed"),
            }
        }
        BatchAck::accepted()
    }

    /// Handle a control command (exposure/gain)
    pub fn on_control(&self, cmd: &contracts::CameraControl) {
        lock(&self.control).on_control(&self.applier, &self.registry, cmd);
    }

    /// Compute, log and export the interval throughput report.
    ///
    /// Returns `None` with a warning when the device is not online; the
    /// counters are reset atomically with the read otherwise.
    pub fn status_report(&self) -> Option<ThroughputReport> {
        if !self.online.load(Ordering::SeqCst) {
            warn!(serial = %self.config.serial, "camera is not online");
            return None;
        }

        let elapsed = {
            let mut last = lock(&self.last_status);
            let elapsed = last.elapsed();
            *last = Instant::now();
            elapsed
        };

        let report = ThroughputReport::compute(
            self.metrics.take(),
            self.device.receive_frame_rate(),
            elapsed,
        );
        info!("{report}");
        record_throughput(&report);
        Some(report)
    }

    /// Configured status report interval
    pub fn status_interval(&self) -> Duration {
        self.config.status_interval()
    }

    /// Shared counters
    pub fn metrics(&self) -> &Arc<BridgeMetrics> {
        &self.metrics
    }

    /// Loaded parameter registry
    pub fn registry(&self) -> &ParamRegistry {
        &self.registry
    }

    /// Last applied control values
    pub fn control_state(&self) -> ControlState {
        lock(&self.control).state()
    }

    /// Whether acquisition is currently running
    pub fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }
}

impl Drop for CameraBridge {
    fn drop(&mut self) {
        self.stop();
    }
}
