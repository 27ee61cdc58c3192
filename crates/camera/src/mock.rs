//! Mock camera driver
//!
//! Implements the `CameraDevice` trait, generating simulated frames from a
//! background thread. Used for testing and development without vendor
//! hardware; the callback path is identical to the real driver's.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use contracts::{CameraDevice, DeviceError, Frame, FrameCallback, ParamValue, PixelFormat};
use tracing::{debug, trace};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Mock camera configuration
#[derive(Debug, Clone)]
pub struct MockCameraConfig {
    /// Serial number the camera enumerates with
    pub serial: String,

    /// Frame generation frequency (Hz)
    pub frequency_hz: f64,

    /// Image width
    pub width: u32,

    /// Image height
    pub height: u32,

    /// Delivered pixel format
    pub pixel_format: PixelFormat,

    /// Quantization step applied to float node writes, simulating device
    /// rounding (None = exact)
    pub float_quantum: Option<f64>,

    /// Number of device-list refreshes before the camera becomes visible
    /// (simulates slow bus enumeration)
    pub appear_after_refreshes: u32,

    /// Force init to fail
    pub fail_init: bool,
}

impl Default for MockCameraConfig {
    fn default() -> Self {
        Self {
            serial: "00000000".to_string(),
            frequency_hz: 20.0,
            width: 640,
            height: 480,
            pixel_format: PixelFormat::Mono8,
            float_quantum: None,
            appear_after_refreshes: 0,
            fail_init: false,
        }
    }
}

/// Mock camera
///
/// Node writes are stored in-process and read back on verification, so the
/// tolerance path behaves like a real device; `float_quantum` makes float
/// writes land on a grid the way real sensors quantize exposure steps.
pub struct MockCamera {
    config: MockCameraConfig,
    initialized: AtomicBool,
    streaming: Arc<AtomicBool>,
    refreshes: AtomicU32,
    nodes: Mutex<HashMap<String, ParamValue>>,
    pinned_nodes: Mutex<HashMap<String, ParamValue>>,
    write_counts: Mutex<HashMap<String, u64>>,
    rejected_nodes: Mutex<HashSet<String>>,
    faulted_nodes: Mutex<HashSet<String>>,
}

impl MockCamera {
    /// Create a new mock camera
    pub fn new(config: MockCameraConfig) -> Self {
        Self {
            config,
            initialized: AtomicBool::new(false),
            streaming: Arc::new(AtomicBool::new(false)),
            refreshes: AtomicU32::new(0),
            nodes: Mutex::new(HashMap::new()),
            pinned_nodes: Mutex::new(HashMap::new()),
            write_counts: Mutex::new(HashMap::new()),
            rejected_nodes: Mutex::new(HashSet::new()),
            faulted_nodes: Mutex::new(HashSet::new()),
        }
    }

    /// Create a mock camera with default configuration
    pub fn with_serial(serial: impl Into<String>) -> Self {
        Self::new(MockCameraConfig {
            serial: serial.into(),
            ..Default::default()
        })
    }

    /// Make every write to `node` report a non-OK status
    pub fn reject_node(&self, node: impl Into<String>) {
        lock(&self.rejected_nodes).insert(node.into());
    }

    /// Make every write to `node` raise a driver fault
    pub fn fault_node(&self, node: impl Into<String>) {
        lock(&self.faulted_nodes).insert(node.into());
    }

    /// Pin `node` to a fixed value: writes report `value` back no matter
    /// what was requested, like a device clamping a setting
    pub fn pin_node(&self, node: impl Into<String>, value: ParamValue) {
        lock(&self.pinned_nodes).insert(node.into(), value);
    }

    /// Number of writes attempted on `node` (including rejected/faulted)
    pub fn write_count(&self, node: &str) -> u64 {
        lock(&self.write_counts).get(node).copied().unwrap_or(0)
    }

    /// Last value stored on `node`
    pub fn node_value(&self, node: &str) -> Option<ParamValue> {
        lock(&self.nodes).get(node).cloned()
    }

    fn record_write(&self, node: &str) -> Result<(), DeviceError> {
        *lock(&self.write_counts).entry(node.to_string()).or_insert(0) += 1;
        if lock(&self.faulted_nodes).contains(node) {
            return Err(DeviceError::fault(format!("node '{node}' unreachable")));
        }
        if lock(&self.rejected_nodes).contains(node) {
            return Err(DeviceError::rejected(node, "node rejected value"));
        }
        Ok(())
    }

    fn make_frame(config: &MockCameraConfig, seq: u64) -> Arc<Frame> {
        let stride = config.width * config.pixel_format.bytes_per_pixel().max(1) as u32;
        let size = (stride * config.height) as usize;
        Arc::new(Frame {
            width: config.width,
            height: config.height,
            stride,
            pixel_format: config.pixel_format,
            timestamp_ns: now_ns(),
            brightness: ((seq % 64) + 96) as i16,
            exposure_time_us: 10_000,
            max_exposure_time_us: 30_000,
            gain: 0.0,
            data: Bytes::from(vec![128u8; size]),
        })
    }
}

impl CameraDevice for MockCamera {
    fn init(&self, serial: &str) -> Result<(), DeviceError> {
        if self.config.fail_init || serial != self.config.serial {
            return Err(DeviceError::init_failed(serial, "camera unavailable"));
        }
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn deinit(&self) {
        self.stop_streaming();
        self.initialized.store(false, Ordering::SeqCst);
    }

    fn start_streaming(&self, callback: FrameCallback) -> bool {
        if !self.initialized.load(Ordering::SeqCst) {
            return false;
        }
        // Idempotent: if already streaming, don't start again
        if self.streaming.swap(true, Ordering::SeqCst) {
            return false;
        }

        let config = self.config.clone();
        let streaming = self.streaming.clone();
        let interval = Duration::from_secs_f64(1.0 / config.frequency_hz);

        thread::spawn(move || {
            let mut seq: u64 = 0;
            debug!(
                serial = %config.serial,
                frequency_hz = config.frequency_hz,
                "mock camera streaming"
            );

            while streaming.load(Ordering::Relaxed) {
                seq += 1;
                callback(Self::make_frame(&config, seq));
                trace!(serial = %config.serial, seq, "mock frame delivered");
                thread::sleep(interval);
            }

            debug!(serial = %config.serial, "mock camera stopped");
        });

        true
    }

    fn stop_streaming(&self) -> bool {
        self.streaming.swap(false, Ordering::SeqCst)
    }

    fn set_enum(&self, node: &str, value: &str) -> Result<String, DeviceError> {
        self.record_write(node)?;
        let actual = match lock(&self.pinned_nodes).get(node) {
            Some(ParamValue::Str(pinned)) => pinned.clone(),
            _ => value.to_string(),
        };
        lock(&self.nodes).insert(node.to_string(), ParamValue::Str(actual.clone()));
        Ok(actual)
    }

    fn set_float(&self, node: &str, value: f64) -> Result<f64, DeviceError> {
        self.record_write(node)?;
        let actual = match lock(&self.pinned_nodes).get(node) {
            Some(ParamValue::Float(pinned)) => *pinned,
            _ => match self.config.float_quantum {
                Some(q) if q > 0.0 => (value / q).round() * q,
                _ => value,
            },
        };
        lock(&self.nodes).insert(node.to_string(), ParamValue::Float(actual));
        Ok(actual)
    }

    fn set_int(&self, node: &str, value: i64) -> Result<i64, DeviceError> {
        self.record_write(node)?;
        let actual = match lock(&self.pinned_nodes).get(node) {
            Some(ParamValue::Int(pinned)) => *pinned,
            _ => value,
        };
        lock(&self.nodes).insert(node.to_string(), ParamValue::Int(actual));
        Ok(actual)
    }

    fn set_bool(&self, node: &str, value: bool) -> Result<bool, DeviceError> {
        self.record_write(node)?;
        let actual = match lock(&self.pinned_nodes).get(node) {
            Some(ParamValue::Bool(pinned)) => *pinned,
            _ => value,
        };
        lock(&self.nodes).insert(node.to_string(), ParamValue::Bool(actual));
        Ok(actual)
    }

    fn serial_numbers(&self) -> Vec<String> {
        if self.refreshes.load(Ordering::SeqCst) >= self.config.appear_after_refreshes {
            vec![self.config.serial.clone()]
        } else {
            Vec::new()
        }
    }

    fn refresh_device_list(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn receive_frame_rate(&self) -> f64 {
        if self.streaming.load(Ordering::Relaxed) {
            self.config.frequency_hz
        } else {
            0.0
        }
    }

    fn pixel_format(&self) -> PixelFormat {
        self.config.pixel_format
    }

    fn node_map(&self) -> String {
        let nodes = lock(&self.nodes);
        let mut lines: Vec<String> = nodes
            .iter()
            .map(|(name, value)| format!("{name} = {value}"))
            .collect();
        lines.sort();
        lines.join("\n")
    }

    fn library_version(&self) -> String {
        format!("mock-{}", env!("CARGO_PKG_VERSION"))
    }
}
