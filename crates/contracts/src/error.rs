//! Layered error definitions
//!
//! Categorized by source: device / registry / startup

use thiserror::Error;

/// Device driver error
///
/// `Rejected` is a soft per-call status: the write did not take, the bridge
/// logs and moves on. `Fault` mirrors the vendor driver's structured
/// exception and is caught at the nearest call site that can still make
/// progress (per setting, per control field).
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Device reported a non-OK status for a node write
    #[error("setting '{node}' failed: {status}")]
    Rejected { node: String, status: String },

    /// Driver-level failure (the structured device exception)
    #[error("device fault: {message}")]
    Fault { message: String },

    /// Camera initialization failed
    #[error("init failed for camera '{serial}': {message}")]
    InitFailed { serial: String, message: String },
}

impl DeviceError {
    /// Create a soft rejection for a node write
    pub fn rejected(node: impl Into<String>, status: impl Into<String>) -> Self {
        Self::Rejected {
            node: node.into(),
            status: status.into(),
        }
    }

    /// Create a driver fault
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault {
            message: message.into(),
        }
    }

    /// Create an init failure
    pub fn init_failed(serial: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InitFailed {
            serial: serial.into(),
            message: message.into(),
        }
    }
}

/// Fatal bridge startup error
///
/// Everything here aborts startup entirely; recoverable per-operation
/// failures are logged warnings instead and never surface as errors.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Parameter map file could not be read
    #[error("cannot read parameter map '{path}': {source}")]
    RegistryUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Camera was not found within the discovery retry budget
    #[error("camera '{serial}' not found after {attempts} attempts")]
    CameraNotFound { serial: String, attempts: u32 },

    /// Acquisition could not be started
    #[error("failed to start acquisition on camera '{serial}'")]
    StreamingStart { serial: String },

    /// Run configuration error
    #[error("config error: {message}")]
    Config { message: String },

    /// Wrapped device error
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
