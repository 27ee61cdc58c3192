//! Bridge counters and interval throughput reporting
//!
//! Published/dropped counters are written from two different threads (the
//! publishing loop and the device callback) and read by the status timer;
//! `take()` swaps both to zero so the reset is atomic with the read.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use metrics::{counter, gauge};

/// Shared publish/drop counters
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    published: AtomicU64,
    dropped: AtomicU64,
}

impl BridgeMetrics {
    /// Create new counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully published image
    pub fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
        counter!("cam_bridge_frames_published_total").increment(1);
    }

    /// Record a frame dropped at the handoff queue
    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        counter!("cam_bridge_frames_dropped_total").increment(1);
    }

    /// Current published count (without reset)
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Current dropped count (without reset)
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Read both counters and reset them to zero in one step
    pub fn take(&self) -> CounterSnapshot {
        CounterSnapshot {
            published: self.published.swap(0, Ordering::Relaxed),
            dropped: self.dropped.swap(0, Ordering::Relaxed),
        }
    }
}

/// Counter values for one status interval
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterSnapshot {
    /// Images published during the interval
    pub published: u64,

    /// Frames dropped during the interval
    pub dropped: u64,
}

/// Interval throughput report
#[derive(Debug, Clone, Copy)]
pub struct ThroughputReport {
    /// Device-reported input frame rate (Hz)
    pub input_rate_hz: f64,

    /// Achieved output rate (Hz)
    pub output_rate_hz: f64,

    /// Dropped / published ratio (0 when nothing was published)
    pub drop_rate: f64,

    /// Images published during the interval
    pub published: u64,

    /// Frames dropped during the interval
    pub dropped: u64,
}

impl ThroughputReport {
    /// Compute the report for one interval.
    ///
    /// Division guards: elapsed is clamped to 1 ns, and an interval without
    /// publications reports drop rate 0 rather than NaN.
    pub fn compute(snapshot: CounterSnapshot, input_rate_hz: f64, elapsed: Duration) -> Self {
        let elapsed_ns = (elapsed.as_nanos() as u64).max(1);
        let output_rate_hz = snapshot.published as f64 * 1e9 / elapsed_ns as f64;
        let drop_rate = if snapshot.published > 0 {
            snapshot.dropped as f64 / snapshot.published as f64
        } else {
            0.0
        };

        Self {
            input_rate_hz,
            output_rate_hz,
            drop_rate,
            published: snapshot.published,
            dropped: snapshot.dropped,
        }
    }
}

impl fmt::Display for ThroughputReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame rate in: {:.2} Hz, out: {:.2} Hz, drop: {:.2}%",
            self.input_rate_hz,
            self.output_rate_hz,
            self.drop_rate * 100.0
        )
    }
}

/// Export an interval report through the metrics recorder
pub fn record_throughput(report: &ThroughputReport) {
    gauge!("cam_bridge_input_rate_hz").set(report.input_rate_hz);
    gauge!("cam_bridge_output_rate_hz").set(report.output_rate_hz);
    gauge!("cam_bridge_drop_rate").set(report.drop_rate);
}
