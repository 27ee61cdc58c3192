//! Publisher implementations

mod counting;
mod log;

pub use counting::{CountingImageSink, CountingMetadataSink};
pub use log::{LogImageSink, LogMetadataSink};
