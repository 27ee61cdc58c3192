//! # Publish
//!
//! Publication side of the bridge: converts dequeued frames into wire
//! messages and fans them out to the host transport.
//!
//! The driver never blocks the acquisition path; it runs entirely on the
//! dedicated publishing thread and skips the pixel copy when nobody is
//! subscribed to the image topic.

mod driver;
pub mod sinks;

pub use driver::PublicationDriver;
