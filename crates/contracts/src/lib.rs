//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Device capture timestamps are nanoseconds since the UNIX epoch (u64)
//! - Exposure times are microseconds (u32), matching the control message units

mod descriptor;
mod device;
mod error;
mod frame;
mod message;
mod transport;
mod value;

pub use descriptor::*;
pub use device::*;
pub use error::*;
pub use frame::*;
pub use message::*;
pub use transport::*;
pub use value::*;
