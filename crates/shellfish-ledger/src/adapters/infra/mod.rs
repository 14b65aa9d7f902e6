//! Infrastructure Adapters
//!
//! Implementations of infrastructure traits (Time, Checksum).

mod checksum;
mod time;

pub use checksum::Crc32ChecksumProvider;
pub use time::{FixedTimeSource, SystemTimeSource};
