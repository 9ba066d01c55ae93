//! Lock-free, time-ordered 64-bit IDs.
//!
//! Each [`SnowflakeId`] packs 41 bits of milliseconds since a chosen epoch,
//! a 10-bit machine ID and a 12-bit per-millisecond sequence, with the sign
//! bit left clear. A [`Generator`] mints them from any number of threads
//! without locks.
//!
//! ```
//! use std::time::{Duration, SystemTime};
//! use shardflake::Generator;
//!
//! let epoch = SystemTime::now() - Duration::from_secs(60);
//! let generator = Generator::new(epoch, 42).unwrap();
//!
//! let id = generator.next_id();
//! let parts = generator.decompose(id);
//! assert_eq!(parts.machine_id, 42);
//! assert_eq!(parts.sequence, 0);
//! ```

mod error;
mod generator;
mod id;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
