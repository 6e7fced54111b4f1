//! # oarlock
//!
//! Async client for CSAFE rowing, ski and bike ergometer performance
//! monitors.
//!
//! ## Features
//!
//! - Bit-exact CSAFE frame codec with byte stuffing and checksums
//! - Typed command surface over the public and vendor opcode spaces
//! - One-in-flight transaction engine with inter-frame timing
//! - USB HID transport plus a scriptable mock for tests
//!
//! ## Quick Start
//!
//! ```no_run
//! use oarlock::{HidContext, HidTransport, Monitor};
//!
//! #[tokio::main]
//! async fn main() -> oarlock::Result<()> {
//!     let context = HidContext::new()?;
//!     let monitor = Monitor::new(Box::new(HidTransport::pm5(&context)));
//!
//!     monitor.connect().await?;
//!
//!     let snapshot = monitor.snapshot().await?;
//!     println!("{}", snapshot);
//!
//!     monitor.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod metrics;
pub mod snapshot;
pub mod units;
pub mod workout;

// Re-exports
pub use device::{Monitor, Version, WorkTime, DEFAULT_READ_TIMEOUT};
pub use error::{Error, Result};
pub use metrics::{decode_metric, MetricValue, StrokeStats};
pub use snapshot::WorkoutSnapshot;
pub use workout::DateTime;

// Re-export the protocol layers
pub use oarlock_csafe::{CommandResponse, Frame, MachineState, PrevFrameStatus, Response};
pub use oarlock_transport::{HidContext, HidTransport, MockTransport, Transport};
pub use oarlock_types as types;
