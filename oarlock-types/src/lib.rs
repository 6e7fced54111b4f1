//! # oarlock-types
//!
//! Protocol vocabulary for CSAFE performance monitors.
//!
//! Every discriminated byte the wire carries gets a typed enum here:
//! workout and interval configuration, monitor state machines, erg
//! machine identification and screen control. No I/O lives in this
//! crate.

pub mod error;
pub mod machine;
pub mod screen;
pub mod workout;

pub use error::{Error, Result};
pub use machine::{ErgMachineType, OperationalState, RowingState, StrokeState};
pub use screen::{ScreenType, WorkoutScreenValue};
pub use workout::{DurationType, IntervalType, WorkoutNumber, WorkoutState, WorkoutType};
