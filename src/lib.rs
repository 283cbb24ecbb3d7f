//! Aviary - a virtual indoor drone and the walled enclosure it flies in
//!
//! The crate models the command protocol of a consumer-grade drone (locate,
//! take off, land, translate, rotate, ascend/descend) flying inside a closed
//! polygonal enclosure with a ceiling. Each command is validated, checked
//! against the enclosure geometry, and either committed, softly rejected, or
//! turned into a fatal crash - the same semantics a control program would see
//! on the physical aircraft.

pub mod core;
pub mod enclosure;
pub mod flight;
pub mod spatial;

pub use crate::core::config::FlightConfig;
pub use crate::core::error::{CrashSurface, Result, SimError};
pub use crate::enclosure::Enclosure;
pub use crate::flight::{CommandKind, CommandOutcome, CommandRecord, Drone, DroneState};
pub use crate::spatial::{Position, Segment2D};
