//! Flight control: the command vocabulary and the drone state machine

pub mod command;
pub mod drone;

pub use command::{CommandKind, CommandOutcome, CommandRecord};
pub use drone::{Drone, DroneState};
