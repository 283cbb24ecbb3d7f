pub mod config;
pub mod error;

pub use config::FlightConfig;
pub use error::{CrashSurface, Result, SimError};
