use crate::spatial::Position;
use std::fmt;
use thiserror::Error;

/// Which surface of the enclosure the drone hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashSurface {
    Wall,
    Ceiling,
}

impl fmt::Display for CrashSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrashSurface::Wall => write!(f, "a wall"),
            CrashSurface::Ceiling => write!(f, "the ceiling"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SimError {
    /// A supplied point lies outside the enclosure's legal volume
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// Malformed enclosure description (too few vertices, self-intersecting
    /// ring, non-positive height)
    #[error("Invalid enclosure geometry: {0}")]
    InvalidGeometry(String),

    /// Inconsistent flight configuration values
    #[error("Invalid flight configuration: {0}")]
    InvalidConfig(String),

    /// The drone collided with the enclosure. Terminal: the drone is
    /// inoperable afterwards and every further command is rejected.
    #[error("Crash! drone hits {surface} at {impact}")]
    Crashed {
        surface: CrashSurface,
        impact: Position,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
