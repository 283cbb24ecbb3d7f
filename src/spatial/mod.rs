pub mod position;

pub use position::{Position, Segment2D};
