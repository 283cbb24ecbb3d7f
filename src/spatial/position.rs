//! Spatial value types shared by the enclosure and the flight controller

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pose in the enclosure frame: coordinates in centimeters, heading in
/// radians measured from the x-axis.
///
/// Headings accumulate without wraparound; two headings that differ by a
/// multiple of 2π are geometrically equivalent but numerically distinct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub heading: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64, heading: f64) -> Self {
        Self { x, y, z, heading }
    }

    pub fn set_coord(&mut self, x: f64, y: f64, z: f64, heading: f64) {
        self.x = x;
        self.y = y;
        self.z = z;
        self.heading = heading;
    }

    /// Euclidean 3D distance to another position (heading ignored)
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Heading converted to degrees
    pub fn heading_degrees(&self) -> f64 {
        self.heading.to_degrees()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={} y={} z={} heading={}",
            self.x, self.y, self.z, self.heading
        )
    }
}

/// A 2D segment in the floor plane, used for wall edges and flight paths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2D {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment2D {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Segment between the floor projections of two positions
    pub fn between(p1: &Position, p2: &Position) -> Self {
        Self::new(p1.x, p1.y, p2.x, p2.y)
    }

    pub fn to_line(&self) -> geo_types::Line<f64> {
        geo_types::Line::new(
            geo_types::Coord { x: self.x1, y: self.y1 },
            geo_types::Coord { x: self.x2, y: self.y2 },
        )
    }
}

impl fmt::Display for Segment2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x1={} y1={} x2={} y2={}",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_3d() {
        let a = Position::new(0.0, 0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 12.0, 1.5);
        assert!((a.distance(&b) - 13.0).abs() < 1e-9);
        assert!((b.distance(&a) - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_coord_overwrites_all_fields() {
        let mut p = Position::default();
        p.set_coord(10.0, 20.0, 30.0, 0.5);
        assert_eq!(p, Position::new(10.0, 20.0, 30.0, 0.5));
    }

    #[test]
    fn test_heading_degrees() {
        let p = Position::new(0.0, 0.0, 0.0, std::f64::consts::PI);
        assert!((p.heading_degrees() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_between_positions_ignores_z() {
        let a = Position::new(1.0, 2.0, 80.0, 0.0);
        let b = Position::new(3.0, 4.0, 130.0, 0.0);
        let s = Segment2D::between(&a, &b);
        assert_eq!(s, Segment2D::new(1.0, 2.0, 3.0, 4.0));
    }
}
