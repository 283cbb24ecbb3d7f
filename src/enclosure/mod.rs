//! The walled enclosure the drone flies in
//!
//! An enclosure is a simple closed polygon describing the floor boundary plus
//! a ceiling height. It answers the geometry queries the flight controller
//! needs (containment, wall intersection) and generates valid random
//! positions, e.g. for placing a target.

use crate::core::error::{Result, SimError};
use crate::spatial::{Position, Segment2D};
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{BoundingRect, Intersects};
use geo_types::{Coord, LineString, Point, Polygon, Rect};
use rand::Rng;

/// Ceiling height used when none is supplied (cm)
pub const DEFAULT_HEIGHT: f64 = 250.0;

/// Two bound points closer than this are treated as a single point (cm)
const BOUND_MERGE_DISTANCE: f64 = 0.1;

/// A simple closed polygon with a ceiling, immutable once constructed
#[derive(Debug, Clone)]
pub struct Enclosure {
    boundary: Polygon<f64>,
    bounds: Rect<f64>,
    height: f64,
}

impl Enclosure {
    /// Build an enclosure from its floor contour and ceiling height.
    ///
    /// The contour may be given open or explicitly closed; it is closed
    /// automatically. Fails with `InvalidGeometry` on fewer than 3 distinct
    /// vertices, a self-intersecting ring, or a non-positive height.
    pub fn from_vertices(vertices: &[(f64, f64)], height: f64) -> Result<Self> {
        let mut ring: Vec<Coord<f64>> = vertices
            .iter()
            .map(|&(x, y)| Coord { x, y })
            .collect();
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(SimError::InvalidGeometry(format!(
                "a contour needs at least 3 vertices, got {}",
                ring.len()
            )));
        }
        if is_self_intersecting(&ring) {
            return Err(SimError::InvalidGeometry(
                "the contour edges cross each other".into(),
            ));
        }
        if height <= 0.0 {
            return Err(SimError::InvalidGeometry(format!(
                "the ceiling height must be positive, got {height}"
            )));
        }
        let boundary = Polygon::new(LineString::from(ring), vec![]);
        let bounds = boundary
            .bounding_rect()
            .ok_or_else(|| SimError::InvalidGeometry("degenerate contour".into()))?;
        Ok(Self { boundary, bounds, height })
    }

    /// Ceiling height in cm
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Set the ceiling height; non-positive values are silently ignored
    /// (configuration guard, not an error)
    pub fn set_height(&mut self, height: f64) {
        if height > 0.0 {
            self.height = height;
        }
    }

    /// Bounding extent of the floor polygon along the x-axis
    pub fn extent_x(&self) -> f64 {
        self.bounds.max().x
    }

    /// Bounding extent of the floor polygon along the y-axis
    pub fn extent_y(&self) -> f64 {
        self.bounds.max().y
    }

    /// True iff (x, y) lies inside the floor polygon, boundary included
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.boundary.intersects(&Point::new(x, y))
    }

    /// True iff the 2D segment p1-p2 crosses the polygon boundary (the wall
    /// ring itself, not the interior)
    pub fn wall_intersects(&self, p1: &Position, p2: &Position) -> bool {
        let path = Segment2D::between(p1, p2).to_line();
        path.intersects(self.boundary.exterior())
    }

    /// Intersection of the 2D segment p1-p2 with the polygon boundary, if
    /// any, with z taken from `p1`.
    ///
    /// When the segment crosses several boundary edges the returned point is
    /// the hit on the first edge in ring order (for a collinear overlap, the
    /// start of the overlap). The choice of which true intersection is
    /// reported is implementation-defined; callers may only rely on the
    /// point lying on the boundary.
    pub fn first_wall_intersection(&self, p1: &Position, p2: &Position) -> Option<Position> {
        let path = Segment2D::between(p1, p2).to_line();
        for edge in self.boundary.exterior().lines() {
            match line_intersection(path, edge) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    return Some(Position::new(intersection.x, intersection.y, p1.z, 0.0));
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    return Some(Position::new(
                        intersection.start.x,
                        intersection.start.y,
                        p1.z,
                        0.0,
                    ));
                }
                None => {}
            }
        }
        None
    }

    /// Draw a random position inside the enclosure.
    ///
    /// - no bounds: rejection-sampled uniformly over the floor polygon, with
    ///   a uniform altitude in [0, height];
    /// - one bound (or two bounds within 0.1 cm of each other): the point is
    ///   validated and returned verbatim;
    /// - two distinct bounds: both corner points are validated, then each
    ///   coordinate is drawn uniformly between them. The sampled point itself
    ///   is *not* re-checked against the polygon, so a box spanning a
    ///   non-convex corner can yield positions outside the floor contour.
    pub fn random_position<R: Rng + ?Sized>(
        &self,
        bound1: Option<&Position>,
        bound2: Option<&Position>,
        rng: &mut R,
    ) -> Result<Position> {
        match (bound1, bound2) {
            (None, None) => Ok(self.sample_floor(rng)),
            (Some(p1), Some(p2)) if p1.distance(p2) < BOUND_MERGE_DISTANCE => {
                self.validated_point(p1)
            }
            (Some(p), None) | (None, Some(p)) => self.validated_point(p),
            (Some(p1), Some(p2)) => {
                self.check_corner(p1, "first")?;
                self.check_corner(p2, "second")?;
                Ok(Position::new(
                    sample_between(rng, p1.x, p2.x),
                    sample_between(rng, p1.y, p2.y),
                    sample_between(rng, p1.z, p2.z),
                    0.0,
                ))
            }
        }
    }

    fn sample_floor<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let min = self.bounds.min();
        let max = self.bounds.max();
        loop {
            let x = rng.gen_range(min.x..=max.x);
            let y = rng.gen_range(min.y..=max.y);
            if self.contains(x, y) {
                return Position::new(x, y, rng.gen_range(0.0..=self.height), 0.0);
            }
        }
    }

    fn validated_point(&self, p: &Position) -> Result<Position> {
        if self.contains(p.x, p.y) && p.z < self.height {
            Ok(*p)
        } else {
            Err(SimError::OutOfBounds(
                "the given point is not inside the enclosure".into(),
            ))
        }
    }

    fn check_corner(&self, p: &Position, which: &str) -> Result<()> {
        if !self.contains(p.x, p.y) || p.z > self.height || p.z < 0.0 {
            return Err(SimError::OutOfBounds(format!(
                "the {which} point is not inside the enclosure"
            )));
        }
        Ok(())
    }

    /// Wall edges in the floor plane, in ring order (viewer consumption)
    pub fn walls_2d(&self) -> Vec<Segment2D> {
        self.boundary
            .exterior()
            .lines()
            .map(|l| Segment2D::new(l.start.x, l.start.y, l.end.x, l.end.y))
            .collect()
    }

    /// The closed vertex ring lifted to the given height, in original
    /// winding order (viewer consumption)
    pub fn wall_vertices(&self, at_height: f64) -> Vec<[f64; 3]> {
        self.boundary
            .exterior()
            .coords()
            .map(|c| [c.x, c.y, at_height])
            .collect()
    }
}

/// Check whether any two non-adjacent ring edges properly cross
fn is_self_intersecting(ring: &[Coord<f64>]) -> bool {
    let n = ring.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let a1 = ring[i];
        let a2 = ring[(i + 1) % n];
        for j in (i + 2)..n {
            // skip the edge adjacent on the wrap-around side
            if j == (i + n - 1) % n {
                continue;
            }
            let b1 = ring[j];
            let b2 = ring[(j + 1) % n];
            if segments_cross(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

/// Proper crossing test (touching endpoints do not count)
fn segments_cross(a1: Coord<f64>, a2: Coord<f64>, b1: Coord<f64>, b2: Coord<f64>) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

fn orientation(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn sample_between<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    rng.gen_range(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle() -> Enclosure {
        Enclosure::from_vertices(
            &[(0.0, 0.0), (500.0, 0.0), (500.0, 1000.0), (0.0, 1000.0)],
            300.0,
        )
        .unwrap()
    }

    #[test]
    fn test_closed_and_open_contours_are_equivalent() {
        let open = rectangle();
        let closed = Enclosure::from_vertices(
            &[
                (0.0, 0.0),
                (500.0, 0.0),
                (500.0, 1000.0),
                (0.0, 1000.0),
                (0.0, 0.0),
            ],
            300.0,
        )
        .unwrap();
        assert_eq!(open.walls_2d(), closed.walls_2d());
    }

    #[test]
    fn test_too_few_vertices_rejected() {
        let err = Enclosure::from_vertices(&[(0.0, 0.0), (1.0, 1.0)], 250.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidGeometry(_)));
    }

    #[test]
    fn test_bowtie_contour_rejected() {
        let err = Enclosure::from_vertices(
            &[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)],
            250.0,
        )
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidGeometry(_)));
    }

    #[test]
    fn test_non_positive_height_rejected_at_construction() {
        let err =
            Enclosure::from_vertices(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], 0.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidGeometry(_)));
    }

    #[test]
    fn test_set_height_ignores_non_positive_values() {
        let mut room = rectangle();
        room.set_height(-5.0);
        assert_eq!(room.height(), 300.0);
        room.set_height(0.0);
        assert_eq!(room.height(), 300.0);
        room.set_height(400.0);
        assert_eq!(room.height(), 400.0);
    }

    #[test]
    fn test_extents_are_upper_bounds() {
        let room = rectangle();
        assert_eq!(room.extent_x(), 500.0);
        assert_eq!(room.extent_y(), 1000.0);
    }

    #[test]
    fn test_contains_includes_boundary() {
        let room = rectangle();
        assert!(room.contains(250.0, 500.0));
        assert!(room.contains(0.0, 250.0));
        assert!(room.contains(0.0, 0.0));
        assert!(!room.contains(-1.0, 250.0));
        assert!(!room.contains(250.0, 1000.1));
    }

    #[test]
    fn test_wall_intersects_interior_segment_is_false() {
        let room = rectangle();
        let a = Position::new(250.0, 250.0, 0.0, 0.0);
        let b = Position::new(250.0, 450.0, 0.0, 0.0);
        assert!(!room.wall_intersects(&a, &b));
    }

    #[test]
    fn test_wall_intersects_crossing_segment_is_true() {
        let room = rectangle();
        let a = Position::new(250.0, 250.0, 0.0, 0.0);
        let b = Position::new(250.0, 1200.0, 0.0, 0.0);
        assert!(room.wall_intersects(&a, &b));
    }

    #[test]
    fn test_first_intersection_takes_z_from_first_point() {
        let room = rectangle();
        let a = Position::new(250.0, 250.0, 130.0, 0.0);
        let b = Position::new(250.0, -100.0, 130.0, 0.0);
        let hit = room.first_wall_intersection(&a, &b).unwrap();
        assert!((hit.x - 250.0).abs() < 1e-9);
        assert!(hit.y.abs() < 1e-9);
        assert_eq!(hit.z, 130.0);
    }

    #[test]
    fn test_no_intersection_returns_none() {
        let room = rectangle();
        let a = Position::new(100.0, 100.0, 80.0, 0.0);
        let b = Position::new(400.0, 900.0, 80.0, 0.0);
        assert!(room.first_wall_intersection(&a, &b).is_none());
    }

    #[test]
    fn test_wall_vertices_ring_is_closed_and_lifted() {
        let room = rectangle();
        let ring = room.wall_vertices(300.0);
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert!(ring.iter().all(|v| v[2] == 300.0));
    }

    #[test]
    fn test_walls_2d_edge_count() {
        assert_eq!(rectangle().walls_2d().len(), 4);
    }
}
