//! Splitting line representation and point classification.

use nalgebra::{Point2, Vector2};

/// Tolerance for point classification.
/// Points within this distance of a line are considered "on" the line.
///
/// This is the only tolerance used for side tests anywhere in the crate.
pub const PLANE_EPSILON: f32 = 1e-3;

/// Denominators smaller than this are treated as parallel in intersection solves.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Which side of a splitting line a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum PlaneSide {
    /// Point is behind the line (negative side of normal)
    Behind,
    /// Point is in front of the line (positive side of normal)
    InFront,
    /// Point lies on the line (within epsilon tolerance)
    OnLine,
}

impl PlaneSide {
    /// Returns `true` if the point may be considered behind the line.
    /// On-line points are compatible with both sides.
    #[inline]
    pub fn is_behind_or_on(self) -> bool {
        matches!(self, PlaneSide::Behind | PlaneSide::OnLine)
    }

    /// Returns `true` if the point may be considered in front of the line.
    #[inline]
    pub fn is_in_front_or_on(self) -> bool {
        matches!(self, PlaneSide::InFront | PlaneSide::OnLine)
    }
}

/// An oriented line in 2D space, represented as `normal · point = offset`.
///
/// In BSP terminology this is the "plane" of a node: it splits the plane into
/// an in-front half (the side the normal points to) and a behind half.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Plane2D {
    normal: Vector2<f32>,
    offset: f32,
}

impl Plane2D {
    /// Creates a new line from a normal vector and offset.
    /// The normal will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn new(normal: Vector2<f32>, offset: f32) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "Plane normal cannot be zero");
        Self {
            normal: normal / norm,
            offset: offset / norm,
        }
    }

    /// Creates the splitting line through two points.
    ///
    /// The normal is the direction `end - start` rotated clockwise by 90°,
    /// so for a counter-clockwise polygon boundary it points outward and the
    /// polygon interior lies behind every edge line.
    ///
    /// # Panics
    /// Panics if the points coincide.
    pub fn from_points(start: Point2<f32>, end: Point2<f32>) -> Self {
        Self::try_from_points(start, end)
            .expect("Plane endpoints cannot coincide")
    }

    /// Fallible variant of [`Plane2D::from_points`].
    ///
    /// Returns `None` when the points coincide or are not finite.
    pub fn try_from_points(start: Point2<f32>, end: Point2<f32>) -> Option<Self> {
        let dir = end - start;
        let norm = dir.norm();
        if !norm.is_finite() || norm <= f32::EPSILON {
            return None;
        }
        let normal = Vector2::new(dir.y, -dir.x) / norm;
        Some(Self {
            normal,
            offset: normal.dot(&start.coords),
        })
    }

    /// Returns the unit normal vector of the line.
    #[inline]
    pub fn normal(&self) -> Vector2<f32> {
        self.normal
    }

    /// Returns the signed distance from the origin to the line along the normal.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Returns a unit vector along the line (the normal rotated counter-clockwise).
    #[inline]
    pub fn direction(&self) -> Vector2<f32> {
        Vector2::new(-self.normal.y, self.normal.x)
    }

    /// Returns the point of the line closest to the origin.
    #[inline]
    pub fn point_on_plane(&self) -> Point2<f32> {
        Point2::from(self.normal * self.offset)
    }

    /// Computes the signed distance from a point to the line.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind
    /// - Zero: point is on the line
    #[inline]
    pub fn signed_distance(&self, point: Point2<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Classifies which side of the line a point lies on, using [`PLANE_EPSILON`].
    pub fn classify_point(&self, point: Point2<f32>) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > PLANE_EPSILON {
            PlaneSide::InFront
        } else if dist < -PLANE_EPSILON {
            PlaneSide::Behind
        } else {
            PlaneSide::OnLine
        }
    }

    /// Returns a new line with the normal flipped (facing the opposite direction).
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Projects a point onto the line.
    #[inline]
    pub fn project_point(&self, point: Point2<f32>) -> Point2<f32> {
        point - self.normal * self.signed_distance(point)
    }

    /// Casts a ray from `origin` along `dir` against the line.
    ///
    /// Returns the ray parameter `t` such that `origin + dir * t` lies on the
    /// line, or `None` if the ray is (nearly) parallel to it.
    pub fn raycast(&self, origin: Point2<f32>, dir: Vector2<f32>) -> Option<f32> {
        let denom = self.normal.dot(&dir);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (self.offset - self.normal.dot(&origin.coords)) / denom;
        t.is_finite().then_some(t)
    }

    /// Computes the intersection of a line segment with the line.
    ///
    /// Returns `Some((t, point))` where:
    /// - `t` is the interpolation parameter (0.0 = start, 1.0 = end)
    /// - `point` is the intersection point
    ///
    /// Returns `None` if the segment is degenerate, parallel to the line or
    /// doesn't reach it.
    pub fn intersect_segment(
        &self,
        start: Point2<f32>,
        end: Point2<f32>,
    ) -> Option<(f32, Point2<f32>)> {
        let direction = end - start;
        let t = self.raycast(start, direction)?;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }
        Some((t, start + direction * t))
    }

    /// Intersects this line with another one.
    ///
    /// Returns `None` for (nearly) parallel lines.
    pub fn intersect_line(&self, other: &Plane2D) -> Option<Point2<f32>> {
        let det = self.normal.x * other.normal.y - self.normal.y * other.normal.x;
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }
        let x = (self.offset * other.normal.y - self.normal.y * other.offset) / det;
        let y = (self.normal.x * other.offset - self.offset * other.normal.x) / det;
        Some(Point2::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x_axis() -> Plane2D {
        // Edge walking along +X has its normal pointing to -Y.
        Plane2D::from_points(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0))
    }

    #[test]
    fn normal_is_clockwise_perpendicular() {
        let plane = x_axis();
        assert_relative_eq!(plane.normal(), Vector2::new(0.0, -1.0));
        assert_relative_eq!(plane.offset(), 0.0);
    }

    #[test]
    fn ccw_square_interior_is_behind() {
        let corners = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        let center = Point2::new(5.0, 5.0);
        for i in 0..4 {
            let plane = Plane2D::from_points(corners[i], corners[(i + 1) % 4]);
            assert_eq!(plane.classify_point(center), PlaneSide::Behind);
        }
    }

    #[test]
    fn classify_point_epsilon_band() {
        let plane = x_axis();
        let side = |y: f32| plane.classify_point(Point2::new(3.0, y));
        assert_eq!(side(0.0), PlaneSide::OnLine);
        assert_eq!(side(0.0009), PlaneSide::OnLine);
        assert_eq!(side(-0.0009), PlaneSide::OnLine);
        assert_eq!(side(-0.01), PlaneSide::InFront);
        assert_eq!(side(0.01), PlaneSide::Behind);
    }

    #[test]
    fn flipped_swaps_sides() {
        let plane = Plane2D::from_points(Point2::new(1.0, 2.0), Point2::new(4.0, 7.0));
        let flipped = plane.flipped();
        for p in [
            Point2::new(0.0, 0.0),
            Point2::new(5.0, -3.0),
            Point2::new(-2.0, 9.0),
            Point2::new(2.5, 4.5),
        ] {
            let side = plane.classify_point(p);
            let other = flipped.classify_point(p);
            match side {
                PlaneSide::Behind => assert_eq!(other, PlaneSide::InFront),
                PlaneSide::InFront => assert_eq!(other, PlaneSide::Behind),
                PlaneSide::OnLine => assert_eq!(other, PlaneSide::OnLine),
            }
        }
    }

    #[test]
    fn try_from_points_rejects_coincident() {
        let p = Point2::new(2.0, 2.0);
        assert!(Plane2D::try_from_points(p, p).is_none());
        let nan = Point2::new(f32::NAN, 0.0);
        assert!(Plane2D::try_from_points(p, nan).is_none());
    }

    #[test]
    fn project_point_lands_on_line() {
        let plane = Plane2D::from_points(Point2::new(0.0, 1.0), Point2::new(1.0, 2.0));
        let projected = plane.project_point(Point2::new(4.0, -2.0));
        assert_eq!(plane.classify_point(projected), PlaneSide::OnLine);
    }

    #[test]
    fn intersect_segment_crossing() {
        let plane = x_axis();
        let (t, point) = plane
            .intersect_segment(Point2::new(2.0, -1.0), Point2::new(2.0, 3.0))
            .unwrap();
        assert_relative_eq!(t, 0.25);
        assert_relative_eq!(point, Point2::new(2.0, 0.0));
    }

    #[test]
    fn intersect_segment_parallel_or_short() {
        let plane = x_axis();
        let above = Point2::new(0.0, 1.0);
        let parallel = plane.intersect_segment(above, Point2::new(5.0, 1.0));
        assert!(parallel.is_none());
        let short = plane.intersect_segment(above, Point2::new(0.0, 2.0));
        assert!(short.is_none());
        let p = Point2::new(1.0, 1.0);
        assert!(plane.intersect_segment(p, p).is_none());
    }

    #[test]
    fn intersect_line_perpendicular() {
        let horizontal = Plane2D::from_points(Point2::new(0.0, 3.0), Point2::new(1.0, 3.0));
        let vertical = Plane2D::from_points(Point2::new(-2.0, 0.0), Point2::new(-2.0, 1.0));
        let point = horizontal.intersect_line(&vertical).unwrap();
        assert_relative_eq!(point, Point2::new(-2.0, 3.0), epsilon = 1e-5);
        assert!(horizontal.intersect_line(&horizontal.flipped()).is_none());
    }
}
