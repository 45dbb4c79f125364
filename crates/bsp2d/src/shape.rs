//! Convex shapes that feed boundary edges into the BSP builder.

use nalgebra::{Point2, Vector2};
use rand::Rng;

use crate::{BspError, Edge};

/// Smallest angular step, in degrees, between consecutive vertices of a random polygon.
pub const MIN_RANDOM_STEP_DEGREES: f32 = 10.0;
/// Largest angular step, in degrees, between consecutive vertices of a random polygon.
pub const MAX_RANDOM_STEP_DEGREES: f32 = 170.0;

/// Anything that can describe its boundary as world-space edges.
///
/// Edges must be ordered and wound counter-clockwise so that the interior
/// lies behind every edge line. This is the only capability the BSP builder
/// requires from scene geometry.
///
/// Shapes handed to one build must not overlap. Free and solid leaves are
/// told apart only by which side of their last splitter they lie on, so an
/// edge running through another shape's interior can mislabel regions.
pub trait ConvexShape {
    /// Returns the boundary as directed edges in world space.
    fn world_segments(&self) -> Vec<Edge>;
}

impl<T: ConvexShape + ?Sized> ConvexShape for &T {
    fn world_segments(&self) -> Vec<Edge> {
        (**self).world_segments()
    }
}

impl<T: ConvexShape + ?Sized> ConvexShape for Box<T> {
    fn world_segments(&self) -> Vec<Edge> {
        (**self).world_segments()
    }
}

/// A convex polygon in world space, defined by counter-clockwise vertices.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ConvexPolygon {
    points: Vec<Point2<f32>>,
}

impl ConvexPolygon {
    /// Creates a polygon from counter-clockwise vertices, validating it.
    ///
    /// # Errors
    /// Returns [`BspError::InvalidPolygon`] if there are fewer than three
    /// vertices, two consecutive vertices coincide, or the vertices are not
    /// a counter-clockwise convex loop.
    pub fn try_new(points: Vec<Point2<f32>>) -> Result<Self, BspError> {
        let n = points.len();
        if n < 3 {
            return Err(BspError::InvalidPolygon("fewer than three vertices"));
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(BspError::InvalidPolygon("non-finite vertex"));
        }

        let mut twice_area = 0.0;
        for i in 0..n {
            let a = points[i];
            let b = points[(i + 1) % n];
            let c = points[(i + 2) % n];
            if (b - a).norm() <= f32::EPSILON {
                return Err(BspError::InvalidPolygon("repeated consecutive vertex"));
            }
            if cross(b - a, c - b) < -f32::EPSILON {
                return Err(BspError::InvalidPolygon("non-convex or clockwise"));
            }
            twice_area += cross(a.coords, b.coords);
        }
        if twice_area <= 0.0 {
            return Err(BspError::InvalidPolygon("not counter-clockwise"));
        }

        Ok(Self { points })
    }

    /// Creates an axis-aligned rectangle spanning `min` to `max`.
    ///
    /// # Errors
    /// Returns [`BspError::InvalidPolygon`] if the rectangle has no area.
    pub fn rectangle(min: Point2<f32>, max: Point2<f32>) -> Result<Self, BspError> {
        Self::try_new(vec![
            min,
            Point2::new(max.x, min.y),
            max,
            Point2::new(min.x, max.y),
        ])
    }

    /// Generates a random convex polygon inscribed in a circle.
    ///
    /// Vertices are placed counter-clockwise by walking around the circle in
    /// random angular steps between [`MIN_RANDOM_STEP_DEGREES`] and
    /// [`MAX_RANDOM_STEP_DEGREES`]. Since every step is below 180°, the result
    /// is always convex with at least three vertices.
    ///
    /// # Errors
    /// Returns [`BspError::InvalidPolygon`] if `radius` is not a positive
    /// finite number, or if the generated vertices collapse numerically.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        center: Point2<f32>,
        radius: f32,
    ) -> Result<Self, BspError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(BspError::InvalidPolygon("non-positive radius"));
        }

        let mut points = Vec::new();
        let mut degrees: f32 = 0.0;
        // The closing edge must also respect the minimum step.
        while degrees < 360.0 - MIN_RANDOM_STEP_DEGREES {
            let radians = degrees.to_radians();
            points.push(center + Vector2::new(radians.cos(), radians.sin()) * radius);
            degrees += rng.gen_range(MIN_RANDOM_STEP_DEGREES..MAX_RANDOM_STEP_DEGREES);
        }
        Self::try_new(points)
    }

    /// Returns the vertices in counter-clockwise order.
    #[inline]
    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }

    /// Returns the average of the vertices.
    pub fn centroid(&self) -> Point2<f32> {
        let sum: Vector2<f32> = self.points.iter().map(|p| p.coords).sum();
        Point2::from(sum / self.points.len() as f32)
    }

    /// Returns `true` if the point is inside the polygon or on its boundary.
    ///
    /// A polygon with a zero-length edge contains nothing.
    pub fn contains_point(&self, point: Point2<f32>) -> bool {
        self.world_segments().iter().all(|edge| {
            edge.try_plane()
                .is_some_and(|plane| plane.classify_point(point).is_behind_or_on())
        })
    }
}

impl ConvexShape for ConvexPolygon {
    fn world_segments(&self) -> Vec<Edge> {
        let n = self.points.len();
        (0..n)
            .map(|i| Edge::new(self.points[i], self.points[(i + 1) % n]))
            .collect()
    }
}

#[inline]
fn cross(a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    a.x * b.y - a.y * b.x
}
