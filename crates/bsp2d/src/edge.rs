//! Directed boundary edges and their classification against splitting lines.

use nalgebra::{Point2, Vector2};

use crate::{BspError, Plane2D, PlaneSide};

/// Classification of an edge relative to a splitting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum EdgeClassification {
    /// Both endpoints are behind the line (or on it)
    Behind,
    /// Both endpoints are in front of the line (or on it), including the coplanar case
    InFront,
    /// One endpoint is strictly in front and the other strictly behind
    Straddling,
}

/// A directed line segment in world space.
///
/// The direction defines the outward side: the line through the edge has its
/// normal pointing to the right of `start -> end`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Edge {
    start: Point2<f32>,
    end: Point2<f32>,
}

impl Edge {
    /// Creates a new edge from `start` to `end`.
    pub fn new(start: Point2<f32>, end: Point2<f32>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> Point2<f32> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point2<f32> {
        self.end
    }

    /// Returns the (unnormalized) direction `end - start`.
    #[inline]
    pub fn direction(&self) -> Vector2<f32> {
        self.end - self.start
    }

    /// Returns the length of the edge.
    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().norm()
    }

    /// Returns the midpoint of the edge.
    #[inline]
    pub fn midpoint(&self) -> Point2<f32> {
        nalgebra::center(&self.start, &self.end)
    }

    /// Returns `true` if the edge has zero length or non-finite coordinates.
    pub fn is_degenerate(&self) -> bool {
        Plane2D::try_from_points(self.start, self.end).is_none()
    }

    /// Returns the splitting line through this edge.
    ///
    /// # Panics
    /// Panics if the edge is degenerate. Use [`Edge::try_plane`] for untrusted input.
    pub fn plane(&self) -> Plane2D {
        Plane2D::from_points(self.start, self.end)
    }

    /// Returns the splitting line through this edge, or `None` if it is degenerate.
    pub fn try_plane(&self) -> Option<Plane2D> {
        Plane2D::try_from_points(self.start, self.end)
    }

    /// Returns the same segment walked in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Classifies this edge relative to a line.
    ///
    /// An endpoint on the line counts as both behind and in front, so:
    /// - `Behind` if both endpoints are behind or on the line
    /// - `InFront` if both endpoints are in front or on the line
    /// - `InFront` if both endpoints lie on the line (coplanar edges attach to the front)
    /// - `Straddling` otherwise
    pub fn classify(&self, plane: &Plane2D) -> EdgeClassification {
        let start = plane.classify_point(self.start);
        let end = plane.classify_point(self.end);

        if start == PlaneSide::OnLine && end == PlaneSide::OnLine {
            EdgeClassification::InFront
        } else if start.is_behind_or_on() && end.is_behind_or_on() {
            EdgeClassification::Behind
        } else if start.is_in_front_or_on() && end.is_in_front_or_on() {
            EdgeClassification::InFront
        } else {
            EdgeClassification::Straddling
        }
    }

    /// Splits a straddling edge into its in-front and behind pieces.
    ///
    /// The intersection is found by casting a ray from the in-front endpoint
    /// towards the behind endpoint. Both pieces keep the original direction
    /// and share the intersection point.
    ///
    /// Returns `(front, back)`.
    ///
    /// # Errors
    /// - [`BspError::NotStraddling`] if the edge does not straddle the line
    /// - [`BspError::NoIntersection`] if the ray test reports no hit, which
    ///   means classification and intersection disagree
    pub fn split(&self, plane: &Plane2D) -> Result<(Edge, Edge), BspError> {
        let start_side = plane.classify_point(self.start);
        let end_side = plane.classify_point(self.end);

        match (start_side, end_side) {
            (PlaneSide::InFront, PlaneSide::Behind) => {
                let point = intersection_from(self.start, self.end, plane)?;
                Ok((Edge::new(self.start, point), Edge::new(point, self.end)))
            }
            (PlaneSide::Behind, PlaneSide::InFront) => {
                let point = intersection_from(self.end, self.start, plane)?;
                Ok((Edge::new(point, self.end), Edge::new(self.start, point)))
            }
            _ => Err(BspError::NotStraddling {
                start: self.start,
                end: self.end,
            }),
        }
    }
}

/// Ray-vs-line intersection anchored at `front`, walking towards `back`.
fn intersection_from(
    front: Point2<f32>,
    back: Point2<f32>,
    plane: &Plane2D,
) -> Result<Point2<f32>, BspError> {
    let dir = back - front;
    match plane.raycast(front, dir) {
        Some(t) if (0.0..=1.0).contains(&t) => Ok(front + dir * t),
        _ => Err(BspError::NoIntersection {
            start: front,
            end: back,
        }),
    }
}
