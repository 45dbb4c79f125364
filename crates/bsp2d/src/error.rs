//! Errors raised while building a BSP tree.

use nalgebra::Point2;

/// Errors that abort a BSP build.
///
/// A build either produces a complete tree or one of these; an inconsistent
/// tree is never returned. Visibility queries never fail.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum BspError {
    /// A shape produced an edge with zero length or non-finite coordinates.
    #[error("shape {shape} has a degenerate edge {start:?} -> {end:?}")]
    DegenerateEdge {
        /// Index of the offending shape in the build input.
        shape: usize,
        start: Point2<f32>,
        end: Point2<f32>,
    },

    /// A split was requested for an edge that does not straddle the line.
    #[error("edge {start:?} -> {end:?} does not straddle the line")]
    NotStraddling {
        start: Point2<f32>,
        end: Point2<f32>,
    },

    /// The ray-vs-line test found no intersection for a straddling edge.
    #[error("splitting line misses the ray {start:?} -> {end:?}")]
    NoIntersection {
        start: Point2<f32>,
        end: Point2<f32>,
    },

    /// The splitter selector found no valid candidate in a non-empty edge set.
    #[error("no splitter could be selected among {candidates} edges")]
    NoSplitter { candidates: usize },

    /// A polygon is not a valid counter-clockwise convex polygon.
    #[error("invalid convex polygon: {0}")]
    InvalidPolygon(&'static str),
}
