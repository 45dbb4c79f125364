//! Renderable line segments derived from a tree's splitting lines.

use nalgebra::Point2;

use crate::config::DEFAULT_DEBUG_HALF_LENGTH;

use super::node::{BspNode, NodeIndex, SpaceType};
use super::tree::{BspTree, ChildSide};
use super::visitor::FnVisitor;

/// Directions closer to parallel than this do not bound a splitting line.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A line segment visualizing one internal node's splitting line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugSegment {
    pub node: NodeIndex,
    pub start: Point2<f32>,
    pub end: Point2<f32>,
    /// Classification of the node, usable as a colour hint.
    pub space: SpaceType,
}

impl BspTree {
    /// Derives one debug segment per internal node, in pre-order.
    ///
    /// Uses [`DEFAULT_DEBUG_HALF_LENGTH`] for unbounded lines.
    pub fn debug_segments(&self) -> Vec<DebugSegment> {
        self.debug_segments_with_half_length(DEFAULT_DEBUG_HALF_LENGTH)
    }

    /// Derives one debug segment per internal node, in pre-order.
    ///
    /// Each splitting line is clipped to the region of its node, i.e. by the
    /// half-plane of every ancestor on the side the node lies in. Ends that no
    /// ancestor bounds are placed `half_length` away from the splitter's
    /// midpoint (never closer than the splitter's own endpoints).
    ///
    /// Segments are not cached: a rebuilt tree yields fresh segments.
    pub fn debug_segments_with_half_length(&self, half_length: f32) -> Vec<DebugSegment> {
        let mut segments = Vec::with_capacity(self.internal_count());
        let mut visitor = FnVisitor::new(|index: NodeIndex, node: &BspNode| {
            if let Some(segment) = self.debug_segment(index, node, half_length) {
                segments.push(segment);
            }
        });
        self.walk_pre_order(&mut visitor);
        segments
    }

    fn debug_segment(
        &self,
        index: NodeIndex,
        node: &BspNode,
        half_length: f32,
    ) -> Option<DebugSegment> {
        let split = node.split()?;
        let plane = split.plane();
        let origin = split.splitter().midpoint();
        let dir = plane.direction();

        let reach = half_length.max(split.splitter().length() * 0.5);
        let mut t_min = -reach;
        let mut t_max = reach;

        for (ancestor, side) in self.region_constraints(index) {
            // Keep the part of the line where the signed distance to the
            // ancestor has the sign of the node's side.
            let sign = match side {
                ChildSide::Front => 1.0,
                ChildSide::Back => -1.0,
            };
            let distance = sign * ancestor.signed_distance(origin);
            let rate = sign * ancestor.normal().dot(&dir);
            if rate.abs() < PARALLEL_EPSILON {
                continue;
            }
            let bound = -distance / rate;
            if rate > 0.0 {
                t_min = t_min.max(bound);
            } else {
                t_max = t_max.min(bound);
            }
        }

        if t_min > t_max {
            // Numerically inconsistent bounds: fall back to the splitter itself.
            t_min = -split.splitter().length() * 0.5;
            t_max = -t_min;
        }

        Some(DebugSegment {
            node: index,
            start: origin + dir * t_min,
            end: origin + dir * t_max,
            space: node.space(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConvexPolygon, ScoredSplitter};
    use approx::assert_relative_eq;

    fn square_tree() -> BspTree {
        let (min, max) = (Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let square = ConvexPolygon::rectangle(min, max).unwrap();
        let selector = ScoredSplitter::default();
        BspTree::build(&[square], selector).unwrap()
    }

    #[test]
    fn empty_tree_has_no_segments() {
        assert!(BspTree::new().debug_segments().is_empty());
    }

    #[test]
    fn one_segment_per_internal_node() {
        let tree = square_tree();
        let segments = tree.debug_segments();
        assert_eq!(segments.len(), tree.internal_count());
        assert_eq!(segments[0].node, NodeIndex::ROOT);
        assert!(segments.iter().all(|s| !tree[s.node].is_leaf()));
    }

    #[test]
    fn root_segment_uses_fallback_length() {
        let tree = square_tree();
        let root = tree.debug_segments_with_half_length(50.0)[0];
        // Bottom edge midpoint is (5, 0); its line runs along X.
        assert_relative_eq!((root.end - root.start).norm(), 100.0, epsilon = 1e-3);
        assert_relative_eq!(root.start.y, 0.0, epsilon = 1e-5);
        assert_eq!(root.space, SpaceType::Mixed);
    }

    #[test]
    fn deepest_segment_is_clipped_by_ancestors() {
        let tree = square_tree();
        let segments = tree.debug_segments();
        // The last splitter is the left edge, bounded by the bottom and top lines.
        let left = segments.last().unwrap();
        let (low, high) = if left.start.y < left.end.y {
            (left.start, left.end)
        } else {
            (left.end, left.start)
        };
        assert_relative_eq!(low, Point2::new(0.0, 0.0), epsilon = 1e-4);
        assert_relative_eq!(high, Point2::new(0.0, 10.0), epsilon = 1e-4);
        assert_eq!(left.space, SpaceType::Mixed);
    }

    #[test]
    fn segments_are_regenerated_per_tree() {
        let a = square_tree().debug_segments();
        let b = square_tree().debug_segments();
        assert_eq!(a, b);
    }
}
