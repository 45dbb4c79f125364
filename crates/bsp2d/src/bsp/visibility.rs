//! Line-of-sight queries against a built tree.

use nalgebra::Point2;

use crate::PlaneSide;

use super::node::{NodeIndex, SpaceType, Split};
use super::tree::BspTree;

/// Result of a line-of-sight query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sight {
    /// `true` if the whole segment lies in free space.
    pub visible: bool,
    /// How far along the segment sight reaches: the segment end when
    /// visible, otherwise the point where the segment first enters solid
    /// space (the start itself if it begins inside a solid).
    pub furthest: Point2<f32>,
}

impl BspTree {
    /// Tests whether `end` can be seen from `start` without crossing solid space.
    ///
    /// The segment is pushed down the tree. At each splitting line:
    /// - both endpoints on the line: continue in the front child only
    /// - endpoints strictly on opposite sides: split at the intersection,
    ///   test the half containing `start` first, then the other half
    /// - otherwise: continue in the front child if any endpoint is in front,
    ///   else in the back child
    ///
    /// A segment that cannot be intersected reliably (zero length, or
    /// parallel to the line within tolerance) falls through to the last
    /// rule. Queries never fail.
    pub fn can_see(&self, start: Point2<f32>, end: Point2<f32>) -> Sight {
        self.sight_in(NodeIndex::ROOT, start, end)
    }

    /// Returns `true` if the point lies in a solid leaf.
    ///
    /// Points on a splitting line resolve to the front side.
    pub fn is_solid(&self, point: Point2<f32>) -> bool {
        self[self.locate(point)].space() == SpaceType::Solid
    }

    /// Returns the leaf whose region contains `point`.
    ///
    /// Points on a splitting line resolve to the front side.
    pub fn locate(&self, point: Point2<f32>) -> NodeIndex {
        let mut index = NodeIndex::ROOT;
        while let Some(split) = self[index].split() {
            index = match split.plane().classify_point(point) {
                PlaneSide::Behind => split.back(),
                PlaneSide::InFront | PlaneSide::OnLine => split.front(),
            };
        }
        index
    }

    fn sight_in(&self, index: NodeIndex, start: Point2<f32>, end: Point2<f32>) -> Sight {
        let node = &self[index];
        let Some(split) = node.split() else {
            return match node.space() {
                SpaceType::Free => Sight {
                    visible: true,
                    furthest: end,
                },
                SpaceType::Solid | SpaceType::Mixed => Sight {
                    visible: false,
                    furthest: start,
                },
            };
        };

        let plane = split.plane();
        let start_side = plane.classify_point(start);
        let end_side = plane.classify_point(end);

        match (start_side, end_side) {
            (PlaneSide::OnLine, PlaneSide::OnLine) => self.sight_in(split.front(), start, end),
            (PlaneSide::InFront, PlaneSide::Behind) | (PlaneSide::Behind, PlaneSide::InFront) => {
                let Some((_, crossing)) = plane.intersect_segment(start, end) else {
                    return self.sight_dominant(split, start_side, end_side, start, end);
                };
                let (near, far) = if start_side == PlaneSide::InFront {
                    (split.front(), split.back())
                } else {
                    (split.back(), split.front())
                };

                let near_sight = self.sight_in(near, start, crossing);
                if !near_sight.visible {
                    return near_sight;
                }
                self.sight_in(far, crossing, end)
            }
            _ => self.sight_dominant(split, start_side, end_side, start, end),
        }
    }

    /// Sends the whole segment to the front child if any endpoint is in front.
    fn sight_dominant(
        &self,
        split: &Split,
        start_side: PlaneSide,
        end_side: PlaneSide,
        start: Point2<f32>,
        end: Point2<f32>,
    ) -> Sight {
        if start_side == PlaneSide::InFront || end_side == PlaneSide::InFront {
            self.sight_in(split.front(), start, end)
        } else {
            self.sight_in(split.back(), start, end)
        }
    }
}
