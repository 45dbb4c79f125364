//! BSP tree node implementation.

use std::fmt;

use crate::{Edge, Plane2D};

/// Index of a node in a [`BspTree`](super::BspTree) node arena.
///
/// Indices are assigned in depth-first pre-order, so a child always has a
/// larger index than its parent. The root is always [`NodeIndex::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// The root node of every tree.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Returns the raw arena position.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of space a region (or, for internal nodes, a subtree) covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum SpaceType {
    /// Open, walkable space
    Free,
    /// Inside scene geometry
    Solid,
    /// A subtree containing both free and solid leaves (internal nodes only)
    Mixed,
}

impl SpaceType {
    /// Aggregates the classification of two children into their parent's.
    pub fn combine(front: SpaceType, back: SpaceType) -> SpaceType {
        match (front, back) {
            (SpaceType::Free, SpaceType::Free) => SpaceType::Free,
            (SpaceType::Solid, SpaceType::Solid) => SpaceType::Solid,
            _ => SpaceType::Mixed,
        }
    }
}

/// The splitting data of an internal node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Split {
    /// The splitting line.
    pub(crate) plane: Plane2D,
    /// The boundary edge the line was derived from.
    pub(crate) splitter: Edge,
    /// Subtree on the side the normal points to.
    pub(crate) front: NodeIndex,
    /// Subtree on the other side.
    pub(crate) back: NodeIndex,
}

impl Split {
    #[inline]
    pub fn plane(&self) -> &Plane2D {
        &self.plane
    }

    #[inline]
    pub fn splitter(&self) -> &Edge {
        &self.splitter
    }

    #[inline]
    pub fn front(&self) -> NodeIndex {
        self.front
    }

    #[inline]
    pub fn back(&self) -> NodeIndex {
        self.back
    }
}

/// A node in the BSP tree.
///
/// Internal nodes carry a [`Split`] with both children; a leaf has none, so a
/// node with a single child cannot be represented. Leaves are classified
/// [`SpaceType::Free`] or [`SpaceType::Solid`] when they are created; internal
/// nodes are classified once the whole tree exists.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BspNode {
    split: Option<Split>,
    parent: Option<NodeIndex>,
    space: SpaceType,
}

impl BspNode {
    /// Creates a leaf node.
    pub(crate) fn leaf(parent: Option<NodeIndex>, space: SpaceType) -> Self {
        debug_assert!(space != SpaceType::Mixed, "Leaves cannot be mixed");
        Self {
            split: None,
            parent,
            space,
        }
    }

    /// Turns this node into an internal node.
    pub(crate) fn set_split(&mut self, split: Split) {
        self.split = Some(split);
    }

    pub(crate) fn set_space(&mut self, space: SpaceType) {
        self.space = space;
    }

    /// Returns the splitting data, or `None` for leaves.
    #[inline]
    pub fn split(&self) -> Option<&Split> {
        self.split.as_ref()
    }

    /// Returns the splitting line, or `None` for leaves.
    #[inline]
    pub fn plane(&self) -> Option<&Plane2D> {
        self.split.as_ref().map(|s| &s.plane)
    }

    /// Returns the parent index, or `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns the front child index, or `None` for leaves.
    #[inline]
    pub fn front(&self) -> Option<NodeIndex> {
        self.split.as_ref().map(|s| s.front)
    }

    /// Returns the back child index, or `None` for leaves.
    #[inline]
    pub fn back(&self) -> Option<NodeIndex> {
        self.split.as_ref().map(|s| s.back)
    }

    /// Checks if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }

    /// Returns the region classification of this node.
    #[inline]
    pub fn space(&self) -> SpaceType {
        self.space
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    #[test]
    fn combine_rules() {
        use SpaceType::*;
        assert_eq!(SpaceType::combine(Free, Free), Free);
        assert_eq!(SpaceType::combine(Solid, Solid), Solid);
        assert_eq!(SpaceType::combine(Free, Solid), Mixed);
        assert_eq!(SpaceType::combine(Solid, Free), Mixed);
        assert_eq!(SpaceType::combine(Mixed, Free), Mixed);
        assert_eq!(SpaceType::combine(Mixed, Mixed), Mixed);
    }

    #[test]
    fn leaf_has_no_children() {
        let node = BspNode::leaf(None, SpaceType::Free);
        assert!(node.is_leaf());
        assert!(node.front().is_none());
        assert!(node.back().is_none());
        assert!(node.plane().is_none());
        assert!(node.parent().is_none());
    }

    #[test]
    fn set_split_makes_internal() {
        let splitter = Edge::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let mut node = BspNode::leaf(Some(NodeIndex(3)), SpaceType::Free);
        node.set_split(Split {
            plane: splitter.plane(),
            splitter,
            front: NodeIndex(4),
            back: NodeIndex(5),
        });

        assert!(!node.is_leaf());
        assert_eq!(node.front(), Some(NodeIndex(4)));
        assert_eq!(node.back(), Some(NodeIndex(5)));
        assert_eq!(node.parent(), Some(NodeIndex(3)));
        assert_eq!(node.split().unwrap().splitter(), &splitter);
    }

    #[test]
    fn node_index_display() {
        assert_eq!(NodeIndex::ROOT.to_string(), "#0");
        assert_eq!(NodeIndex(12).index(), 12);
    }
}
