//! BSP tree container and construction.

use std::ops::Index;

use log::{debug, trace};
use rand::Rng;

use crate::{BspError, BuildConfig, ConvexShape, Edge, EdgeClassification, Heuristic, Plane2D};

use super::node::{BspNode, NodeIndex, SpaceType, Split};
use super::selector::{RandomSplitter, ScoredSplitter, SplitterSelector};
use super::visitor::NodeVisitor;

/// Which child of its parent a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildSide {
    Front,
    Back,
}

/// A Binary Space Partitioning tree over 2D convex shape boundaries.
///
/// Every boundary edge of the input becomes (part of) a splitter, so the
/// leaves of the tree are convex regions that are either entirely free or
/// entirely inside a shape:
///
/// - the side in front of a splitter with no edges left is open space
///   ([`SpaceType::Free`]),
/// - the side behind a splitter with no edges left is shape interior
///   ([`SpaceType::Solid`]).
///
/// This convention relies on shapes being convex and wound
/// counter-clockwise, so that their interiors are behind all of their edges.
///
/// Nodes live in a flat arena addressed by [`NodeIndex`], in depth-first
/// pre-order. The tree is immutable once built; to change the scene, build a
/// new tree.
///
/// ```ignore
/// use bsp2d::{BspTree, ConvexPolygon, ScoredSplitter};
/// use nalgebra::Point2;
///
/// let square = ConvexPolygon::rectangle(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0))?;
/// let tree = BspTree::build(&[square], ScoredSplitter::default())?;
/// assert!(!tree.can_see(Point2::new(-5.0, 5.0), Point2::new(5.0, 5.0)).visible);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BspTree {
    nodes: Vec<BspNode>,
}

impl Default for BspTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeIndex> for BspTree {
    type Output = BspNode;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl BspTree {
    /// Creates the tree of an empty scene: a single free leaf covering the plane.
    pub fn new() -> Self {
        Self {
            nodes: vec![BspNode::leaf(None, SpaceType::Free)],
        }
    }

    /// Builds a BSP tree from a collection of shapes.
    ///
    /// Uses the provided [`SplitterSelector`] to choose splitting edges.
    /// Edges straddling a splitting line are split in two.
    ///
    /// Returns a single free leaf if the input has no edges. Shapes must not
    /// overlap (see [`ConvexShape`]); overlapping input still builds, but
    /// some leaves inside the overlap may be labelled free.
    ///
    /// # Errors
    /// - [`BspError::DegenerateEdge`] if a shape has a zero-length edge
    /// - [`BspError::NoSplitter`], [`BspError::NotStraddling`] or
    ///   [`BspError::NoIntersection`] on internal inconsistencies
    ///
    /// No partial tree is ever returned.
    pub fn build<S, Sel>(shapes: &[S], selector: Sel) -> Result<Self, BspError>
    where
        S: ConvexShape,
        Sel: SplitterSelector,
    {
        let mut edges = Vec::new();
        for (shape_index, shape) in shapes.iter().enumerate() {
            for edge in shape.world_segments() {
                if edge.is_degenerate() {
                    return Err(BspError::DegenerateEdge {
                        shape: shape_index,
                        start: edge.start(),
                        end: edge.end(),
                    });
                }
                edges.push(edge);
            }
        }

        debug!(
            "Building BSP tree from {} edges across {} shapes",
            edges.len(),
            shapes.len()
        );

        if edges.is_empty() {
            return Ok(Self::new());
        }

        let working = (0..edges.len()).collect();
        let mut builder = Builder {
            edges,
            nodes: vec![BspNode::leaf(None, SpaceType::Free)],
            selector,
            splits: 0,
        };
        builder.partition(NodeIndex::ROOT, working, None)?;

        let mut tree = Self {
            nodes: builder.nodes,
        };
        tree.classify_subtree(NodeIndex::ROOT);

        debug!(
            "BSP tree built: {} nodes ({} leaves), depth {}, {} splits, {} edges in pool",
            tree.node_count(),
            tree.leaf_count(),
            tree.depth(),
            builder.splits,
            builder.edges.len()
        );

        Ok(tree)
    }

    /// Builds a BSP tree according to a [`BuildConfig`].
    ///
    /// `rng` is only drawn from for [`Heuristic::Random`].
    pub fn build_with_config<S, R>(
        shapes: &[S],
        config: &BuildConfig,
        rng: &mut R,
    ) -> Result<Self, BspError>
    where
        S: ConvexShape,
        R: Rng,
    {
        match config.heuristic {
            Heuristic::Random => Self::build(shapes, RandomSplitter::new(rng)),
            Heuristic::Score => Self::build(shapes, ScoredSplitter::new(config.weights)),
        }
    }

    /// Returns all nodes in arena order.
    #[inline]
    pub fn nodes(&self) -> &[BspNode] {
        &self.nodes
    }

    /// Returns a node, or `None` if the index is out of range.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> Option<&BspNode> {
        self.nodes.get(index.0)
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> &BspNode {
        &self.nodes[0]
    }

    /// Returns the total number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the number of internal (splitting) nodes.
    pub fn internal_count(&self) -> usize {
        self.node_count() - self.leaf_count()
    }

    /// Returns the indices of all leaves in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(i, _)| NodeIndex(i))
    }

    /// Returns the maximum depth of the tree (1 for a single leaf).
    pub fn depth(&self) -> usize {
        self.subtree_depth(NodeIndex::ROOT)
    }

    fn subtree_depth(&self, index: NodeIndex) -> usize {
        match self[index].split() {
            None => 1,
            Some(split) => {
                1 + self
                    .subtree_depth(split.front)
                    .max(self.subtree_depth(split.back))
            }
        }
    }

    /// Returns which child of its parent a node is, or `None` for the root.
    pub fn child_side(&self, index: NodeIndex) -> Option<ChildSide> {
        let parent = self.node(index)?.parent()?;
        let split = self[parent].split()?;
        if split.front == index {
            Some(ChildSide::Front)
        } else {
            Some(ChildSide::Back)
        }
    }

    /// Returns the splitting lines bounding a node's region, closest ancestor first.
    ///
    /// Each entry pairs an ancestor's line with the side of it the node lies on.
    pub fn region_constraints(&self, index: NodeIndex) -> Vec<(Plane2D, ChildSide)> {
        let mut constraints = Vec::new();
        let mut current = index;
        while let (Some(parent), Some(side)) = (self[current].parent(), self.child_side(current)) {
            if let Some(plane) = self[parent].plane() {
                constraints.push((*plane, side));
            }
            current = parent;
        }
        constraints
    }

    /// Visits every node, parents before children, front before back.
    pub fn walk_pre_order<V: NodeVisitor>(&self, visitor: &mut V) {
        self.walk_pre_order_from(NodeIndex::ROOT, visitor);
    }

    fn walk_pre_order_from<V: NodeVisitor>(&self, index: NodeIndex, visitor: &mut V) {
        let node = &self[index];
        visitor.visit(index, node);
        if let Some(split) = node.split() {
            self.walk_pre_order_from(split.front, visitor);
            self.walk_pre_order_from(split.back, visitor);
        }
    }

    /// Visits every node, children before parents, front before back.
    pub fn walk_post_order<V: NodeVisitor>(&self, visitor: &mut V) {
        self.walk_post_order_from(NodeIndex::ROOT, visitor);
    }

    fn walk_post_order_from<V: NodeVisitor>(&self, index: NodeIndex, visitor: &mut V) {
        let node = &self[index];
        if let Some(split) = node.split() {
            self.walk_post_order_from(split.front, visitor);
            self.walk_post_order_from(split.back, visitor);
        }
        visitor.visit(index, node);
    }

    /// Post-order classification pass: an internal node is free if both
    /// children are free, solid if both are solid, mixed otherwise.
    fn classify_subtree(&mut self, index: NodeIndex) -> SpaceType {
        let Some((front, back)) = self[index].split().map(|s| (s.front, s.back)) else {
            return self[index].space();
        };
        let space = SpaceType::combine(self.classify_subtree(front), self.classify_subtree(back));
        self.nodes[index.0].set_space(space);
        space
    }
}

/// Construction state; discarded once the tree is built.
struct Builder<Sel> {
    /// Edge pool. Only grows: split edges are appended, never replaced.
    edges: Vec<Edge>,
    nodes: Vec<BspNode>,
    selector: Sel,
    splits: usize,
}

impl<Sel: SplitterSelector> Builder<Sel> {
    /// Splits `node` by an edge chosen from `working`, then builds its children.
    fn partition(
        &mut self,
        node: NodeIndex,
        working: Vec<usize>,
        parent_plane: Option<Plane2D>,
    ) -> Result<(), BspError> {
        let candidates: Vec<Edge> = working.iter().map(|&i| self.edges[i]).collect();
        let chosen = self
            .selector
            .select(&candidates, parent_plane.as_ref())
            .filter(|&i| i < candidates.len())
            .ok_or(BspError::NoSplitter {
                candidates: candidates.len(),
            })?;

        let splitter = candidates[chosen];
        let plane = splitter.try_plane().ok_or(BspError::NoSplitter {
            candidates: candidates.len(),
        })?;

        let mut front_list = Vec::new();
        let mut back_list = Vec::new();

        for (position, &edge_index) in working.iter().enumerate() {
            if position == chosen {
                continue;
            }
            let edge = self.edges[edge_index];
            match edge.classify(&plane) {
                EdgeClassification::Behind => back_list.push(edge_index),
                EdgeClassification::InFront => front_list.push(edge_index),
                EdgeClassification::Straddling => {
                    let (front_part, back_part) = edge.split(&plane)?;
                    trace!(
                        "Node {} splits edge {:?} -> {:?} at {:?}",
                        node,
                        edge.start(),
                        edge.end(),
                        front_part.end()
                    );
                    self.edges.push(front_part);
                    front_list.push(self.edges.len() - 1);
                    self.edges.push(back_part);
                    back_list.push(self.edges.len() - 1);
                    self.splits += 1;
                }
            }
        }

        let front = self.child(node, front_list, SpaceType::Free, plane)?;
        let back = self.child(node, back_list, SpaceType::Solid, plane)?;

        self.nodes[node.0].set_split(Split {
            plane,
            splitter,
            front,
            back,
        });
        Ok(())
    }

    /// Allocates a child of `parent`: a leaf of `empty_space` when no edges
    /// remain on that side, otherwise an internal node built recursively.
    fn child(
        &mut self,
        parent: NodeIndex,
        edges: Vec<usize>,
        empty_space: SpaceType,
        parent_plane: Plane2D,
    ) -> Result<NodeIndex, BspError> {
        let index = NodeIndex(self.nodes.len());
        if edges.is_empty() {
            self.nodes.push(BspNode::leaf(Some(parent), empty_space));
        } else {
            // Classified by the post-order pass once the subtree exists.
            self.nodes.push(BspNode::leaf(Some(parent), SpaceType::Free));
            self.partition(index, edges, Some(parent_plane))?;
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConvexPolygon;
    use crate::bsp::visitor::{CollectingVisitor, FnVisitor};
    use nalgebra::Point2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn square() -> ConvexPolygon {
        let (min, max) = (Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        ConvexPolygon::rectangle(min, max).unwrap()
    }

    fn square_tree() -> BspTree {
        let selector = ScoredSplitter::default();
        BspTree::build(&[square()], selector).unwrap()
    }

    /// Always picks the last candidate.
    struct LastEdge;

    impl SplitterSelector for LastEdge {
        fn select(&mut self, edges: &[Edge], _parent: Option<&Plane2D>) -> Option<usize> {
            edges.len().checked_sub(1)
        }
    }

    /// Returns an index past the end of the candidates.
    struct Broken;

    impl SplitterSelector for Broken {
        fn select(&mut self, edges: &[Edge], _parent: Option<&Plane2D>) -> Option<usize> {
            Some(edges.len())
        }
    }

    struct Degenerate;

    impl ConvexShape for Degenerate {
        fn world_segments(&self) -> Vec<Edge> {
            let p = Point2::new(1.0, 1.0);
            vec![Edge::new(p, p)]
        }
    }

    #[test]
    fn empty_tree() {
        let tree = BspTree::new();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().space(), SpaceType::Free);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn build_empty() {
        let shapes: Vec<ConvexPolygon> = vec![];
        let tree = BspTree::build(&shapes, ScoredSplitter::default()).unwrap();
        assert_eq!(tree, BspTree::new());
    }

    #[test]
    fn build_square_scored() {
        let tree = square_tree();

        assert_eq!(tree.internal_count(), 4);
        assert_eq!(tree.leaf_count(), 5);
        assert_eq!(tree.depth(), 5);

        let solid: Vec<_> = tree
            .leaves()
            .filter(|&i| tree[i].space() == SpaceType::Solid)
            .collect();
        assert_eq!(solid.len(), 1);
        assert_eq!(tree.root().space(), SpaceType::Mixed);

        // Bottom edge is chosen first; every other edge is behind it.
        let root_split = tree.root().split().unwrap();
        assert_eq!(root_split.splitter().start(), Point2::new(0.0, 0.0));
        assert!(tree[root_split.front()].is_leaf());
        assert_eq!(tree[root_split.front()].space(), SpaceType::Free);
    }

    #[test]
    fn build_square_pre_order_layout() {
        let tree = square_tree();
        for (i, node) in tree.nodes().iter().enumerate() {
            if let Some(split) = node.split() {
                assert!(split.front().index() > i);
                assert!(split.back().index() > i);
                assert_eq!(tree[split.front()].parent(), Some(NodeIndex(i)));
                assert_eq!(tree[split.back()].parent(), Some(NodeIndex(i)));
            }
        }
        assert!(tree.root().parent().is_none());
        let roots = tree.nodes().iter().filter(|n| n.parent().is_none());
        assert_eq!(roots.count(), 1);
    }

    #[test]
    fn build_with_custom_selector() {
        let tree = BspTree::build(&[square()], LastEdge).unwrap();
        let root_split = tree.root().split().unwrap();
        assert_eq!(root_split.splitter().start(), Point2::new(0.0, 10.0));
        assert_eq!(tree.leaf_count(), 5);
    }

    #[test]
    fn build_spanning_edge_gets_split() {
        // The bottom line of `a` (its last edge) crosses both slanted edges of `b`.
        let a = ConvexPolygon::try_new(vec![
            Point2::new(4.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.0, 0.0),
        ])
        .unwrap();
        let b = ConvexPolygon::try_new(vec![
            Point2::new(10.0, -2.0),
            Point2::new(12.0, -2.0),
            Point2::new(11.0, 2.0),
        ])
        .unwrap();

        let tree = BspTree::build(&[b, a], LastEdge).unwrap();
        // Six input edges plus two extra pieces, each used as a splitter once.
        assert!(tree.internal_count() >= 8);
        assert_eq!(tree.leaf_count(), tree.internal_count() + 1);
    }

    #[test]
    fn build_random_is_reproducible() {
        let mut rng = StdRng::seed_from_u64(3);
        let shapes: Vec<_> = (0..6)
            .map(|i| {
                let center = Point2::new(i as f32 * 15.0, (i % 2) as f32 * 12.0);
                ConvexPolygon::random(&mut rng, center, 5.0).unwrap()
            })
            .collect();

        let build = |seed| {
            let selector = RandomSplitter::new(StdRng::seed_from_u64(seed));
            BspTree::build(&shapes, selector).unwrap()
        };
        let (a, b) = (build(9), build(9));
        assert_eq!(a, b);
    }

    #[test]
    fn build_with_config_dispatches() -> Result<(), BspError> {
        let config = BuildConfig::default().with_heuristic(Heuristic::Random);
        let mut rng = StdRng::seed_from_u64(5);
        let shapes = [square()];
        let tree = BspTree::build_with_config(&shapes, &config, &mut rng)?;
        assert_eq!(tree.leaf_count(), tree.internal_count() + 1);

        let config = BuildConfig::default();
        let scored = BspTree::build_with_config(&shapes, &config, &mut rng)?;
        assert_eq!(scored, square_tree());
        Ok(())
    }

    #[test]
    fn build_rejects_degenerate_edge() {
        let result = BspTree::build(&[Degenerate], ScoredSplitter::default());
        let degenerate = matches!(result, Err(BspError::DegenerateEdge { shape: 0, .. }));
        assert!(degenerate);
    }

    #[test]
    fn build_rejects_broken_selector() {
        let result = BspTree::build(&[square()], Broken);
        assert_eq!(result, Err(BspError::NoSplitter { candidates: 4 }));
    }

    #[test]
    fn walks_visit_every_node() {
        let tree = square_tree();

        let mut pre = CollectingVisitor::new();
        tree.walk_pre_order(&mut pre);
        let pre = pre.into_indices();
        assert_eq!(pre.len(), tree.node_count());
        // Pre-order of an arena built in pre-order is the arena order.
        assert!(pre.iter().enumerate().all(|(i, n)| n.index() == i));

        let mut post = CollectingVisitor::new();
        tree.walk_post_order(&mut post);
        let post = post.into_indices();
        assert_eq!(post.len(), tree.node_count());
        assert_eq!(post.last(), Some(&NodeIndex::ROOT));
    }

    #[test]
    fn post_order_sees_children_first() {
        let tree = square_tree();
        let mut seen = vec![false; tree.node_count()];
        let mut visitor = FnVisitor::new(|index: NodeIndex, node: &BspNode| {
            if let Some(split) = node.split() {
                assert!(seen[split.front().index()]);
                assert!(seen[split.back().index()]);
            }
            seen[index.index()] = true;
        });
        tree.walk_post_order(&mut visitor);
    }

    #[test]
    fn region_constraints_follow_ancestors() {
        let tree = square_tree();
        let solid = tree
            .leaves()
            .find(|&i| tree[i].space() == SpaceType::Solid)
            .unwrap();
        let constraints = tree.region_constraints(solid);
        assert_eq!(constraints.len(), 4);
        assert!(constraints.iter().all(|(_, side)| *side == ChildSide::Back));
        assert!(tree.region_constraints(NodeIndex::ROOT).is_empty());
        assert_eq!(tree.child_side(NodeIndex::ROOT), None);
    }
}
