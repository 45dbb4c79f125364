//! Visitor pattern for BSP tree walks.
//!
//! Visitors allow custom processing of nodes during pre-order or post-order
//! walks without coupling traversal logic to specific use cases.

use super::node::{BspNode, NodeIndex};

/// Visitor for processing nodes during a BSP tree walk.
///
/// Implement this trait to define custom behavior when walking the tree.
/// Common uses include:
/// - Deriving render data (debug segments)
/// - Collecting statistics
/// - Exporting the tree structure
pub trait NodeVisitor {
    /// Called once for each node of the tree.
    fn visit(&mut self, index: NodeIndex, node: &BspNode);
}

/// A simple visitor that records the order in which nodes were visited.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<NodeIndex>,
}

impl CollectingVisitor {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the visited node indices.
    pub fn into_indices(self) -> Vec<NodeIndex> {
        self.collected
    }

    /// Returns a reference to the visited node indices.
    pub fn indices(&self) -> &[NodeIndex] {
        &self.collected
    }
}

impl NodeVisitor for CollectingVisitor {
    fn visit(&mut self, index: NodeIndex, _node: &BspNode) {
        self.collected.push(index);
    }
}

/// A visitor that calls a closure for each node.
pub struct FnVisitor<F>
where
    F: FnMut(NodeIndex, &BspNode),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(NodeIndex, &BspNode),
{
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> NodeVisitor for FnVisitor<F>
where
    F: FnMut(NodeIndex, &BspNode),
{
    fn visit(&mut self, index: NodeIndex, node: &BspNode) {
        (self.func)(index, node);
    }
}
