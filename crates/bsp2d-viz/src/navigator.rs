//! BSP tree navigation utilities for interactive visualization.

use bsp2d::{BspTree, ChildSide, DebugSegment, NodeIndex};
use macroquad::prelude::*;

use crate::{WorldView, draw_world_line, space_color};

/// Interactive cursor over the nodes of a tree.
///
/// The cursor is a plain index, so it must be [`reset`](Self::reset) when the
/// tree it points into is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeNavigator {
    current: NodeIndex,
}

impl Default for TreeNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self {
            current: NodeIndex::ROOT,
        }
    }

    #[inline]
    pub fn current(&self) -> NodeIndex {
        self.current
    }

    /// Returns the sides taken from the root to the current node.
    pub fn path(&self, tree: &BspTree) -> Vec<ChildSide> {
        let mut path = Vec::new();
        let mut index = self.current;
        while let Some(side) = tree.child_side(index) {
            path.push(side);
            match tree.node(index).and_then(|n| n.parent()) {
                Some(parent) => index = parent,
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// Attempts to navigate to the front child. Returns true if successful.
    pub fn go_front(&mut self, tree: &BspTree) -> bool {
        self.go_to(tree.node(self.current).and_then(|n| n.front()))
    }

    /// Attempts to navigate to the back child. Returns true if successful.
    pub fn go_back(&mut self, tree: &BspTree) -> bool {
        self.go_to(tree.node(self.current).and_then(|n| n.back()))
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self, tree: &BspTree) -> bool {
        self.go_to(tree.node(self.current).and_then(|n| n.parent()))
    }

    /// Returns to the root node.
    pub fn reset(&mut self) {
        self.current = NodeIndex::ROOT;
    }

    fn go_to(&mut self, target: Option<NodeIndex>) -> bool {
        match target {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update(&mut self, tree: &BspTree) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::F) {
            changed |= self.go_front(tree);
        }
        if is_key_pressed(KeyCode::B) {
            changed |= self.go_back(tree);
        }
        if is_key_pressed(KeyCode::P) {
            changed |= self.go_parent(tree);
        }
        if is_key_pressed(KeyCode::Home) && self.current != NodeIndex::ROOT {
            self.reset();
            changed = true;
        }

        changed
    }

    /// Highlights the current node's splitting line, if it has one.
    pub fn draw_selection(&self, segments: &[DebugSegment], view: &WorldView) {
        if let Some(segment) = segments.iter().find(|s| s.node == self.current) {
            draw_world_line(segment.start, segment.end, 3.0, WHITE, view);
        }
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, tree: &BspTree, y_offset: f32) {
        let Some(node) = tree.node(self.current) else {
            return;
        };

        let path = self.path(tree);
        let path_str = if path.is_empty() {
            "root".to_string()
        } else {
            path.iter()
                .map(|side| match side {
                    ChildSide::Front => "F",
                    ChildSide::Back => "B",
                })
                .collect::<Vec<_>>()
                .join(" -> ")
        };

        draw_text(
            &format!(
                "Tree: {} nodes, {} leaves, depth {}",
                tree.node_count(),
                tree.leaf_count(),
                tree.depth()
            ),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Node {}: {:?}", self.current, node.space()),
            10.0,
            y_offset + 20.0,
            18.0,
            space_color(node.space()),
        );
        draw_text(
            &format!("Path: {} (depth {})", path_str, path.len()),
            10.0,
            y_offset + 40.0,
            18.0,
            YELLOW,
        );
        draw_text(
            if node.is_leaf() {
                "(leaf) [P]arent | Home"
            } else {
                "[F]ront | [B]ack | [P]arent | Home"
            },
            10.0,
            y_offset + 60.0,
            16.0,
            GRAY,
        );
    }
}
