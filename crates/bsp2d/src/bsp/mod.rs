//! Binary Space Partitioning tree over 2D convex shape boundaries.
//!
//! This module provides a BSP tree that recursively partitions the plane
//! using the boundary edges of convex shapes as splitters. The tree enables:
//!
//! - Classifying every convex region as free or solid space
//! - Line-of-sight queries that clip a segment against the splitting lines
//! - Debug segments visualizing each splitting line within its region
//!
//! # Example
//!
//! ```ignore
//! use bsp2d::{BspTree, ConvexPolygon, ScoredSplitter};
//! use nalgebra::Point2;
//!
//! let shapes = vec![ConvexPolygon::rectangle(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0))?];
//! let tree = BspTree::build(&shapes, ScoredSplitter::default())?;
//!
//! let sight = tree.can_see(Point2::new(-5.0, 5.0), Point2::new(5.0, 5.0));
//! assert!(!sight.visible);
//! // Sight stops at the left side of the square.
//! println!("blocked at {:?}", sight.furthest);
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: The node arena and construction
//! - [`BspNode`]: A splitting line with two children, or a free/solid leaf
//! - [`SplitterSelector`]: Strategy trait for choosing splitting edges
//! - [`NodeVisitor`]: Visitor trait for pre-order and post-order walks

mod debug;
mod node;
mod selector;
mod tree;
mod visibility;
mod visitor;

// Re-export main types
pub use debug::DebugSegment;
pub use node::{BspNode, NodeIndex, SpaceType, Split};
pub use selector::{RandomSplitter, ScoreWeights, ScoredSplitter, SplitterSelector, SplitterStats};
pub use tree::{BspTree, ChildSide};
pub use visibility::Sight;
pub use visitor::{CollectingVisitor, FnVisitor, NodeVisitor};
