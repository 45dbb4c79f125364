//! 2D BSP (Binary Space Partitioning) tree with solid/free region
//! classification and line-of-sight queries.

pub mod bsp;
mod config;
mod edge;
mod error;
mod plane;
mod shape;

pub use bsp::{
    BspNode, BspTree, ChildSide, CollectingVisitor, DebugSegment, FnVisitor, NodeIndex,
    NodeVisitor, RandomSplitter, ScoreWeights, ScoredSplitter, Sight, SpaceType, Split,
    SplitterSelector, SplitterStats,
};
pub use config::{BuildConfig, DEFAULT_DEBUG_HALF_LENGTH, Heuristic};
pub use edge::{Edge, EdgeClassification};
pub use error::BspError;
pub use plane::{PLANE_EPSILON, Plane2D, PlaneSide};
pub use shape::{ConvexPolygon, ConvexShape, MAX_RANDOM_STEP_DEGREES, MIN_RANDOM_STEP_DEGREES};
