//! Build configuration.

use crate::bsp::ScoreWeights;

/// Default half length of a debug segment whose line no ancestor bounds.
pub const DEFAULT_DEBUG_HALF_LENGTH: f32 = 100.0;

/// Which splitter selection strategy a build uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(feature = "serde-serialize", serde(rename_all = "snake_case"))]
pub enum Heuristic {
    /// Uniformly random splitter; fast, unbalanced.
    Random,
    /// Lowest weighted cost splitter; deterministic.
    #[default]
    Score,
}

/// Parameters of a BSP build and of its derived debug output.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(feature = "serde-serialize", serde(default))]
pub struct BuildConfig {
    pub heuristic: Heuristic,
    /// Cost weights used by [`Heuristic::Score`].
    pub weights: ScoreWeights,
    /// Half length of debug segments on unbounded splitting lines.
    pub debug_half_length: f32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::default(),
            weights: ScoreWeights::default(),
            debug_half_length: DEFAULT_DEBUG_HALF_LENGTH,
        }
    }
}

impl BuildConfig {
    /// Returns a copy using the given heuristic.
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }
}
