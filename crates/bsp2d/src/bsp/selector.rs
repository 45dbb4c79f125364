//! Splitter selection strategies for BSP tree construction.
//!
//! The choice of splitting edge affects tree balance and the number of
//! edge splits during construction. Different strategies offer different
//! trade-offs between build time and tree quality.

use rand::Rng;

use crate::{Edge, EdgeClassification, Plane2D};

/// Strategy for selecting which edge's line to use for splitting.
///
/// The selected edge's line becomes the splitting line for a BSP node.
pub trait SplitterSelector {
    /// Select an edge from the working set to use as the splitter.
    ///
    /// `parent` is the splitting line of the parent node, if any.
    /// Returns the position of the chosen edge in `edges`, or `None` if the
    /// slice is empty.
    fn select(&mut self, edges: &[Edge], parent: Option<&Plane2D>) -> Option<usize>;
}

impl<S: SplitterSelector + ?Sized> SplitterSelector for &mut S {
    fn select(&mut self, edges: &[Edge], parent: Option<&Plane2D>) -> Option<usize> {
        (**self).select(edges, parent)
    }
}

/// Picks a uniformly random edge.
///
/// O(1) per node with no quality guarantee. The generator is injected so
/// that builds are reproducible with a seeded generator.
#[derive(Debug, Clone)]
pub struct RandomSplitter<R> {
    rng: R,
}

impl<R: Rng> RandomSplitter<R> {
    /// Creates a selector drawing from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the generator back.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> SplitterSelector for RandomSplitter<R> {
    fn select(&mut self, edges: &[Edge], _parent: Option<&Plane2D>) -> Option<usize> {
        if edges.is_empty() {
            return None;
        }
        Some(self.rng.gen_range(0..=edges.len() - 1))
    }
}

/// Weights of the [`ScoredSplitter`] cost function.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ScoreWeights {
    /// Cost per unit of `|front - back|`.
    pub balance: f32,
    /// Cost per unit of `|candidate normal · parent normal|`.
    pub alignment: f32,
    /// Cost per straddling edge.
    pub split: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            balance: 7.0,
            alignment: 19.0,
            split: 31.0,
        }
    }
}

/// Per-candidate statistics gathered by the [`ScoredSplitter`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SplitterStats {
    pub front: usize,
    pub back: usize,
    /// Straddling edges, counted once each.
    pub splits: usize,
    /// Dot product of the candidate normal with the parent normal (0 at the root).
    pub alignment: f32,
}

impl SplitterStats {
    /// Evaluates the cost of these statistics; lower is better.
    pub fn score(&self, weights: &ScoreWeights) -> f32 {
        let imbalance = self.front.abs_diff(self.back) as f32;
        weights.balance * imbalance
            + weights.alignment * self.alignment.abs()
            + weights.split * self.splits as f32
    }
}

/// Picks the edge minimizing a weighted cost of imbalance, alignment with
/// the parent splitter and number of splits.
///
/// Splits are penalized most, near-parallel-to-parent splitters next (they
/// produce long thin regions), imbalance least. O(n²) per node. Ties keep
/// the first candidate, so the result is deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoredSplitter {
    weights: ScoreWeights,
}

impl ScoredSplitter {
    /// Creates a selector with custom weights.
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    #[inline]
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Classifies every other edge against the candidate's line.
    ///
    /// Degenerate candidates yield `None`.
    pub fn stats(
        edges: &[Edge],
        candidate: usize,
        parent: Option<&Plane2D>,
    ) -> Option<SplitterStats> {
        let plane = edges.get(candidate)?.try_plane()?;
        let mut stats = SplitterStats {
            alignment: parent.map_or(0.0, |p| plane.normal().dot(&p.normal())),
            ..SplitterStats::default()
        };

        for (i, edge) in edges.iter().enumerate() {
            if i == candidate {
                continue;
            }
            match edge.classify(&plane) {
                EdgeClassification::Behind => stats.back += 1,
                EdgeClassification::InFront => stats.front += 1,
                EdgeClassification::Straddling => stats.splits += 1,
            }
        }

        Some(stats)
    }
}

impl SplitterSelector for ScoredSplitter {
    fn select(&mut self, edges: &[Edge], parent: Option<&Plane2D>) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;

        for candidate in 0..edges.len() {
            let Some(stats) = Self::stats(edges, candidate, parent) else {
                continue;
            };
            let score = stats.score(&self.weights);
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((candidate, score));
            }
        }

        best.map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn edge(a: [f32; 2], b: [f32; 2]) -> Edge {
        Edge::new(Point2::new(a[0], a[1]), Point2::new(b[0], b[1]))
    }

    fn square_edges() -> Vec<Edge> {
        vec![
            edge([0.0, 0.0], [10.0, 0.0]),
            edge([10.0, 0.0], [10.0, 10.0]),
            edge([10.0, 10.0], [0.0, 10.0]),
            edge([0.0, 10.0], [0.0, 0.0]),
        ]
    }

    #[test]
    fn random_empty_list() {
        let mut selector = RandomSplitter::new(StdRng::seed_from_u64(1));
        assert!(selector.select(&[], None).is_none());
    }

    #[test]
    fn random_stays_in_range() {
        let mut selector = RandomSplitter::new(StdRng::seed_from_u64(1));
        let edges = square_edges();
        for _ in 0..100 {
            let index = selector.select(&edges, None).unwrap();
            assert!(index < edges.len());
        }
    }

    #[test]
    fn random_is_reproducible_with_seed() {
        let edges = square_edges();
        let mut a = RandomSplitter::new(StdRng::seed_from_u64(42));
        let mut b = RandomSplitter::new(StdRng::seed_from_u64(42));
        for _ in 0..20 {
            assert_eq!(a.select(&edges, None), b.select(&edges, None));
        }
    }

    #[test]
    fn scored_empty_list() {
        let mut selector = ScoredSplitter::default();
        assert!(selector.select(&[], None).is_none());
    }

    #[test]
    fn scored_ties_keep_first() {
        let mut selector = ScoredSplitter::default();
        assert_eq!(selector.select(&square_edges(), None), Some(0));
    }

    #[test]
    fn scored_penalizes_alignment_with_parent() {
        let edges = square_edges();
        let parent = edges[0].plane();
        let mut selector = ScoredSplitter::default();
        // Right and left edges are perpendicular to the bottom edge; the
        // top edge is anti-parallel and pays the alignment cost.
        let remaining = &edges[1..];
        assert_eq!(selector.select(remaining, Some(&parent)), Some(0));

        let top = ScoredSplitter::stats(remaining, 1, Some(&parent)).unwrap();
        assert_eq!(top.back, 2);
        assert!((top.alignment + 1.0).abs() < 1e-6);
        let expected = 7.0 * 2.0 + 19.0;
        assert!((top.score(selector.weights()) - expected).abs() < 1e-4);
    }

    #[test]
    fn scored_avoids_splits() {
        // A short vertical wall whose line crosses a long horizontal wall.
        let edges = vec![
            edge([-5.0, 1.0], [-5.0, 3.0]),
            edge([-10.0, 0.0], [10.0, 0.0]),
        ];
        let splitting = ScoredSplitter::stats(&edges, 0, None).unwrap();
        assert_eq!(splitting.splits, 1);

        let clean = ScoredSplitter::stats(&edges, 1, None).unwrap();
        assert_eq!(clean.splits, 0);
        assert_eq!(clean.back, 1);

        let mut selector = ScoredSplitter::default();
        assert_eq!(selector.select(&edges, None), Some(1));
    }

    #[test]
    fn stats_counts_sides() {
        let edges = square_edges();
        let stats = ScoredSplitter::stats(&edges, 0, None).unwrap();
        assert_eq!(
            stats,
            SplitterStats {
                front: 0,
                back: 3,
                splits: 0,
                alignment: 0.0,
            }
        );
    }
}
