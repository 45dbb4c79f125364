//! Scene configuration, random shape generation and tree (re)building.

use std::fs;
use std::path::Path;

use bsp2d::{BspError, BspTree, BuildConfig, ConvexPolygon, Heuristic};
use log::{debug, info};
use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Errors raised while loading a [`SceneConfig`].
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("failed to read scene config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parameters of a generated scene. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub shape_count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub seed: u64,
    pub world_width: f32,
    pub world_height: f32,
    pub build: BuildConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            shape_count: 10,
            min_radius: 5.0,
            max_radius: 15.0,
            seed: 0x5eed,
            world_width: 177.7,
            world_height: 100.0,
            build: BuildConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Reads a JSON scene config from disk.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses a JSON scene config.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Random shapes plus the tree built over them.
pub struct Scene {
    config: SceneConfig,
    rng: StdRng,
    shapes: Vec<ConvexPolygon>,
    tree: BspTree,
    heuristic: Heuristic,
}

impl Scene {
    /// Generates the first scene from the config's seed.
    ///
    /// # Errors
    /// Returns the error if the shapes cannot be generated or the initial
    /// tree cannot be built.
    pub fn generate(config: SceneConfig) -> Result<Self, BspError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let shapes = random_shapes(&mut rng, &config)?;
        let heuristic = config.build.heuristic;
        let tree = BspTree::build_with_config(&shapes, &config.build, &mut rng)?;
        info!(
            "Generated scene: {} shapes, {} nodes",
            shapes.len(),
            tree.node_count()
        );
        Ok(Self {
            config,
            rng,
            shapes,
            tree,
            heuristic,
        })
    }

    /// Replaces the shapes with a fresh random set and rebuilds.
    ///
    /// On failure, in generation or in the build, the previous shapes and
    /// tree are kept.
    pub fn regenerate(&mut self) -> Result<(), BspError> {
        let shapes = random_shapes(&mut self.rng, &self.config)?;
        let config = self.config.build.with_heuristic(self.heuristic);
        self.tree = BspTree::build_with_config(&shapes, &config, &mut self.rng)?;
        self.shapes = shapes;
        debug!("Regenerated scene with {} shapes", self.shapes.len());
        Ok(())
    }

    /// Rebuilds the tree over the current shapes with the given heuristic.
    ///
    /// On failure the previous tree is kept.
    pub fn rebuild(&mut self, heuristic: Heuristic) -> Result<(), BspError> {
        let config = self.config.build.with_heuristic(heuristic);
        self.tree = BspTree::build_with_config(&self.shapes, &config, &mut self.rng)?;
        self.heuristic = heuristic;
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn shapes(&self) -> &[ConvexPolygon] {
        &self.shapes
    }

    #[inline]
    pub fn tree(&self) -> &BspTree {
        &self.tree
    }

    /// Heuristic of the current tree.
    #[inline]
    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Index of the shape containing `point`, if any.
    pub fn shape_at(&self, point: Point2<f32>) -> Option<usize> {
        self.shapes.iter().position(|s| s.contains_point(point))
    }
}

/// Attempts at finding a free spot for one shape before it is skipped.
const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// Places up to `shape_count` random polygons fully inside the world
/// rectangle.
///
/// Bounding circles of placed shapes never intersect, so the polygons do not
/// overlap. A shape that finds no free spot is skipped.
///
/// # Errors
/// Returns [`BspError::InvalidPolygon`] if the configured radius is not
/// positive.
pub fn random_shapes<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SceneConfig,
) -> Result<Vec<ConvexPolygon>, BspError> {
    let mut placed: Vec<(Point2<f32>, f32)> = Vec::with_capacity(config.shape_count);
    let mut shapes = Vec::with_capacity(config.shape_count);
    for index in 0..config.shape_count {
        let radius = if config.max_radius > config.min_radius {
            rng.gen_range(config.min_radius..config.max_radius)
        } else {
            config.min_radius
        };
        let Some(center) = free_center(rng, config, radius, &placed) else {
            debug!("No free spot for shape {index} (radius {radius}), skipping");
            continue;
        };
        shapes.push(ConvexPolygon::random(rng, center, radius)?);
        placed.push((center, radius));
    }
    Ok(shapes)
}

fn free_center<R: Rng + ?Sized>(
    rng: &mut R,
    config: &SceneConfig,
    radius: f32,
    placed: &[(Point2<f32>, f32)],
) -> Option<Point2<f32>> {
    (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
        let x = random_coordinate(rng, radius, config.world_width);
        let y = random_coordinate(rng, radius, config.world_height);
        let center = Point2::new(x, y);
        let clear = placed
            .iter()
            .all(|(other, r)| (center - other).norm() > radius + r);
        clear.then_some(center)
    })
}

fn random_coordinate<R: Rng + ?Sized>(rng: &mut R, radius: f32, extent: f32) -> f32 {
    if extent > 2.0 * radius {
        rng.gen_range(radius..extent - radius)
    } else {
        extent * 0.5
    }
}
