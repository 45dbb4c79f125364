//! Shared visualization utilities for the BSP visibility demo.

use std::hash::{Hash, Hasher};

use bsp2d::{ConvexPolygon, DebugSegment, Sight, SpaceType};
use macroquad::models::{Mesh, Vertex, draw_mesh};
use macroquad::prelude::*;
use nalgebra::Point2;

pub mod navigator;
pub mod scene;

pub use navigator::TreeNavigator;
pub use scene::{Scene, SceneConfig, SceneError};

/// Maps world coordinates (Y up) to screen pixels (Y down), preserving aspect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldView {
    scale: f32,
    offset: Vec2,
    screen_height: f32,
}

impl WorldView {
    /// Fits a `world_width` x `world_height` rectangle into the screen with a
    /// pixel margin on every side.
    pub fn fit(world_width: f32, world_height: f32, screen: Vec2, margin: f32) -> Self {
        let available = (screen - Vec2::splat(2.0 * margin)).max(Vec2::ONE);
        let scale = (available.x / world_width).min(available.y / world_height);
        let used = vec2(world_width, world_height) * scale;
        Self {
            scale,
            offset: (screen - used) * 0.5,
            screen_height: screen.y,
        }
    }

    pub fn to_screen(&self, p: Point2<f32>) -> Vec2 {
        vec2(
            self.offset.x + p.x * self.scale,
            self.screen_height - (self.offset.y + p.y * self.scale),
        )
    }

    pub fn to_world(&self, screen: Vec2) -> Point2<f32> {
        Point2::new(
            (screen.x - self.offset.x) / self.scale,
            (self.screen_height - screen.y - self.offset.y) / self.scale,
        )
    }
}

/// Generates a deterministic color from a shape's vertices using hashing.
pub fn shape_color(shape: &ConvexPolygon) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for p in shape.points() {
        p.x.to_bits().hash(&mut hasher);
        p.y.to_bits().hash(&mut hasher);
    }
    let hash = hasher.finish();

    // Keep shapes bright enough to read against the dark background
    let r = (((hash >> 16) & 0xFF) as u8).max(60);
    let g = (((hash >> 8) & 0xFF) as u8).max(60);
    let b = ((hash & 0xFF) as u8).max(60);

    Color::from_rgba(r, g, b, 255)
}

/// Draws a convex shape by fan triangulation.
pub fn draw_shape(shape: &ConvexPolygon, view: &WorldView) {
    let points = shape.points();
    if points.len() < 3 {
        return;
    }

    let color = shape_color(shape);
    let vertices: Vec<Vertex> = points
        .iter()
        .map(|p| {
            let s = view.to_screen(*p);
            Vertex::new2(vec3(s.x, s.y, 0.0), vec2(0.0, 0.0), color)
        })
        .collect();

    // Convex shapes: vertex 0 sees every other edge
    let mut indices: Vec<u16> = Vec::with_capacity((points.len() - 2) * 3);
    for i in 1..points.len() - 1 {
        indices.push(0);
        indices.push(i as u16);
        indices.push((i + 1) as u16);
    }

    draw_mesh(&Mesh {
        vertices,
        indices,
        texture: None,
    });
}

/// Outlines a shape, used for the hover highlight.
pub fn draw_shape_outline(shape: &ConvexPolygon, view: &WorldView, color: Color) {
    let points = shape.points();
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        draw_world_line(a, b, 3.0, color, view);
    }
}

/// Color hint for a node classification.
pub fn space_color(space: SpaceType) -> Color {
    match space {
        SpaceType::Free => Color::from_rgba(80, 200, 120, 160),
        SpaceType::Solid => Color::from_rgba(220, 70, 70, 160),
        SpaceType::Mixed => Color::from_rgba(230, 200, 60, 160),
    }
}

pub fn draw_world_line(
    a: Point2<f32>,
    b: Point2<f32>,
    thickness: f32,
    color: Color,
    view: &WorldView,
) {
    let a = view.to_screen(a);
    let b = view.to_screen(b);
    draw_line(a.x, a.y, b.x, b.y, thickness, color);
}

/// Draws every splitting line clipped to its region.
pub fn draw_debug_segments(segments: &[DebugSegment], view: &WorldView) {
    for segment in segments {
        let color = space_color(segment.space);
        draw_world_line(segment.start, segment.end, 1.0, color, view);
    }
}

/// Draws the query ray up to the furthest visible point.
///
/// The visible part is green when the whole ray is clear, red otherwise; the
/// hidden remainder is drawn faintly.
pub fn draw_sight(start: Point2<f32>, end: Point2<f32>, sight: &Sight, view: &WorldView) {
    let color = if sight.visible { GREEN } else { RED };
    if !sight.visible {
        let faint = Color::new(1.0, 1.0, 1.0, 0.15);
        draw_world_line(sight.furthest, end, 1.0, faint, view);
    }
    draw_world_line(start, sight.furthest, 2.0, color, view);

    let s = view.to_screen(start);
    let e = view.to_screen(end);
    let f = view.to_screen(sight.furthest);
    draw_circle(s.x, s.y, 4.0, SKYBLUE);
    draw_circle(e.x, e.y, 4.0, ORANGE);
    if !sight.visible {
        draw_circle_lines(f.x, f.y, 6.0, 2.0, RED);
    }
}
