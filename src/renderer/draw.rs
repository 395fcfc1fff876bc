//! Draw-target abstraction
//!
//! The simulation never touches a canvas directly. Entities describe
//! themselves through [`DrawTarget`]; the browser build collects the calls in
//! a [`ShapeBatch`] and hands its vertices to the GPU pipeline.

use glam::Vec2;

use super::shapes;
use super::vertex::{Rgba, Vertex};
use crate::sim::Aabb;

/// Minimal 2D drawing surface in stage pixel coordinates
pub trait DrawTarget {
    fn fill_rect(&mut self, bounds: Aabb, color: Rgba);
    fn stroke_rect(&mut self, bounds: Aabb, line_width: f32, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Rgba);
    fn line(&mut self, from: Vec2, to: Vec2, line_width: f32, color: Rgba);
}

/// Accumulates triangle-list vertices for one frame
#[derive(Debug, Default)]
pub struct ShapeBatch {
    vertices: Vec<Vertex>,
}

impl ShapeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last frame's geometry but keep the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl DrawTarget for ShapeBatch {
    fn fill_rect(&mut self, bounds: Aabb, color: Rgba) {
        self.vertices.extend(shapes::rect(&bounds, color));
    }

    fn stroke_rect(&mut self, bounds: Aabb, line_width: f32, color: Rgba) {
        self.vertices
            .extend(shapes::rect_outline(&bounds, line_width, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let segments = shapes::circle_segments(radius);
        self.vertices
            .extend(shapes::circle(center, radius, color, segments));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Rgba) {
        let half = line_width / 2.0;
        let segments = shapes::circle_segments(radius);
        self.vertices.extend(shapes::ring(
            center,
            (radius - half).max(0.0),
            radius + half,
            color,
            segments,
        ));
    }

    fn line(&mut self, from: Vec2, to: Vec2, line_width: f32, color: Rgba) {
        self.vertices
            .extend(shapes::line(from, to, line_width, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_accumulates_and_clears() {
        let mut batch = ShapeBatch::new();
        assert!(batch.is_empty());

        batch.fill_rect(Aabb::new(0.0, 0.0, 10.0, 10.0), [1.0; 4]);
        batch.fill_circle(Vec2::new(5.0, 5.0), 8.0, [1.0; 4]);
        assert_eq!(batch.vertices().len(), 6 + 16 * 3);

        batch.clear();
        assert!(batch.is_empty());
    }
}
