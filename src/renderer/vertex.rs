//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Linear RGBA color, components in 0..=1
pub type Rgba = [f32; 4];

/// Build a color from 8-bit channels and an alpha
#[inline]
pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Rgba {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

/// Same color with its alpha scaled
#[inline]
pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Rgba) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::{Rgba, rgba};

    pub const BACKGROUND: Rgba = rgba(13, 17, 23, 1.0);
    pub const GRID: Rgba = [1.0, 1.0, 1.0, 0.05];
    pub const BALL: Rgba = rgba(255, 107, 107, 1.0);
    pub const BALL_SPIN: Rgba = rgba(255, 167, 38, 1.0);
    pub const PADDLE: Rgba = rgba(78, 205, 196, 1.0);
    pub const PADDLE_POWERED: Rgba = rgba(255, 167, 38, 1.0);
    pub const BRICK_OUTLINE: Rgba = [1.0, 1.0, 1.0, 0.3];
    pub const BRICK_NORMAL: Rgba = rgba(78, 205, 196, 1.0);
    pub const BRICK_STRONG: Rgba = rgba(255, 107, 107, 1.0);
    pub const BRICK_INDESTRUCTIBLE: Rgba = rgba(128, 128, 128, 0.8);
    pub const BRICK_EXPLOSIVE: Rgba = rgba(255, 167, 38, 1.0);
    pub const BRICK_MOVING: Rgba = rgba(102, 187, 106, 1.0);
    pub const POWER_UP_MULTI_BALL: Rgba = rgba(255, 107, 107, 1.0);
    pub const POWER_UP_PADDLE_SIZE: Rgba = rgba(78, 205, 196, 1.0);
    pub const POWER_UP_SPEED_BOOST: Rgba = rgba(69, 183, 209, 1.0);
    pub const POWER_UP_LASER: Rgba = rgba(255, 167, 38, 1.0);
    pub const POWER_UP_LIFE: Rgba = rgba(102, 187, 106, 1.0);
    pub const ICON: Rgba = [1.0, 1.0, 1.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_channels() {
        let c = rgba(255, 0, 51, 0.5);
        assert_eq!(c, [1.0, 0.0, 0.2, 0.5]);
    }

    #[test]
    fn test_with_alpha_scales_existing_alpha() {
        let c = with_alpha(colors::BRICK_INDESTRUCTIBLE, 0.5);
        assert!((c[3] - 0.4).abs() < 1e-6);
        assert_eq!(with_alpha(colors::BALL, 2.0)[3], 1.0);
    }
}
