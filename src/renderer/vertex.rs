//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
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
    pub const SKY: [f32; 4] = [0.27, 0.71, 0.78, 1.0];
    pub const SPRITE: [f32; 4] = [0.96, 0.78, 0.26, 1.0];
    pub const SPRITE_CRASHED: [f32; 4] = [0.9, 0.25, 0.2, 1.0];
    pub const GATE: [f32; 4] = [0.39, 0.67, 0.16, 1.0];
    /// Gates the sprite has already cleared
    pub const GATE_PASSED: [f32; 4] = [0.29, 0.48, 0.1, 1.0];
    pub const GATE_CAP: [f32; 4] = [0.24, 0.39, 0.08, 1.0];
    /// Dim overlay on the idle and game-over screens
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
}
