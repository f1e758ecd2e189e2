//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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
    pub const BACKGROUND: [f32; 4] = [0.03, 0.04, 0.09, 1.0];
    pub const STAR: [f32; 4] = [0.85, 0.9, 1.0, 0.7];
    pub const GROUND: [f32; 4] = [0.12, 0.14, 0.22, 1.0];
    pub const GROUND_LINE: [f32; 4] = [0.35, 0.45, 0.7, 1.0];
    pub const PLAYER: [f32; 4] = [0.25, 0.85, 0.55, 1.0];
    pub const PLAYER_EYE: [f32; 4] = [0.05, 0.08, 0.1, 1.0];
    pub const OBSTACLE_HIGH: [f32; 4] = [0.95, 0.4, 0.3, 1.0];
    pub const OBSTACLE_LOW: [f32; 4] = [0.95, 0.75, 0.25, 1.0];
}
