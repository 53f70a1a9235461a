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
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const WALL: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const PADDLE: [f32; 4] = [0.25, 0.45, 1.0, 1.0];
    pub const BALL: [f32; 4] = [1.0, 0.25, 0.2, 1.0];

    /// Block colors by grid row, top to bottom
    pub const BLOCK_ROWS: [[f32; 4]; 5] = [
        [0.95, 0.2, 0.2, 1.0],  // red
        [0.2, 0.85, 0.3, 1.0],  // green
        [0.25, 0.4, 1.0, 1.0],  // blue
        [0.95, 0.95, 0.95, 1.0], // white
        [1.0, 0.6, 0.15, 1.0],  // orange
    ];

    /// Color for a block (or its debris) by row index
    pub fn block_row(row: u32) -> [f32; 4] {
        BLOCK_ROWS[row as usize % BLOCK_ROWS.len()]
    }
}
