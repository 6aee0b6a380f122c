//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in playfield pixels with an RGBA color
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

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Unpack a 0xRRGGBB color with the given alpha
pub fn rgba(packed: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((packed >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha.clamp(0.0, 1.0)]
}

/// Colors for the playfield furniture
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    /// Cyan at ~13% (#00ffff22)
    pub const GRID: [f32; 4] = [0.0, 1.0, 1.0, 0.133];
    pub const OUTLINE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BOSS_CORE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SCANLINE: [f32; 4] = [0.0, 0.0, 0.0, 0.1];
}
