//! Vertex type for textured sprite quads

use bytemuck::{Pod, Zeroable};

/// Quad corner with position in model space and texture coordinate
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
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
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Unit quad `[-1, 1]²` as two triangles; texture row 0 is the top edge
pub const UNIT_QUAD: [QuadVertex; 6] = [
    QuadVertex::new(-1.0, -1.0, 0.0, 1.0),
    QuadVertex::new(1.0, -1.0, 1.0, 1.0),
    QuadVertex::new(1.0, 1.0, 1.0, 0.0),
    QuadVertex::new(-1.0, -1.0, 0.0, 1.0),
    QuadVertex::new(1.0, 1.0, 1.0, 0.0),
    QuadVertex::new(-1.0, 1.0, 0.0, 0.0),
];

/// Colors for the procedural textures
pub mod colors {
    pub const SHIP: [u8; 4] = [80, 230, 120, 255];
    pub const INVADER: [u8; 4] = [230, 230, 240, 255];
    pub const MISSILE: [u8; 4] = [255, 255, 255, 255];
    pub const POWER_MISSILE_1: [u8; 4] = [90, 190, 255, 255];
    pub const POWER_MISSILE_2: [u8; 4] = [255, 120, 240, 255];
    pub const BOMB: [u8; 4] = [255, 90, 60, 255];
    pub const EXPLOSION: [u8; 4] = [255, 200, 60, 255];
    pub const EXPLOSION_CORE: [u8; 4] = [255, 255, 200, 255];
    pub const GAME_OVER: [u8; 4] = [255, 60, 60, 255];
    pub const BORDER: [u8; 4] = [80, 80, 110, 255];
    pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];
    /// Clear color behind the background quad
    pub const CLEAR: [f64; 4] = [0.02, 0.02, 0.05, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_covers_unit_square() {
        let min = UNIT_QUAD
            .iter()
            .fold([f32::MAX; 2], |m, v| [m[0].min(v.position[0]), m[1].min(v.position[1])]);
        let max = UNIT_QUAD
            .iter()
            .fold([f32::MIN; 2], |m, v| [m[0].max(v.position[0]), m[1].max(v.position[1])]);
        assert_eq!(min, [-1.0, -1.0]);
        assert_eq!(max, [1.0, 1.0]);
    }

    #[test]
    fn test_top_edge_samples_first_row() {
        for v in UNIT_QUAD.iter().filter(|v| v.position[1] > 0.0) {
            assert_eq!(v.uv[1], 0.0);
        }
    }
}
