//! Cube geometry shared by every voxel instance.
//!
//! One cube of edge `voxel_size` with its minimum corner at the origin; each
//! instance translates it by its offset in the vertex shader.

use crate::editor_state::voxels::face::VoxelFace;

/// Vertices per cube: 6 faces × 2 triangles × 3 vertices.
pub const CUBE_VERTEX_COUNT: u32 = 36;

/// A cube vertex.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Normal: [f32; 3] (12 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

const _: () = assert!(std::mem::size_of::<CubeVertex>() == 32);

impl CubeVertex {
    /// Vertex buffer layout for slot 0.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: tex_coords (vec2<f32>)
    /// - `location = 2`: normal (vec3<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<CubeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Unit-cube corners of each face, counter-clockwise seen from outside,
/// starting at the corner mapped to uv (0, 0).
fn face_corners(face: VoxelFace) -> [[f32; 3]; 4] {
    match face {
        VoxelFace::POS_Z => [[0., 0., 1.], [1., 0., 1.], [1., 1., 1.], [0., 1., 1.]],
        VoxelFace::NEG_Z => [[1., 0., 0.], [0., 0., 0.], [0., 1., 0.], [1., 1., 0.]],
        VoxelFace::NEG_X => [[0., 0., 0.], [0., 0., 1.], [0., 1., 1.], [0., 1., 0.]],
        VoxelFace::POS_X => [[1., 0., 1.], [1., 0., 0.], [1., 1., 0.], [1., 1., 1.]],
        VoxelFace::NEG_Y => [[0., 0., 0.], [1., 0., 0.], [1., 0., 1.], [0., 0., 1.]],
        VoxelFace::POS_Y => [[0., 1., 1.], [1., 1., 1.], [1., 1., 0.], [0., 1., 0.]],
    }
}

/// Builds the 36 vertices of a cube with edge `voxel_size`.
pub fn cube_vertices(voxel_size: f32) -> Vec<CubeVertex> {
    // Texture rows run top-down, so v is flipped against the corner height.
    const UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
    const TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

    let mut vertices = Vec::with_capacity(CUBE_VERTEX_COUNT as usize);
    for face in VoxelFace::all() {
        let corners = face_corners(face);
        let normal = face.normal().map(|n| n as f32).into();

        for corner in TRIANGLES {
            let [x, y, z] = corners[corner];
            vertices.push(CubeVertex {
                position: [x * voxel_size, y * voxel_size, z * voxel_size],
                tex_coords: UVS[corner],
                normal,
            });
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};

    use super::*;

    #[test]
    fn cube_has_two_triangles_per_face() {
        assert_eq!(cube_vertices(1.0).len(), CUBE_VERTEX_COUNT as usize);
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        for triangle in cube_vertices(1.0).chunks(3) {
            let a = Vector3::from(triangle[0].position);
            let b = Vector3::from(triangle[1].position);
            let c = Vector3::from(triangle[2].position);
            let winding_normal = (b - a).cross(c - a).normalize();

            let normal = Vector3::from(triangle[0].normal);
            assert!(winding_normal.dot(normal) > 0.99, "triangle {:?}", triangle);
        }
    }

    #[test]
    fn vertices_scale_with_voxel_size() {
        let max = cube_vertices(0.5)
            .iter()
            .flat_map(|vertex| vertex.position)
            .fold(f32::MIN, f32::max);
        assert_eq!(max, 0.5);
    }
}
