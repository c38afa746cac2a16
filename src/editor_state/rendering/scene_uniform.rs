//! The per-frame uniform shared by the vertex and fragment stages.

use cgmath::{Matrix4, Point3};

/// Scene uniform layout (112 bytes, every member 16-byte aligned).
///
/// - view_proj:       mat4x4<f32> - View-projection in wgpu clip space
/// - eye_position:    vec4<f32>   - Camera position, w unused
/// - light_position:  vec4<f32>   - Point light position, w unused
/// - selected_offset: vec4<f32>   - Selected voxel's minimum corner, w = 1 when highlighted
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye_position: [f32; 4],
    pub light_position: [f32; 4],
    pub selected_offset: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<SceneUniform>() == 112);

impl SceneUniform {
    pub fn new(
        view_proj: Matrix4<f32>,
        eye: Point3<f32>,
        light: Point3<f32>,
        selected_offset: Option<Point3<f32>>,
    ) -> Self {
        let selected_offset = match selected_offset {
            Some(offset) => [offset.x, offset.y, offset.z, 1.0],
            None => [0.0; 4],
        };

        Self {
            view_proj: view_proj.into(),
            eye_position: [eye.x, eye.y, eye.z, 1.0],
            light_position: [light.x, light.y, light.z, 1.0],
            selected_offset,
        }
    }
}

/// Point light above one corner of a grid with `grid_size` cells per side.
pub fn light_position(grid_size: usize) -> Point3<f32> {
    let n = grid_size as f32;
    Point3::new(n * 1.25, n * 2.25, n * 1.25)
}
