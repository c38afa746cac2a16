//! Per-voxel instance data uploaded to the GPU.

use crate::editor_state::voxels::world::VoxelWorld;

/// GPU instance data for one voxel.
///
/// Layout (16 bytes):
/// - offset:      vec3<f32> (12 bytes) - World position of the cell's minimum corner
/// - material_id: f32 (4 bytes) - Layer in the material texture array
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VoxelInstance {
    pub offset: [f32; 3],
    pub material_id: f32,
}

const _: () = {
    assert!(
        std::mem::size_of::<VoxelInstance>() == 16,
        "VoxelInstance must be exactly 16 bytes"
    );
};

impl VoxelInstance {
    /// Vertex buffer layout for slot 1, advanced once per instance.
    ///
    /// # Shader Attributes
    /// - `location = 3`: offset (vec3<f32>)
    /// - `location = 4`: material_id (f32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VoxelInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }

    /// Zips the world's instance positions and materials into GPU instances.
    pub fn from_world(world: &VoxelWorld) -> Vec<VoxelInstance> {
        world
            .instance_positions()
            .iter()
            .zip(world.instance_material_ids())
            .map(|(&offset, &material_id)| VoxelInstance {
                offset,
                material_id,
            })
            .collect()
    }

    /// Buffer size needed to hold one instance for every cell of a
    /// `grid_size`³ grid.
    ///
    /// # Returns
    /// `None` if the size overflows
    pub fn grid_capacity_bytes(grid_size: usize) -> Option<wgpu::BufferAddress> {
        let cells = grid_size.checked_pow(3)?.max(1);
        let bytes = cells.checked_mul(std::mem::size_of::<VoxelInstance>())?;
        wgpu::BufferAddress::try_from(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::editor_state::voxels::material::Material;

    #[test]
    fn instances_follow_world_scan_order() {
        let mut world = VoxelWorld::empty(4, 2.0);
        world.set_voxel(Point3::new(1, 0, 0), true, Material::SAND);
        world.set_voxel(Point3::new(0, 3, 1), true, Material::LEAVES);
        world.rebuild_instance_data();

        let instances = VoxelInstance::from_world(&world);
        assert_eq!(
            instances,
            vec![
                VoxelInstance {
                    offset: [0.0, 6.0, 2.0],
                    material_id: 4.0
                },
                VoxelInstance {
                    offset: [2.0, 0.0, 0.0],
                    material_id: 3.0
                },
            ]
        );
    }

    #[test]
    fn capacity_covers_a_full_grid() {
        assert_eq!(VoxelInstance::grid_capacity_bytes(10), Some(1000 * 16));
        assert_eq!(VoxelInstance::grid_capacity_bytes(0), Some(16));
    }

    #[test]
    fn capacity_of_an_absurd_grid_overflows_to_none() {
        assert_eq!(VoxelInstance::grid_capacity_bytes(usize::MAX), None);
        assert_eq!(VoxelInstance::grid_capacity_bytes(1 << 22), None);
    }
}
