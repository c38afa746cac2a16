//! Manages WebGPU bind groups and their layouts.
//!
//! Two groups are used by the voxel shader:
//! - group 0: the scene uniform (camera, light, selection)
//! - group 1: the material texture array and its sampler

use wgpu::{BindGroup, BindGroupLayout, Device};

use crate::{editor_state::buffer_state::BufferState, error::EditorError};

use super::{texture::Texture, SCENE_UNIFORM_BUFFER_NAME};

const SCENE_BIND_GROUP: &str = "scene_bind_group";
const SCENE_BIND_GROUP_LAYOUT: &str = "scene_bind_group_layout";
const MATERIAL_BIND_GROUP: &str = "material_bind_group";
const MATERIAL_BIND_GROUP_LAYOUT: &str = "material_bind_group_layout";

/// Bind group slot of the scene uniform.
pub const SCENE_GROUP_INDEX: u32 = 0;
/// Bind group slot of the material textures.
pub const MATERIAL_GROUP_INDEX: u32 = 1;

/// The bind groups used by the voxel pipeline, with their layouts.
pub struct BindGroupState {
    pub scene_bind_group: BindGroup,
    pub scene_bind_group_layout: BindGroupLayout,
    pub material_bind_group: BindGroup,
    pub material_bind_group_layout: BindGroupLayout,
    /// Kept alive for the texture bind group
    #[allow(dead_code)]
    material_texture: Texture,
}

impl BindGroupState {
    /// Creates the scene and material bind groups.
    ///
    /// The scene uniform buffer must already be registered in `buffer_state`.
    pub fn new(
        device: &Device,
        buffer_state: &BufferState,
        material_texture: Texture,
    ) -> Result<Self, EditorError> {
        let (scene_bind_group, scene_bind_group_layout) =
            Self::generate_scene_bindgroups(device, buffer_state)?;

        let (material_bind_group, material_bind_group_layout) =
            Self::generate_material_bindgroups(device, &material_texture);

        Ok(Self {
            scene_bind_group,
            scene_bind_group_layout,
            material_bind_group,
            material_bind_group_layout,
            material_texture,
        })
    }

    fn generate_scene_bindgroups(
        device: &Device,
        buffer_state: &BufferState,
    ) -> Result<(BindGroup, BindGroupLayout), EditorError> {
        let scene_binding = buffer_state
            .get_entire_binding(SCENE_UNIFORM_BUFFER_NAME)
            .ok_or(EditorError::MissingGpuResource {
                name: SCENE_UNIFORM_BUFFER_NAME,
            })?;

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some(SCENE_BIND_GROUP_LAYOUT),
            });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_binding,
            }],
            label: Some(SCENE_BIND_GROUP),
        });

        Ok((scene_bind_group, scene_bind_group_layout))
    }

    fn generate_material_bindgroups(device: &Device, material_texture: &Texture) -> (BindGroup, BindGroupLayout) {
        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2Array,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        // Must match the filterable flag of the texture entry
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some(MATERIAL_BIND_GROUP_LAYOUT),
            });

        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &material_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&material_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&material_texture.sampler),
                },
            ],
            label: Some(MATERIAL_BIND_GROUP),
        });

        (material_bind_group, material_bind_group_layout)
    }
}
