//! Instanced voxel rendering.
//!
//! Every voxel is the same cube mesh drawn once per instance; the instance
//! buffer supplies the offset and material layer.
//!
//! # Architecture
//!
//! The voxel renderer is responsible for:
//! 1. Creating and owning its render pipeline
//! 2. Binding the scene uniform and material textures
//! 3. Issuing one instanced draw for the whole world

use log::error;
use wgpu::{Device, RenderPass, RenderPipeline, TextureFormat};

use crate::{core::StSystem, editor_state::buffer_state::BufferState};

use super::{
    bind_group_state::{BindGroupState, MATERIAL_GROUP_INDEX, SCENE_GROUP_INDEX},
    cube::{CubeVertex, CUBE_VERTEX_COUNT},
    instance::VoxelInstance,
    CUBE_VERTEX_BUFFER_NAME, INSTANCE_BUFFER_NAME,
};

pub struct VoxelRenderer {
    render_pipeline: RenderPipeline,
    buffer_state: StSystem<BufferState>,
    bind_group_state: StSystem<BindGroupState>,
}

impl VoxelRenderer {
    /// Creates the voxel render pipeline.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Registry holding the cube and instance buffers
    /// * `bind_group_state` - Scene and material bind groups
    /// * `shader_string` - WGSL source with `vs_main` and `fs_main`
    /// * `texture_format` - Format of the surface being rendered to
    /// * `depth_stencil` - Depth test configuration
    pub fn new(
        device: &Device,
        buffer_state: StSystem<BufferState>,
        bind_group_state: StSystem<BindGroupState>,
        shader_string: &str,
        texture_format: TextureFormat,
        depth_stencil: Option<wgpu::DepthStencilState>,
    ) -> Self {
        let render_pipeline = {
            let bind_groups = bind_group_state.get();
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Voxel Render Pipeline Layout"),
                bind_group_layouts: &[
                    &bind_groups.scene_bind_group_layout,
                    &bind_groups.material_bind_group_layout,
                ],
                push_constant_ranges: &[],
            });

            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Voxel Shader"),
                source: wgpu::ShaderSource::Wgsl(shader_string.into()),
            });

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Voxel Render Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[CubeVertex::desc(), VoxelInstance::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: texture_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };

        Self {
            render_pipeline,
            buffer_state,
            bind_group_state,
        }
    }

    /// Draws `instance_count` voxels from the instance buffer.
    pub fn render(&self, render_pass: &mut RenderPass<'_>, instance_count: u32) {
        if instance_count == 0 {
            return;
        }

        let buffer_state = self.buffer_state.get();
        let (Some(cube_vertices), Some(instances)) = (
            buffer_state.get_buffer(CUBE_VERTEX_BUFFER_NAME),
            buffer_state.get_buffer(INSTANCE_BUFFER_NAME),
        ) else {
            error!("Voxel buffers missing, skipping draw");
            return;
        };
        let bind_groups = self.bind_group_state.get();

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(SCENE_GROUP_INDEX, &bind_groups.scene_bind_group, &[]);
        render_pass.set_bind_group(MATERIAL_GROUP_INDEX, &bind_groups.material_bind_group, &[]);
        render_pass.set_vertex_buffer(0, cube_vertices.slice(..));
        render_pass.set_vertex_buffer(1, instances.slice(..));
        render_pass.draw(0..CUBE_VERTEX_COUNT, 0..instance_count);
    }
}
