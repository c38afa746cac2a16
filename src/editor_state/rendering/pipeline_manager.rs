//! Records each frame's render pass. Holds the depth texture, which follows
//! the surface size, and the voxel renderer.

use wgpu::{Device, Queue, Surface, SurfaceConfiguration, SurfaceError, TextureFormat};

use crate::{core::StSystem, editor_state::buffer_state::BufferState};

use super::{bind_group_state::BindGroupState, texture, voxel_renderer::VoxelRenderer};

/// Background color behind the grid.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.08,
    a: 1.0,
};

pub struct PipelineManager {
    pub depth_texture: texture::Texture,
    pub voxel_renderer: VoxelRenderer,
}

impl PipelineManager {
    /// Creates the depth buffer and the voxel pipeline.
    pub fn new(
        device: &Device,
        config: &SurfaceConfiguration,
        texture_format: TextureFormat,
        buffer_state: StSystem<BufferState>,
        bind_group_state: StSystem<BindGroupState>,
        shader_string: &str,
    ) -> Self {
        let depth_texture = texture::Texture::create_depth_texture(device, config, "DEPTH TEXTURE");

        let depth_stencil = Some(wgpu::DepthStencilState {
            format: texture::Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let voxel_renderer = VoxelRenderer::new(
            device,
            buffer_state,
            bind_group_state,
            shader_string,
            texture_format,
            depth_stencil,
        );

        Self {
            depth_texture,
            voxel_renderer,
        }
    }

    /// Renders one frame to `surface`.
    ///
    /// # Errors
    /// Returns the surface error when no frame could be acquired; the caller
    /// decides whether to reconfigure or skip.
    pub fn render(
        &mut self,
        surface: &Surface,
        device: &Device,
        queue: &Queue,
        instance_count: u32,
    ) -> Result<(), SurfaceError> {
        let frame = surface.get_current_texture()?;

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = device.create_command_encoder(&Default::default());
        {
            let depth_stencil_attachment = Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment,
                ..Default::default()
            });

            self.voxel_renderer.render(&mut rpass, instance_count);
        }

        queue.submit([encoder.finish()]);
        frame.present();
        Ok(())
    }

    /// Recreates the depth texture for the new surface size.
    pub fn resize(&mut self, device: &Device, config: &SurfaceConfiguration) {
        self.depth_texture = texture::Texture::create_depth_texture(device, config, "DEPTH TEXTURE");
    }
}
