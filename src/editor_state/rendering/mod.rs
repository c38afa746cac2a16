//! Rendering system for the voxel editor.
//!
//! This module owns the surface, the GPU buffers and the voxel pipeline. It
//! provides a high-level interface for drawing the editor world: upload the
//! instances when the world changes, write the scene uniform, render.

use log::{debug, error, info, warn};
use pipeline_manager::PipelineManager;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration, SurfaceError};

use crate::{
    core::StSystem,
    editor_state::{buffer_state::BufferState, voxels::world::VoxelWorld},
    error::EditorError,
};

mod bind_group_state;
pub mod cube;
pub mod instance;
mod pipeline_manager;
pub mod scene_uniform;
pub mod texture;
mod voxel_renderer;

pub use instance::VoxelInstance;
pub use scene_uniform::SceneUniform;

/// The shared cube mesh every instance is drawn with.
pub const CUBE_VERTEX_BUFFER_NAME: &str = "cube_vertex_buffer";
/// One [`VoxelInstance`] per occupied cell, sized for a full grid.
pub const INSTANCE_BUFFER_NAME: &str = "voxel_instance_buffer";
/// The [`SceneUniform`] for the current frame.
pub const SCENE_UNIFORM_BUFFER_NAME: &str = "scene_uniform_buffer";

/// Surface, device and every GPU resource the editor draws with.
pub struct VoxelRendererManager {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    /// The WebGPU device used for creating GPU resources
    pub device: StSystem<Device>,
    /// The WebGPU queue for submitting command buffers
    pub queue: StSystem<Queue>,
    /// Registry of every GPU buffer
    pub buffer_state: StSystem<BufferState>,
    /// Manages the rendering pipeline and shaders
    pipeline_manager: PipelineManager,
    /// World rebuild last uploaded to the instance buffer
    uploaded_generation: Option<u64>,
    instance_count: u32,
}

impl VoxelRendererManager {
    /// Allocates the cube and instance buffers (the latter sized for a full
    /// grid), the scene uniform, the material texture array and the pipeline,
    /// then uploads `world`.
    ///
    /// # Errors
    /// Returns [`EditorError::InvalidConfig`] if the instance buffer for the
    /// grid exceeds the device's buffer size limit, and
    /// [`EditorError::MissingGpuResource`] if a buffer needed for the bind
    /// groups was not created.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        shader_string: &str,
        material_layers: &[u8],
        world: &VoxelWorld,
    ) -> Result<Self, EditorError> {
        use wgpu::util::DeviceExt;

        let max_buffer_size = device.limits().max_buffer_size;
        let instance_capacity = VoxelInstance::grid_capacity_bytes(world.grid_size())
            .filter(|bytes| *bytes <= max_buffer_size)
            .ok_or_else(|| {
                EditorError::invalid_config(format!(
                    "a {}³ grid needs an instance buffer larger than the device limit of {} bytes",
                    world.grid_size(),
                    max_buffer_size
                ))
            })?;

        let device = StSystem::new(device);
        let queue = StSystem::new(queue);
        let buffer_state = StSystem::new(BufferState::new(device.clone(), queue.clone()));

        {
            let mut buffers = buffer_state.get_mut();
            let cube = cube::cube_vertices(world.voxel_size());
            buffers.create_buffer_init(
                CUBE_VERTEX_BUFFER_NAME,
                wgpu::util::BufferInitDescriptor {
                    label: Some(CUBE_VERTEX_BUFFER_NAME),
                    contents: bytemuck::cast_slice(&cube),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            );
            buffers.create_buffer(
                INSTANCE_BUFFER_NAME,
                wgpu::BufferDescriptor {
                    label: Some(INSTANCE_BUFFER_NAME),
                    size: instance_capacity,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                },
            );
            buffers.create_buffer(
                SCENE_UNIFORM_BUFFER_NAME,
                wgpu::BufferDescriptor {
                    label: Some(SCENE_UNIFORM_BUFFER_NAME),
                    size: std::mem::size_of::<SceneUniform>() as wgpu::BufferAddress,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                },
            );
        }

        let material_texture =
            texture::Texture::create_material_array(&device.get(), &queue.get(), material_layers);
        let bind_group_state = StSystem::new(bind_group_state::BindGroupState::new(
            &device.get(),
            &buffer_state.get(),
            material_texture,
        )?);

        let pipeline_manager = PipelineManager::new(
            &device.get(),
            &surface_config,
            surface_config.format,
            buffer_state.clone(),
            bind_group_state,
            shader_string,
        );

        info!(
            "GPU buffers allocated: {} bytes",
            buffer_state.get().get_total_allocated_memory()
        );

        let mut manager = Self {
            surface,
            surface_config,
            device,
            queue,
            buffer_state,
            pipeline_manager,
            uploaded_generation: None,
            instance_count: 0,
        };
        manager.sync_instances(world);
        Ok(manager)
    }

    /// Uploads the world's instances if it was rebuilt since the last upload.
    pub fn sync_instances(&mut self, world: &VoxelWorld) {
        let generation = world.instance_generation();
        if self.uploaded_generation == Some(generation) {
            return;
        }

        let instances = VoxelInstance::from_world(world);
        let written = instances.is_empty()
            || self.buffer_state.get_mut().write_buffer(
                INSTANCE_BUFFER_NAME,
                0,
                bytemuck::cast_slice(&instances),
            );

        if written {
            self.instance_count = instances.len() as u32;
            self.uploaded_generation = Some(generation);
            debug!(
                "Uploaded {} voxel instances, {} bytes in use",
                self.instance_count,
                self.buffer_state.get().get_total_used_memory()
            );
        }
    }

    /// Writes this frame's camera, light and highlight.
    pub fn update_scene(&mut self, scene: &SceneUniform) {
        self.buffer_state.get_mut().write_buffer(
            SCENE_UNIFORM_BUFFER_NAME,
            0,
            bytemuck::bytes_of(scene),
        );
    }

    /// Number of instances drawn per frame.
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Reconfigures the surface and depth buffer. A zero-sized (minimized)
    /// window keeps the previous configuration.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;

        self.surface.configure(&self.device.get(), &self.surface_config);
        self.pipeline_manager
            .resize(&self.device.get(), &self.surface_config);
    }

    /// Renders a new frame.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped; other
    /// surface errors are logged and the frame skipped.
    pub fn render(&mut self) {
        let result = self.pipeline_manager.render(
            &self.surface,
            &self.device.get(),
            &self.queue.get(),
            self.instance_count,
        );

        match result {
            Ok(()) => {}
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device.get(), &self.surface_config);
            }
            Err(SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame");
            }
            Err(other) => {
                error!("Failed to acquire the next frame: {}", other);
            }
        }
    }
}
