//! # GPU Bootstrap
//!
//! Opens the window and brings up the wgpu device and surface, then reads the
//! voxel shader and decodes the material textures.
//!
//! - `Graphics`: everything the editor needs to start rendering
//! - `GraphicsBuilder`: builds `Graphics` once and posts it to the event loop
//! - `MaybeGraphics`: where startup currently stands

use std::future::Future;
use std::sync::Arc;

use log::info;
use wgpu::{Device, Features, Queue, Surface, SurfaceConfiguration};
use winit::{
    dpi::LogicalSize,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    config::EditorConfig, editor_state::rendering::texture::load_material_layers,
    error::EditorError,
};

/// Outcome of graphics initialization, delivered to the event loop.
pub type GraphicsResult = Result<Graphics, EditorError>;

/// GPU context and assets, handed to the editor state at startup.
pub struct Graphics {
    pub window: Arc<Window>,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub device: Device,
    pub queue: Queue,
    pub shader_file_string: String,
    /// Layer-major RGBA bytes, one layer per material
    pub material_layers: Vec<u8>,
}

fn graphics_init(message: impl std::fmt::Display) -> EditorError {
    EditorError::GraphicsInit {
        message: message.to_string(),
    }
}

/// Creates and initializes all required graphics resources.
///
/// The window and surface are created synchronously; the returned future
/// requests the adapter and device, configures the surface and loads the
/// shader and textures named in `config`.
///
/// # Arguments
/// * `event_loop` - The active event loop used to create the window and surface
/// * `config` - Window size and title, shader path and texture directory
fn create_graphics(
    event_loop: &ActiveEventLoop,
    config: EditorConfig,
) -> Result<impl Future<Output = GraphicsResult> + 'static, EditorError> {
    let window_attrs = Window::default_attributes()
        .with_title(config.window_title.clone())
        .with_inner_size(LogicalSize::new(config.window_width, config.window_height));

    let window = Arc::new(event_loop.create_window(window_attrs).map_err(graphics_init)?);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance.create_surface(window.clone()).map_err(graphics_init)?;

    Ok(async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(graphics_init)?;
        info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(graphics_init)?;

        let size = window.inner_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| graphics_init("surface reports no supported formats"))?;
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let shader_string =
            std::fs::read_to_string(&config.shader_path).map_err(|source| EditorError::ShaderRead {
                path: config.shader_path.clone(),
                source,
            })?;

        let material_layers = load_material_layers(&config.texture_dir)?;

        surface.configure(&device, &surface_config);
        Ok::<_, EditorError>(Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            shader_file_string: shader_string,
            material_layers,
        })
    })
}

/// One-shot builder for [`Graphics`].
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<GraphicsResult>>,
    config: EditorConfig,
}

/// Startup progress of the GPU context.
pub enum MaybeGraphics {
    /// Waiting for the event loop to resume
    Builder(GraphicsBuilder),
    /// Built, not yet handed over
    Graphics(Graphics),
    /// Owned by the editor state
    Moved,
}

impl GraphicsBuilder {
    /// # Arguments
    /// * `event_loop_proxy` - Receives the build result as a user event
    /// * `config` - Window settings and asset paths
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsResult>, config: EditorConfig) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
            config,
        }
    }

    /// Builds the graphics resources and posts the result, success or
    /// failure, to the event loop. Only the first call does anything.
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // Already built
            return;
        };

        let gfx = match create_graphics(event_loop, self.config.clone()) {
            Ok(gfx_fut) => pollster::block_on(gfx_fut),
            Err(error) => Err(error),
        };

        if event_loop_proxy.send_event(gfx).is_err() {
            log::error!("Event loop closed before graphics were delivered");
        }
    }
}
