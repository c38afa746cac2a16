#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Editor
//!
//! An interactive voxel editor built with Rust and WGPU.
//!
//! A cubic grid of voxels is viewed through an orbit camera. The voxel under
//! the cursor is picked by ray casting; new voxels are placed against the face
//! the cursor points at, and selected voxels can be removed.
//!
//! ## Key Modules
//!
//! * `application_state` - Window, input and application lifecycle
//! * `core` - Shared single-threaded handles for GPU resources
//! * `editor_state` - World, camera, picking and the instanced renderer
//! * `config` - JSON editor settings
//! * `error` - Startup and asset errors
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_editor::run();
//! }
//! ```
//!
//! The editing logic is usable without a window:
//!
//! ```
//! use cgmath::Point3;
//! use voxel_editor::editor_state::{
//!     math::Ray,
//!     picking,
//!     voxels::{material::Material, world::VoxelWorld},
//! };
//!
//! let mut world = VoxelWorld::new(10, 1.0);
//! let ray = Ray::towards(Point3::new(5.5, 5.5, 20.0), Point3::new(5.5, 5.5, 0.0)).unwrap();
//!
//! let selected = picking::pick(&world, &ray).unwrap();
//! assert_eq!(selected, Point3::new(5, 5, 6));
//!
//! let placed = picking::add_adjacent(&mut world, selected, &ray, Material::WOOD);
//! assert_eq!(placed, Some(Point3::new(5, 5, 7)));
//! assert_eq!(world.voxel_count(), 28);
//! assert_eq!(world.material_at(Point3::new(5, 5, 7)), Some(Material::WOOD));
//! ```

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, MaybeGraphics},
    ApplicationState,
};
use config::EditorConfig;
use log::{error, info};
use winit::event_loop::EventLoop;

mod application_state;
pub mod config;
pub mod core;
pub mod editor_state;
pub mod error;

const CONTROLS_HELP: &str = "Controls: right-drag orbit | wheel zoom | 1-5 material \
(Wood, Grass, Stone, Sand, Leaves) | A add | D remove | Esc quit";

/// Starts the editor and blocks until the window is closed.
///
/// Logging goes to stdout, filtered by `RUST_LOG`. A config that cannot be
/// loaded is logged and no window is opened.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match EditorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    info!(
        "Grid {}³ with voxel size {}, {}x{} window",
        config.grid_size, config.voxel_size, config.window_width, config.window_height
    );
    info!("{}", CONTROLS_HELP);

    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create the event loop: {}", e);
            return;
        }
    };

    let mut state = ApplicationState {
        graphics: MaybeGraphics::Builder(GraphicsBuilder::new(
            event_loop.create_proxy(),
            config.clone(),
        )),
        state: None,
        config,
    };

    if let Err(e) = event_loop.run_app(&mut state) {
        error!("Event loop terminated with an error: {}", e);
    }
}
