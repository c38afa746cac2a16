//! # Editor State Module
//!
//! The core editor module that owns the voxel world, the camera and the GPU
//! renderer.
//!
//! ## Key Components
//!
//! * `EditorState` - Couples the editing session with its renderer
//! * `session` - Per-frame editing logic, independent of the GPU
//! * `math` - Matrices, unprojection and ray/box intersection
//! * `camera_state` - Orbit camera and projection
//! * `voxels` - The dense grid, materials and cube faces
//! * `picking` - Ray picking, adjacent placement and removal
//! * `action_cooldown` - Rate limiting for add/remove
//! * `buffer_state` - Named GPU buffer registry
//! * `rendering` - Instanced voxel rendering
//!
//! ## Frame Flow
//!
//! 1. Raw input is translated into [`session::EditorActions`]
//! 2. The session rotates/zooms the camera, picks and applies edits
//! 3. Rebuilt instance data and the scene uniform are uploaded
//! 4. The renderer draws every voxel in one instanced call

use log::debug;
use web_time::Instant;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{
    application_state::input_state::ProcessedInputState, config::EditorConfig, error::EditorError,
};
use rendering::{scene_uniform, SceneUniform, VoxelRendererManager};
use session::{EditorActions, EditorSession, FrameReport};
use voxels::material::Material;

pub mod action_cooldown;
pub mod buffer_state;
pub mod camera_state;
pub mod math;
pub mod picking;
pub mod rendering;
pub mod session;
pub mod voxels;

const MATERIAL_KEYS: [KeyCode; 5] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
];

/// The running editor: session state plus the renderer that draws it.
pub struct EditorState {
    /// Camera, world, selection and edit timing
    pub session: EditorSession,
    /// Owns the surface and every GPU resource
    pub render_manager: VoxelRendererManager,
    /// Actions derived from the latest input
    actions: EditorActions,
    /// Last known cursor position, kept between frames without cursor events
    cursor_position: (f32, f32),
    base_title: String,
}

impl EditorState {
    /// Creates the session and uploads its world to the GPU.
    ///
    /// # Arguments
    /// * `surface` - The configured rendering surface
    /// * `surface_config` - Configuration for the rendering surface
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `shader_string` - WGSL source for the voxel pipeline
    /// * `material_layers` - Layer-major RGBA material textures
    /// * `config` - Editor settings
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        shader_string: &str,
        material_layers: &[u8],
        config: &EditorConfig,
    ) -> Result<Self, EditorError> {
        let viewport = (surface_config.width, surface_config.height);
        let session = EditorSession::new(config, viewport);

        let render_manager = VoxelRendererManager::new(
            surface,
            surface_config,
            device,
            queue,
            shader_string,
            material_layers,
            &session.world,
        )?;

        Ok(Self {
            session,
            render_manager,
            actions: EditorActions::default(),
            cursor_position: (viewport.0 as f32 / 2.0, viewport.1 as f32 / 2.0),
            base_title: config.window_title.clone(),
        })
    }

    /// Resizes the rendering surface when the window size changes
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.render_manager.resize_surface(size);
    }

    /// Renders the current frame
    pub fn render(&mut self) {
        self.render_manager.render();
    }

    /// Sets the input commands for the next frame.
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        self.actions = translate_processed_input(&input, self.cursor_position);
        self.cursor_position = self.actions.cursor_position;
    }

    /// Runs one editing frame and uploads what changed.
    ///
    /// Instance data is only re-uploaded after the world was rebuilt; the
    /// scene uniform is written every frame.
    pub fn process_frame(&mut self, now: Instant) -> FrameReport {
        let viewport = self.viewport();
        let report = self.session.frame(&self.actions, viewport, now);

        if report.instances_changed() {
            debug!("World now holds {} voxels", self.session.world.voxel_count());
        }
        self.render_manager.sync_instances(&self.session.world);

        let world = &self.session.world;
        let selected_offset = report.selection.map(|coord| world.voxel_bounds(coord).0);
        let camera_state = &self.session.camera_state;
        let scene = SceneUniform::new(
            camera_state.wgpu_view_projection(),
            camera_state.matrices().eye,
            scene_uniform::light_position(world.grid_size()),
            selected_offset,
        );
        self.render_manager.update_scene(&scene);

        report
    }

    /// Window title naming the current material.
    pub fn window_title(&self) -> String {
        format_window_title(&self.base_title, self.session.current_material())
    }

    fn viewport(&self) -> (u32, u32) {
        let config = &self.render_manager.surface_config;
        (config.width, config.height)
    }
}

fn format_window_title(base_title: &str, material: Material) -> String {
    format!("{} - Material: {}", base_title, material)
}

/// Translates the processed input state into editor actions.
///
/// # Arguments
/// * `input` - The processed input state to translate
/// * `last_cursor` - Cursor position to use when no cursor event arrived yet
fn translate_processed_input(input: &ProcessedInputState, last_cursor: (f32, f32)) -> EditorActions {
    let cursor_position = input
        .cursor_position
        .map(|(x, y)| (x as f32, y as f32))
        .unwrap_or(last_cursor);

    // Rotation - active while the right button is held and the cursor moved
    let rotate_view = input
        .get_cursor_delta()
        .filter(|_| input.get_mouse_button_state(MouseButton::Right).is_active())
        .map(|(dx, dy)| (dx as f32, dy as f32));

    // Lowest held slot wins
    let select_material = MATERIAL_KEYS
        .iter()
        .position(|key| input.get_key_state(*key).is_active())
        .and_then(|index| Material::from_slot(index + 1));

    EditorActions {
        cursor_position,
        rotate_view,
        zoom_lines: input.scroll_lines,
        select_material,
        add_voxel: input.get_key_state(KeyCode::KeyA).is_active(),
        remove_voxel: input.get_key_state(KeyCode::KeyD).is_active(),
    }
}

#[cfg(test)]
mod tests {
    use crate::application_state::input_state::RawInputState;

    use super::*;

    fn input_with_keys(keys: &[(KeyCode, RawInputState)]) -> ProcessedInputState {
        ProcessedInputState {
            keyboard_states: keys.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn no_input_keeps_last_cursor_and_does_nothing() {
        let actions = translate_processed_input(&ProcessedInputState::default(), (320.0, 240.0));

        assert_eq!(
            actions,
            EditorActions {
                cursor_position: (320.0, 240.0),
                ..Default::default()
            }
        );
    }

    #[test]
    fn cursor_drag_rotates_only_with_right_button() {
        let mut input = ProcessedInputState {
            cursor_position: Some((100.0, 50.0)),
            cursor_delta: Some((6.0, -2.0)),
            ..Default::default()
        };
        let actions = translate_processed_input(&input, (0.0, 0.0));
        assert_eq!(actions.cursor_position, (100.0, 50.0));
        assert_eq!(actions.rotate_view, None);

        input
            .mouse_button_states
            .insert(MouseButton::Right, RawInputState::Held);
        let actions = translate_processed_input(&input, (0.0, 0.0));
        assert_eq!(actions.rotate_view, Some((6.0, -2.0)));
    }

    #[test]
    fn number_keys_select_materials_lowest_first() {
        let input = input_with_keys(&[
            (KeyCode::Digit3, RawInputState::Pressed),
            (KeyCode::Digit5, RawInputState::Held),
        ]);
        let actions = translate_processed_input(&input, (0.0, 0.0));
        assert_eq!(actions.select_material, Some(Material::STONE));

        let released = input_with_keys(&[(KeyCode::Digit2, RawInputState::Released)]);
        assert_eq!(translate_processed_input(&released, (0.0, 0.0)).select_material, None);
    }

    #[test]
    fn held_edit_keys_and_scroll_are_forwarded() {
        let mut input = input_with_keys(&[
            (KeyCode::KeyA, RawInputState::Held),
            (KeyCode::KeyD, RawInputState::Pressed),
        ]);
        input.scroll_lines = -2.0;

        let actions = translate_processed_input(&input, (0.0, 0.0));
        assert!(actions.add_voxel);
        assert!(actions.remove_voxel);
        assert_eq!(actions.zoom_lines, -2.0);
    }

    #[test]
    fn title_names_the_material() {
        assert_eq!(
            format_window_title("Voxel Editor 3D", Material::LEAVES),
            "Voxel Editor 3D - Material: Leaves"
        );
    }
}
