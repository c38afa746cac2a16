//! # Editor Session
//!
//! The per-frame editing logic, independent of any window or GPU. Each frame
//! the session:
//!
//! 1. Applies camera rotation and zoom
//! 2. Casts the cursor ray and picks the voxel under it
//! 3. Switches the current material
//! 4. Applies at most one add or remove, rate limited by the action cooldown
//!
//! The renderer reads the resulting world, selection and camera afterwards.

use cgmath::Deg;
use log::{debug, trace};
use web_time::Instant;

use crate::{
    config::EditorConfig,
    editor_state::{
        action_cooldown::ActionCooldown,
        camera_state::{
            camera::{OrbitCamera, Projection},
            CameraState,
        },
        math::{ray_from_cursor, Ray},
        picking,
        voxels::{material::Material, world::VoxelWorld, GridCoord},
    },
};

/// Editing intents for one frame, already translated from raw input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorActions {
    /// Cursor position in pixels, origin top-left
    pub cursor_position: (f32, f32),
    /// Cursor travel while the rotate button is held
    pub rotate_view: Option<(f32, f32)>,
    /// Scroll distance in lines, positive zooms in
    pub zoom_lines: f32,
    /// Material chosen with the number keys this frame
    pub select_material: Option<Material>,
    pub add_voxel: bool,
    /// Takes priority over `add_voxel` when both are requested
    pub remove_voxel: bool,
}

/// An edit applied to the world during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Added { coord: GridCoord, material: Material },
    Removed { coord: GridCoord },
}

/// What changed during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Voxel picked under the cursor this frame; edits do not change it
    pub selection: Option<GridCoord>,
    pub edit: Option<EditOutcome>,
    pub material_changed: bool,
}

impl FrameReport {
    /// Whether the instance data must be uploaded again.
    pub fn instances_changed(&self) -> bool {
        self.edit.is_some()
    }
}

/// Camera, world, selection and edit timing for one editing session.
pub struct EditorSession {
    pub camera_state: CameraState,
    pub world: VoxelWorld,
    selection: Option<GridCoord>,
    current_material: Material,
    cooldown: ActionCooldown,
}

impl EditorSession {
    /// Creates a session with a seeded world and the camera orbiting its center.
    pub fn new(config: &EditorConfig, viewport: (u32, u32)) -> Self {
        let world = VoxelWorld::new(config.grid_size, config.voxel_size);

        let camera = OrbitCamera::new(
            Deg(config.camera_yaw),
            Deg(config.camera_pitch),
            config.camera_radius,
            config.orbit_settings(),
        );
        let projection = Projection::new(
            viewport.0,
            viewport.1,
            Deg(config.fov_degrees),
            config.near_plane,
            config.far_plane,
        );
        let camera_state = CameraState::new(camera, projection, world.get_center());

        Self {
            camera_state,
            world,
            selection: None,
            current_material: Material::default(),
            cooldown: ActionCooldown::new(config.action_cooldown()),
        }
    }

    pub fn selection(&self) -> Option<GridCoord> {
        self.selection
    }

    pub fn current_material(&self) -> Material {
        self.current_material
    }

    /// Casts the ray through `cursor` for the current camera.
    pub fn cursor_ray(&self, cursor: (f32, f32), viewport: (u32, u32)) -> Option<Ray> {
        let matrices = self.camera_state.matrices();
        ray_from_cursor(
            cursor,
            viewport,
            &matrices.view,
            &matrices.projection,
            matrices.eye,
        )
    }

    /// Runs one frame of editing.
    ///
    /// # Arguments
    /// * `actions` - This frame's intents
    /// * `viewport` - Framebuffer size in pixels
    /// * `now` - Frame timestamp, used for the action cooldown
    pub fn frame(&mut self, actions: &EditorActions, viewport: (u32, u32), now: Instant) -> FrameReport {
        if let Some((dx, dy)) = actions.rotate_view {
            self.camera_state.rotate(dx, dy);
        }
        if actions.zoom_lines != 0.0 {
            self.camera_state.zoom(actions.zoom_lines);
        }
        self.camera_state.resize(viewport.0, viewport.1);

        let ray = self.cursor_ray(actions.cursor_position, viewport);
        let selection = ray.as_ref().and_then(|ray| picking::pick(&self.world, ray));
        if selection != self.selection {
            trace!("Selection changed: {:?} -> {:?}", self.selection, selection);
        }
        self.selection = selection;

        let mut report = FrameReport::default();

        if let Some(material) = actions.select_material {
            if material != self.current_material {
                debug!("Material set to {}", material);
                self.current_material = material;
                report.material_changed = true;
            }
        }

        if let (Some(selected), Some(ray)) = (self.selection, ray) {
            let wants_edit = actions.remove_voxel || actions.add_voxel;
            if wants_edit && self.cooldown.try_fire(now) {
                report.edit = self.apply_edit(actions, selected, &ray);
            }
        }

        report.selection = self.selection;
        report
    }

    fn apply_edit(&mut self, actions: &EditorActions, selected: GridCoord, ray: &Ray) -> Option<EditOutcome> {
        if actions.remove_voxel {
            if !picking::remove_voxel(&mut self.world, Some(selected)) {
                return None;
            }
            debug!("Removed voxel at {:?}", selected);
            return Some(EditOutcome::Removed { coord: selected });
        }

        let material = self.current_material;
        let coord = picking::add_adjacent(&mut self.world, selected, ray, material)?;
        debug!("Added {} voxel at {:?}", material, coord);
        Some(EditOutcome::Added { coord, material })
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;
    use web_time::Duration;

    use super::*;

    const VIEWPORT: (u32, u32) = (1280, 720);

    fn centered_actions() -> EditorActions {
        EditorActions {
            cursor_position: (640.0, 360.0),
            ..Default::default()
        }
    }

    /// Camera looking straight down -Z at the middle of a 9³ grid, so the
    /// center pixel lands inside the +Z face of cell (4, 4, 5).
    fn session() -> EditorSession {
        let config = EditorConfig {
            grid_size: 9,
            camera_yaw: 90.0,
            camera_pitch: 0.0,
            ..Default::default()
        };
        EditorSession::new(&config, VIEWPORT)
    }

    #[test]
    fn center_of_screen_selects_seed_block() {
        let mut session = session();
        let report = session.frame(&centered_actions(), VIEWPORT, Instant::now());

        assert_eq!(report.selection, Some(Point3::new(4, 4, 5)));
        assert_eq!(report.edit, None);
    }

    #[test]
    fn cursor_off_the_grid_selects_nothing() {
        let mut session = session();
        let actions = EditorActions {
            cursor_position: (0.0, 0.0),
            add_voxel: true,
            ..Default::default()
        };

        let report = session.frame(&actions, VIEWPORT, Instant::now());
        assert_eq!(report.selection, None);
        assert_eq!(report.edit, None);
        assert_eq!(session.world.voxel_count(), 27);
    }

    #[test]
    fn add_is_rate_limited_by_cooldown() {
        let mut session = session();
        let start = Instant::now();
        let actions = EditorActions {
            add_voxel: true,
            ..centered_actions()
        };

        let report = session.frame(&actions, VIEWPORT, start);
        assert_eq!(
            report.edit,
            Some(EditOutcome::Added {
                coord: Point3::new(4, 4, 6),
                material: Material::WOOD
            })
        );
        assert_eq!(session.world.voxel_count(), 28);

        let report = session.frame(&actions, VIEWPORT, start + Duration::from_millis(50));
        assert_eq!(report.selection, Some(Point3::new(4, 4, 6)));
        assert_eq!(report.edit, None);
        assert_eq!(session.world.voxel_count(), 28);

        session.frame(&actions, VIEWPORT, start + Duration::from_millis(200));
        assert!(session.world.is_occupied(Point3::new(4, 4, 7)));
        assert_eq!(session.world.voxel_count(), 29);
    }

    #[test]
    fn remove_wins_over_add() {
        let mut session = session();
        let actions = EditorActions {
            add_voxel: true,
            remove_voxel: true,
            ..centered_actions()
        };

        let report = session.frame(&actions, VIEWPORT, Instant::now());
        assert_eq!(
            report.edit,
            Some(EditOutcome::Removed {
                coord: Point3::new(4, 4, 5)
            })
        );
        assert!(report.instances_changed());
        assert_eq!(session.world.voxel_count(), 26);

        // The next frame's pick looks through the hole to the cell behind it
        let report = session.frame(&centered_actions(), VIEWPORT, Instant::now());
        assert_eq!(report.selection, Some(Point3::new(4, 4, 4)));
    }

    #[test]
    fn number_keys_change_material_of_next_placement() {
        let mut session = session();
        let actions = EditorActions {
            select_material: Some(Material::STONE),
            add_voxel: true,
            ..centered_actions()
        };

        let report = session.frame(&actions, VIEWPORT, Instant::now());
        assert!(report.material_changed);
        assert_eq!(session.current_material(), Material::STONE);
        assert_eq!(
            session.world.material_at(Point3::new(4, 4, 6)),
            Some(Material::STONE)
        );
    }

    #[test]
    fn drag_and_scroll_move_the_camera() {
        let mut session = session();
        let actions = EditorActions {
            rotate_view: Some((10.0, 5.0)),
            zoom_lines: 1.0,
            ..centered_actions()
        };

        session.frame(&actions, VIEWPORT, Instant::now());

        let camera = &session.camera_state.camera;
        assert!((camera.yaw.0 - 92.0).abs() < 1e-4);
        assert!((camera.pitch.0 - 1.0).abs() < 1e-4);
        assert!((camera.radius - 22.5).abs() < 1e-4);
    }
}
