//! # Editor Configuration
//!
//! Tunables for the grid, window, camera and edit timing, read from a JSON file.
//! Every field is optional in the file; missing fields take their defaults.
//!
//! The file is looked up at `$VOXEL_EDITOR_CONFIG`, falling back to
//! `voxel_editor.json` in the working directory. No file at all means the
//! defaults are used.

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::{
    editor_state::{camera_state::camera::OrbitSettings, rendering::VoxelInstance},
    error::EditorError,
};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "VOXEL_EDITOR_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "voxel_editor.json";

const DEFAULT_GRID_SIZE: usize = 10;
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_WINDOW_TITLE: &str = "Voxel Editor 3D";
const DEFAULT_ACTION_COOLDOWN_MS: u64 = 150;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Cells per axis of the cubic grid
    pub grid_size: usize,
    /// Edge length of one voxel in world units
    pub voxel_size: f32,
    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    /// Initial camera yaw in degrees
    pub camera_yaw: f32,
    /// Initial camera pitch in degrees
    pub camera_pitch: f32,
    /// Initial orbit radius
    pub camera_radius: f32,
    /// Degrees per pixel of mouse drag
    pub rotate_sensitivity: f32,
    /// Fractional radius change per scroll line
    pub zoom_sensitivity: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Minimum delay between two add/remove actions, in milliseconds
    pub action_cooldown_ms: u64,
    pub shader_path: PathBuf,
    /// Directory holding `<material>.png` textures
    pub texture_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let orbit = OrbitSettings::default();
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            voxel_size: 1.0,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            fov_degrees: 45.0,
            near_plane: 0.1,
            far_plane: 500.0,
            camera_yaw: 45.0,
            camera_pitch: 30.0,
            camera_radius: 25.0,
            rotate_sensitivity: orbit.rotate_sensitivity,
            zoom_sensitivity: orbit.zoom_sensitivity,
            min_radius: orbit.min_radius,
            max_radius: orbit.max_radius,
            action_cooldown_ms: DEFAULT_ACTION_COOLDOWN_MS,
            shader_path: PathBuf::from("assets/shaders/voxel_shader.wgsl"),
            texture_dir: PathBuf::from("assets/textures"),
        }
    }
}

impl EditorConfig {
    /// Loads the config from `$VOXEL_EDITOR_CONFIG` or `voxel_editor.json`.
    pub fn load() -> Result<Self, EditorError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from_path(&path)
    }

    /// Loads and validates the config at `path`.
    ///
    /// A file that does not exist yields the defaults. A file that exists but
    /// cannot be read, parsed or validated is an error.
    pub fn load_from_path(path: &Path) -> Result<Self, EditorError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(EditorError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self =
            serde_json::from_str(&contents).map_err(|source| EditorError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Rejects values the editor cannot work with.
    ///
    /// The grid must fit in a single instance buffer under the default device
    /// limits, which are the limits the editor requests.
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.grid_size == 0 {
            return Err(EditorError::invalid_config("grid_size must be at least 1"));
        }
        let max_buffer_size = wgpu::Limits::default().max_buffer_size;
        if !VoxelInstance::grid_capacity_bytes(self.grid_size)
            .is_some_and(|bytes| bytes <= max_buffer_size)
        {
            return Err(EditorError::invalid_config(format!(
                "grid_size {} needs more than the {} byte instance buffer limit",
                self.grid_size, max_buffer_size
            )));
        }
        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(EditorError::invalid_config(format!(
                "voxel_size must be positive, got {}",
                self.voxel_size
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(EditorError::invalid_config(format!(
                "fov_degrees must lie in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        let finite_fields = [
            ("camera_yaw", self.camera_yaw),
            ("camera_pitch", self.camera_pitch),
            ("rotate_sensitivity", self.rotate_sensitivity),
            ("zoom_sensitivity", self.zoom_sensitivity),
            ("max_radius", self.max_radius),
            ("far_plane", self.far_plane),
        ];
        if let Some((name, value)) = finite_fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(EditorError::invalid_config(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
        if !(self.min_radius > 0.0 && self.min_radius <= self.max_radius) {
            return Err(EditorError::invalid_config(format!(
                "radius range [{}, {}] is empty or not positive",
                self.min_radius, self.max_radius
            )));
        }
        if !(self.near_plane > 0.0 && self.far_plane > self.near_plane) {
            return Err(EditorError::invalid_config(format!(
                "clip planes near={} far={} must satisfy 0 < near < far",
                self.near_plane, self.far_plane
            )));
        }
        if !(self.min_radius..=self.max_radius).contains(&self.camera_radius) {
            return Err(EditorError::invalid_config(format!(
                "camera_radius {} outside [{}, {}]",
                self.camera_radius, self.min_radius, self.max_radius
            )));
        }
        Ok(())
    }

    pub fn orbit_settings(&self) -> OrbitSettings {
        OrbitSettings {
            rotate_sensitivity: self.rotate_sensitivity,
            zoom_sensitivity: self.zoom_sensitivity,
            min_radius: self.min_radius,
            max_radius: self.max_radius,
        }
    }

    pub fn action_cooldown(&self) -> Duration {
        Duration::from_millis(self.action_cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("voxel_editor_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.action_cooldown(), Duration::from_millis(150));
        assert_eq!(config.window_title, "Voxel Editor 3D");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "grid_size": 16, "voxel_size": 0.5 }"#).unwrap();

        assert_eq!(config.grid_size, 16);
        assert_eq!(config.voxel_size, 0.5);
        assert_eq!(config.far_plane, 500.0);
        assert_eq!(config.orbit_settings(), OrbitSettings::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = temp_config_path("missing");
        let _ = std::fs::remove_file(&path);

        let config = EditorConfig::load_from_path(&path).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = temp_config_path("malformed");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"{ grid_size: ").unwrap();
        drop(file);

        let result = EditorConfig::load_from_path(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(EditorError::ConfigParse { .. })));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = EditorConfig::default();
        config.grid_size = 0;
        assert!(matches!(config.validate(), Err(EditorError::InvalidConfig { .. })));

        let mut config = EditorConfig::default();
        config.voxel_size = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.min_radius = 50.0;
        config.max_radius = 10.0;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.far_plane = config.near_plane;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.camera_radius = 1.0;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.grid_size = 300;
        assert!(matches!(config.validate(), Err(EditorError::InvalidConfig { .. })));

        let mut config = EditorConfig::default();
        config.grid_size = usize::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn largest_grid_within_buffer_limit_is_accepted() {
        let max_buffer_size = wgpu::Limits::default().max_buffer_size;
        let fits = |size: usize| {
            VoxelInstance::grid_capacity_bytes(size).is_some_and(|bytes| bytes <= max_buffer_size)
        };
        let largest = (1..).take_while(|size| fits(*size)).last().unwrap();

        let mut config = EditorConfig::default();
        config.grid_size = largest;
        assert!(config.validate().is_ok());
        config.grid_size = largest + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_camera_values_are_rejected() {
        let broken: [fn(&mut EditorConfig); 7] = [
            |config| config.camera_pitch = f32::NAN,
            |config| config.camera_yaw = f32::INFINITY,
            |config| config.fov_degrees = 0.0,
            |config| config.fov_degrees = 180.0,
            |config| config.fov_degrees = f32::NAN,
            |config| config.rotate_sensitivity = f32::NAN,
            |config| config.zoom_sensitivity = f32::NEG_INFINITY,
        ];

        for apply in broken {
            let mut config = EditorConfig::default();
            apply(&mut config);
            assert!(
                matches!(config.validate(), Err(EditorError::InvalidConfig { .. })),
                "accepted {:?}",
                config
            );
        }
    }
}
