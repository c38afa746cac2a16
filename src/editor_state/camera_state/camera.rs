//! # Camera Implementation
//!
//! This module contains the orbit camera and its projection:
//! - `OrbitCamera`: yaw/pitch/radius around a fixed target, driven by mouse drag and scroll
//! - `OrbitSettings`: sensitivities and radius limits
//! - `Projection`: perspective projection settings with wgpu depth remapping

use cgmath::*;

use crate::editor_state::math;

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// WGPU NDC depth ranges from 0 to 1 while OpenGL's ranges from -1 to 1.
/// This matrix performs two main transformations:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Pitch limit in degrees; keeps the view from flipping over the poles.
pub const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Tuning for how input maps onto the orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    /// Degrees of rotation per pixel of mouse travel
    pub rotate_sensitivity: f32,
    /// Fraction of the radius removed per scroll line
    pub zoom_sensitivity: f32,
    /// Closest allowed distance to the target
    pub min_radius: f32,
    /// Farthest allowed distance from the target
    pub max_radius: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.2,
            zoom_sensitivity: 0.1,
            min_radius: 5.0,
            max_radius: 100.0,
        }
    }
}

/// A camera orbiting a target on a sphere.
///
/// Yaw is unbounded and wraps through the trigonometry. Pitch stays within
/// [-89, 89] degrees and the radius within the configured limits.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Rotation about the vertical axis
    pub yaw: Deg<f32>,
    /// Elevation above (positive) or below (negative) the horizontal plane
    pub pitch: Deg<f32>,
    /// Distance from the orbit target
    pub radius: f32,
    settings: OrbitSettings,
}

impl OrbitCamera {
    /// Creates a camera, clamping the initial pitch and radius into range.
    ///
    /// # Arguments
    /// * `yaw` - Initial yaw (anything convertible to `Deg<f32>`)
    /// * `pitch` - Initial pitch
    /// * `radius` - Initial distance from the target
    /// * `settings` - Sensitivities and radius limits
    pub fn new<Y: Into<Deg<f32>>, P: Into<Deg<f32>>>(
        yaw: Y,
        pitch: P,
        radius: f32,
        settings: OrbitSettings,
    ) -> Self {
        let mut camera = Self {
            yaw: yaw.into(),
            pitch: pitch.into(),
            radius,
            settings,
        };
        camera.clamp_pitch();
        camera.clamp_radius();
        camera
    }

    /// Rotates the camera from a mouse delta in pixels.
    ///
    /// The caller gates this on the rotate button being held.
    pub fn update_from_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += Deg(dx * self.settings.rotate_sensitivity);
        self.pitch += Deg(dy * self.settings.rotate_sensitivity);
        self.clamp_pitch();
    }

    /// Scales the orbit radius by `1 - scroll_delta * zoom_sensitivity`.
    ///
    /// Multiplicative so each scroll step feels the same at any distance.
    pub fn zoom(&mut self, scroll_delta: f32) {
        self.radius *= 1.0 - scroll_delta * self.settings.zoom_sensitivity;
        self.clamp_radius();
    }

    /// Converts the spherical orbit into a world-space eye position around `target`.
    pub fn compute_eye_position(&self, target: Point3<f32>) -> Point3<f32> {
        let (yaw_sin, yaw_cos) = Rad::from(self.yaw).sin_cos();
        let (pitch_sin, pitch_cos) = Rad::from(self.pitch).sin_cos();

        target
            + Vector3::new(
                self.radius * pitch_cos * yaw_cos,
                self.radius * pitch_sin,
                self.radius * pitch_cos * yaw_sin,
            )
    }

    /// Calculates the view matrix looking from the eye position at `target`.
    pub fn calc_matrix(&self, target: Point3<f32>) -> Matrix4<f32> {
        math::look_at(self.compute_eye_position(target), target, Vector3::unit_y())
    }

    fn clamp_pitch(&mut self) {
        self.pitch = Deg(self.pitch.0.clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES));
    }

    fn clamp_radius(&mut self) {
        // NaN from a malformed scroll value falls back to the closest distance
        self.radius = if self.radius.is_nan() {
            self.settings.min_radius
        } else {
            self.radius
                .clamp(self.settings.min_radius, self.settings.max_radius)
        };
    }
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view
    fovy: Deg<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels (0 is treated as 1)
    /// * `fovy` - Vertical field of view
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Deg<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: Self::aspect_for(width, height),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = Self::aspect_for(width, height);
    }

    /// OpenGL-convention projection, used for unprojecting cursor rays.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        math::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// Projection remapped to wgpu's [0, 1] depth range, used for rendering.
    pub fn calc_wgpu_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.calc_matrix()
    }

    fn aspect_for(width: u32, height: u32) -> f32 {
        width as f32 / height.max(1) as f32
    }
}
