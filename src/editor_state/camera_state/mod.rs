//! # Camera State Management
//!
//! Couples the orbit camera with its projection and the point it orbits, and
//! derives the per-frame matrices consumed by picking and rendering.
//!
//! The camera state is the sole source of truth for view transforms.

use cgmath::{Matrix4, Point3};

pub mod camera;

use camera::{OrbitCamera, Projection};

/// Matrices and eye position for a single frame.
#[derive(Debug, Clone, Copy)]
pub struct CameraMatrices {
    /// World-to-eye transform
    pub view: Matrix4<f32>,
    /// OpenGL-convention projection (used for unprojection)
    pub projection: Matrix4<f32>,
    /// Camera position in world space
    pub eye: Point3<f32>,
}

/// Owns the orbit camera, the projection, and the orbit target.
pub struct CameraState {
    /// The orbit parameters
    pub camera: OrbitCamera,
    /// Perspective projection settings
    pub projection: Projection,
    /// Fixed point the camera orbits around
    pub target: Point3<f32>,
}

impl CameraState {
    /// Creates a camera state orbiting `target`.
    pub fn new(camera: OrbitCamera, projection: Projection, target: Point3<f32>) -> Self {
        Self {
            camera,
            projection,
            target,
        }
    }

    /// Applies a mouse drag while the rotate button is held.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.camera.update_from_mouse_delta(dx, dy);
    }

    /// Applies a scroll delta in lines.
    pub fn zoom(&mut self, scroll_delta: f32) {
        self.camera.zoom(scroll_delta);
    }

    /// Keeps the projection aspect in sync with the framebuffer.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    /// Computes the view/projection matrices and eye position for this frame.
    pub fn matrices(&self) -> CameraMatrices {
        CameraMatrices {
            view: self.camera.calc_matrix(self.target),
            projection: self.projection.calc_matrix(),
            eye: self.camera.compute_eye_position(self.target),
        }
    }

    /// View-projection matrix in wgpu clip space for the shader uniform.
    pub fn wgpu_view_projection(&self) -> Matrix4<f32> {
        self.projection.calc_wgpu_matrix() * self.camera.calc_matrix(self.target)
    }
}
