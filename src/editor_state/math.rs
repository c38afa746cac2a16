//! # Geometry Utilities
//!
//! Stateless helpers shared by the camera, the picking engine and the renderer:
//! - Perspective and view matrix construction (OpenGL clip conventions)
//! - Screen-to-world ray unprojection
//! - Ray/axis-aligned-box intersection using the slab method
//!
//! All matrices produced here use the OpenGL convention (NDC depth in [-1, 1]).
//! The renderer applies `OPENGL_TO_WGPU_MATRIX` on top before uploading.

use cgmath::{Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3, Vector4};

/// A half-line in world space.
///
/// The direction is always unit length when produced by [`Ray::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray
    pub origin: Point3<f32>,
    /// Normalized direction of travel
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// # Returns
    /// `None` when the direction has zero (or non-finite) length, so a degenerate
    /// ray is treated as "hits nothing" instead of producing NaNs downstream.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Option<Self> {
        let length = direction.magnitude();
        if !length.is_finite() || length <= f32::EPSILON {
            return None;
        }

        Some(Self {
            origin,
            direction: direction / length,
        })
    }

    /// Creates a ray starting at `origin` and aimed at `target`.
    pub fn towards(origin: Point3<f32>, target: Point3<f32>) -> Option<Self> {
        Self::new(origin, target - origin)
    }

    /// Returns the point reached after travelling `t` units along the ray.
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Entry and exit distances of a ray through a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxHit {
    /// Parametric distance where the ray enters the box (negative when the origin is inside)
    pub t_near: f32,
    /// Parametric distance where the ray leaves the box
    pub t_far: f32,
}

/// Builds an OpenGL-style perspective projection matrix.
///
/// # Arguments
/// * `fovy` - Vertical field of view
/// * `aspect` - Viewport width divided by height
/// * `near` - Near clipping plane distance
/// * `far` - Far clipping plane distance
pub fn perspective(fovy: Deg<f32>, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    cgmath::perspective(fovy, aspect, near, far)
}

/// Builds a right-handed view matrix looking from `eye` towards `target`.
pub fn look_at(eye: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::look_at_rh(eye, target, up)
}

/// Intersects a ray with an axis-aligned box using the slab method.
///
/// Division by a zero direction component yields ±infinity under IEEE-754, so a
/// ray parallel to a slab and outside of it reports no hit without special casing.
///
/// # Returns
/// `None` when the ray misses (`t_near > t_far`) or the box is entirely behind
/// the origin (`t_far < 0`).
pub fn ray_box_intersection(
    ray: &Ray,
    box_min: Point3<f32>,
    box_max: Point3<f32>,
) -> Option<BoxHit> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let t0 = (box_min[axis] - ray.origin[axis]) / ray.direction[axis];
        let t1 = (box_max[axis] - ray.origin[axis]) / ray.direction[axis];

        t_near = t_near.max(t0.min(t1));
        t_far = t_far.min(t0.max(t1));
    }

    if t_near > t_far || t_far < 0.0 {
        return None;
    }

    Some(BoxHit { t_near, t_far })
}

/// Casts a world-space ray through a pixel of the viewport.
///
/// The cursor is mapped to NDC (Y flipped, since pixel rows grow downwards), a
/// far-plane point is unprojected through the inverse projection, its eye-space
/// direction is forced to point into the scene (-Z) and finally rotated into
/// world space by the inverse view matrix.
///
/// # Arguments
/// * `cursor` - Cursor position in pixels, origin at the top-left corner
/// * `viewport` - Framebuffer size in pixels
/// * `view` - World-to-eye matrix
/// * `projection` - OpenGL-style projection matrix
/// * `eye` - Camera position in world space, used as the ray origin
///
/// # Returns
/// `None` for an empty viewport, singular matrices or a degenerate direction.
pub fn ray_from_cursor(
    cursor: (f32, f32),
    viewport: (u32, u32),
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
    eye: Point3<f32>,
) -> Option<Ray> {
    let (width, height) = viewport;
    if width == 0 || height == 0 {
        return None;
    }

    let ndc_x = (2.0 * cursor.0) / width as f32 - 1.0;
    let ndc_y = 1.0 - (2.0 * cursor.1) / height as f32;
    let ray_clip = Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

    let inverse_projection = projection.invert()?;
    let inverse_view = view.invert()?;

    let ray_eye = inverse_projection * ray_clip;
    let ray_eye = Vector4::new(ray_eye.x, ray_eye.y, -1.0, 0.0);

    let ray_world = inverse_view * ray_eye;
    Ray::new(eye, ray_world.truncate())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> (Point3<f32>, Point3<f32>) {
        (Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn ray_aimed_at_box_center_hits_in_front() {
        let (min, max) = unit_box();
        let ray = Ray::towards(Point3::new(-3.0, 2.0, 4.0), Point3::new(0.5, 0.5, 0.5)).unwrap();

        let hit = ray_box_intersection(&ray, min, max).expect("ray should hit the box");
        assert!(hit.t_near >= 0.0);
        assert!(hit.t_near < hit.t_far);
    }

    #[test]
    fn ray_aimed_away_from_box_misses() {
        let (min, max) = unit_box();
        let ray = Ray::new(Point3::new(0.5, 0.5, 5.0), Vector3::new(0.0, 0.0, 1.0)).unwrap();

        assert_eq!(ray_box_intersection(&ray, min, max), None);
    }

    #[test]
    fn parallel_ray_outside_slab_misses() {
        let (min, max) = unit_box();
        // Travels along +X at y = 2, never inside the Y slab.
        let ray = Ray::new(Point3::new(-5.0, 2.0, 0.5), Vector3::new(1.0, 0.0, 0.0)).unwrap();

        assert_eq!(ray_box_intersection(&ray, min, max), None);
    }

    #[test]
    fn parallel_ray_inside_slab_hits() {
        let (min, max) = unit_box();
        let ray = Ray::new(Point3::new(-5.0, 0.5, 0.5), Vector3::new(1.0, 0.0, 0.0)).unwrap();

        let hit = ray_box_intersection(&ray, min, max).unwrap();
        assert!((hit.t_near - 5.0).abs() < 1e-5);
        assert!((hit.t_far - 6.0).abs() < 1e-5);
    }

    #[test]
    fn origin_inside_box_reports_negative_entry() {
        let (min, max) = unit_box();
        let ray = Ray::new(Point3::new(0.5, 0.5, 0.5), Vector3::new(0.0, 1.0, 0.0)).unwrap();

        let hit = ray_box_intersection(&ray, min, max).unwrap();
        assert!(hit.t_near < 0.0);
        assert!((hit.t_far - 0.5).abs() < 1e-5);
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert_eq!(Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0)), None);
    }

    #[test]
    fn center_pixel_ray_points_at_target() {
        let eye = Point3::new(5.0, 5.0, 20.0);
        let target = Point3::new(5.0, 5.0, 5.0);
        let view = look_at(eye, target, Vector3::unit_y());
        let projection = perspective(Deg(45.0), 800.0 / 600.0, 0.1, 500.0);

        let ray = ray_from_cursor((400.0, 300.0), (800, 600), &view, &projection, eye).unwrap();

        assert_eq!(ray.origin, eye);
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-4);
    }

    #[test]
    fn upper_half_of_screen_casts_upwards() {
        let eye = Point3::new(0.0, 0.0, 10.0);
        let view = look_at(eye, Point3::new(0.0, 0.0, 0.0), Vector3::unit_y());
        let projection = perspective(Deg(60.0), 1.0, 0.1, 100.0);

        let ray = ray_from_cursor((50.0, 10.0), (100, 100), &view, &projection, eye).unwrap();

        assert!(ray.direction.y > 0.0);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn empty_viewport_casts_nothing() {
        let eye = Point3::new(0.0, 0.0, 10.0);
        let view = look_at(eye, Point3::new(0.0, 0.0, 0.0), Vector3::unit_y());
        let projection = perspective(Deg(60.0), 1.0, 0.1, 100.0);

        assert_eq!(ray_from_cursor((0.0, 0.0), (0, 100), &view, &projection, eye), None);
    }
}
