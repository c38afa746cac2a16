//! # Voxel Face Module
//!
//! The six faces of a voxel cube and their outward normals, in the order the
//! placement engine tests them.

use cgmath::{Point3, Vector3};

/// One of the six faces of a voxel.
///
/// Discriminants follow the face test order: -X, +X, -Y, +Y, -Z, +Z.
#[allow(non_camel_case_types)]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum VoxelFace {
    /// The face at the box minimum on X
    NEG_X = 0,
    /// The face at the box maximum on X
    POS_X = 1,
    /// The face at the box minimum on Y (bottom)
    NEG_Y = 2,
    /// The face at the box maximum on Y (top)
    POS_Y = 3,
    /// The face at the box minimum on Z
    NEG_Z = 4,
    /// The face at the box maximum on Z
    POS_Z = 5,
}

impl VoxelFace {
    /// All faces in test order. The first face matching a hit point wins, so a
    /// ray striking an edge or corner resolves deterministically.
    pub fn all() -> [VoxelFace; 6] {
        [
            VoxelFace::NEG_X,
            VoxelFace::POS_X,
            VoxelFace::NEG_Y,
            VoxelFace::POS_Y,
            VoxelFace::NEG_Z,
            VoxelFace::POS_Z,
        ]
    }

    /// Integer outward normal, used to step to the neighbouring cell.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            VoxelFace::NEG_X => Vector3::new(-1, 0, 0),
            VoxelFace::POS_X => Vector3::new(1, 0, 0),
            VoxelFace::NEG_Y => Vector3::new(0, -1, 0),
            VoxelFace::POS_Y => Vector3::new(0, 1, 0),
            VoxelFace::NEG_Z => Vector3::new(0, 0, -1),
            VoxelFace::POS_Z => Vector3::new(0, 0, 1),
        }
    }

    /// Axis index (0 = X, 1 = Y, 2 = Z) the face is perpendicular to.
    pub fn axis(self) -> usize {
        self as usize / 2
    }

    /// Whether the face lies on the maximum side of its axis.
    pub fn is_max_side(self) -> bool {
        self as usize % 2 == 1
    }

    /// Finds the first face whose plane contains `point` within `epsilon`.
    ///
    /// # Arguments
    /// * `point` - A point on (or very near) the surface of the box
    /// * `box_min` - Minimum corner of the box
    /// * `box_max` - Maximum corner of the box
    /// * `epsilon` - Absolute tolerance in world units
    pub fn from_surface_point(
        point: Point3<f32>,
        box_min: Point3<f32>,
        box_max: Point3<f32>,
        epsilon: f32,
    ) -> Option<VoxelFace> {
        VoxelFace::all().into_iter().find(|face| {
            let axis = face.axis();
            let plane = if face.is_max_side() {
                box_max[axis]
            } else {
                box_min[axis]
            };
            (point[axis] - plane).abs() < epsilon
        })
    }
}
