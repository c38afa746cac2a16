//! # Voxel World Model
//!
//! This module contains the editable voxel data:
//!
//! * **Material**: the five texture slots a voxel can carry
//! * **Face**: the six cube faces and their normals, used for placement
//! * **World**: the dense grid, its mutators and the derived instance list
//!
//! ## Data Flow
//!
//! 1. The picking engine mutates the world through `set_voxel`
//! 2. Every mutation is followed by `rebuild_instance_data`
//! 3. The renderer uploads the rebuilt instance list before drawing

use cgmath::Point3;

pub mod face;
pub mod material;
pub mod world;

/// Integer cell coordinate inside the grid.
pub type GridCoord = Point3<i32>;

/// Compact material id stored per cell.
pub type MaterialId = u8;
