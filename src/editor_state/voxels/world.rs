//! # World Module
//!
//! This module provides the `VoxelWorld` struct, a dense cubic grid of voxels and
//! the instance data derived from it for rendering.
//!
//! ## Storage
//!
//! Two parallel dense arrays cover every cell of the `N×N×N` grid:
//! - `occupancy`: a bit vector (1 bit per cell) marking which cells hold a voxel
//! - `material_ids`: one byte per cell, reset to [`EMPTY_MATERIAL_ID`] when a cell empties
//!
//! Cells are laid out lexicographically with X outermost, then Y, then Z, so
//! walking the set bits in ascending order is also the canonical scan order used
//! by rebuilding and picking.
//!
//! ## Performance Considerations
//!
//! - `rebuild_instance_data` rescans the whole grid: O(N³) per mutation
//! - Fine for grids tens of cells wide; larger worlds would keep a sparse set of
//!   occupied cells and update the instance list incrementally

use bitvec::prelude::BitVec;
use cgmath::{Point3, Vector3};
use log::trace;

use super::{material::Material, GridCoord, MaterialId};

/// Material id stored in cells that hold no voxel.
pub const EMPTY_MATERIAL_ID: MaterialId = 0;

/// Edge length, in cells, of the block seeded at the grid center.
const SEED_BLOCK_EXTENT: i32 = 3;

/// A dense cubic voxel grid with derived per-instance render data.
///
/// # Examples
///
/// ```
/// use voxel_editor::editor_state::voxels::{material::Material, world::VoxelWorld};
/// use cgmath::Point3;
///
/// let mut world = VoxelWorld::empty(10, 1.0);
/// world.set_voxel(Point3::new(5, 5, 5), true, Material::SAND);
/// world.rebuild_instance_data();
/// assert_eq!(world.instance_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct VoxelWorld {
    grid_size: usize,
    voxel_size: f32,
    occupancy: BitVec,
    material_ids: Vec<MaterialId>,
    instance_positions: Vec<[f32; 3]>,
    instance_material_ids: Vec<f32>,
    instance_generation: u64,
}

impl VoxelWorld {
    /// Creates a world with a 3×3×3 block of grass centered in the grid.
    ///
    /// # Arguments
    /// * `grid_size` - Number of cells along each axis
    /// * `voxel_size` - Edge length of one cell in world units
    pub fn new(grid_size: usize, voxel_size: f32) -> Self {
        let mut world = Self::allocate(grid_size, voxel_size);

        let center = (grid_size / 2) as i32;
        let first = center - SEED_BLOCK_EXTENT / 2;
        for x in first..first + SEED_BLOCK_EXTENT {
            for y in first..first + SEED_BLOCK_EXTENT {
                for z in first..first + SEED_BLOCK_EXTENT {
                    world.set_voxel(Point3::new(x, y, z), true, Material::GRASS);
                }
            }
        }

        world.rebuild_instance_data();
        world
    }

    /// Creates a world with every cell empty.
    pub fn empty(grid_size: usize, voxel_size: f32) -> Self {
        let mut world = Self::allocate(grid_size, voxel_size);
        world.rebuild_instance_data();
        world
    }

    fn allocate(grid_size: usize, voxel_size: f32) -> Self {
        let cell_count = grid_size * grid_size * grid_size;
        Self {
            grid_size,
            voxel_size,
            occupancy: BitVec::repeat(false, cell_count),
            material_ids: vec![EMPTY_MATERIAL_ID; cell_count],
            instance_positions: Vec::new(),
            instance_material_ids: Vec::new(),
            instance_generation: 0,
        }
    }

    /// Number of cells along each axis.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Edge length of one cell in world units.
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// World-space centroid of the grid, used as the camera orbit target.
    pub fn get_center(&self) -> Point3<f32> {
        let half = self.grid_size as f32 * self.voxel_size / 2.0;
        Point3::new(half, half, half)
    }

    /// Returns whether a voxel exists at `coord`; `false` when out of range.
    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.index_of(coord)
            .map(|index| self.occupancy[index])
            .unwrap_or(false)
    }

    /// Returns the material of the voxel at `coord`, or `None` for empty or
    /// out-of-range cells.
    pub fn material_at(&self, coord: GridCoord) -> Option<Material> {
        let index = self.index_of(coord)?;
        if !self.occupancy[index] {
            return None;
        }
        Material::from_id(self.material_ids[index])
    }

    /// Sets or clears the voxel at `coord`.
    ///
    /// Out-of-range coordinates are ignored. Clearing a cell ignores `material`
    /// and resets the stored id to [`EMPTY_MATERIAL_ID`]. The instance data is
    /// not rebuilt here; call [`VoxelWorld::rebuild_instance_data`] before the
    /// next render.
    ///
    /// # Returns
    /// `true` if the coordinate was in range and the grid was written
    pub fn set_voxel(&mut self, coord: GridCoord, occupied: bool, material: Material) -> bool {
        let Some(index) = self.index_of(coord) else {
            trace!("Ignoring out-of-bounds voxel write at {:?}", coord);
            return false;
        };

        self.occupancy.set(index, occupied);
        self.material_ids[index] = if occupied {
            material.id()
        } else {
            EMPTY_MATERIAL_ID
        };
        true
    }

    /// Iterates occupied cells in scan order (X outermost, then Y, then Z).
    pub fn occupied_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.occupancy
            .iter_ones()
            .map(move |index| self.coord_of(index))
    }

    /// Number of occupied cells.
    pub fn voxel_count(&self) -> usize {
        self.occupancy.count_ones()
    }

    /// World-space bounding box `(min, max)` of the cell at `coord`.
    pub fn voxel_bounds(&self, coord: GridCoord) -> (Point3<f32>, Point3<f32>) {
        let min = Point3::new(
            coord.x as f32 * self.voxel_size,
            coord.y as f32 * self.voxel_size,
            coord.z as f32 * self.voxel_size,
        );
        let max = min + Vector3::new(self.voxel_size, self.voxel_size, self.voxel_size);
        (min, max)
    }

    /// Recomputes the instance list from the grid.
    ///
    /// Produces one `(position, material)` pair per occupied cell in scan order,
    /// with `position = coord * voxel_size`.
    pub fn rebuild_instance_data(&mut self) {
        self.instance_positions.clear();
        self.instance_material_ids.clear();

        for index in self.occupancy.iter_ones() {
            let coord = self.coord_of(index);
            let (min, _) = self.voxel_bounds(coord);
            self.instance_positions.push(min.into());
            self.instance_material_ids
                .push(self.material_ids[index] as f32);
        }

        self.instance_generation = self.instance_generation.wrapping_add(1);
    }

    /// World-space offsets of every instance, index-aligned with
    /// [`VoxelWorld::instance_material_ids`].
    pub fn instance_positions(&self) -> &[[f32; 3]] {
        &self.instance_positions
    }

    /// Material id of every instance, index-aligned with
    /// [`VoxelWorld::instance_positions`].
    pub fn instance_material_ids(&self) -> &[f32] {
        &self.instance_material_ids
    }

    /// Number of instances in the last rebuild.
    pub fn instance_count(&self) -> usize {
        self.instance_positions.len()
    }

    /// Counter bumped by every rebuild, so consumers can tell when to re-upload.
    pub fn instance_generation(&self) -> u64 {
        self.instance_generation
    }

    fn index_of(&self, coord: GridCoord) -> Option<usize> {
        let size = self.grid_size;
        let axis = |value: i32| usize::try_from(value).ok().filter(|v| *v < size);

        let x = axis(coord.x)?;
        let y = axis(coord.y)?;
        let z = axis(coord.z)?;
        Some((x * size + y) * size + z)
    }

    fn coord_of(&self, index: usize) -> GridCoord {
        let size = self.grid_size;
        Point3::new(
            (index / (size * size)) as i32,
            (index / size % size) as i32,
            (index % size) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(world: &VoxelWorld) -> Vec<(GridCoord, Option<Material>)> {
        world
            .occupied_coords()
            .map(|coord| (coord, world.material_at(coord)))
            .collect()
    }

    #[test]
    fn new_world_seeds_centered_block() {
        let world = VoxelWorld::new(10, 1.0);

        assert_eq!(world.voxel_count(), 27);
        assert_eq!(world.instance_count(), 27);
        assert!(world.is_occupied(Point3::new(4, 4, 4)));
        assert!(world.is_occupied(Point3::new(6, 6, 6)));
        assert!(!world.is_occupied(Point3::new(7, 5, 5)));
        assert!(!world.is_occupied(Point3::new(3, 5, 5)));
    }

    #[test]
    fn center_is_half_the_world_extent() {
        let world = VoxelWorld::empty(10, 0.5);
        assert_eq!(world.get_center(), Point3::new(2.5, 2.5, 2.5));
    }

    #[test]
    fn out_of_bounds_writes_leave_grid_unchanged() {
        let mut world = VoxelWorld::new(4, 1.0);
        let before = snapshot(&world);

        let outside = [
            Point3::new(-1, 0, 0),
            Point3::new(0, -1, 0),
            Point3::new(0, 0, -1),
            Point3::new(4, 0, 0),
            Point3::new(0, 4, 0),
            Point3::new(0, 0, 4),
            Point3::new(i32::MAX, i32::MIN, 2),
        ];
        for coord in outside {
            assert!(!world.set_voxel(coord, true, Material::STONE));
            assert!(!world.set_voxel(coord, false, Material::default()));
            assert!(!world.is_occupied(coord));
        }

        assert_eq!(snapshot(&world), before);
    }

    #[test]
    fn rebuild_matches_occupied_cells() {
        let mut world = VoxelWorld::empty(6, 2.0);
        let placed = [
            (Point3::new(0, 0, 0), Material::WOOD),
            (Point3::new(5, 1, 3), Material::LEAVES),
            (Point3::new(2, 4, 0), Material::SAND),
        ];
        for (coord, material) in placed {
            world.set_voxel(coord, true, material);
        }
        world.rebuild_instance_data();

        assert_eq!(world.instance_count(), world.voxel_count());
        assert_eq!(
            world.instance_positions(),
            &[[0.0, 0.0, 0.0], [4.0, 8.0, 0.0], [10.0, 2.0, 6.0]]
        );
        assert_eq!(world.instance_material_ids(), &[0.0, 3.0, 4.0]);
    }

    #[test]
    fn clearing_a_cell_resets_its_material() {
        let mut world = VoxelWorld::empty(4, 1.0);
        let coord = Point3::new(1, 2, 3);

        world.set_voxel(coord, true, Material::LEAVES);
        world.set_voxel(coord, false, Material::LEAVES);

        assert!(!world.is_occupied(coord));
        assert_eq!(world.material_at(coord), None);
        assert_eq!(world.material_ids[world.index_of(coord).unwrap()], EMPTY_MATERIAL_ID);
    }

    #[test]
    fn replacing_a_voxel_keeps_length_and_takes_new_material() {
        let mut world = VoxelWorld::new(10, 1.0);
        let coord = Point3::new(5, 5, 5);
        let before = world.instance_count();

        world.set_voxel(coord, false, Material::default());
        world.rebuild_instance_data();
        world.set_voxel(coord, true, Material::STONE);
        world.rebuild_instance_data();

        assert_eq!(world.instance_count(), before);
        let index = world
            .instance_positions()
            .iter()
            .position(|position| *position == [5.0, 5.0, 5.0])
            .unwrap();
        assert_eq!(world.instance_material_ids()[index], Material::STONE.id() as f32);
    }

    #[test]
    fn occupied_coords_follow_lexicographic_order() {
        let mut world = VoxelWorld::empty(3, 1.0);
        for coord in [Point3::new(2, 0, 0), Point3::new(0, 2, 1), Point3::new(0, 2, 0)] {
            world.set_voxel(coord, true, Material::GRASS);
        }

        let order: Vec<_> = world.occupied_coords().collect();
        assert_eq!(
            order,
            vec![Point3::new(0, 2, 0), Point3::new(0, 2, 1), Point3::new(2, 0, 0)]
        );
    }

    #[test]
    fn every_occupied_cell_reports_a_known_material() {
        let mut world = VoxelWorld::empty(5, 1.0);
        for (slot, material) in Material::all().into_iter().enumerate() {
            world.set_voxel(Point3::new(slot as i32, 0, 0), true, material);
        }
        world.rebuild_instance_data();

        for (slot, material) in Material::all().into_iter().enumerate() {
            assert_eq!(world.material_at(Point3::new(slot as i32, 0, 0)), Some(material));
        }
        assert_eq!(world.instance_material_ids(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(world
            .occupied_coords()
            .all(|coord| world.material_at(coord).is_some()));
    }

    #[test]
    fn rebuild_bumps_generation() {
        let mut world = VoxelWorld::empty(2, 1.0);
        let generation = world.instance_generation();
        world.rebuild_instance_data();
        assert_eq!(world.instance_generation(), generation + 1);
    }

    #[test]
    fn tiny_grid_seed_is_clipped_to_bounds() {
        let world = VoxelWorld::new(1, 1.0);
        assert_eq!(world.voxel_count(), 1);
    }
}
