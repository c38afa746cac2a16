//! # Material Module
//!
//! The five texture slots a voxel can be painted with.

use std::fmt;

use num_derive::FromPrimitive;

use super::MaterialId;

/// Number of selectable material slots.
pub const MATERIAL_COUNT: usize = 5;

/// Enumerates the materials a voxel can carry.
///
/// The discriminant is the material id stored in the grid and uploaded to the
/// GPU; it also indexes the layer of the material texture array.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum Material {
    /// Wood planks (slot 1)
    WOOD = 0,
    /// Grass (slot 2)
    GRASS = 1,
    /// Stone (slot 3)
    STONE = 2,
    /// Sand (slot 4)
    SAND = 3,
    /// Leaves (slot 5)
    LEAVES = 4,
}

impl Material {
    /// All materials in slot order.
    pub fn all() -> [Material; MATERIAL_COUNT] {
        [
            Material::WOOD,
            Material::GRASS,
            Material::STONE,
            Material::SAND,
            Material::LEAVES,
        ]
    }

    /// Looks a material up by id.
    ///
    /// # Returns
    /// `None` for ids outside [0, 4]
    pub fn from_id(id: MaterialId) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// Maps a 1-based keyboard slot to its material.
    pub fn from_slot(slot: usize) -> Option<Self> {
        slot.checked_sub(1)
            .and_then(|index| num::FromPrimitive::from_usize(index))
    }

    /// The id stored in the grid for this material.
    pub fn id(self) -> MaterialId {
        self as MaterialId
    }

    /// File stem of the material texture inside the texture directory.
    pub fn texture_stem(self) -> &'static str {
        match self {
            Material::WOOD => "wood",
            Material::GRASS => "grass",
            Material::STONE => "stone",
            Material::SAND => "sand",
            Material::LEAVES => "leaves",
        }
    }

    /// RGBA tint used for the placeholder tile when a texture is missing.
    pub fn placeholder_tint(self) -> [u8; 4] {
        match self {
            Material::WOOD => [133, 94, 66, 255],
            Material::GRASS => [86, 160, 62, 255],
            Material::STONE => [128, 128, 128, 255],
            Material::SAND => [219, 201, 142, 255],
            Material::LEAVES => [52, 110, 44, 255],
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::WOOD
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Material::WOOD => "Wood",
            Material::GRASS => "Grass",
            Material::STONE => "Stone",
            Material::SAND => "Sand",
            Material::LEAVES => "Leaves",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_lookup() {
        for material in Material::all() {
            assert_eq!(Material::from_id(material.id()), Some(material));
        }
        assert_eq!(Material::from_id(5), None);
    }

    #[test]
    fn keyboard_slots_are_one_based() {
        assert_eq!(Material::from_slot(1), Some(Material::WOOD));
        assert_eq!(Material::from_slot(5), Some(Material::LEAVES));
        assert_eq!(Material::from_slot(0), None);
        assert_eq!(Material::from_slot(6), None);
    }
}
