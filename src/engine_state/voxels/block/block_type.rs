//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification, conversion and
//! lookup by name.

use std::{fmt, str::FromStr};

use num_derive::FromPrimitive;
use phf::phf_map;

use super::BlockTypeSize;
use crate::error::ConfigError;

/// Enumerates all possible block types in the voxel world.
///
/// Block types are opaque identifiers: apart from the handful of predicates
/// below they carry no behaviour. The `FromPrimitive` derive allows conversion
/// from the compact integer stored inside a [`Block`](super::Block).
///
/// `AIR` must stay at discriminant zero so that a zeroed block is air.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum BlockType {
    /// An air block, which is non-solid and transparent.
    AIR = 0,

    /// The untextured fallback block.
    DEFAULT,

    /// The indestructible floor of the world (always at `y == 0`).
    BEDROCK,

    /// Plain stone, filling everything below the terrain.
    STONE,

    /// A basic dirt block found just below the surface.
    DIRT,

    /// A grass block with different textures on top and sides.
    GRASS,

    /// A tree trunk.
    TREE,

    /// Tree canopy.
    LEAF,

    /// The block players place.
    BRICK,

    /// Ore pockets scattered through the stone layer.
    ORE,
}

/// Lower-case names for every block type, as used in configuration files.
pub static BLOCK_TYPE_NAMES: phf::Map<&'static str, BlockType> = phf_map! {
    "air" => BlockType::AIR,
    "default" => BlockType::DEFAULT,
    "bedrock" => BlockType::BEDROCK,
    "stone" => BlockType::STONE,
    "dirt" => BlockType::DIRT,
    "grass" => BlockType::GRASS,
    "tree" => BlockType::TREE,
    "leaf" => BlockType::LEAF,
    "brick" => BlockType::BRICK,
    "ore" => BlockType::ORE,
};

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// Unknown ids (which can only appear through raw byte casts) decode as
    /// `DEFAULT` rather than panicking.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Self {
        num::FromPrimitive::from_u8(btype).unwrap_or(BlockType::DEFAULT)
    }

    /// Whether this block fills its cell (everything except air).
    #[inline]
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }

    /// Blocks that can never be removed by an edit.
    #[inline]
    pub fn is_indestructible(self) -> bool {
        self == BlockType::BEDROCK
    }

    /// Sealed blocks keep all six faces occluded through whole-world
    /// neighbour passes. Only a single-block edit right next to one exposes it.
    #[inline]
    pub fn is_sealed(self) -> bool {
        self == BlockType::ORE
    }

    /// The configuration name of this block type.
    pub fn name(self) -> &'static str {
        BLOCK_TYPE_NAMES
            .entries()
            .find(|(_, btype)| **btype == self)
            .map(|(name, _)| *name)
            .unwrap_or("default")
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for BlockType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BLOCK_TYPE_NAMES
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| ConfigError::UnknownBlockType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for (name, btype) in BLOCK_TYPE_NAMES.entries() {
            assert_eq!(name.parse::<BlockType>().unwrap(), *btype);
            assert_eq!(btype.name(), *name);
        }
        assert_eq!(" Brick ".parse::<BlockType>().unwrap(), BlockType::BRICK);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(matches!(
            "obsidian".parse::<BlockType>(),
            Err(ConfigError::UnknownBlockType(name)) if name == "obsidian"
        ));
    }

    #[test]
    fn unknown_ids_decode_as_default() {
        assert_eq!(BlockType::get_block_type_from_int(0), BlockType::AIR);
        assert_eq!(
            BlockType::get_block_type_from_int(BlockType::ORE as BlockTypeSize),
            BlockType::ORE
        );
        assert_eq!(BlockType::get_block_type_from_int(200), BlockType::DEFAULT);
    }
}
