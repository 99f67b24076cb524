//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel world.
//! It includes block type definitions, block face handling, and the per-cell
//! block data stored by chunks.

use block_side::BlockSide;
use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Occlusion mask with every face hidden.
pub const ALL_SIDES_OCCLUDED: u8 = 0b11_1111;

/// Maps each block type to its corresponding texture indices for each face.
///
/// The outer array is indexed by `BlockType` as a `usize`.
/// The inner array contains 6 texture indices, one for each face in the order:
/// [Front, Back, Right, Left, Top, Bottom]
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[usize; 6]; 10] = [
    [0, 0, 0, 0, 0, 0],       // AIR (never drawn)
    [1, 1, 1, 1, 1, 1],       // DEFAULT
    [9, 9, 9, 9, 9, 9],       // BEDROCK
    [2, 2, 2, 2, 2, 2],       // STONE
    [5, 5, 5, 5, 5, 5],       // DIRT
    [3, 3, 3, 3, 4, 5],       // GRASS (top: 4, bottom: dirt)
    [7, 7, 7, 7, 6, 6],       // TREE (rings on top and bottom)
    [8, 8, 8, 8, 8, 8],       // LEAF
    [10, 10, 10, 10, 10, 10], // BRICK
    [15, 15, 15, 15, 15, 15], // ORE
];

/// Represents a single voxel block in the world.
///
/// This is a lightweight structure holding everything the world tracks about
/// one cell: its type, which of its faces are hidden by a solid neighbour, and
/// the light level reaching it.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute and the `Pod` derive make a block exactly three
/// bytes, so whole chunks can be viewed as byte slices (see
/// [`World::snapshot`](super::world::World::snapshot)).
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    block_type: BlockTypeSize,
    /// One bit per `BlockSide`; a set bit means that face is hidden.
    occluded: u8,
    /// Light level. Only meaningful for air.
    light: u8,
}

impl Block {
    /// Creates a new block of the specified type with no occluded faces and no light.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
            occluded: 0,
            light: 0,
        }
    }

    /// An empty cell.
    pub fn air() -> Self {
        Self::new(BlockType::AIR)
    }

    /// Creates a block with all six faces already hidden.
    pub fn sealed(block_type: BlockType) -> Self {
        Block {
            occluded: ALL_SIDES_OCCLUDED,
            ..Self::new(block_type)
        }
    }

    /// The decoded type of this block.
    #[inline]
    pub fn block_type(&self) -> BlockType {
        BlockType::get_block_type_from_int(self.block_type)
    }

    #[inline]
    /// Whether this cell is empty.
    pub fn is_air(&self) -> bool {
        self.block_type == BlockType::AIR as BlockTypeSize
    }

    #[inline]
    /// Whether this cell is filled.
    pub fn is_solid(&self) -> bool {
        !self.is_air()
    }

    /// Whether the given face is hidden by an adjacent solid cell (or the world edge).
    #[inline]
    pub fn is_occluded(&self, side: BlockSide) -> bool {
        self.occluded & side.mask() != 0
    }

    /// Sets or clears the occlusion flag of one face.
    pub fn set_occluded(&mut self, side: BlockSide, occluded: bool) {
        if occluded {
            self.occluded |= side.mask();
        } else {
            self.occluded &= !side.mask();
        }
    }

    /// The raw occlusion bits, indexed by `BlockSide as u8`.
    #[inline]
    pub fn occlusion_mask(&self) -> u8 {
        self.occluded
    }

    /// Replaces all six occlusion flags at once. Bits above the sixth are ignored.
    pub fn set_occlusion_mask(&mut self, mask: u8) {
        self.occluded = mask & ALL_SIDES_OCCLUDED;
    }

    /// The occlusion flags unpacked in `BlockSide::all()` order.
    pub fn occluded_sides(&self) -> [bool; 6] {
        BlockSide::all().map(|side| self.is_occluded(side))
    }

    #[inline]
    /// The light level reaching this cell.
    pub fn light(&self) -> u8 {
        self.light
    }

    /// Sets the light level of this cell.
    pub fn set_light(&mut self, light: u8) {
        self.light = light;
    }

    /// Gets the texture indices for all faces of this block.
    pub fn texture_indices(&self) -> [usize; 6] {
        Self::get_texture_indices_from_int(self.block_type)
    }

    /// Gets the texture indices for all faces of a block given its type as an integer.
    ///
    /// # Arguments
    /// * `btype_int` - The block type as a `BlockTypeSize`
    ///
    /// # Returns
    /// An array of 6 texture indices, one for each face of the block.
    pub fn get_texture_indices_from_int(btype_int: BlockTypeSize) -> [usize; 6] {
        let block_type = BlockType::get_block_type_from_int(btype_int);
        BLOCK_TYPE_TO_TEXTURE_INDICES[block_type as usize]
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::air()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_block_is_air() {
        let block: Block = bytemuck::Zeroable::zeroed();
        assert!(block.is_air());
        assert_eq!(block, Block::air());
        assert_eq!(std::mem::size_of::<Block>(), 3);
    }

    #[test]
    fn occlusion_flags_are_independent() {
        let mut block = Block::new(BlockType::STONE);
        block.set_occluded(BlockSide::TOP, true);
        block.set_occluded(BlockSide::LEFT, true);
        block.set_occluded(BlockSide::LEFT, false);
        assert!(block.is_occluded(BlockSide::TOP));
        assert!(!block.is_occluded(BlockSide::LEFT));
        assert_eq!(
            block.occluded_sides(),
            [false, false, false, false, true, false]
        );
    }

    #[test]
    fn sealed_blocks_hide_every_face() {
        let ore = Block::sealed(BlockType::ORE);
        assert_eq!(ore.occlusion_mask(), ALL_SIDES_OCCLUDED);
        assert_eq!(ore.texture_indices(), [15; 6]);
    }

    #[test]
    fn grass_has_distinct_top_texture() {
        let grass = Block::new(BlockType::GRASS);
        let textures = grass.texture_indices();
        assert_eq!(textures[BlockSide::TOP as usize], 4);
        assert_eq!(textures[BlockSide::BOTTOM as usize], 5);
    }
}
