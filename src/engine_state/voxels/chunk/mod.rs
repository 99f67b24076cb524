//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 16 × height × 16 column of
//! blocks, the unit in which the world is stored and in which cached render
//! geometry is invalidated.
//!
//! ## Storage
//!
//! Every cell is stored (air included) so reads and writes are a single index
//! computation. Alongside the blocks, a bit vector mirrors which cells are
//! solid:
//! - `solid_array`: 1 bit per cell, set when the cell is not air
//! - `blocks`: one [`Block`] per cell
//!
//! Storage order is `x` fastest, then `z`, then `y`, so each `y` level is one
//! contiguous plane of `CHUNK_PLANE_SIZE` cells.
//!
//! ### Performance Characteristics
//! - **Solidity Check**: O(1) - Just check the bit in `solid_array`
//! - **Block Lookup**: O(1)
//! - **Solid Iteration**: skips runs of air by scanning for set bits

use bitvec::prelude::BitVec;
use cgmath::{Point2, Point3};
use chunk_creation::ChunkCreationIterator;
use chunk_iteration::ChunkBlockIterator;

use super::block::block_type::BlockType;
use super::block::Block;

pub mod chunk_creation;
pub mod chunk_iteration;

/// The horizontal dimension (width and depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single horizontal plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: usize = (CHUNK_DIMENSION * CHUNK_DIMENSION) as usize;

/// Represents a 16 × height × 16 column of voxel blocks in the world.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point2<i32>,

    /// Number of horizontal planes (the world height).
    height: usize,

    /// A bit vector where each bit represents whether the corresponding block is solid (1) or air (0).
    ///
    /// Kept in sync with `blocks` by every write.
    solid_array: BitVec,

    /// The block data for every cell of this chunk, in storage order.
    blocks: Vec<Block>,

    /// Set whenever a block inside this chunk changes; cleared by the renderer
    /// once it has rebuilt its cached geometry.
    stale: bool,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty(position: Point2<i32>, height: usize) -> Self {
        ChunkCreationIterator::new(position, height).return_chunk()
    }

    /// Creates the starting chunk used by world generation.
    ///
    /// The bottom plane is bedrock, every plane below `min_terrain_height` is
    /// stone, and everything above is air waiting for the terrain generator.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    /// * `height` - The world height
    /// * `min_terrain_height` - The first `y` level left as air
    pub fn layered(position: Point2<i32>, height: usize, min_terrain_height: usize) -> Self {
        let mut cci = ChunkCreationIterator::new(position, height);

        for y in 0..height {
            let block_type = if y >= min_terrain_height {
                BlockType::AIR
            } else if y == 0 {
                BlockType::BEDROCK
            } else {
                BlockType::STONE
            };
            cci.push_plane(block_type);
        }

        cci.return_chunk()
    }

    /// The block coordinates of this chunk's minimum corner, as `(x, z)`.
    pub fn origin(&self) -> Point2<i32> {
        Point2::new(
            self.position.x * CHUNK_DIMENSION,
            self.position.y * CHUNK_DIMENSION,
        )
    }

    /// Number of block layers in this chunk.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether a chunk-local position lies inside this chunk.
    pub fn contains_local(&self, local: Point3<usize>) -> bool {
        local.x < CHUNK_DIMENSION as usize
            && local.z < CHUNK_DIMENSION as usize
            && local.y < self.height
    }

    /// Converts a chunk-local position into an index into `blocks`.
    ///
    /// # Panics
    /// Panics in debug builds if the position lies outside the chunk.
    #[inline]
    fn index_of(&self, local: Point3<usize>) -> usize {
        debug_assert!(self.contains_local(local), "{local:?} outside chunk");
        local.x + CHUNK_DIMENSION as usize * local.z + CHUNK_PLANE_SIZE * local.y
    }

    /// Converts an index into `blocks` back into a chunk-local position.
    #[inline]
    pub(crate) fn local_from_index(index: usize) -> Point3<usize> {
        let dimension = CHUNK_DIMENSION as usize;
        Point3::new(
            index % dimension,
            index / CHUNK_PLANE_SIZE,
            (index / dimension) % dimension,
        )
    }

    /// Gets a reference to the block at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn get_block_at(&self, local: Point3<usize>) -> &Block {
        &self.blocks[self.index_of(local)]
    }

    /// Checks if the block at the specified chunk-relative coordinates is solid.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn is_block_solid(&self, local: Point3<usize>) -> bool {
        self.solid_array[self.index_of(local)]
    }

    /// Replaces the block at the given chunk-relative coordinates.
    ///
    /// Returns whether the stored block changed. A change marks the chunk stale.
    pub fn set_block_at(&mut self, local: Point3<usize>, block: Block) -> bool {
        self.update_block_at(local, |stored| *stored = block)
    }

    /// Applies `update` to the block at the given chunk-relative coordinates,
    /// keeping the solidity bit in sync.
    ///
    /// Returns whether the stored block changed. A change marks the chunk stale.
    pub fn update_block_at<F>(&mut self, local: Point3<usize>, update: F) -> bool
    where
        F: FnOnce(&mut Block),
    {
        let index = self.index_of(local);
        let before = self.blocks[index];
        update(&mut self.blocks[index]);
        let after = self.blocks[index];

        if before == after {
            return false;
        }

        self.solid_array.set(index, after.is_solid());
        self.stale = true;
        true
    }

    /// Iterates over every solid block of the chunk with its local position.
    pub fn iter_solid(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// All blocks of the chunk in storage order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The number of solid blocks in this chunk.
    pub fn solid_count(&self) -> usize {
        self.solid_array.count_ones()
    }

    /// Whether a block changed since the renderer last rebuilt this chunk.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Forces a geometry rebuild of this chunk.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Records that the renderer rebuilt this chunk.
    pub fn clear_stale(&mut self) {
        self.stale = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layered_chunk_has_bedrock_floor_and_stone_below_terrain() {
        let chunk = Chunk::layered(Point2::new(0, 0), 8, 3);
        for x in 0..16 {
            for z in 0..16 {
                let at = |y| chunk.get_block_at(Point3::new(x, y, z)).block_type();
                assert_eq!(at(0), BlockType::BEDROCK);
                assert_eq!(at(1), BlockType::STONE);
                assert_eq!(at(2), BlockType::STONE);
                assert_eq!(at(3), BlockType::AIR);
                assert_eq!(at(7), BlockType::AIR);
            }
        }
        assert_eq!(chunk.solid_count(), 3 * CHUNK_PLANE_SIZE);
    }

    #[test]
    fn index_conversion_round_trips() {
        let chunk = Chunk::empty(Point2::new(0, 0), 5);
        for index in [0, 1, 15, 16, 255, 256, 4 * CHUNK_PLANE_SIZE + 37] {
            let local = Chunk::local_from_index(index);
            assert_eq!(chunk.index_of(local), index);
        }
    }

    #[test]
    fn writes_keep_solid_bits_and_staleness_in_sync() {
        let mut chunk = Chunk::empty(Point2::new(2, 3), 4);
        chunk.clear_stale();

        let local = Point3::new(4, 2, 9);
        assert!(!chunk.set_block_at(local, Block::air()));
        assert!(!chunk.is_stale());

        assert!(chunk.set_block_at(local, Block::new(BlockType::BRICK)));
        assert!(chunk.is_block_solid(local));
        assert!(chunk.is_stale());

        chunk.clear_stale();
        assert!(chunk.update_block_at(local, |block| *block = Block::air()));
        assert!(!chunk.is_block_solid(local));
        assert!(chunk.is_stale());
        assert_eq!(chunk.origin(), Point2::new(32, 48));
    }
}
