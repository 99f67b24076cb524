//! # Chunk Creation Module
//!
//! This module provides a builder that populates a chunk's block storage and
//! its solidity bit vector in storage order, keeping the two consistent.

use bitvec::vec::BitVec;
use cgmath::Point2;

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

use super::{Chunk, CHUNK_PLANE_SIZE};

/// A builder for creating and populating chunks one block at a time.
///
/// Blocks must be pushed in storage order: `x` fastest, then `z`, then `y`
/// (one full horizontal plane per `y` level). The builder maintains:
/// 1. The bit vector tracking solid blocks (`solid_array`)
/// 2. The vector storing the block data (`blocks`)
pub struct ChunkCreationIterator {
    /// The chunk coordinates of the chunk being created
    position: Point2<i32>,
    /// Number of horizontal planes the chunk holds
    height: usize,
    /// One bit per cell, set when the cell is solid
    solid_array: BitVec,
    /// Block data for every cell pushed so far
    blocks: Vec<Block>,
}

impl ChunkCreationIterator {
    /// Creates a new `ChunkCreationIterator` for building a chunk at the given position.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the chunk to create
    /// * `height` - The world height, i.e. the number of planes in the chunk
    pub fn new(position: Point2<i32>, height: usize) -> Self {
        let capacity = CHUNK_PLANE_SIZE * height;
        ChunkCreationIterator {
            position,
            height,
            solid_array: BitVec::with_capacity(capacity),
            blocks: Vec::with_capacity(capacity),
        }
    }

    /// Adds a block at the current position and advances the position.
    pub fn push_block(&mut self, block: Block) {
        self.solid_array.push(block.is_solid());
        self.blocks.push(block);
    }

    /// Adds a fresh block of the given type.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        self.push_block(Block::new(block_type));
    }

    /// Fills one whole horizontal plane with the given block type.
    pub fn push_plane(&mut self, block_type: BlockType) {
        for _ in 0..CHUNK_PLANE_SIZE {
            self.push_block_type(block_type);
        }
    }

    /// Finalizes the chunk creation and returns the constructed `Chunk`.
    ///
    /// Cells that were never pushed are filled with air. The new chunk starts
    /// out stale since no geometry has been built for it yet.
    pub fn return_chunk(mut self) -> Chunk {
        let capacity = CHUNK_PLANE_SIZE * self.height;
        self.blocks.truncate(capacity);
        self.solid_array.truncate(capacity);
        while self.blocks.len() < capacity {
            self.push_block_type(BlockType::AIR);
        }

        Chunk {
            position: self.position,
            height: self.height,
            solid_array: self.solid_array,
            blocks: self.blocks,
            stale: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;

    #[test]
    fn short_builds_are_padded_with_air() {
        let mut cci = ChunkCreationIterator::new(Point2::new(0, 0), 4);
        cci.push_plane(BlockType::BEDROCK);
        cci.push_block_type(BlockType::STONE);
        let chunk = cci.return_chunk();

        assert!(chunk.is_block_solid(Point3::new(15, 0, 15)));
        assert_eq!(
            chunk.get_block_at(Point3::new(0, 1, 0)).block_type(),
            BlockType::STONE
        );
        assert!(!chunk.is_block_solid(Point3::new(1, 1, 0)));
        assert!(!chunk.is_block_solid(Point3::new(0, 3, 0)));
        assert!(chunk.is_stale());
    }
}
