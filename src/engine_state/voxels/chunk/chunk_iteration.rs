//! # Chunk Iteration Module
//!
//! This module provides an iterator over the solid blocks of a chunk.
//!
//! The iterator walks the chunk's `solid_array` bit vector, jumping straight
//! from one set bit to the next, so runs of air cost almost nothing.

use cgmath::Point3;

use crate::engine_state::voxels::block::Block;

use super::Chunk;

/// An iterator over all non-air blocks in a chunk, in storage order.
///
/// Yields the chunk-local position of each solid block together with the block.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Next position in the solid array to scan from
    current_solid_offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` for the given chunk.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            current_solid_offset: 0,
        }
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Point3<usize>, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunk_ref;
        if self.current_solid_offset >= chunk.solid_array.len() {
            return None;
        }

        let remaining = &chunk.solid_array[self.current_solid_offset..];
        let offset = self.current_solid_offset + remaining.first_one()?;
        self.current_solid_offset = offset + 1;

        Some((Chunk::local_from_index(offset), &chunk.blocks[offset]))
    }
}
