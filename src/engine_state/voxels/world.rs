//! # World Module
//!
//! This module provides the `World` struct which owns every chunk of a
//! fixed-size voxel world and addresses blocks purely by world coordinate.
//!
//! ## Architecture
//!
//! The world is `world_size × world_height × world_size` blocks, split into
//! 16 × world_height × 16 chunks created once at generation time and never
//! resized. Callers never see which chunk a coordinate falls in: `get`, `set`
//! and `contains` take world coordinates, and anything outside the bounds is
//! uniformly "not found".
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map keyed by chunk position
//! - Solidity checks read one bit of the owning chunk's mask
//! - Whole-world scans walk chunks in generation order (x-major, then z) so
//!   every pass that depends on scan order is deterministic

use std::collections::HashMap;

use cgmath::{Point2, Point3};

use super::block::block_side::BlockSide;
use super::block::block_type::BlockType;
use super::block::Block;
use super::chunk::{Chunk, CHUNK_DIMENSION};
use crate::error::{WorldError, WorldResult};

/// A fixed-size voxel world composed of chunks.
///
/// # Examples
///
/// ```
/// use block_world::World;
/// use block_world::engine_state::voxels::block::{Block, block_type::BlockType};
/// use cgmath::Point3;
///
/// let mut world = World::new(16, 8, 2);
/// assert!(world.contains(Point3::new(3, 1, 3)));
///
/// world.set(Point3::new(3, 5, 3), Block::new(BlockType::BRICK)).unwrap();
/// assert!(world.get(Point3::new(3, 5, 3)).unwrap().is_solid());
/// assert!(world.get(Point3::new(16, 5, 3)).is_none());
/// ```
pub struct World {
    /// A mapping from chunk coordinates `(x, z)` to chunk data.
    pub chunks: HashMap<Point2<i32>, Chunk>,
    /// Chunk coordinates in generation order.
    chunk_order: Vec<Point2<i32>>,
    world_size: i32,
    world_height: i32,
}

impl World {
    /// Creates a world of the given size with every chunk in its starting
    /// state: bedrock floor, stone up to `min_terrain_height`, air above.
    ///
    /// `world_size` is rounded down to a whole number of chunks.
    pub fn new(world_size: usize, world_height: usize, min_terrain_height: usize) -> Self {
        let chunks_per_side = world_size as i32 / CHUNK_DIMENSION;
        let mut chunks = HashMap::new();
        let mut chunk_order = Vec::new();

        for cx in 0..chunks_per_side {
            for cz in 0..chunks_per_side {
                let position = Point2::new(cx, cz);
                chunks.insert(
                    position,
                    Chunk::layered(position, world_height, min_terrain_height),
                );
                chunk_order.push(position);
            }
        }

        World {
            chunks,
            chunk_order,
            world_size: chunks_per_side * CHUNK_DIMENSION,
            world_height: world_height as i32,
        }
    }

    /// Width and depth of the world in blocks.
    pub fn world_size(&self) -> i32 {
        self.world_size
    }

    /// Number of block layers.
    pub fn world_height(&self) -> i32 {
        self.world_height
    }

    /// Whether `position` lies inside the world bounds.
    #[inline]
    pub fn in_bounds(&self, position: Point3<i32>) -> bool {
        (0..self.world_size).contains(&position.x)
            && (0..self.world_height).contains(&position.y)
            && (0..self.world_size).contains(&position.z)
    }

    /// The cell containing a continuous position. Each component is truncated
    /// toward zero, so `-0.5` lands in cell `0`.
    ///
    /// # Panics
    /// Panics if any component is not finite.
    pub fn cell_of(position: Point3<f32>) -> Point3<i32> {
        assert!(
            position.x.is_finite() && position.y.is_finite() && position.z.is_finite(),
            "non-finite position {position:?}"
        );
        Point3::new(position.x as i32, position.y as i32, position.z as i32)
    }

    /// The coordinates of the chunk owning a block position.
    #[inline]
    pub fn chunk_position_of(position: Point3<i32>) -> Point2<i32> {
        Point2::new(
            position.x.div_euclid(CHUNK_DIMENSION),
            position.z.div_euclid(CHUNK_DIMENSION),
        )
    }

    /// The chunk-local position of an in-bounds block position.
    #[inline]
    fn local_position_of(position: Point3<i32>) -> Point3<usize> {
        Point3::new(
            position.x.rem_euclid(CHUNK_DIMENSION) as usize,
            position.y as usize,
            position.z.rem_euclid(CHUNK_DIMENSION) as usize,
        )
    }

    /// Chunk coordinates in generation order.
    pub fn chunk_positions(&self) -> &[Point2<i32>] {
        &self.chunk_order
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, position: Point2<i32>) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    /// Gets the block at a world position, or `None` outside the world.
    pub fn get(&self, position: Point3<i32>) -> Option<&Block> {
        if !self.in_bounds(position) {
            return None;
        }
        self.chunks
            .get(&Self::chunk_position_of(position))
            .map(|chunk| chunk.get_block_at(Self::local_position_of(position)))
    }

    /// The type of the block at a world position, or `None` outside the world.
    pub fn block_type_at(&self, position: Point3<i32>) -> Option<BlockType> {
        self.get(position).map(Block::block_type)
    }

    /// Whether there is a solid block at `position`. Out-of-bounds is never solid.
    pub fn contains(&self, position: Point3<i32>) -> bool {
        if !self.in_bounds(position) {
            return false;
        }
        self.chunks
            .get(&Self::chunk_position_of(position))
            .is_some_and(|chunk| chunk.is_block_solid(Self::local_position_of(position)))
    }

    /// Replaces the block at `position`, marking its chunk stale if anything changed.
    pub fn set(&mut self, position: Point3<i32>, block: Block) -> WorldResult<()> {
        self.update(position, |stored| *stored = block).map(|_| ())
    }

    /// Applies `update` to the block at `position` in place.
    ///
    /// Returns whether the block changed; a change marks the owning chunk stale.
    pub fn update<F>(&mut self, position: Point3<i32>, update: F) -> WorldResult<bool>
    where
        F: FnOnce(&mut Block),
    {
        if !self.in_bounds(position) {
            return Err(WorldError::OutOfBounds(position));
        }
        let chunk = self
            .chunks
            .get_mut(&Self::chunk_position_of(position))
            .ok_or(WorldError::OutOfBounds(position))?;
        Ok(chunk.update_block_at(Self::local_position_of(position), update))
    }

    /// Calls `f` with the world position of every solid block, chunk by chunk
    /// in generation order.
    pub fn for_each_solid<F>(&self, mut f: F)
    where
        F: FnMut(Point3<i32>, &Block),
    {
        for position in &self.chunk_order {
            let Some(chunk) = self.chunks.get(position) else {
                continue;
            };
            let origin = chunk.origin();
            for (local, block) in chunk.iter_solid() {
                let world_position = Point3::new(
                    origin.x + local.x as i32,
                    local.y as i32,
                    origin.y + local.z as i32,
                );
                f(world_position, block);
            }
        }
    }

    /// The highest solid `y` in the column at `(x, z)`, if any.
    pub fn column_top(&self, x: i32, z: i32) -> Option<i32> {
        (0..self.world_height)
            .rev()
            .find(|&y| self.contains(Point3::new(x, y, z)))
    }

    /// Whether the axis-aligned box `[min, max]` touches any solid block.
    ///
    /// Blocks are closed unit cubes, so a box resting exactly on a face
    /// counts as touching it.
    pub fn collides(&self, min: Point3<f32>, max: Point3<f32>) -> bool {
        let lower = |v: f32| (v.floor() as i32) - 1;
        let upper = |v: f32| v.floor() as i32;

        for x in lower(min.x).max(0)..=upper(max.x).min(self.world_size - 1) {
            for y in lower(min.y).max(0)..=upper(max.y).min(self.world_height - 1) {
                for z in lower(min.z).max(0)..=upper(max.z).min(self.world_size - 1) {
                    let touches = min.x <= (x + 1) as f32
                        && max.x >= x as f32
                        && min.y <= (y + 1) as f32
                        && max.y >= y as f32
                        && min.z <= (z + 1) as f32
                        && max.z >= z as f32;
                    if touches && self.contains(Point3::new(x, y, z)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Whether the renderer's cached geometry for a chunk is out of date.
    pub fn is_chunk_stale(&self, position: Point2<i32>) -> bool {
        self.chunks.get(&position).is_some_and(Chunk::is_stale)
    }

    /// Acknowledges that the renderer rebuilt a chunk's geometry.
    pub fn clear_stale(&mut self, position: Point2<i32>) {
        if let Some(chunk) = self.chunks.get_mut(&position) {
            chunk.clear_stale();
        }
    }

    /// Clears the stale flag of every chunk.
    pub fn clear_all_stale(&mut self) {
        for chunk in self.chunks.values_mut() {
            chunk.clear_stale();
        }
    }

    /// Every stale chunk, in generation order.
    pub fn stale_chunks(&self) -> Vec<Point2<i32>> {
        self.chunk_order
            .iter()
            .copied()
            .filter(|position| self.is_chunk_stale(*position))
            .collect()
    }

    /// Marks the chunk owning `position` stale.
    pub fn mark_stale_at(&mut self, position: Point3<i32>) {
        if !self.in_bounds(position) {
            return;
        }
        if let Some(chunk) = self.chunks.get_mut(&Self::chunk_position_of(position)) {
            chunk.mark_stale();
        }
    }

    /// Marks every chunk that owns a face neighbour of `position`, other than
    /// `position`'s own chunk, stale. Only edits on a chunk border have any.
    pub fn mark_adjacent_chunks_stale(&mut self, position: Point3<i32>) {
        let home = Self::chunk_position_of(position);
        for side in BlockSide::all() {
            let neighbor = position + side.normal();
            if self.in_bounds(neighbor) && Self::chunk_position_of(neighbor) != home {
                self.mark_stale_at(neighbor);
            }
        }
    }

    /// A copy of every block, chunk by chunk in generation order.
    ///
    /// Combined with `bytemuck::cast_slice` this gives a byte image of the
    /// whole world.
    pub fn snapshot(&self) -> Vec<Block> {
        self.chunk_order
            .iter()
            .filter_map(|position| self.chunks.get(position))
            .flat_map(|chunk| chunk.blocks().iter().copied())
            .collect()
    }

    /// Counts blocks of every type present in the world.
    pub fn block_type_counts(&self) -> HashMap<BlockType, usize> {
        let mut counts = HashMap::new();
        for chunk in self.chunks.values() {
            for block in chunk.blocks() {
                *counts.entry(block.block_type()).or_insert(0) += 1;
            }
        }
        counts
    }
}
