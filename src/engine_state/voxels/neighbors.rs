//! # Neighbors Module
//!
//! Maintains the per-face occlusion flags of solid blocks.
//!
//! A face is occluded when the cell across it is solid or lies outside the
//! world; the world's hard boundary is never drawn. [`update_neighbors`]
//! recomputes every solid block once after generation. After a single-block
//! edit, [`patch_edit`] recomputes the edited block and flips the one facing
//! flag of each of its up-to-6 neighbours, including neighbours that live in
//! a different chunk.
//!
//! Sealed block types (ore) keep all six faces occluded through both passes.

use cgmath::Point3;

use super::block::block_side::BlockSide;
use super::block::ALL_SIDES_OCCLUDED;
use super::world::World;

/// The occlusion mask a block at `position` should carry, derived from its
/// current neighbours.
pub fn compute_occlusion(world: &World, position: Point3<i32>) -> u8 {
    BlockSide::all()
        .into_iter()
        .filter(|side| {
            let neighbor = position + side.normal();
            !world.in_bounds(neighbor) || world.contains(neighbor)
        })
        .fold(0, |mask, side| mask | side.mask())
}

/// Recomputes the occlusion flags of every solid block in the world.
///
/// Sealed block types keep their flags. Returns the number of blocks whose
/// flags changed.
pub fn update_neighbors(world: &mut World) -> usize {
    let mut updates = Vec::new();
    world.for_each_solid(|position, block| {
        if block.block_type().is_sealed() {
            return;
        }
        let mask = compute_occlusion(world, position);
        if mask != block.occlusion_mask() {
            updates.push((position, mask));
        }
    });

    let changed = updates.len();
    for (position, mask) in updates {
        // positions came from the world itself
        let _ = world.update(position, |block| block.set_occlusion_mask(mask));
    }
    changed
}

/// Recomputes the flags of the block at `position` from scratch. Air keeps
/// an empty mask; sealed blocks keep every face hidden.
pub fn refresh_block(world: &mut World, position: Point3<i32>) {
    let mask = match world.get(position) {
        Some(block) if block.block_type().is_sealed() => ALL_SIDES_OCCLUDED,
        Some(block) if block.is_solid() => compute_occlusion(world, position),
        _ => 0,
    };
    let _ = world.update(position, |block| block.set_occlusion_mask(mask));
}

/// Brings the neighbourhood of an edited cell up to date: the cell itself,
/// plus the facing flag of every solid, unsealed neighbour.
pub fn patch_edit(world: &mut World, position: Point3<i32>) {
    refresh_block(world, position);

    let solid = world.contains(position);
    for side in BlockSide::all() {
        let neighbor = position + side.normal();
        let patchable = world
            .get(neighbor)
            .is_some_and(|block| block.is_solid() && !block.block_type().is_sealed());
        if !patchable {
            continue;
        }
        let facing = side.opposite();
        let _ = world.update(neighbor, |block| block.set_occluded(facing, solid));
    }
    world.mark_adjacent_chunks_stale(position);
}
