//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the unit normals
//! used to step from a block to its face neighbours.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value which doubles as the bit
/// position of that face inside a block's occlusion mask and as the index into
/// the per-face texture table.
///
/// The order is: [FRONT, BACK, RIGHT, LEFT, TOP, BOTTOM]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The right face (facing positive X)
    RIGHT = 2,

    /// The left face (facing negative X)
    LEFT = 3,

    /// The top face (facing positive Y)
    TOP = 4,

    /// The bottom face (facing negative Y)
    BOTTOM = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// Scans that pick "the first best face" (such as placement) rely on this
    /// order for tie-breaking.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
        ]
    }

    /// The outward unit normal of this face in block coordinates.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
        }
    }

    /// The face pointing the other way. A neighbour across `self` touches this
    /// block through `self.opposite()`.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::BOTTOM => BlockSide::TOP,
        }
    }

    /// The bit for this face inside a block's occlusion mask.
    #[inline]
    pub fn mask(self) -> u8 {
        1 << self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_faces_have_opposite_normals() {
        for side in BlockSide::all() {
            assert_eq!(side.normal(), -side.opposite().normal());
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn masks_are_distinct_bits() {
        let combined = BlockSide::all()
            .iter()
            .fold(0u8, |acc, side| {
                assert_eq!(acc & side.mask(), 0);
                acc | side.mask()
            });
        assert_eq!(combined, 0b11_1111);
    }
}
