//! # Lighting Module
//!
//! Computes the light level of every air cell.
//!
//! The solver is a fixed sequence of scans rather than a flood fill:
//!
//! 1. **Sky pass**: chunk by chunk, top to bottom. Air with nothing solid
//!    above it is sky-lit (`max_light`); other air takes the brightest of its
//!    six neighbours minus one.
//! 2. **Relaxation pass**: one more sweep, bottom to top with `x` and `z`
//!    reversed, so light reaches around corners the first pass scanned past.
//!    The local row and column `0` of each chunk are not revisited.
//! 3. **Clamp pass**: anything still below `min_light` is raised to it.
//!
//! Every solve starts from zero light, so solving an unchanged world again
//! reproduces the same values.

use bitvec::prelude::BitVec;
use cgmath::Point3;

use super::block::block_side::BlockSide;
use super::chunk::CHUNK_DIMENSION;
use super::world::World;

/// Default floor for air light.
pub const MIN_LIGHT: u8 = 2;
/// Default light of sky-exposed air.
pub const MAX_LIGHT: u8 = 15;

/// Light propagation over a whole world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSolver {
    /// Lowest light any air cell ends up with.
    pub min_light: u8,
    /// Light of sky-exposed air.
    pub max_light: u8,
}

impl Default for LightSolver {
    fn default() -> Self {
        LightSolver::new(MIN_LIGHT, MAX_LIGHT)
    }
}

/// Dense copy of the world used while solving, indexed `x` fastest, then
/// `z`, then `y`.
struct LightField {
    size: i32,
    height: i32,
    solid: BitVec,
    light: Vec<u8>,
}

impl LightField {
    fn capture(world: &World) -> Self {
        let size = world.world_size();
        let height = world.world_height();
        let volume = (size * size * height).max(0) as usize;
        let mut field = LightField {
            size,
            height,
            solid: BitVec::repeat(false, volume),
            light: vec![0; volume],
        };
        world.for_each_solid(|position, _| {
            let index = field.index(position);
            field.solid.set(index, true);
        });
        field
    }

    #[inline]
    fn index(&self, position: Point3<i32>) -> usize {
        ((position.y * self.size + position.z) * self.size + position.x) as usize
    }

    #[inline]
    fn in_bounds(&self, position: Point3<i32>) -> bool {
        (0..self.size).contains(&position.x)
            && (0..self.height).contains(&position.y)
            && (0..self.size).contains(&position.z)
    }

    #[inline]
    fn is_solid(&self, position: Point3<i32>) -> bool {
        self.solid[self.index(position)]
    }

    /// The brightest in-bounds face neighbour of `position`.
    fn brightest_neighbor(&self, position: Point3<i32>) -> u8 {
        BlockSide::all()
            .into_iter()
            .map(|side| position + side.normal())
            .filter(|neighbor| self.in_bounds(*neighbor))
            .map(|neighbor| self.light[self.index(neighbor)])
            .max()
            .unwrap_or(0)
    }
}

impl LightSolver {
    /// Creates a solver with the given light bounds.
    pub fn new(min_light: u8, max_light: u8) -> Self {
        LightSolver {
            min_light,
            max_light,
        }
    }

    /// Light for a cell lit only through its neighbours.
    ///
    /// A neighbour at exactly `min_light` passes on `min_light` rather than
    /// dropping below it.
    #[inline]
    fn attenuate(&self, brightest: u8) -> u8 {
        let brightest = if brightest == self.min_light {
            self.min_light.saturating_add(1)
        } else {
            brightest
        };
        brightest.saturating_sub(1)
    }

    /// Recomputes the light of every cell and writes it back into the world.
    ///
    /// Solid blocks end up with light `0`. Only chunks whose bytes change are
    /// marked stale. Returns the number of sky-lit cells.
    pub fn solve(&self, world: &mut World) -> usize {
        let mut field = LightField::capture(world);
        let chunk_positions = world.chunk_positions().to_vec();
        let mut sky_lit = 0;

        for chunk in &chunk_positions {
            let origin_x = chunk.x * CHUNK_DIMENSION;
            let origin_z = chunk.y * CHUNK_DIMENSION;
            let mut covered = [false; (CHUNK_DIMENSION * CHUNK_DIMENSION) as usize];

            for y in (0..field.height).rev() {
                for lx in 0..CHUNK_DIMENSION {
                    for lz in 0..CHUNK_DIMENSION {
                        let position = Point3::new(origin_x + lx, y, origin_z + lz);
                        let column = (lx * CHUNK_DIMENSION + lz) as usize;
                        if field.is_solid(position) {
                            covered[column] = true;
                            continue;
                        }
                        let index = field.index(position);
                        field.light[index] = if covered[column] {
                            self.attenuate(field.brightest_neighbor(position))
                        } else {
                            sky_lit += 1;
                            self.max_light
                        };
                    }
                }
            }
        }

        for chunk in &chunk_positions {
            let origin_x = chunk.x * CHUNK_DIMENSION;
            let origin_z = chunk.y * CHUNK_DIMENSION;
            for y in 0..field.height {
                for lx in (1..CHUNK_DIMENSION).rev() {
                    for lz in (1..CHUNK_DIMENSION).rev() {
                        let position = Point3::new(origin_x + lx, y, origin_z + lz);
                        let index = field.index(position);
                        if field.is_solid(position) || field.light[index] == self.max_light {
                            continue;
                        }
                        field.light[index] = self.attenuate(field.brightest_neighbor(position));
                    }
                }
            }
        }

        for index in 0..field.light.len() {
            if !field.solid[index] && field.light[index] < self.min_light {
                field.light[index] = self.min_light;
            }
        }

        for chunk in world.chunks.values_mut() {
            let origin = chunk.origin();
            for y in 0..field.height {
                for lz in 0..CHUNK_DIMENSION {
                    for lx in 0..CHUNK_DIMENSION {
                        let light = field.light[field.index(Point3::new(origin.x + lx, y, origin.y + lz))];
                        let local = Point3::new(lx as usize, y as usize, lz as usize);
                        chunk.update_block_at(local, |block| block.set_light(light));
                    }
                }
            }
        }

        sky_lit
    }

    /// The grey level (`0.0..=1.0`) of the face vertex at lattice point
    /// `corner` on a face pointing along `side`.
    ///
    /// Averages the light of the in-bounds cells that touch `corner` on the
    /// side the face looks into. If all of them are dark the vertex is black.
    pub fn vertex_light(&self, world: &World, corner: Point3<i32>, side: BlockSide) -> f32 {
        let normal = side.normal();
        let candidates = |vertex: i32, normal: i32| -> Vec<i32> {
            match normal {
                1 => vec![vertex],
                -1 => vec![vertex - 1],
                _ => vec![vertex, vertex - 1],
            }
        };

        let mut total = 0u32;
        let mut count = 0u32;
        for x in candidates(corner.x, normal.x) {
            for y in candidates(corner.y, normal.y) {
                for z in candidates(corner.z, normal.z) {
                    if let Some(block) = world.get(Point3::new(x, y, z)) {
                        total += block.light() as u32;
                        count += 1;
                    }
                }
            }
        }

        if total == 0 {
            return 0.0;
        }
        total as f32 / count as f32 / self.max_light as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::block::Block;

    #[test]
    fn open_world_is_fully_sky_lit() {
        let mut world = World::new(16, 8, 3);
        let sky_lit = LightSolver::default().solve(&mut world);
        assert_eq!(sky_lit, 16 * 16 * 5);
        assert_eq!(world.get(Point3::new(3, 3, 3)).unwrap().light(), MAX_LIGHT);
        assert_eq!(world.get(Point3::new(3, 2, 3)).unwrap().light(), 0);
    }

    #[test]
    fn light_falls_off_under_a_roof() {
        let mut world = World::new(16, 8, 2);
        // a roof over the whole chunk except the x = 15 column strip
        for x in 0..15 {
            for z in 0..16 {
                world.set(Point3::new(x, 5, z), Block::new(BlockType::STONE)).unwrap();
            }
        }
        LightSolver::default().solve(&mut world);

        let open = world.get(Point3::new(15, 3, 8)).unwrap().light();
        let beside = world.get(Point3::new(14, 3, 8)).unwrap().light();
        let deeper = world.get(Point3::new(10, 3, 8)).unwrap().light();
        assert_eq!(open, MAX_LIGHT);
        assert_eq!(beside, MAX_LIGHT - 1);
        assert!(deeper < beside);
        assert!(deeper >= MIN_LIGHT);
    }

    #[test]
    fn attenuation_never_drops_below_the_floor_in_one_step() {
        let solver = LightSolver::default();
        assert_eq!(solver.attenuate(MIN_LIGHT), MIN_LIGHT);
        assert_eq!(solver.attenuate(MIN_LIGHT + 1), MIN_LIGHT);
        assert_eq!(solver.attenuate(MAX_LIGHT), MAX_LIGHT - 1);
        assert_eq!(solver.attenuate(0), 0);

        let saturated = LightSolver::new(u8::MAX, u8::MAX);
        assert_eq!(saturated.attenuate(u8::MAX), u8::MAX - 1);
    }

    #[test]
    fn solving_twice_changes_nothing() {
        let mut world = World::new(16, 8, 2);
        for x in 2..12 {
            for z in 3..9 {
                world.set(Point3::new(x, 6, z), Block::new(BlockType::BRICK)).unwrap();
            }
        }
        let solver = LightSolver::default();
        solver.solve(&mut world);
        let first = world.snapshot();
        world.clear_all_stale();

        solver.solve(&mut world);
        assert_eq!(first, world.snapshot());
        assert!(world.stale_chunks().is_empty());
    }

    #[test]
    fn vertex_light_averages_the_cells_in_front_of_a_face() {
        let mut world = World::new(16, 8, 2);
        let solver = LightSolver::default();
        solver.solve(&mut world);

        // top face of the surface stone at (4, 1, 4): the four air cells at y = 2
        let grey = solver.vertex_light(&world, Point3::new(5, 2, 5), BlockSide::TOP);
        assert_eq!(grey, 1.0);

        // bottom face of the bedrock floor looks out of the world
        let dark = solver.vertex_light(&world, Point3::new(5, 0, 5), BlockSide::BOTTOM);
        assert_eq!(dark, 0.0);
    }
}
