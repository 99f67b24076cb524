//! # Terrain Module
//!
//! Populates a freshly created [`World`] with its initial landscape.
//!
//! ## Height map mode
//!
//! 1. Every column gets a surface height from 2D noise; cells from
//!    `min_terrain_height` up to the surface become stone, dirt and a grass top.
//! 2. Ore pockets are scattered through the stone below the terrain.
//! 3. Optionally, 3D noise carves caves out of anything solid.
//! 4. Trees grow on a sparse set of columns that still have ground under them.
//!
//! ## Hills mode
//!
//! Cone-shaped hills are layered onto the world; each hill only ever fills
//! air, so earlier hills are never cut into by later ones. Trees grow on the
//! tallest hill covering their column.

use cgmath::Point3;
use log::debug;

use super::noise::NoiseSource;
use crate::config::{TerrainMode, WorldConfig};
use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::block::Block;
use crate::engine_state::voxels::chunk::CHUNK_DIMENSION;
use crate::engine_state::voxels::world::World;

/// Caves are carved wherever the cave density exceeds this.
pub const CAVE_THRESHOLD: f64 = 0.53;
/// Trees closer than this (on both horizontal axes) to an accepted tree are dropped.
pub const TREE_EXCLUSION_RADIUS: i32 = 3;
/// Trunk heights are drawn from this range.
pub const TREE_TRUNK_HEIGHT: std::ops::Range<i32> = 3..5;
/// Ore seeds per chunk.
pub const ORE_SEEDS_PER_CHUNK: std::ops::RangeInclusive<u32> = 5..=8;
/// Lowest hill peak.
pub const MIN_HILL_HEIGHT: i32 = 4;
/// Hill slopes are drawn from this range.
pub const HILL_GRADIENT: std::ops::Range<f64> = 0.1..0.8;

/// Offsets an ore pocket can spread to from its seed: the 6 face neighbours
/// followed by the 8 corner neighbours.
const ORE_SPREAD: [[i32; 3]; 14] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
    [-1, -1, -1],
    [1, -1, -1],
    [-1, -1, 1],
    [1, -1, 1],
    [-1, 1, -1],
    [1, 1, -1],
    [-1, 1, 1],
    [1, 1, 1],
];

/// A column picked to maybe grow a tree; `y` is the trunk's base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TreeCandidate {
    x: i32,
    y: i32,
    z: i32,
}

/// Fills a world with terrain, ore, caves and trees.
pub struct TerrainGenerator<'a> {
    config: &'a WorldConfig,
    noise: &'a dyn NoiseSource,
    rng: fastrand::Rng,
}

impl<'a> TerrainGenerator<'a> {
    /// Creates a generator. Every random choice is drawn from `rng`.
    pub fn new(config: &'a WorldConfig, noise: &'a dyn NoiseSource, rng: fastrand::Rng) -> Self {
        TerrainGenerator { config, noise, rng }
    }

    /// Runs the configured terrain mode over the whole world.
    pub fn generate(&mut self, world: &mut World) {
        match self.config.terrain_mode {
            TerrainMode::HeightMap => self.generate_height_map(world),
            TerrainMode::Hills => self.generate_hills(world),
        }
    }

    /// The surface level of the column at `(x, z)` in height map mode.
    pub fn surface_height(&self, world: &World, x: i32, z: i32) -> i32 {
        let min = self.config.min_terrain_height as i32;
        let max = self.config.resolved_max_terrain_height() as i32;
        let sample = self.noise.terrain_height(x as f64, z as f64);
        let height = min + (sample * (max - min) as f64).floor() as i32;
        height.clamp(min, world.world_height() - 1)
    }

    fn generate_height_map(&mut self, world: &mut World) {
        let size = world.world_size();
        let chunks_per_side = size / CHUNK_DIMENSION;
        let mut trees = self.tree_candidates(
            size,
            (chunks_per_side * chunks_per_side - 1).max(0) as usize,
            2,
            0,
        );

        for x in 0..size {
            for z in 0..size {
                let height = self.surface_height(world, x, z);
                for y in self.config.min_terrain_height as i32..=height {
                    let block_type = if y == height {
                        BlockType::GRASS
                    } else if y < height - 2 {
                        BlockType::STONE
                    } else {
                        BlockType::DIRT
                    };
                    set_in_world(world, Point3::new(x, y, z), Block::new(block_type));
                }
                for tree in trees.iter_mut().filter(|tree| tree.x == x && tree.z == z) {
                    tree.y = height + 1;
                }
            }
        }

        self.scatter_ore(world);

        if self.config.generate_caves {
            self.carve_caves(world);
        }

        self.plant_trees(world, &trees);
    }

    /// Scatters ore pockets through the stone of every chunk.
    ///
    /// Ore only ever replaces stone, so bedrock and the surface layers are untouched.
    fn scatter_ore(&mut self, world: &mut World) {
        let size = world.world_size();
        let top = self.config.min_terrain_height as i32 - 1;
        if top < 1 {
            return;
        }

        let mut placed = 0usize;
        for chunk_x in (0..size).step_by(CHUNK_DIMENSION as usize) {
            for chunk_z in (0..size).step_by(CHUNK_DIMENSION as usize) {
                let amount = self.rng.u32(ORE_SEEDS_PER_CHUNK);
                for _ in 0..amount {
                    let mut x = self.rng.i32(chunk_x..=chunk_x + CHUNK_DIMENSION);
                    let y = self.rng.i32(1..=top);
                    let mut z = self.rng.i32(chunk_z..=chunk_z + CHUNK_DIMENSION);
                    if x == 0 {
                        x += 1;
                    }
                    if x == size - 1 {
                        x -= 1;
                    }
                    if z == 0 {
                        z += 1;
                    }
                    if z == size - 1 {
                        z -= 1;
                    }

                    let seed = Point3::new(x, y, z);
                    placed += place_ore(world, seed) as usize;
                    for [dx, dy, dz] in ORE_SPREAD {
                        if self.rng.bool() {
                            placed += place_ore(world, Point3::new(x + dx, y + dy, z + dz)) as usize;
                        }
                    }
                }
            }
        }
        debug!("Placed {placed} ore blocks");
    }

    /// Turns solid cells with high cave density into air.
    fn carve_caves(&mut self, world: &mut World) {
        let size = world.world_size();
        let mut carved = 0usize;
        for x in 1..size - 1 {
            for y in 2..world.world_height() {
                for z in 1..size - 1 {
                    let position = Point3::new(x, y, z);
                    if !world.contains(position) {
                        continue;
                    }
                    if self.noise.cave_density(x as f64, y as f64, z as f64) > CAVE_THRESHOLD {
                        set_in_world(world, position, Block::air());
                        carved += 1;
                    }
                }
            }
        }
        debug!("Carved {carved} cave blocks");
    }

    fn generate_hills(&mut self, world: &mut World) {
        let size = world.world_size();
        let height_limit = world.world_height();
        let mut trees = self.tree_candidates(size, (size / 2 - 1).max(0) as usize, 2, 2);

        let num_hills = self.rng.i32(size / 8..=size / 4).max(1);
        let max_peak = (height_limit / 2 - 6).max(MIN_HILL_HEIGHT);
        let hills: Vec<Point3<i32>> = (0..num_hills)
            .map(|_| {
                Point3::new(
                    self.rng.i32(0..=size),
                    self.rng.i32(MIN_HILL_HEIGHT..=max_peak).min(height_limit),
                    self.rng.i32(0..=size),
                )
            })
            .collect();

        for hill in &hills {
            let gradient = self.hill_gradient();
            raise_hill(world, *hill, gradient, &mut trees);
        }
        debug!("Raised {} hills", hills.len());

        self.plant_trees(world, &trees);
    }

    /// Slope of the next hill, uniform in [`HILL_GRADIENT`].
    fn hill_gradient(&mut self) -> f64 {
        HILL_GRADIENT.start + self.rng.f64() * (HILL_GRADIENT.end - HILL_GRADIENT.start)
    }

    /// Picks `count` random columns at least `margin` away from the world edge.
    fn tree_candidates(&mut self, size: i32, count: usize, margin: i32, base: i32) -> Vec<TreeCandidate> {
        if size - 1 - margin < margin {
            return Vec::new();
        }
        (0..count)
            .map(|_| TreeCandidate {
                x: self.rng.i32(margin..=size - 1 - margin),
                y: base,
                z: self.rng.i32(margin..=size - 1 - margin),
            })
            .collect()
    }

    /// Grows every candidate that has ground under an empty base and keeps
    /// its distance from the trees accepted before it.
    fn plant_trees(&mut self, world: &mut World, candidates: &[TreeCandidate]) {
        let mut accepted: Vec<TreeCandidate> = Vec::new();
        for tree in candidates {
            let base = Point3::new(tree.x, tree.y, tree.z);
            if world.contains(base) || !world.contains(Point3::new(tree.x, tree.y - 1, tree.z)) {
                continue;
            }
            let crowded = accepted.iter().any(|other| {
                (other.x - tree.x).abs() < TREE_EXCLUSION_RADIUS
                    && (other.z - tree.z).abs() < TREE_EXCLUSION_RADIUS
            });
            if crowded {
                continue;
            }
            self.generate_tree(world, *tree);
            accepted.push(*tree);
        }
        debug!("Grew {} of {} trees", accepted.len(), candidates.len());
    }

    /// A trunk of 3 or 4 blocks topped by a two-layer 3×3 canopy. The lower
    /// canopy layer wraps around the trunk's top block; the upper layer is full.
    /// Trees only grow into air.
    fn generate_tree(&mut self, world: &mut World, tree: TreeCandidate) {
        let height = self.rng.i32(TREE_TRUNK_HEIGHT);
        for y in tree.y..tree.y + height {
            fill_air(world, Point3::new(tree.x, y, tree.z), Block::new(BlockType::TREE));
        }

        let crown = tree.y + height;
        for x in tree.x - 1..=tree.x + 1 {
            for y in [crown - 1, crown] {
                for z in tree.z - 1..=tree.z + 1 {
                    if x != tree.x || z != tree.z || y == crown {
                        fill_air(world, Point3::new(x, y, z), Block::new(BlockType::LEAF));
                    }
                }
            }
        }
    }
}

/// Writes a block if the position is inside the world. Generation features
/// (canopies, ore spread) are allowed to overhang the world edge.
fn set_in_world(world: &mut World, position: Point3<i32>, block: Block) {
    if world.in_bounds(position) {
        // in bounds, so the write cannot fail
        let _ = world.set(position, block);
    }
}

/// Raises one cone-shaped hill peaking at `hill` and falling off by
/// `gradient` blocks per block of horizontal distance.
///
/// Only air is filled, and a column is skipped entirely when the cell at the
/// hill's height there is already solid. The top filled cell of a column is
/// grass with two dirt below it and stone down to `y = 1`. Tree candidates on
/// the hill are lifted onto it.
fn raise_hill(world: &mut World, hill: Point3<i32>, gradient: f64, trees: &mut [TreeCandidate]) {
    let size = world.world_size();
    let height_limit = world.world_height();
    for x in 0..size {
        for z in 0..size {
            let dx = (hill.x - x) as f64;
            let dz = (hill.z - z) as f64;
            let distance = (dx * dx + dz * dz).sqrt();
            let height = hill.y - (gradient * distance) as i32;

            if world.contains(Point3::new(x, height, z)) {
                continue;
            }

            for y in 1..height.min(height_limit) {
                let block_type = if y == height - 1 {
                    BlockType::GRASS
                } else if y < height - 3 {
                    BlockType::STONE
                } else {
                    BlockType::DIRT
                };
                fill_air(world, Point3::new(x, y, z), Block::new(block_type));
            }

            for tree in trees.iter_mut().filter(|tree| tree.x == x && tree.z == z) {
                tree.y = tree.y.max(height);
            }
        }
    }
}

/// Writes a block only if the position is inside the world and still air.
fn fill_air(world: &mut World, position: Point3<i32>, block: Block) {
    if world.in_bounds(position) && !world.contains(position) {
        set_in_world(world, position, block);
    }
}

/// Replaces a stone block with sealed ore. Returns whether ore was placed.
fn place_ore(world: &mut World, position: Point3<i32>) -> bool {
    if world.block_type_at(position) != Some(BlockType::STONE) {
        return false;
    }
    set_in_world(world, position, Block::sealed(BlockType::ORE));
    true
}
