//! # Engine State Module
//!
//! The single owner of a generated world and the interface a renderer talks
//! to.
//!
//! ## Key Components
//!
//! * `EngineState` - Generates the world and serves block reads, stale-chunk
//!   signalling and ray edits
//! * `voxels` - Block storage, generation, occlusion, lighting and editing
//!
//! ## Renderer Contract
//!
//! A renderer reads blocks with [`EngineState::get_block`], rebuilds the
//! geometry of every chunk reported stale, and acknowledges each rebuild with
//! [`EngineState::clear_stale`]. Edits go through
//! [`EngineState::cast_and_edit`] and return only once occlusion and light
//! are consistent again.

use cgmath::{Point2, Point3, Vector3};
use log::{debug, info};
use web_time::Instant;

use voxels::{
    block::{block_side::BlockSide, block_type::BlockType, Block},
    editing::{self, EditMode, EditResult, Ray},
    generation::{build_noise, terrain::TerrainGenerator},
    lighting::LightSolver,
    neighbors,
    world::World,
};

use crate::config::WorldConfig;
use crate::error::{ConfigError, WorldResult};

pub mod voxels;

/// The generated world together with the settings it was built from.
///
/// # Examples
///
/// ```
/// use block_world::{EngineState, WorldConfig};
/// use block_world::engine_state::voxels::block::block_type::BlockType;
///
/// let mut config = WorldConfig::with_bounds(16, 8, 4);
/// config.seed = Some(7);
/// let engine = EngineState::generate(config).unwrap();
///
/// let bedrock = engine.get_block(cgmath::Point3::new(0, 0, 0)).unwrap();
/// assert_eq!(bedrock.block_type(), BlockType::BEDROCK);
/// ```
pub struct EngineState {
    world: World,
    config: WorldConfig,
    solver: LightSolver,
    place_block: BlockType,
    seed: u64,
}

impl EngineState {
    /// Validates `config` and generates a complete world: terrain, then
    /// occlusion flags, then light.
    ///
    /// Every chunk starts out stale.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the configuration fails validation.
    pub fn generate(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let place_block = config.place_block()?;
        let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
        info!(
            "Generating a {0}x{1}x{0} world with seed {seed}",
            config.world_size, config.world_height
        );

        let generation_start = Instant::now();
        let mut rng = fastrand::Rng::with_seed(seed);

        let start = Instant::now();
        let noise = build_noise(&config, &mut rng);
        let mut world = World::new(config.world_size, config.world_height, config.min_terrain_height);
        info!("Noise and chunk allocation: {:?}", start.elapsed());

        let start = Instant::now();
        TerrainGenerator::new(&config, noise.as_ref(), rng.fork()).generate(&mut world);
        info!("Terrain generation: {:?}", start.elapsed());

        let start = Instant::now();
        let flagged = neighbors::update_neighbors(&mut world);
        info!("Neighbor pass: {:?} ({flagged} blocks flagged)", start.elapsed());

        let solver = LightSolver::new(config.min_light, config.max_light);
        let start = Instant::now();
        let sky_lit = solver.solve(&mut world);
        info!("Light solve: {:?} ({sky_lit} sky-lit cells)", start.elapsed());

        info!("World generated in {:?}", generation_start.elapsed());

        Ok(EngineState {
            world,
            config,
            solver,
            place_block,
            seed,
        })
    }

    /// The generated world, for read-only queries.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The configuration the world was generated from.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The light solver edits re-run.
    pub fn solver(&self) -> &LightSolver {
        &self.solver
    }

    /// The seed the world was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The block at a world coordinate, or `None` outside the world.
    pub fn get_block(&self, position: Point3<i32>) -> Option<&Block> {
        self.world.get(position)
    }

    /// Whether the renderer must rebuild the geometry of a chunk.
    pub fn is_chunk_geometry_stale(&self, chunk: Point2<i32>) -> bool {
        self.world.is_chunk_stale(chunk)
    }

    /// Acknowledges that the renderer rebuilt a chunk's geometry.
    pub fn clear_stale(&mut self, chunk: Point2<i32>) {
        self.world.clear_stale(chunk);
    }

    /// Every chunk whose geometry must be rebuilt.
    pub fn stale_chunks(&self) -> Vec<Point2<i32>> {
        self.world.stale_chunks()
    }

    /// Walks a ray from `origin` against `direction` and destroys or places
    /// a block at the first solid cell it meets.
    ///
    /// # Arguments
    ///
    /// * `origin` - The viewer's position
    /// * `direction` - The viewer's forward basis vector; the ray walks along its negation
    /// * `mode` - Whether to destroy the hit block or place one against it
    ///
    /// # Returns
    ///
    /// The edited coordinate, or the reason nothing changed.
    ///
    /// # Panics
    /// Panics if `origin` or `direction` has a non-finite component.
    pub fn cast_and_edit(
        &mut self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        mode: EditMode,
    ) -> WorldResult<EditResult> {
        let ray = Ray::new(origin, direction);
        debug!("{mode:?} ray from {origin:?} along {direction:?}");
        match mode {
            EditMode::Destroy => {
                editing::destroy(&mut self.world, &self.solver, &ray, self.config.destroy_reach)
            }
            EditMode::Place => editing::place(
                &mut self.world,
                &self.solver,
                &ray,
                self.config.place_reach,
                self.place_block,
            ),
        }
    }

    /// Grey level of a face vertex, for shading. See [`LightSolver::vertex_light`].
    pub fn vertex_light(&self, corner: Point3<i32>, side: BlockSide) -> f32 {
        self.solver.vertex_light(&self.world, corner, side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> WorldConfig {
        let mut config = WorldConfig::with_bounds(32, 16, 4);
        config.seed = Some(seed);
        config
    }

    #[test]
    fn generate_rejects_invalid_config() {
        let config = WorldConfig::with_bounds(20, 16, 4);
        assert!(matches!(EngineState::generate(config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn same_seed_same_world() {
        let a = EngineState::generate(small_config(42)).unwrap();
        let b = EngineState::generate(small_config(42)).unwrap();
        assert_eq!(a.world().snapshot(), b.world().snapshot());
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn every_chunk_starts_stale() {
        let mut engine = EngineState::generate(small_config(1)).unwrap();
        assert_eq!(engine.stale_chunks().len(), 4);
        engine.clear_stale(Point2::new(1, 0));
        assert!(!engine.is_chunk_geometry_stale(Point2::new(1, 0)));
        assert!(engine.is_chunk_geometry_stale(Point2::new(0, 0)));
    }

    #[test]
    fn cast_and_edit_places_with_the_configured_block() {
        let mut config = small_config(3);
        config.place_block_type = "ore".to_string();
        let mut engine = EngineState::generate(config).unwrap();

        let top = engine.world().column_top(16, 16).unwrap();
        let origin = Point3::new(16.5, top as f32 + 1.5, 16.5);
        let result = engine
            .cast_and_edit(origin, Vector3::new(0.0, 1.0, 0.0), EditMode::Place)
            .unwrap();

        assert_eq!(result.position, Point3::new(16, top + 1, 16));
        assert_eq!(engine.world().block_type_at(result.position), Some(BlockType::ORE));
    }
}
