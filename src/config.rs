//! # Configuration
//!
//! World bounds and generation settings, supplied once at world-generation
//! time and read-only afterwards. Configurations are plain `serde` structs, so
//! they can be written by hand as JSON:
//!
//! ```json
//! { "world_size": 32, "world_height": 24, "min_terrain_height": 6, "generate_caves": true }
//! ```
//!
//! Missing fields take their [`Default`] values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::{
    block::block_type::BlockType,
    chunk::CHUNK_DIMENSION,
    lighting::{MAX_LIGHT, MIN_LIGHT},
};
use crate::error::ConfigError;

/// How the initial landscape is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainMode {
    /// Rolling terrain from a 2D noise height map, with ore and optional caves.
    #[default]
    HeightMap,
    /// Overlapping cone-shaped hills with random slopes.
    Hills,
}

/// Which noise source feeds terrain and cave generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// Interpolated value noise over a random lattice.
    #[default]
    Lattice,
    /// Gradient noise from the `noise` crate.
    Perlin,
}

/// How far, and how finely, an edit ray is walked.
///
/// The walk takes `distance * accuracy` steps of length `1 / accuracy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reach {
    /// How far the ray reaches, in blocks.
    pub distance: u32,
    /// Steps taken per block of distance.
    pub accuracy: u32,
}

impl Reach {
    /// Creates a reach of `distance` blocks walked in `1 / accuracy` steps.
    pub const fn new(distance: u32, accuracy: u32) -> Self {
        Reach { distance, accuracy }
    }

    /// Total number of steps in the walk.
    pub fn steps(&self) -> u32 {
        self.distance.saturating_mul(self.accuracy)
    }
}

/// Default reach of a destroy ray.
pub const DESTROY_REACH: Reach = Reach::new(5, 8);
/// Default reach of a place ray.
pub const PLACE_REACH: Reach = Reach::new(5, 4);

/// Everything needed to generate a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width and depth of the world in blocks. Must be a multiple of 16.
    pub world_size: usize,
    /// Number of block layers.
    pub world_height: usize,
    /// Lowest surface level; everything below is stone (bedrock at `y == 0`).
    pub min_terrain_height: usize,
    /// Highest surface level. Defaults to `world_height - 8`.
    pub max_terrain_height: Option<usize>,
    /// Carve 3D noise caves after the height map is filled.
    pub generate_caves: bool,
    /// How the landscape is shaped.
    pub terrain_mode: TerrainMode,
    /// Which noise feeds terrain heights and caves.
    pub noise_kind: NoiseKind,
    /// Seed for every random choice in generation. `None` picks a fresh one.
    pub seed: Option<u64>,
    /// Light floor for air cells.
    pub min_light: u8,
    /// Light of sky-exposed air.
    pub max_light: u8,
    /// Ray walk used by destroy edits.
    pub destroy_reach: Reach,
    /// Ray walk used by place edits.
    pub place_reach: Reach,
    /// Name of the block type that place edits create.
    pub place_block_type: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            world_size: 64,
            world_height: 32,
            min_terrain_height: 8,
            max_terrain_height: None,
            generate_caves: false,
            terrain_mode: TerrainMode::HeightMap,
            noise_kind: NoiseKind::Lattice,
            seed: None,
            min_light: MIN_LIGHT,
            max_light: MAX_LIGHT,
            destroy_reach: DESTROY_REACH,
            place_reach: PLACE_REACH,
            place_block_type: BlockType::BRICK.name().to_string(),
        }
    }
}

impl WorldConfig {
    /// Shorthand for a configuration with the given bounds and defaults elsewhere.
    pub fn with_bounds(world_size: usize, world_height: usize, min_terrain_height: usize) -> Self {
        WorldConfig {
            world_size,
            world_height,
            min_terrain_height,
            ..Default::default()
        }
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks every bound generation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dimension = CHUNK_DIMENSION as usize;
        if self.world_size == 0 || self.world_size % dimension != 0 {
            return Err(ConfigError::Invalid(format!(
                "world_size must be a positive multiple of {dimension}, got {}",
                self.world_size
            )));
        }
        if self.world_size > i32::MAX as usize || self.world_height > i32::MAX as usize {
            return Err(ConfigError::Invalid("world is too large".to_string()));
        }
        if self.min_terrain_height == 0 || self.min_terrain_height >= self.world_height {
            return Err(ConfigError::Invalid(format!(
                "min_terrain_height must be in [1, {}), got {}",
                self.world_height, self.min_terrain_height
            )));
        }
        if let Some(max) = self.max_terrain_height {
            if max < self.min_terrain_height {
                return Err(ConfigError::Invalid(format!(
                    "max_terrain_height {max} is below min_terrain_height {}",
                    self.min_terrain_height
                )));
            }
        }
        if self.min_light == 0 || self.min_light >= self.max_light {
            return Err(ConfigError::Invalid(format!(
                "light bounds must satisfy 1 <= min < max, got {}..={}",
                self.min_light, self.max_light
            )));
        }
        for (name, reach) in [("destroy", self.destroy_reach), ("place", self.place_reach)] {
            if reach.distance == 0 || reach.accuracy == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name}_reach needs a positive distance and accuracy"
                )));
            }
        }
        let place = self.place_block()?;
        if !place.is_solid() {
            return Err(ConfigError::Invalid(
                "place_block_type must be a solid block".to_string(),
            ));
        }
        Ok(())
    }

    /// The block type place edits create.
    pub fn place_block(&self) -> Result<BlockType, ConfigError> {
        self.place_block_type.parse()
    }

    /// The highest surface level, resolved against the world bounds.
    ///
    /// Defaults to eight below the world top, never below
    /// `min_terrain_height` and never above the top layer.
    pub fn resolved_max_terrain_height(&self) -> usize {
        let top = self.world_height.saturating_sub(1);
        self.max_terrain_height
            .unwrap_or_else(|| self.world_height.saturating_sub(8))
            .max(self.min_terrain_height)
            .min(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = WorldConfig::default();
        config.validate().unwrap();
        assert_eq!(config.resolved_max_terrain_height(), 24);
        assert_eq!(config.place_block().unwrap(), BlockType::BRICK);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = WorldConfig::from_json_str(
            r#"{ "world_size": 32, "world_height": 16, "min_terrain_height": 4,
                 "terrain_mode": "hills", "noise_kind": "perlin", "seed": 7 }"#,
        )
        .unwrap();
        assert_eq!(config.world_size, 32);
        assert_eq!(config.terrain_mode, TerrainMode::Hills);
        assert_eq!(config.noise_kind, NoiseKind::Perlin);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.destroy_reach, DESTROY_REACH);
        assert_eq!(config.resolved_max_terrain_height(), 8);
    }

    #[test]
    fn rejects_bad_bounds() {
        assert!(matches!(
            WorldConfig::with_bounds(20, 16, 4).validate(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            WorldConfig::with_bounds(16, 8, 0).validate(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            WorldConfig::with_bounds(16, 8, 8).validate(),
            Err(ConfigError::Invalid(_))
        ));

        let mut config = WorldConfig::with_bounds(16, 8, 4);
        config.place_block_type = "air".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.place_block_type = "marble".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownBlockType(_))
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            WorldConfig::from_json_str("{ world_size: 16 "),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn max_terrain_never_drops_below_min() {
        let config = WorldConfig::with_bounds(16, 8, 4);
        assert_eq!(config.resolved_max_terrain_height(), 4);
    }
}
