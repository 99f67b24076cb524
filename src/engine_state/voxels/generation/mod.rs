//! # Generation Module
//!
//! Everything that runs once, when a world is created: the noise fields and
//! the terrain generator that reads them.

pub mod noise;
pub mod terrain;

use crate::config::{NoiseKind, WorldConfig};
use self::noise::{NoiseField, NoiseSource, PerlinNoise};

/// Builds the noise source selected by the configuration.
///
/// The lattice tables of [`NoiseField`] are filled from `rng`; the Perlin
/// permutation is seeded from it.
pub fn build_noise(config: &WorldConfig, rng: &mut fastrand::Rng) -> Box<dyn NoiseSource> {
    match config.noise_kind {
        NoiseKind::Lattice => Box::new(NoiseField::new(config.world_size, config.world_height, rng)),
        NoiseKind::Perlin => Box::new(PerlinNoise::new(rng.u32(..))),
    }
}
