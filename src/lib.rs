#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Block World
//!
//! The world core of a block-building voxel game: chunked block storage,
//! procedural terrain, face occlusion bookkeeping, light propagation and
//! ray-driven block edits.
//!
//! Rendering is not part of this crate. A renderer reads blocks (type,
//! occluded faces, light) through [`EngineState`], rebuilds the geometry of
//! every chunk reported stale, and sends edits back through
//! [`EngineState::cast_and_edit`].
//!
//! ## Key Modules
//!
//! * `config` - World bounds and generation settings
//! * `engine_state` - The engine facade and the voxel world core
//! * `error` - Typed outcomes of queries, edits and configuration loading
//!
//! ## Usage
//!
//! ```rust
//! use block_world::{EngineState, WorldConfig};
//! use block_world::engine_state::voxels::editing::EditMode;
//! use cgmath::{Point3, Vector3};
//!
//! let mut config = WorldConfig::with_bounds(16, 16, 4);
//! config.seed = Some(1);
//! let mut engine = EngineState::generate(config).unwrap();
//!
//! // look straight down from just above the centre column
//! let top = engine.world().column_top(8, 8).unwrap();
//! let result = engine.cast_and_edit(
//!     Point3::new(8.5, top as f32 + 2.5, 8.5),
//!     Vector3::new(0.0, 1.0, 0.0),
//!     EditMode::Destroy,
//! );
//! assert!(result.is_ok());
//! ```

use log::info;

pub mod config;
pub mod engine_state;
pub mod error;

pub use config::WorldConfig;
pub use engine_state::voxels::world::World;
pub use engine_state::EngineState;
pub use error::{ConfigError, WorldError, WorldResult};

use cgmath::{Point3, Vector3};
use engine_state::voxels::editing::EditMode;

/// Generates a world from the configuration file named on the command line
/// (or the defaults), reports on it and runs one destroy and one place edit
/// straight down at the world centre.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {path}");
            WorldConfig::from_file(path)?
        }
        None => WorldConfig::default(),
    };

    let mut engine = EngineState::generate(config)?;
    report(&engine);

    // pretend a renderer built every chunk
    for chunk in engine.stale_chunks() {
        engine.clear_stale(chunk);
    }

    let centre = engine.world().world_size() / 2;
    let above = engine.world().column_top(centre, centre).unwrap_or(0) + 2;
    let origin = Point3::new(centre as f32 + 0.5, above as f32 + 0.5, centre as f32 + 0.5);
    let down = Vector3::new(0.0, 1.0, 0.0);

    for mode in [EditMode::Destroy, EditMode::Place] {
        match engine.cast_and_edit(origin, down, mode) {
            Ok(result) => info!("{mode:?} edited {:?}", result.position),
            Err(err) => info!("{mode:?} did nothing: {err}"),
        }
        info!("Stale chunks: {:?}", engine.stale_chunks());
    }

    Ok(())
}

/// Logs block counts per type and light statistics.
fn report(engine: &EngineState) {
    let mut counts: Vec<_> = engine.world().block_type_counts().into_iter().collect();
    counts.sort();
    for (block_type, count) in counts {
        info!("{block_type:>8}: {count}");
    }

    let lights: Vec<u8> = engine
        .world()
        .snapshot()
        .iter()
        .filter(|block| block.is_air())
        .map(|block| block.light())
        .collect();
    if let (Some(min), Some(max)) = (lights.iter().min(), lights.iter().max()) {
        let mean = lights.iter().map(|&l| l as f64).sum::<f64>() / lights.len() as f64;
        info!("Air light: min {min}, max {max}, mean {mean:.2}");
    }
}
