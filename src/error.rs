//! # Error Types
//!
//! All the expected, recoverable outcomes of world queries, edits and
//! configuration loading.

use cgmath::Point3;
use thiserror::Error;

/// Outcomes of world queries and edits that did not do anything.
///
/// None of these are faults: an out-of-range coordinate, a bedrock target or a
/// ray that hits nothing all leave the world untouched.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The coordinate lies outside `[0, world_size) × [0, world_height) × [0, world_size)`.
    #[error("block {0:?} is outside the world")]
    OutOfBounds(Point3<i32>),

    /// The edit targeted a block that cannot be removed.
    #[error("block {0:?} is indestructible")]
    Indestructible(Point3<i32>),

    /// The ray walk used up its step budget without touching a solid block.
    #[error("no solid block within reach")]
    NoTargetInRange,

    /// A block was about to be placed into a cell that is already solid.
    #[error("block {0:?} is already occupied")]
    Occupied(Point3<i32>),
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;

/// Errors raised while loading or validating a [`WorldConfig`](crate::config::WorldConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A block type name that is not in the block table.
    #[error("unknown block type: {0}")]
    UnknownBlockType(String),

    /// The configuration file is not valid JSON for a `WorldConfig`.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}
