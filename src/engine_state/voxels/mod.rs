//! # Voxel World Core
//!
//! This module contains the voxel world itself and every algorithm that keeps
//! it consistent: generation, face occlusion, lighting and editing.
//!
//! ## Architecture
//!
//! * **Block**: block types, faces, and the three-byte per-cell record
//! * **Chunk**: fixed 16 × height × 16 columns of blocks with a solidity mask
//! * **World**: owns every chunk and addresses blocks by world coordinate
//! * **Generation**: noise fields and the terrain generator
//! * **Neighbors**: per-face occlusion flags, in full and after single edits
//! * **Lighting**: the multi-pass light solver and per-vertex shading
//! * **Editing**: ray-driven destroy and place
//!
//! ## Data Flow
//!
//! 1. The terrain generator fills a freshly allocated world
//! 2. One full neighbour pass sets every occlusion flag
//! 3. One full light solve lights every air cell
//! 4. Each edit changes one cell, patches the flags around it and solves
//!    light again; every chunk whose bytes change is marked stale for the
//!    renderer

pub mod block;
pub mod chunk;
pub mod editing;
pub mod generation;
pub mod lighting;
pub mod neighbors;
pub mod world;
