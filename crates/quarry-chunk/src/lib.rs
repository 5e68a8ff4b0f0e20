//! Chunk node storage, light packing and parent delegation.
#![forbid(unsafe_code)]

pub mod chunk;
pub mod container;
pub mod error;
pub mod node;
pub mod overlay;

pub use chunk::Chunk;
pub use container::{ChunkMap, Detached, NodeContainer};
pub use error::GridError;
pub use node::{
    LIGHT_MAX, LIGHT_SUN, LightBank, LightParam, Node, decode_light, diminish_light, pack_dir,
    undiminish_light, unpack_dir,
};
pub use overlay::{NodeOverlay, OverlayMap};

/// Side length of a chunk in nodes.
pub const CHUNK_SIZE: i32 = 16;
/// Nodes per chunk.
pub const NODE_COUNT: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;
