use hashbrown::HashMap;
use quarry_geom::V3i;

use crate::CHUNK_SIZE;
use crate::chunk::Chunk;
use crate::error::GridError;
use crate::node::Node;

/// Anything that can answer node queries in world coordinates.
pub trait NodeContainer {
    fn is_valid_position(&self, p: V3i) -> bool;
    fn node(&self, p: V3i) -> Result<Node, GridError>;
    fn set_node(&mut self, p: V3i, node: Node) -> Result<(), GridError>;
}

/// Parent of a chunk that has no neighbours: every lookup fails.
#[derive(Copy, Clone, Debug, Default)]
pub struct Detached;

impl NodeContainer for Detached {
    fn is_valid_position(&self, _p: V3i) -> bool {
        false
    }

    fn node(&self, p: V3i) -> Result<Node, GridError> {
        Err(GridError::InvalidPosition(p))
    }

    fn set_node(&mut self, p: V3i, _node: Node) -> Result<(), GridError> {
        Err(GridError::InvalidPosition(p))
    }
}

/// Chunks keyed by chunk position.
///
/// To work on one chunk while reading its neighbours through the map, take it
/// out with [`ChunkMap::take`] (or use [`ChunkMap::with_chunk_mut`]) and put it
/// back afterwards.
#[derive(Debug, Default)]
pub struct ChunkMap {
    chunks: HashMap<V3i, Chunk>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `chunk` at its own position, returning the chunk it replaced.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.pos(), chunk)
    }

    pub fn take(&mut self, pos: V3i) -> Option<Chunk> {
        self.chunks.remove(&pos)
    }

    pub fn get(&self, pos: V3i) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn get_mut(&mut self, pos: V3i) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }

    pub fn contains(&self, pos: V3i) -> bool {
        self.chunks.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = V3i> + '_ {
        self.chunks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Runs `f` on the chunk at `pos` with the rest of the map as its parent.
    pub fn with_chunk_mut<R>(
        &mut self,
        pos: V3i,
        f: impl FnOnce(&mut Chunk, &mut ChunkMap) -> R,
    ) -> Option<R> {
        let mut chunk = self.take(pos)?;
        let r = f(&mut chunk, self);
        self.insert(chunk);
        Some(r)
    }

    #[inline]
    fn locate(p: V3i) -> (V3i, V3i) {
        (p.div_floor(CHUNK_SIZE), p.rem_floor(CHUNK_SIZE))
    }
}

impl NodeContainer for ChunkMap {
    fn is_valid_position(&self, p: V3i) -> bool {
        let (cpos, _) = Self::locate(p);
        self.chunks.get(&cpos).is_some_and(|c| !c.is_dummy())
    }

    fn node(&self, p: V3i) -> Result<Node, GridError> {
        let (cpos, local) = Self::locate(p);
        let chunk = self.chunks.get(&cpos).ok_or(GridError::InvalidPosition(p))?;
        chunk.node_local(local)
    }

    fn set_node(&mut self, p: V3i, node: Node) -> Result<(), GridError> {
        let (cpos, local) = Self::locate(p);
        let chunk = self
            .chunks
            .get_mut(&cpos)
            .ok_or(GridError::InvalidPosition(p))?;
        chunk.set_node_local(local, node)
    }
}
