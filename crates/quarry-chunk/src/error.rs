use quarry_geom::V3i;

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Nothing resolves the position: outside the chunk and no neighbour holds it.
    #[error("no node at {0:?}")]
    InvalidPosition(V3i),
    /// The chunk at this position is a placeholder without node storage.
    #[error("chunk holding {0:?} has no node storage")]
    NotAllocated(V3i),
}
