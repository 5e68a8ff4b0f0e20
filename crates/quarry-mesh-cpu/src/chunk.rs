use std::sync::Arc;

use parking_lot::Mutex;
use quarry_geom::{Aabb, V3i, Vec3};

use crate::batch::MeshBatch;

/// Render geometry of one chunk, grouped into per-material batches.
#[derive(Clone, Debug)]
pub struct ChunkMesh {
    pub pos: V3i,
    pub bbox: Aabb,
    pub batches: Vec<MeshBatch>,
}

impl ChunkMesh {
    pub fn new(pos: V3i, batches: Vec<MeshBatch>) -> Self {
        let mut bbox = Aabb::EMPTY;
        for b in &batches {
            for p in b.build.positions().chunks_exact(3) {
                bbox.include(Vec3::new(p[0], p[1], p[2]));
            }
        }
        Self { pos, bbox, batches }
    }

    pub fn quad_count(&self) -> usize {
        self.batches.iter().map(|b| b.build.quad_count()).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.build.vertex_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(|b| b.build.is_empty())
    }
}

/// The mesh currently shown for a chunk.
///
/// Renderers clone the `Arc` and draw without holding the lock; a rebuild
/// swaps in the new mesh and hands back the retired one.
#[derive(Debug, Default)]
pub struct MeshSlot {
    mesh: Mutex<Option<Arc<ChunkMesh>>>,
}

impl MeshSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<ChunkMesh>> {
        self.mesh.lock().clone()
    }

    pub fn replace(&self, mesh: Option<Arc<ChunkMesh>>) -> Option<Arc<ChunkMesh>> {
        std::mem::replace(&mut *self.mesh.lock(), mesh)
    }

    pub fn take(&self) -> Option<Arc<ChunkMesh>> {
        self.replace(None)
    }
}
