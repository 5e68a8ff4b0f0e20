//! CPU meshing crate: turns a chunk and its neighbors into batched render geometry.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::Instant;

use quarry_chunk::{Chunk, Node, NodeContainer, NodeOverlay, OverlayMap};
use quarry_content::{ContentClassifier, ContentId, TextureSource};
use quarry_geom::{V3i, Vec3};

mod batch;
mod chunk;
mod constants;
mod face;
mod mesh_build;
mod special;
mod sweep;
mod tile;

pub use batch::{FaceBatcher, MaterialKey, MeshBatch};
pub use chunk::{ChunkMesh, MeshSlot};
pub use constants::MAX_BATCH_VERTICES;
pub use face::Face;
pub use mesh_build::MeshBuild;
pub use sweep::{FaceSide, effective_solidness, face_light, face_side};
pub use tile::TileSpec;

use tile::TileResolver;

/// Render style switches and the day/night mix used for vertex light.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeshOptions {
    /// Lower liquid surfaces; sources only draw their top.
    pub new_style_water: bool,
    /// Draw every side of foliage instead of culling it like stone.
    pub new_style_leaves: bool,
    /// 0 = night, 1000 = day.
    pub daynight_ratio: u32,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            new_style_water: false,
            new_style_leaves: false,
            daynight_ratio: 1000,
        }
    }
}

/// Read-only view shared by the meshing passes.
pub(crate) struct MeshContext<'a> {
    pub chunk: &'a Chunk,
    pub parent: &'a dyn NodeContainer,
    pub classifier: &'a dyn ContentClassifier,
    pub options: &'a MeshOptions,
    pub overlays: &'a OverlayMap,
    pub tiles: TileResolver<'a>,
    /// World position of local node (0, 0, 0).
    pub origin: Vec3,
}

impl MeshContext<'_> {
    #[inline]
    pub fn node(&self, p: V3i) -> Node {
        self.chunk.node_or_ignore(p, self.parent)
    }

    /// Content shown at local `p` and its crack stage, after overlays.
    pub fn overlaid(&self, p: V3i, content: ContentId) -> (ContentId, Option<u8>) {
        if !Chunk::is_valid_position(p) {
            return (content, None);
        }
        match self.overlays.get(&p) {
            Some(NodeOverlay::ChangeContent(c)) => (*c, None),
            Some(NodeOverlay::Crack(stage)) => (content, Some(*stage)),
            None => (content, None),
        }
    }
}

/// Builds the mesh of `chunk` with `overlays` applied.
///
/// Nodes outside the chunk are read through `parent`; faces towards
/// unloaded space are left out. Returns `None` for an unallocated chunk or
/// when nothing is visible.
pub fn build_chunk_mesh(
    chunk: &Chunk,
    parent: &dyn NodeContainer,
    classifier: &dyn ContentClassifier,
    textures: &dyn TextureSource,
    options: &MeshOptions,
    overlays: &OverlayMap,
) -> Option<ChunkMesh> {
    if chunk.is_dummy() {
        return None;
    }
    let t0 = Instant::now();
    let mut ctx = MeshContext {
        chunk,
        parent,
        classifier,
        options,
        overlays,
        tiles: TileResolver::new(classifier, textures),
        origin: Vec3::from(chunk.origin()),
    };
    let mut out = FaceBatcher::new();
    sweep::emit_boundary_faces(&mut ctx, &mut out);
    let faces_ms = t0.elapsed().as_millis();
    special::emit_special_nodes(&mut ctx, &mut out);
    let total_ms = t0.elapsed().as_millis();

    let pos = chunk.pos();
    log::info!(
        target: "perf",
        "ms faces={} total={} mesher_chunk pos=({}, {}, {}) quads={} batches={}",
        faces_ms,
        total_ms,
        pos.x,
        pos.y,
        pos.z,
        out.quad_count(),
        out.batches().len()
    );
    if out.is_empty() {
        return None;
    }
    Some(ChunkMesh::new(pos, out.into_batches()))
}

/// Rebuilds the mesh shown in `slot` from the chunk's current nodes and overlays.
///
/// The mesh-expired flag is cleared before the overlays are read, so an
/// overlay change made while the build runs leaves the chunk expired. The
/// retired mesh is returned so the caller decides when to drop it.
pub fn rebuild_chunk_mesh(
    chunk: &Chunk,
    parent: &dyn NodeContainer,
    classifier: &dyn ContentClassifier,
    textures: &dyn TextureSource,
    options: &MeshOptions,
    slot: &MeshSlot,
) -> Option<Arc<ChunkMesh>> {
    chunk.set_mesh_expired(false);
    let overlays = chunk.overlays_snapshot();
    let mesh = build_chunk_mesh(chunk, parent, classifier, textures, options, &overlays);
    slot.replace(mesh.map(Arc::new))
}

#[cfg(test)]
mod tests;
