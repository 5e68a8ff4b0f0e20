use hashbrown::HashMap;
use quarry_content::{AtlasId, MaterialKind};
use quarry_geom::Vec3;

use crate::constants::MAX_BATCH_VERTICES;
use crate::face::Face;
use crate::mesh_build::MeshBuild;

/// Everything that must match for two quads to share a draw call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MaterialKey {
    pub atlas: AtlasId,
    pub kind: MaterialKind,
    pub backface_culling: bool,
}

#[derive(Clone, Debug)]
pub struct MeshBatch {
    pub material: MaterialKey,
    pub build: MeshBuild,
}

/// Groups quads by material, starting a fresh batch for a material whenever
/// the open one would run past the vertex limit.
#[derive(Debug)]
pub struct FaceBatcher {
    batches: Vec<MeshBatch>,
    open: HashMap<MaterialKey, usize>,
    vertex_limit: usize,
}

impl Default for FaceBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceBatcher {
    pub fn new() -> Self {
        Self::with_vertex_limit(MAX_BATCH_VERTICES)
    }

    /// Limit is clamped to what 16-bit indices can address and to at least one quad.
    pub fn with_vertex_limit(limit: usize) -> Self {
        Self {
            batches: Vec::new(),
            open: HashMap::new(),
            vertex_limit: limit.clamp(4, MAX_BATCH_VERTICES),
        }
    }

    fn build_for(&mut self, material: MaterialKey, vertices: usize) -> &mut MeshBuild {
        let limit = self.vertex_limit;
        let reuse = self
            .open
            .get(&material)
            .copied()
            .filter(|&i| self.batches[i].build.vertex_count() + vertices <= limit);
        let i = match reuse {
            Some(i) => i,
            None => {
                self.batches.push(MeshBatch {
                    material,
                    build: MeshBuild::default(),
                });
                let i = self.batches.len() - 1;
                self.open.insert(material, i);
                i
            }
        };
        &mut self.batches[i].build
    }

    pub fn add_quad(
        &mut self,
        material: MaterialKey,
        vs: [Vec3; 4],
        n: Vec3,
        uvs: [[f32; 2]; 4],
        rgba: [u8; 4],
    ) {
        self.build_for(material, 4).add_quad_uv(vs, n, uvs, rgba);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_face_rect(
        &mut self,
        material: MaterialKey,
        face: Face,
        origin: Vec3,
        u1: f32,
        v1: f32,
        uv_rect: [f32; 4],
        rgba: [u8; 4],
    ) {
        self.build_for(material, 4)
            .add_face_rect(face, origin, u1, v1, uv_rect, rgba);
    }

    /// Appends every quad of `other` under `material`, re-basing its indices.
    ///
    /// `other` is split at quad boundaries when the open batch fills up.
    pub fn append(&mut self, material: MaterialKey, other: &MeshBuild) {
        for quad in other.idx.chunks_exact(6) {
            let lo = quad.iter().copied().min().unwrap_or(0) as usize;
            let last = quad.iter().copied().max().unwrap_or(0) as usize;
            let count = last - lo + 1;
            let dst = self.build_for(material, count);
            let base = dst.vertex_count();
            dst.pos.extend_from_slice(&other.pos[lo * 3..(last + 1) * 3]);
            dst.norm.extend_from_slice(&other.norm[lo * 3..(last + 1) * 3]);
            dst.uv.extend_from_slice(&other.uv[lo * 2..(last + 1) * 2]);
            dst.col.extend_from_slice(&other.col[lo * 4..(last + 1) * 4]);
            dst.idx
                .extend(quad.iter().map(|&i| (base + i as usize - lo) as u16));
        }
    }

    pub fn quad_count(&self) -> usize {
        self.batches.iter().map(|b| b.build.quad_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(|b| b.build.is_empty())
    }

    pub fn batches(&self) -> &[MeshBatch] {
        &self.batches
    }

    pub fn into_batches(self) -> Vec<MeshBatch> {
        self.batches
    }
}
