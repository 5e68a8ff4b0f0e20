use quarry_geom::Vec3;

use crate::face::Face;

/// Flat vertex/index arrays of one renderable batch.
#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u16>,
    pub col: Vec<u8>,
}

impl MeshBuild {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Appends a quad (two triangles) with explicit per-vertex UVs.
    ///
    /// Corners are reordered if needed so the front side faces `n`. A zero
    /// normal keeps the given order.
    pub fn add_quad_uv(
        &mut self,
        mut vs: [Vec3; 4],
        n: Vec3,
        mut uvs: [[f32; 2]; 4],
        rgba: [u8; 4],
    ) {
        let base = self.vertex_count() as u16;
        let cross = (vs[1] - vs[0]).cross(vs[2] - vs[0]);
        if cross.dot(n) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
        }
        for i in 0..4 {
            self.pos.extend_from_slice(&[vs[i].x, vs[i].y, vs[i].z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.uv.extend_from_slice(&uvs[i]);
            self.col.extend_from_slice(&rgba);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    /// Emits a face-aligned rectangle for `face` with its minimum corner at `origin`.
    ///
    /// `u1`/`v1` are the extents along the face's in-plane axes: (x, z) for Y
    /// faces, (z, y) for X faces and (x, y) for Z faces. The texture cell
    /// `uv_rect = [x0, y0, w, h]` is repeated once per unit of extent.
    pub fn add_face_rect(
        &mut self,
        face: Face,
        origin: Vec3,
        u1: f32,
        v1: f32,
        uv_rect: [f32; 4],
        rgba: [u8; 4],
    ) {
        let o = origin;
        let (du, dv) = match face {
            Face::PosY | Face::NegY => (Vec3::new(u1, 0.0, 0.0), Vec3::new(0.0, 0.0, v1)),
            Face::PosX | Face::NegX => (Vec3::new(0.0, 0.0, u1), Vec3::new(0.0, v1, 0.0)),
            Face::PosZ | Face::NegZ => (Vec3::new(u1, 0.0, 0.0), Vec3::new(0.0, v1, 0.0)),
        };
        let vs = [o, o + du, o + du + dv, o + dv];
        let [x0, y0, w, h] = uv_rect;
        // Texture v grows downwards while the in-plane v axis grows upwards.
        let uvs = [
            [x0, y0 + h * v1],
            [x0 + w * u1, y0 + h * v1],
            [x0 + w * u1, y0],
            [x0, y0],
        ];
        self.add_quad_uv(vs, face.normal(), uvs, rgba);
    }

    /// Returns a slice of interleaved vertex positions (x,y,z per vertex).
    pub fn positions(&self) -> &[f32] {
        &self.pos
    }

    /// Returns a slice of interleaved vertex normals (x,y,z per vertex).
    pub fn normals(&self) -> &[f32] {
        &self.norm
    }
}
