//! Boundary faces between cube-like nodes.
//!
//! Each axis is swept plane by plane. A face between two nodes is drawn by the
//! more solid one, and only by the chunk that owns that node, so faces on a
//! chunk border are emitted exactly once. Equal faces are merged along the
//! sweep direction first and the resulting runs are then stacked across
//! lines, both bounded by the texture's repeat limit.

use quarry_chunk::{CHUNK_SIZE, Node, decode_light, diminish_light};
use quarry_content::{CONTENT_IGNORE, ContentClassifier, ContentId, DrawType};
use quarry_geom::{V3i, Vec3};

use crate::batch::FaceBatcher;
use crate::face::Face;
use crate::tile::TileSpec;
use crate::{MeshContext, MeshOptions};

/// Which node of a pair draws the face between them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FaceSide {
    /// The first node, facing along the sweep axis.
    Near,
    /// The second node, facing back.
    Far,
}

/// Solidness used for face decisions once the render style is applied.
pub fn effective_solidness(
    id: ContentId,
    classifier: &dyn ContentClassifier,
    options: &MeshOptions,
) -> u8 {
    let f = classifier.features(id);
    match f.draw_type {
        DrawType::Liquid if options.new_style_water => 0,
        DrawType::Foliage if options.new_style_leaves => 0,
        _ => f.solidness,
    }
}

/// Decides whether a face is drawn between `c0` and `c1`, and by whom.
///
/// No face touches unknown space. Two forms of the same liquid count as the
/// same content. Otherwise a face needs different contents of different
/// solidness and belongs to the more solid one.
pub fn face_side(
    c0: ContentId,
    c1: ContentId,
    classifier: &dyn ContentClassifier,
    options: &MeshOptions,
) -> Option<FaceSide> {
    if c0 == CONTENT_IGNORE || c1 == CONTENT_IGNORE || c0 == c1 {
        return None;
    }
    if classifier.is_liquid(c0) && classifier.is_liquid(c1) {
        let f0 = classifier.flowing_form(c0);
        if f0.is_some() && f0 == classifier.flowing_form(c1) {
            return None;
        }
    }
    let s0 = effective_solidness(c0, classifier, options);
    let s1 = effective_solidness(c1, classifier, options);
    match s0.cmp(&s1) {
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(FaceSide::Near),
        std::cmp::Ordering::Less => Some(FaceSide::Far),
    }
}

/// Light of the face between `n0` and `n1` across `face`, before decoding.
///
/// Sides facing X are darkened by two steps and sides facing Z by one; faces
/// across Y keep the brighter neighbor's light.
pub fn face_light(
    n0: Node,
    n1: Node,
    face: Face,
    daynight_ratio: u32,
    classifier: &dyn ContentClassifier,
) -> u8 {
    let l = n0
        .light_blend(daynight_ratio, classifier)
        .max(n1.light_blend(daynight_ratio, classifier));
    match face {
        Face::PosX | Face::NegX => diminish_light(diminish_light(l)),
        Face::PosZ | Face::NegZ => diminish_light(l),
        Face::PosY | Face::NegY => l,
    }
}

struct Sweep {
    /// Positive face of the sweep axis.
    face: Face,
    /// Direction faces are merged along first.
    u: V3i,
    /// Direction merged runs are stacked along.
    v: V3i,
}

// In-plane axes match `MeshBuild::add_face_rect`.
const SWEEPS: [Sweep; 3] = [
    Sweep {
        face: Face::PosY,
        u: V3i::new(1, 0, 0),
        v: V3i::new(0, 0, 1),
    },
    Sweep {
        face: Face::PosX,
        u: V3i::new(0, 0, 1),
        v: V3i::new(0, 1, 0),
    },
    Sweep {
        face: Face::PosZ,
        u: V3i::new(1, 0, 0),
        v: V3i::new(0, 1, 0),
    },
];

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct FaceKey {
    pub side: FaceSide,
    pub tile0: TileSpec,
    pub tile1: TileSpec,
    pub light: u8,
}

impl FaceKey {
    fn max_repeat(&self) -> usize {
        self.tile0.max_repeat().min(self.tile1.max_repeat())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct FaceRect {
    pub u0: i32,
    pub v0: i32,
    pub lu: i32,
    pub lv: i32,
    pub key: FaceKey,
}

/// Emits every boundary face owned by the chunk into `out`.
pub(crate) fn emit_boundary_faces(ctx: &mut MeshContext<'_>, out: &mut FaceBatcher) {
    let l = CHUNK_SIZE;
    let mut keys: Vec<Option<FaceKey>> = vec![None; (l * l) as usize];
    for sweep in &SWEEPS {
        let n = sweep.face.delta();
        // plane w lies between node layers w and w + 1
        for w in -1..l {
            for v in 0..l {
                for u in 0..l {
                    let p = n * w + sweep.u * u + sweep.v * v;
                    keys[(v * l + u) as usize] = face_key(ctx, p, sweep.face, w);
                }
            }
            for rect in coalesce(&keys, l) {
                emit_rect(ctx, out, sweep, w, &rect);
            }
        }
    }
}

fn face_key(ctx: &mut MeshContext<'_>, p: V3i, face: Face, w: i32) -> Option<FaceKey> {
    let q = p + face.delta();
    let n0 = ctx.node(p);
    let n1 = ctx.node(q);
    let (c0, crack0) = ctx.overlaid(p, n0.content);
    let (c1, crack1) = ctx.overlaid(q, n1.content);
    let side = face_side(c0, c1, ctx.classifier, ctx.options)?;
    // the neighbor chunk draws faces of its own nodes
    match side {
        FaceSide::Near if w < 0 => return None,
        FaceSide::Far if w >= CHUNK_SIZE - 1 => return None,
        _ => {}
    }
    let tile0 = ctx.tiles.face_tile(c0, face.index(), crack0);
    let tile1 = ctx.tiles.face_tile(c1, face.opposite().index(), crack1);
    let light = face_light(n0, n1, face, ctx.options.daynight_ratio, ctx.classifier);
    Some(FaceKey {
        side,
        tile0,
        tile1,
        light,
    })
}

/// Runs of equal keys along one line, each at most the key's repeat limit long.
fn line_runs(row: &[Option<FaceKey>]) -> Vec<(i32, i32, FaceKey)> {
    let mut runs = Vec::new();
    let mut u = 0;
    while u < row.len() {
        let Some(key) = row[u] else {
            u += 1;
            continue;
        };
        let limit = key.max_repeat();
        let mut len = 1;
        while u + len < row.len() && len < limit && row[u + len] == Some(key) {
            len += 1;
        }
        runs.push((u as i32, len as i32, key));
        u += len;
    }
    runs
}

/// Merges the `l`×`l` key grid of one plane into rectangles.
///
/// A run extends the rectangle above it when both start and end in the same
/// place with the same key and the rectangle is still under the repeat limit.
pub(crate) fn coalesce(keys: &[Option<FaceKey>], l: i32) -> Vec<FaceRect> {
    let mut done = Vec::new();
    let mut open: Vec<FaceRect> = Vec::new();
    for v in 0..l {
        let row = &keys[(v * l) as usize..((v + 1) * l) as usize];
        let mut next = Vec::new();
        for (u0, lu, key) in line_runs(row) {
            let limit = key.max_repeat();
            let above = open
                .iter()
                .position(|r| r.u0 == u0 && r.lu == lu && r.key == key && (r.lv as usize) < limit);
            match above {
                Some(i) => {
                    let mut r = open.swap_remove(i);
                    r.lv += 1;
                    next.push(r);
                }
                None => next.push(FaceRect {
                    u0,
                    v0: v,
                    lu,
                    lv: 1,
                    key,
                }),
            }
        }
        done.append(&mut open);
        open = next;
    }
    done.append(&mut open);
    done
}

fn emit_rect(ctx: &MeshContext<'_>, out: &mut FaceBatcher, sweep: &Sweep, w: i32, r: &FaceRect) {
    let (face, tile) = match r.key.side {
        FaceSide::Near => (sweep.face, r.key.tile0),
        FaceSide::Far => (sweep.face.opposite(), r.key.tile1),
    };
    let (Some(material), Some(uv_rect)) = (tile.material_key(), tile.uv_rect()) else {
        return;
    };
    // nodes are centered on integer coordinates
    let corner = Vec3::from(sweep.face.delta()) * (w as f32 + 0.5)
        + Vec3::from(sweep.u) * (r.u0 as f32 - 0.5)
        + Vec3::from(sweep.v) * (r.v0 as f32 - 0.5);
    let li = decode_light(r.key.light);
    out.add_face_rect(
        material,
        face,
        ctx.origin + corner,
        r.lu as f32,
        r.lv as f32,
        uv_rect,
        [li, li, li, tile.alpha],
    );
}
