//! Geometry that is not a cube face: billboards, liquid surfaces and
//! see-through foliage.

use quarry_chunk::{CHUNK_SIZE, Node, decode_light, undiminish_light};
use quarry_content::{CONTENT_AIR, ContentFeatures, ContentId, DrawType};
use quarry_geom::{V3i, Vec3};

use crate::batch::FaceBatcher;
use crate::constants::{
    LIQUID_LEVEL_MASK, LIQUID_LEVEL_STEPS, OPAQUE_ALPHA, WATER_LEVEL_CLASSIC,
    WATER_LEVEL_NEW_STYLE, WHITE,
};
use crate::face::Face;
use crate::MeshContext;

/// Emits the special geometry of every node in the chunk.
pub(crate) fn emit_special_nodes(ctx: &mut MeshContext<'_>, out: &mut FaceBatcher) {
    let classifier = ctx.classifier;
    for z in 0..CHUNK_SIZE {
        for y in 0..CHUNK_SIZE {
            for x in 0..CHUNK_SIZE {
                let p = V3i::new(x, y, z);
                let n = ctx.node(p);
                let f = classifier.features(n.content);
                match f.draw_type {
                    DrawType::Billboard => billboard(ctx, out, p, n, f),
                    DrawType::FlowingLiquid => flowing_liquid(ctx, out, p, n),
                    DrawType::Liquid if ctx.options.new_style_water => {
                        liquid_surface(ctx, out, p, n)
                    }
                    DrawType::Foliage if ctx.options.new_style_leaves => foliage(ctx, out, p, n),
                    _ => {}
                }
            }
        }
    }
}

fn water_level(ctx: &MeshContext<'_>) -> f32 {
    if ctx.options.new_style_water {
        WATER_LEVEL_NEW_STYLE
    } else {
        WATER_LEVEL_CLASSIC
    }
}

/// Flat quad standing in the XY plane, turned to face away from what it hangs on.
fn billboard(
    ctx: &mut MeshContext<'_>,
    out: &mut FaceBatcher,
    p: V3i,
    n: Node,
    f: &ContentFeatures,
) {
    let dir = n.dir();
    let def = f.tile(0);
    let name = match &f.billboard {
        Some(bb) if dir == V3i::DOWN || dir == V3i::ZERO => &bb.floor,
        Some(bb) if dir == V3i::UP => &bb.ceiling,
        Some(bb) => &bb.wall,
        None => &def.texture,
    };
    let tile = ctx.tiles.named_tile(name, def);
    let (Some(material), Some(uvs)) = (tile.material_key(), tile.cell_uvs()) else {
        return;
    };
    let angle = match (dir.x, dir.y, dir.z) {
        (-1, 0, 0) => 180.0,
        (0, 0, 1) => 90.0,
        (0, 0, -1) => -90.0,
        (0, -1, 0) => 45.0,
        (0, 1, 0) => -45.0,
        _ => 0.0,
    };
    let base = [
        Vec3::new(-0.5, -0.5, 0.0),
        Vec3::new(0.5, -0.5, 0.0),
        Vec3::new(0.5, 0.5, 0.0),
        Vec3::new(-0.5, 0.5, 0.0),
    ];
    let center = ctx.origin + Vec3::from(p);
    let vs = base.map(|v| center + v.rotate_xz_by(angle));
    let normal = Vec3::new(0.0, 0.0, 1.0).rotate_xz_by(angle);
    out.add_quad(material, vs, normal, uvs, WHITE);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LiquidKind {
    Source,
    Flowing,
    Air,
    Other,
}

#[derive(Copy, Clone, Debug)]
struct LiquidSample {
    kind: LiquidKind,
    /// Surface height relative to the node center.
    level: f32,
    /// Same liquid sits on top of this neighbor.
    covered: bool,
}

const NEIGHBOR_DIRS: [V3i; 9] = [
    V3i::new(0, 0, 0),
    V3i::new(0, 0, 1),
    V3i::new(0, 0, -1),
    V3i::new(1, 0, 0),
    V3i::new(-1, 0, 0),
    V3i::new(1, 0, 1),
    V3i::new(-1, 0, -1),
    V3i::new(1, 0, -1),
    V3i::new(-1, 0, 1),
];

// Corner i is shared by the four nodes at HALF_DIRS[i] - HALF_DIRS[j].
const HALF_DIRS: [V3i; 4] = [
    V3i::new(0, 0, 0),
    V3i::new(1, 0, 0),
    V3i::new(1, 0, 1),
    V3i::new(0, 0, 1),
];

/// Side direction, the two corners on that side and the turn from the +Z side.
const LIQUID_SIDES: [(V3i, [usize; 2], f32); 4] = [
    (V3i::new(1, 0, 0), [1, 2], -90.0),
    (V3i::new(-1, 0, 0), [3, 0], 90.0),
    (V3i::new(0, 0, 1), [2, 3], 0.0),
    (V3i::new(0, 0, -1), [0, 1], 180.0),
];

fn liquid_kind(ctx: &MeshContext<'_>, flowing: ContentId, c: ContentId) -> LiquidKind {
    if c == CONTENT_AIR {
        return LiquidKind::Air;
    }
    if ctx.classifier.flowing_form(c) != Some(flowing) {
        return LiquidKind::Other;
    }
    match ctx.classifier.features(c).draw_type {
        DrawType::FlowingLiquid => LiquidKind::Flowing,
        _ => LiquidKind::Source,
    }
}

fn is_same_liquid(kind: LiquidKind) -> bool {
    matches!(kind, LiquidKind::Source | LiquidKind::Flowing)
}

/// Samples the node at `p`; `None` when it is outside anything loaded.
fn sample_liquid(
    ctx: &MeshContext<'_>,
    flowing: ContentId,
    level_height: f32,
    p: V3i,
) -> Option<LiquidSample> {
    let n = ctx.node(p);
    if n.is_ignore() {
        return None;
    }
    let kind = liquid_kind(ctx, flowing, n.content);
    let level = match kind {
        LiquidKind::Source => -0.5 + level_height,
        LiquidKind::Flowing => {
            let step = (n.param2 & LIQUID_LEVEL_MASK) as f32;
            -0.5 + (step + 0.5) / LIQUID_LEVEL_STEPS * level_height
        }
        LiquidKind::Air | LiquidKind::Other => -0.5,
    };
    // an unloaded node above is taken as uncovered
    let covered = is_same_liquid(liquid_kind(ctx, flowing, ctx.node(p + V3i::UP).content));
    Some(LiquidSample {
        kind,
        level,
        covered,
    })
}

fn flowing_liquid(ctx: &mut MeshContext<'_>, out: &mut FaceBatcher, p: V3i, n: Node) {
    let flowing = n.content;
    let tile = ctx.tiles.face_tile(flowing, Face::PosY.index(), None);
    let (Some(material), Some(uvs)) = (tile.material_key(), tile.cell_uvs()) else {
        return;
    };
    let level_height = water_level(ctx);
    let top_is_liquid = is_same_liquid(liquid_kind(ctx, flowing, ctx.node(p + V3i::UP).content));
    let li = decode_light(n.light_blend(ctx.options.daynight_ratio, ctx.classifier));
    let rgba = [li, li, li, tile.alpha];

    let samples = NEIGHBOR_DIRS.map(|d| sample_liquid(ctx, flowing, level_height, p + d));
    let sample_at = |d: V3i| {
        NEIGHBOR_DIRS
            .iter()
            .position(|&nd| nd == d)
            .and_then(|i| samples[i])
    };

    let mut corners = [0.0f32; 4];
    for (i, &cd) in HALF_DIRS.iter().enumerate() {
        let mut sum = 0.0;
        let mut count = 0;
        for &hd in &HALF_DIRS {
            let Some(s) = sample_at(cd - hd) else {
                continue;
            };
            match s.kind {
                // a source fixes the corner at full height
                LiquidKind::Source => {
                    sum = s.level;
                    count = 1;
                    break;
                }
                LiquidKind::Flowing | LiquidKind::Air => {
                    sum += s.level;
                    count += 1;
                }
                LiquidKind::Other => {}
            }
        }
        if count > 0 {
            corners[i] = sum / count as f32;
        }
    }

    let center = ctx.origin + Vec3::from(p);
    for &(dir, [c0, c1], angle) in &LIQUID_SIDES {
        let Some(s) = sample_at(dir) else {
            continue;
        };
        if top_is_liquid && s.covered {
            continue;
        }
        if !matches!(s.kind, LiquidKind::Air | LiquidKind::Flowing) {
            continue;
        }
        let neighbor_is_liquid = s.kind == LiquidKind::Flowing;
        if neighbor_is_liquid && !top_is_liquid {
            continue;
        }
        let (top0, top1) = if top_is_liquid {
            (0.5, 0.5)
        } else {
            (corners[c0], corners[c1])
        };
        let (bottom0, bottom1) = if neighbor_is_liquid {
            (corners[c1], corners[c0])
        } else {
            (-0.5, -0.5)
        };
        let vs = [
            Vec3::new(-0.5, bottom0, 0.5),
            Vec3::new(0.5, bottom1, 0.5),
            Vec3::new(0.5, top0, 0.5),
            Vec3::new(-0.5, top1, 0.5),
        ]
        .map(|v| center + v.rotate_xz_by(angle));
        let normal = Vec3::new(0.0, 0.0, 1.0).rotate_xz_by(angle);
        out.add_quad(material, vs, normal, uvs, rgba);
    }

    if !top_is_liquid {
        let vs = [
            Vec3::new(-0.5, corners[3], 0.5),
            Vec3::new(0.5, corners[2], 0.5),
            Vec3::new(0.5, corners[1], -0.5),
            Vec3::new(-0.5, corners[0], -0.5),
        ]
        .map(|v| center + v);
        out.add_quad(material, vs, Vec3::UP, uvs, rgba);
    }
}

/// Flat surface on top of a source with open air above.
fn liquid_surface(ctx: &mut MeshContext<'_>, out: &mut FaceBatcher, p: V3i, n: Node) {
    if ctx.node(p + V3i::UP).content != CONTENT_AIR {
        return;
    }
    let tile = ctx.tiles.face_tile(n.content, Face::PosY.index(), None);
    let (Some(material), Some(uvs)) = (tile.material_key(), tile.cell_uvs()) else {
        return;
    };
    let li = decode_light(n.light_blend(ctx.options.daynight_ratio, ctx.classifier));
    let y = -0.5 + WATER_LEVEL_NEW_STYLE;
    let center = ctx.origin + Vec3::from(p);
    let vs = [
        Vec3::new(-0.5, y, 0.5),
        Vec3::new(0.5, y, 0.5),
        Vec3::new(0.5, y, -0.5),
        Vec3::new(-0.5, y, -0.5),
    ]
    .map(|v| center + v);
    out.add_quad(material, vs, Vec3::UP, uvs, [li, li, li, tile.alpha]);
}

/// All six sides of the node, drawn regardless of neighbors.
fn foliage(ctx: &mut MeshContext<'_>, out: &mut FaceBatcher, p: V3i, n: Node) {
    let li = decode_light(undiminish_light(
        n.light_blend(ctx.options.daynight_ratio, ctx.classifier),
    ));
    let center = ctx.origin + Vec3::from(p);
    let base = [
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(-0.5, 0.5, 0.5),
    ];
    let turns: [(Face, fn(Vec3) -> Vec3); 6] = [
        (Face::PosZ, |v| v),
        (Face::NegZ, |v| v.rotate_xz_by(180.0)),
        (Face::PosX, |v| v.rotate_xz_by(-90.0)),
        (Face::NegX, |v| v.rotate_xz_by(90.0)),
        (Face::PosY, |v| v.rotate_yz_by(-90.0)),
        (Face::NegY, |v| v.rotate_yz_by(90.0)),
    ];
    for (face, turn) in turns {
        let tile = ctx.tiles.face_tile(n.content, face.index(), None);
        let (Some(material), Some(uvs)) = (tile.material_key(), tile.cell_uvs()) else {
            continue;
        };
        let vs = base.map(|v| center + turn(v));
        out.add_quad(material, vs, face.normal(), uvs, [li, li, li, OPAQUE_ALPHA]);
    }
}
