use super::*;
use crate::sweep::{FaceKey, coalesce};
use quarry_chunk::LightParam;
use quarry_content::{AtlasId, AtlasPlacement, ContentRegistry, MaterialKind, TextureId};

fn make_test_registry() -> ContentRegistry {
    ContentRegistry::from_toml_str(
        r#"
        [[content]]
        name = "stone"
        id = 0

        [[content]]
        name = "water"
        id = 2
        draw = "flowing_liquid"
        liquid_flowing = "water"
        liquid_source = "water_source"

        [[content]]
        name = "leaves"
        id = 5
        draw = "foliage"

        [[content]]
        name = "water_source"
        id = 9
        draw = "liquid"
        liquid_flowing = "water"
        liquid_source = "water_source"
    "#,
    )
    .unwrap()
}

fn tile(texture: u32, tile_limit: u16) -> TileSpec {
    TileSpec {
        texture: TextureId(texture),
        placement: Some(AtlasPlacement {
            atlas: AtlasId(0),
            pos: [0.0, 0.0],
            size: [0.25, 0.25],
            tile_limit,
        }),
        alpha: 255,
        material: MaterialKind::Opaque,
        backface_culling: true,
    }
}

fn key(texture: u32, tile_limit: u16) -> FaceKey {
    FaceKey {
        side: FaceSide::Near,
        tile0: tile(texture, tile_limit),
        tile1: tile(99, 0),
        light: 0,
    }
}

fn material() -> MaterialKey {
    MaterialKey {
        atlas: AtlasId(0),
        kind: MaterialKind::Opaque,
        backface_culling: true,
    }
}

#[test]
fn face_needs_different_solidness() {
    let reg = make_test_registry();
    let opts = MeshOptions::default();
    let air = quarry_content::CONTENT_AIR;
    let ignore = quarry_content::CONTENT_IGNORE;
    assert_eq!(face_side(0, air, &reg, &opts), Some(FaceSide::Near));
    assert_eq!(face_side(air, 0, &reg, &opts), Some(FaceSide::Far));
    assert_eq!(face_side(0, 0, &reg, &opts), None);
    assert_eq!(face_side(0, ignore, &reg, &opts), None);
    assert_eq!(face_side(ignore, air, &reg, &opts), None);
    // stone and leaves are both opaque in the classic style
    assert_eq!(face_side(0, 5, &reg, &opts), None);
    // source against its own flowing form
    assert_eq!(face_side(9, 2, &reg, &opts), None);
    assert_eq!(face_side(9, air, &reg, &opts), Some(FaceSide::Near));
}

#[test]
fn new_styles_hide_sources_and_leaves() {
    let reg = make_test_registry();
    let opts = MeshOptions {
        new_style_water: true,
        new_style_leaves: true,
        ..Default::default()
    };
    let air = quarry_content::CONTENT_AIR;
    assert_eq!(face_side(9, air, &reg, &opts), None);
    assert_eq!(face_side(0, 5, &reg, &opts), Some(FaceSide::Near));
    assert_eq!(effective_solidness(5, &reg, &opts), 0);
    assert_eq!(effective_solidness(0, &reg, &opts), 2);
}

#[test]
fn face_light_attenuates_by_axis() {
    let reg = make_test_registry();
    let air = quarry_content::CONTENT_AIR;
    let lit = Node::with_params(air, LightParam::new(12, 0).0, 0);
    let dark = Node::new(0);
    assert_eq!(face_light(lit, dark, Face::PosY, 1000, &reg), 12);
    assert_eq!(face_light(dark, lit, Face::PosZ, 1000, &reg), 11);
    assert_eq!(face_light(lit, dark, Face::PosX, 1000, &reg), 10);
    assert_eq!(face_light(dark, lit, Face::NegY, 1000, &reg), 12);
    // night bank is dark
    assert_eq!(face_light(lit, dark, Face::PosY, 0, &reg), 0);
}

#[test]
fn coalesce_merges_equal_square() {
    let l = 4;
    let keys = vec![Some(key(1, 0)); (l * l) as usize];
    let rects = coalesce(&keys, l);
    assert_eq!(rects.len(), 1);
    assert_eq!((rects[0].lu, rects[0].lv), (4, 4));
}

#[test]
fn coalesce_respects_limit_in_both_directions() {
    let l = 4;
    let keys = vec![Some(key(1, 2)); (l * l) as usize];
    let rects = coalesce(&keys, l);
    assert_eq!(rects.len(), 4);
    assert!(rects.iter().all(|r| r.lu == 2 && r.lv == 2));
}

#[test]
fn coalesce_keeps_differing_runs_apart() {
    let l = 3;
    let mut keys = vec![None; (l * l) as usize];
    // row 0: A A B, row 1: A A A
    keys[0] = Some(key(1, 0));
    keys[1] = Some(key(1, 0));
    keys[2] = Some(key(2, 0));
    keys[3] = Some(key(1, 0));
    keys[4] = Some(key(1, 0));
    keys[5] = Some(key(1, 0));
    let rects = coalesce(&keys, l);
    assert_eq!(rects.len(), 3);
    let covered: i32 = rects.iter().map(|r| r.lu * r.lv).sum();
    assert_eq!(covered, 6);
}

#[test]
fn batcher_opens_new_batch_at_vertex_limit() {
    let mut b = FaceBatcher::with_vertex_limit(8);
    let vs = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    let uvs = [[0.0, 0.0]; 4];
    for _ in 0..3 {
        b.add_quad(material(), vs, Vec3::new(0.0, 0.0, 1.0), uvs, [255; 4]);
    }
    assert_eq!(b.batches().len(), 2);
    assert_eq!(b.batches()[0].build.quad_count(), 2);
    assert_eq!(b.batches()[1].build.idx, vec![0, 1, 2, 2, 3, 0]);
    assert_eq!(b.quad_count(), 3);
}

#[test]
fn append_rebases_indices() {
    let mut src = MeshBuild::default();
    for i in 0..3 {
        let o = i as f32;
        src.add_face_rect(Face::PosY, Vec3::new(o, 0.0, 0.0), 1.0, 1.0, [0.0, 0.0, 0.5, 0.5], [255; 4]);
    }
    let mut b = FaceBatcher::with_vertex_limit(8);
    b.append(material(), &src);
    assert_eq!(b.batches().len(), 2);
    let second = &b.batches()[1].build;
    assert_eq!(second.vertex_count(), 4);
    assert!(second.idx.iter().all(|&i| i < 4));
    assert_eq!(second.positions()[0], src.positions()[8 * 3]);
}

#[test]
fn separate_materials_never_share_a_batch() {
    let mut b = FaceBatcher::new();
    let other = MaterialKey {
        kind: MaterialKind::AlphaRef,
        ..material()
    };
    b.add_face_rect(material(), Face::PosX, Vec3::ZERO, 1.0, 1.0, [0.0; 4], [255; 4]);
    b.add_face_rect(other, Face::PosX, Vec3::ZERO, 1.0, 1.0, [0.0; 4], [255; 4]);
    b.add_face_rect(material(), Face::NegX, Vec3::ZERO, 1.0, 1.0, [0.0; 4], [255; 4]);
    assert_eq!(b.batches().len(), 2);
    assert_eq!(b.batches()[0].build.quad_count(), 2);
}

#[test]
fn face_rect_winding_follows_normal() {
    for face in Face::ALL {
        let mut m = MeshBuild::default();
        m.add_face_rect(face, Vec3::ZERO, 2.0, 3.0, [0.0, 0.0, 1.0, 1.0], [255; 4]);
        let p = |i: usize| Vec3::new(m.pos[i * 3], m.pos[i * 3 + 1], m.pos[i * 3 + 2]);
        let cross = (p(1) - p(0)).cross(p(2) - p(0));
        assert!(cross.dot(face.normal()) > 0.0, "{face:?}");
        assert_eq!(Face::from_dir(face.delta()), Some(face));
        assert_eq!(face.opposite().opposite(), face);
    }
}
