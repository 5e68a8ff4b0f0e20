use super::*;
use quarry_chunk::{Detached, LIGHT_MAX, LightParam, Node};
use quarry_content::ContentRegistry;

const STONE: u16 = 0;
const GRASS: u16 = 1;
const MUD: u16 = 8;
const WATER_SOURCE: u16 = 9;

fn make_test_registry() -> ContentRegistry {
    ContentRegistry::from_toml_str(
        r#"
        [[content]]
        name = "stone"
        id = 0

        [[content]]
        name = "grass"
        id = 1

        [[content]]
        name = "mud"
        id = 8
        grows_into = "grass"

        [[content]]
        name = "water_source"
        id = 9
        draw = "liquid"
    "#,
    )
    .unwrap()
}

fn day(chunk: &Chunk, reg: &ContentRegistry, x: i32, y: i32, z: i32) -> u8 {
    chunk
        .node_local(V3i::new(x, y, z))
        .unwrap()
        .light(LightBank::Day, reg)
}

fn lit_air_chunk(pos: V3i, light: u8) -> Chunk {
    Chunk::filled(pos, Node::with_params(CONTENT_AIR, LightParam::new(light, 0).0, 0))
}

#[test]
fn open_sky_lights_air_fully() {
    let reg = make_test_registry();
    let mut c = Chunk::new(V3i::ZERO);
    let mut sources = HashSet::new();
    let r = propagate_sunlight(&mut c, &Detached, &reg, SunlightOptions::default(), &mut sources)
        .unwrap();
    assert!(r.chunk_below_valid);
    assert!(!r.black_air_left);
    assert!(!c.lighting_expired);
    for y in 0..CHUNK_SIZE {
        assert_eq!(day(&c, &reg, 3, y, 7), LIGHT_SUN);
    }
    assert_eq!(sources.len(), quarry_chunk::NODE_COUNT);
    assert!(sources.contains(&V3i::new(3, 0, 7)));
}

#[test]
fn underground_or_liquid_top_starts_dark() {
    let reg = make_test_registry();
    let mut c = Chunk::new(V3i::ZERO);
    c.is_underground = true;
    let mut sources = HashSet::new();
    propagate_sunlight(&mut c, &Detached, &reg, SunlightOptions::default(), &mut sources).unwrap();
    assert_eq!(day(&c, &reg, 0, 15, 0), 0);
    assert!(sources.is_empty());

    let mut c = Chunk::new(V3i::ZERO);
    c.set_node_local(V3i::new(2, 15, 2), Node::new(WATER_SOURCE)).unwrap();
    propagate_sunlight(&mut c, &Detached, &reg, SunlightOptions::default(), &mut sources).unwrap();
    assert_eq!(day(&c, &reg, 2, 14, 2), 0);
    assert_eq!(day(&c, &reg, 3, 14, 2), LIGHT_SUN);
}

#[test]
fn chunk_above_decides_entry_light() {
    let reg = make_test_registry();
    let mut map = ChunkMap::new();
    map.insert(lit_air_chunk(V3i::UP, LIGHT_MAX));
    let mut c = Chunk::new(V3i::ZERO);
    let mut sources = HashSet::new();
    propagate_sunlight(&mut c, &map, &reg, SunlightOptions::default(), &mut sources).unwrap();
    // above exists but is not sunlit, so nothing enters even though the sky is open
    assert_eq!(day(&c, &reg, 5, 15, 5), 0);

    map.insert(lit_air_chunk(V3i::UP, LIGHT_SUN));
    propagate_sunlight(&mut c, &map, &reg, SunlightOptions::default(), &mut sources).unwrap();
    assert_eq!(day(&c, &reg, 5, 0, 5), LIGHT_SUN);
}

#[test]
fn liquid_diminishes_and_solid_stops() {
    let reg = make_test_registry();
    let mut c = Chunk::new(V3i::ZERO);
    c.set_node_local(V3i::new(1, 10, 1), Node::new(WATER_SOURCE)).unwrap();
    c.set_node_local(V3i::new(1, 9, 1), Node::new(WATER_SOURCE)).unwrap();
    c.set_node_local(V3i::new(1, 5, 1), Node::new(STONE)).unwrap();
    let mut sources = HashSet::new();
    let r = propagate_sunlight(&mut c, &Detached, &reg, SunlightOptions::default(), &mut sources)
        .unwrap();
    assert_eq!(day(&c, &reg, 1, 11, 1), LIGHT_SUN);
    assert_eq!(day(&c, &reg, 1, 10, 1), 13);
    assert_eq!(day(&c, &reg, 1, 9, 1), 12);
    assert_eq!(day(&c, &reg, 1, 8, 1), 11);
    assert_eq!(day(&c, &reg, 1, 6, 1), 9);
    assert_eq!(day(&c, &reg, 1, 4, 1), 0);
    assert_eq!(day(&c, &reg, 1, 0, 1), 0);
    assert!(r.black_air_left);
}

#[test]
fn remove_light_darkens_stale_values() {
    let reg = make_test_registry();
    let mut c = lit_air_chunk(V3i::ZERO, 10);
    c.set_node_local(V3i::new(0, 12, 0), Node::new(STONE)).unwrap();
    let mut sources = HashSet::new();
    propagate_sunlight(&mut c, &Detached, &reg, SunlightOptions::default(), &mut sources).unwrap();
    assert_eq!(day(&c, &reg, 0, 3, 0), 10);

    let opts = SunlightOptions {
        remove_light: true,
        ..Default::default()
    };
    propagate_sunlight(&mut c, &Detached, &reg, opts, &mut sources).unwrap();
    assert_eq!(day(&c, &reg, 0, 3, 0), 0);
    assert_eq!(day(&c, &reg, 1, 3, 0), LIGHT_SUN);
}

#[test]
fn sunlit_mud_under_air_grows() {
    let reg = make_test_registry();
    let mut c = Chunk::new(V3i::ZERO);
    c.set_node_local(V3i::new(4, 3, 4), Node::new(MUD)).unwrap();
    // shaded mud stays mud
    c.set_node_local(V3i::new(6, 8, 6), Node::new(STONE)).unwrap();
    c.set_node_local(V3i::new(6, 3, 6), Node::new(MUD)).unwrap();
    // mud under mud has no air above
    c.set_node_local(V3i::new(8, 10, 8), Node::new(MUD)).unwrap();
    c.set_node_local(V3i::new(8, 9, 8), Node::new(MUD)).unwrap();

    let mut sources = HashSet::new();
    let opts = SunlightOptions {
        grow_grass: true,
        ..Default::default()
    };
    propagate_sunlight(&mut c, &Detached, &reg, opts, &mut sources).unwrap();
    let content = |x, y, z| c.node_local(V3i::new(x, y, z)).unwrap().content;
    assert_eq!(content(4, 3, 4), GRASS);
    assert_eq!(content(6, 3, 6), MUD);
    assert_eq!(content(8, 10, 8), GRASS);
    assert_eq!(content(8, 9, 8), MUD);
}

#[test]
fn grass_does_not_grow_without_option() {
    let reg = make_test_registry();
    let mut c = Chunk::new(V3i::ZERO);
    c.set_node_local(V3i::new(4, 3, 4), Node::new(MUD)).unwrap();
    let mut sources = HashSet::new();
    propagate_sunlight(&mut c, &Detached, &reg, SunlightOptions::default(), &mut sources).unwrap();
    assert_eq!(c.node_local(V3i::new(4, 3, 4)).unwrap().content, MUD);
}

#[test]
fn stale_chunk_below_is_reported() {
    let reg = make_test_registry();
    let mut map = ChunkMap::new();
    map.insert(Chunk::new(V3i::DOWN));
    let mut c = Chunk::new(V3i::ZERO);
    let mut sources = HashSet::new();
    let r = propagate_sunlight(&mut c, &map, &reg, SunlightOptions::default(), &mut sources)
        .unwrap();
    assert!(!r.chunk_below_valid);

    // opaque below never disagrees
    map.insert(Chunk::filled(V3i::DOWN, Node::new(STONE)));
    let r = propagate_sunlight(&mut c, &map, &reg, SunlightOptions::default(), &mut sources)
        .unwrap();
    assert!(r.chunk_below_valid);

    map.insert(lit_air_chunk(V3i::DOWN, LIGHT_SUN));
    let r = propagate_sunlight(&mut c, &map, &reg, SunlightOptions::default(), &mut sources)
        .unwrap();
    assert!(r.chunk_below_valid);
}

#[test]
fn cascade_relights_stack() {
    let reg = make_test_registry();
    let mut map = ChunkMap::new();
    map.insert(Chunk::new(V3i::ZERO));
    map.insert(Chunk::new(V3i::DOWN));
    map.insert(Chunk::new(V3i::new(0, -2, 0)));
    let mut sources = HashSet::new();
    let lit =
        propagate_sunlight_downward(&mut map, V3i::ZERO, &reg, SunlightOptions::default(), &mut sources)
            .unwrap();
    assert_eq!(lit, 3);
    let bottom = map.get(V3i::new(0, -2, 0)).unwrap();
    assert_eq!(day(bottom, &reg, 9, 0, 9), LIGHT_SUN);
    assert!(!bottom.lighting_expired);
    assert_eq!(map.len(), 3);

    // already consistent: only the top chunk is relit
    let lit =
        propagate_sunlight_downward(&mut map, V3i::ZERO, &reg, SunlightOptions::default(), &mut sources)
            .unwrap();
    assert_eq!(lit, 1);

    assert!(
        propagate_sunlight_downward(&mut map, V3i::new(5, 5, 5), &reg, SunlightOptions::default(), &mut sources)
            .is_err()
    );
}

#[test]
fn dummy_chunk_is_rejected() {
    let reg = make_test_registry();
    let mut c = Chunk::dummy(V3i::ZERO);
    let mut sources = HashSet::new();
    assert_eq!(
        propagate_sunlight(&mut c, &Detached, &reg, SunlightOptions::default(), &mut sources),
        Err(GridError::NotAllocated(V3i::ZERO))
    );
}
