use hashbrown::HashSet;
use proptest::prelude::*;
use quarry_chunk::{CHUNK_SIZE, Chunk, Detached, LIGHT_SUN, LightBank, Node};
use quarry_content::{CONTENT_AIR, ContentClassifier, ContentRegistry};
use quarry_geom::V3i;
use quarry_lighting::{SunlightOptions, propagate_sunlight};

const STONE: u16 = 0;
const WATER_SOURCE: u16 = 9;

fn registry() -> ContentRegistry {
    ContentRegistry::from_toml_str(
        r#"
        [[content]]
        name = "stone"
        id = 0

        [[content]]
        name = "water_source"
        id = 9
        draw = "liquid"
    "#,
    )
    .unwrap()
}

fn content() -> impl Strategy<Value = u16> {
    prop_oneof![6 => Just(CONTENT_AIR), 1 => Just(STONE), 1 => Just(WATER_SOURCE)]
}

/// One column of contents plus initial light params, replicated across a few columns.
fn column() -> impl Strategy<Value = Vec<(u16, u8)>> {
    prop::collection::vec((content(), any::<u8>()), CHUNK_SIZE as usize)
}

fn build(columns: &[Vec<(u16, u8)>]) -> Chunk {
    let mut c = Chunk::new(V3i::ZERO);
    for (i, col) in columns.iter().enumerate() {
        let x = i as i32;
        for (y, &(id, param)) in col.iter().enumerate() {
            c.set_node_local(V3i::new(x, y as i32, 0), Node::with_params(id, param, 0))
                .unwrap();
        }
    }
    c
}

fn day_lights(c: &Chunk, reg: &ContentRegistry) -> Vec<u8> {
    c.nodes()
        .unwrap()
        .iter()
        .map(|n| n.light(LightBank::Day, reg))
        .collect()
}

proptest! {
    // A second pass over an already lit chunk changes nothing
    #[test]
    fn sunlight_is_idempotent(cols in prop::collection::vec(column(), 1..4), grow in any::<bool>()) {
        let reg = registry();
        let mut c = build(&cols);
        let opts = SunlightOptions { remove_light: false, grow_grass: grow };
        let mut sources = HashSet::new();
        propagate_sunlight(&mut c, &Detached, &reg, opts, &mut sources).unwrap();
        let first: Vec<Node> = c.nodes().unwrap().to_vec();
        let first_sources = sources.clone();
        propagate_sunlight(&mut c, &Detached, &reg, opts, &mut sources).unwrap();
        prop_assert_eq!(c.nodes().unwrap(), &first[..]);
        prop_assert_eq!(sources, first_sources);
    }

    // Without remove_light no node gets darker
    #[test]
    fn light_never_decreases(cols in prop::collection::vec(column(), 1..4)) {
        let reg = registry();
        let mut c = build(&cols);
        let before = day_lights(&c, &reg);
        let mut sources = HashSet::new();
        propagate_sunlight(&mut c, &Detached, &reg, SunlightOptions::default(), &mut sources).unwrap();
        let after = day_lights(&c, &reg);
        for (b, a) in before.iter().zip(after.iter()) {
            prop_assert!(a >= b);
        }
    }

    // Columns of sunlight-passing nodes under open sky end fully lit
    #[test]
    fn open_columns_reach_full_sun(x in 0..CHUNK_SIZE, z in 0..CHUNK_SIZE, param in any::<u8>()) {
        let reg = registry();
        let mut c = Chunk::filled(V3i::ZERO, Node::with_params(CONTENT_AIR, param, 0));
        let mut sources = HashSet::new();
        propagate_sunlight(&mut c, &Detached, &reg, SunlightOptions::default(), &mut sources).unwrap();
        for y in 0..CHUNK_SIZE {
            let n = c.node_local(V3i::new(x, y, z)).unwrap();
            prop_assert_eq!(n.light(LightBank::Day, &reg), LIGHT_SUN);
        }
    }

    // Everything strictly below the first light blocker stays dark
    #[test]
    fn dark_below_first_obstruction(cols in prop::collection::vec(column(), 1..4)) {
        let reg = registry();
        // start from no stored light so nothing else can be brighter
        let cols: Vec<Vec<(u16, u8)>> = cols
            .into_iter()
            .map(|col| col.into_iter().map(|(id, _)| (id, 0)).collect())
            .collect();
        let mut c = build(&cols);
        let mut sources = HashSet::new();
        propagate_sunlight(&mut c, &Detached, &reg, SunlightOptions::default(), &mut sources).unwrap();
        for x in 0..cols.len() as i32 {
            let first_blocker = (0..CHUNK_SIZE).rev().find(|&y| {
                let n = c.node_local(V3i::new(x, y, 0)).unwrap();
                !reg.light_propagates(n.content)
            });
            if let Some(top) = first_blocker {
                for y in 0..top {
                    let n = c.node_local(V3i::new(x, y, 0)).unwrap();
                    prop_assert_eq!(n.light(LightBank::Day, &reg), 0);
                }
            }
        }
    }
}
