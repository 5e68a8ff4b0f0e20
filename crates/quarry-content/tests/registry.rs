use quarry_content::config::TexturesConfig;
use quarry_content::texture::crack_texture_name;
use quarry_content::{
    CONTENT_AIR, CONTENT_IGNORE, ContentClassifier, ContentError, ContentRegistry, DrawType,
    MaterialKind, TextureCatalog, TextureSource,
};

const CONTENT: &str = r#"
[[content]]
name = "stone"
id = 0
tiles = "stone.png"

[[content]]
name = "grass"
id = 1
tiles = { top = "grass.png", bottom = "mud.png", side = "grass_side.png" }

[[content]]
name = "water"
id = 2
draw = "flowing_liquid"
tiles = "water.png"
alpha = 160
liquid_flowing = "water"
liquid_source = "water_source"

[[content]]
name = "old_grass"
id = 6
translate_to = { name = "grass", param2 = 3 }

[[content]]
name = "mud"
id = 8
grows_into = "grass"

[[content]]
name = "water_source"
id = 9
draw = "liquid"
tiles = "water.png"
liquid_flowing = "water"
"#;

#[test]
fn builtins_are_present() {
    let reg = ContentRegistry::new();
    assert_eq!(reg.id_by_name("air"), Some(CONTENT_AIR));
    assert_eq!(reg.id_by_name("ignore"), Some(CONTENT_IGNORE));
    assert!(reg.light_propagates(CONTENT_AIR));
    assert!(reg.sunlight_propagates(CONTENT_AIR));
    assert!(!reg.light_propagates(CONTENT_IGNORE));
    assert_eq!(reg.solidness(CONTENT_IGNORE), 0);
    assert_eq!(reg.len(), 2);
}

#[test]
fn compiles_defaults_and_references() {
    let reg = ContentRegistry::from_toml_str(CONTENT).unwrap();
    let stone = reg.features(0);
    assert_eq!(stone.draw_type, DrawType::Normal);
    assert!(stone.walkable);
    assert!(!stone.light_propagates);
    assert_eq!(stone.solidness, 2);
    assert_eq!(stone.tile(3).texture, "stone.png");

    let grass = reg.features(1);
    assert_eq!(grass.tiles[0].texture, "grass.png");
    assert_eq!(grass.tiles[1].texture, "mud.png");
    assert_eq!(grass.tiles[4].texture, "grass_side.png");

    let water = reg.features(2);
    assert_eq!(water.tiles[0].alpha, 160);
    assert_eq!(water.tiles[0].material, MaterialKind::VertexAlpha);
    assert_eq!(water.liquid_source, Some(9));
    assert!(reg.is_liquid(2));
    assert_eq!(reg.flowing_form(2), Some(2));
    assert_eq!(reg.flowing_form(9), Some(2));
    assert_eq!(reg.flowing_form(0), None);

    let t = reg.translate_to(6).unwrap();
    assert_eq!((t.content, t.param, t.param2), (1, 0, 3));
    assert_eq!(reg.features(8).grows_into, Some(1));
}

#[test]
fn unknown_ids_fall_back_to_opaque() {
    let reg = ContentRegistry::from_toml_str(CONTENT).unwrap();
    assert!(reg.get(77).is_none());
    assert_eq!(reg.features(77).name, "unknown");
    assert_eq!(reg.solidness(77), 2);
}

#[test]
fn ids_are_assigned_around_taken_ones() {
    let reg = ContentRegistry::from_toml_str(
        r#"
        [[content]]
        name = "b"
        id = 0
        [[content]]
        name = "a"
    "#,
    )
    .unwrap();
    assert_eq!(reg.id_by_name("a"), Some(1));
}

#[test]
fn rejects_bad_definitions() {
    let dup = r#"
        [[content]]
        name = "a"
        id = 4
        [[content]]
        name = "b"
        id = 4
    "#;
    assert!(matches!(
        ContentRegistry::from_toml_str(dup),
        Err(ContentError::DuplicateId(4))
    ));

    let reserved = r#"
        [[content]]
        name = "a"
        id = 255
    "#;
    assert!(matches!(
        ContentRegistry::from_toml_str(reserved),
        Err(ContentError::ReservedId { id: 255, .. })
    ));

    let dangling = r#"
        [[content]]
        name = "a"
        grows_into = "nope"
    "#;
    assert!(matches!(
        ContentRegistry::from_toml_str(dangling),
        Err(ContentError::UnknownName(_, _))
    ));

    assert!(matches!(
        ContentRegistry::from_toml_str("content = 3"),
        Err(ContentError::Parse(_))
    ));
}

#[test]
fn texture_catalog_grid_placement() {
    let cat = TextureCatalog::from_toml_str(
        r#"
        atlas_columns = 2
        [[texture]]
        name = "a.png"
        tile_limit = 4
        [[texture]]
        name = "b.png"
        [[texture]]
        name = "c.png"
        [[texture]]
        name = "d.png"
        [[texture]]
        name = "e.png"
    "#,
    )
    .unwrap();
    let a = cat.placement(cat.texture_id("a.png")).unwrap();
    assert_eq!(a.pos, [0.0, 0.0]);
    assert_eq!(a.size, [0.5, 0.5]);
    assert_eq!(a.tile_limit, 4);
    assert_eq!(a.max_repeat(), 4);
    let d = cat.placement(cat.texture_id("d.png")).unwrap();
    assert_eq!(d.pos, [0.5, 0.5]);
    assert_eq!(d.max_repeat(), usize::MAX);
    let e = cat.placement(cat.texture_id("e.png")).unwrap();
    assert_eq!(e.atlas.0, 1);
    assert_eq!(e.pos, [0.0, 0.0]);
}

#[test]
fn texture_ids_are_stable_and_lazy() {
    let cat = TextureCatalog::from_config(TexturesConfig {
        atlas_columns: 4,
        texture: vec![quarry_content::config::TextureDef {
            name: "stone.png".into(),
            tile_limit: 3,
        }],
    });
    let stone = cat.texture_id("stone.png");
    assert_eq!(cat.texture_id("stone.png"), stone);
    assert_eq!(cat.texture_name(stone).as_deref(), Some("stone.png"));

    // crack variants inherit the base cell
    let cracked = cat.texture_id(&crack_texture_name("stone.png", 2));
    assert_ne!(cracked, stone);
    assert_eq!(cat.texture_name(cracked).as_deref(), Some("stone.png^[crack2"));
    assert_eq!(cat.placement(cracked), cat.placement(stone));

    // names nobody configured get an id but no placement
    let missing = cat.texture_id("missing.png");
    assert!(cat.placement(missing).is_none());
    assert_eq!(cat.len(), 3);
}
