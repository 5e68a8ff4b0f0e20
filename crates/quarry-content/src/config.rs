use serde::Deserialize;

use super::types::ContentId;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ContentConfig {
    #[serde(default)]
    pub content: Vec<ContentDef>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ContentDef {
    pub name: String,
    pub id: Option<ContentId>,
    /// "normal", "air_like", "liquid", "flowing_liquid", "billboard", "foliage"
    pub draw: Option<String>,
    pub walkable: Option<bool>,
    pub light_propagates: Option<bool>,
    pub sunlight_propagates: Option<bool>,
    pub solidness: Option<u8>,
    pub light_source: Option<u8>,
    pub tiles: Option<TilesConfig>,
    pub alpha: Option<u8>,
    /// "opaque", "vertex_alpha", "alpha_ref", "alpha_blend"
    pub material: Option<String>,
    pub backface_culling: Option<bool>,
    pub billboard: Option<BillboardConfig>,
    /// Name of the flowing form of this liquid.
    pub liquid_flowing: Option<String>,
    /// Name of the source form of this liquid.
    pub liquid_source: Option<String>,
    /// Content this one turns into when lit by full sun with air above.
    pub grows_into: Option<String>,
    /// Replacement applied to nodes of this content when a chunk is loaded.
    pub translate_to: Option<TranslateConfig>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum TilesConfig {
    // tiles = "stone.png"
    All(String),
    // tiles = { top = "grass.png", bottom = "mud.png", side = "grass_side.png" }
    Faces {
        all: Option<String>,
        top: Option<String>,
        bottom: Option<String>,
        side: Option<String>,
    },
}

#[derive(Deserialize, Clone, Debug)]
pub struct BillboardConfig {
    pub floor: String,
    pub ceiling: String,
    pub wall: String,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum TranslateConfig {
    Name(String),
    Detail {
        name: String,
        #[serde(default)]
        param: u8,
        #[serde(default)]
        param2: u8,
    },
}

impl TranslateConfig {
    pub fn name(&self) -> &str {
        match self {
            TranslateConfig::Name(n) => n,
            TranslateConfig::Detail { name, .. } => name,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct TexturesConfig {
    /// Cells per atlas row (the atlas is square).
    #[serde(default = "default_atlas_columns")]
    pub atlas_columns: u32,
    #[serde(default)]
    pub texture: Vec<TextureDef>,
}

impl Default for TexturesConfig {
    fn default() -> Self {
        Self {
            atlas_columns: default_atlas_columns(),
            texture: Vec::new(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct TextureDef {
    pub name: String,
    /// Maximum number of contiguous repeats a merged face may span; 0 = unlimited.
    #[serde(default)]
    pub tile_limit: u16,
}

fn default_atlas_columns() -> u32 {
    16
}
