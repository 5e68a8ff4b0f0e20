use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::config::{ContentConfig, ContentDef, TilesConfig};
use super::types::{
    BillboardTextures, CONTENT_AIR, CONTENT_IGNORE, ContentId, DrawType, FACE_COUNT, MaterialKind,
    NodeTemplate, TileDef,
};

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid content definition: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("content '{0}' references unknown content '{1}'")]
    UnknownName(String, String),
    #[error("content id {0} is assigned twice")]
    DuplicateId(ContentId),
    #[error("content '{name}' uses reserved id {id}")]
    ReservedId { name: String, id: ContentId },
    #[error("content '{0}' has unknown draw type '{1}'")]
    UnknownDrawType(String, String),
    #[error("content '{0}' has unknown material '{1}'")]
    UnknownMaterial(String, String),
}

/// Everything the grid, lighting and meshing code needs to know about one content id.
#[derive(Clone, Debug)]
pub struct ContentFeatures {
    pub id: ContentId,
    pub name: String,
    pub draw_type: DrawType,
    pub walkable: bool,
    /// Light can enter the node at all (stored light is meaningful).
    pub light_propagates: bool,
    /// Full sunlight passes without diminishing.
    pub sunlight_propagates: bool,
    /// 0 = not drawn, 1 = semi-transparent, 2 = opaque.
    pub solidness: u8,
    pub light_source: u8,
    /// Per face: +Y, -Y, +X, -X, +Z, -Z.
    pub tiles: [TileDef; FACE_COUNT],
    pub billboard: Option<BillboardTextures>,
    pub liquid_flowing: Option<ContentId>,
    pub liquid_source: Option<ContentId>,
    pub grows_into: Option<ContentId>,
    pub translate_to: Option<NodeTemplate>,
}

impl ContentFeatures {
    fn with_draw_type(id: ContentId, name: &str, draw_type: DrawType) -> Self {
        let (walkable, light_propagates, sunlight_propagates, solidness) = match draw_type {
            DrawType::Normal => (true, false, false, 2),
            DrawType::AirLike => (false, true, true, 0),
            DrawType::Liquid => (false, true, false, 1),
            DrawType::FlowingLiquid => (false, true, false, 0),
            DrawType::Billboard => (false, true, true, 0),
            DrawType::Foliage => (true, true, false, 2),
        };
        Self {
            id,
            name: name.to_string(),
            draw_type,
            walkable,
            light_propagates,
            sunlight_propagates,
            solidness,
            light_source: 0,
            tiles: Default::default(),
            billboard: None,
            liquid_flowing: None,
            liquid_source: None,
            grows_into: None,
            translate_to: None,
        }
    }

    fn air() -> Self {
        Self::with_draw_type(CONTENT_AIR, "air", DrawType::AirLike)
    }

    fn ignore() -> Self {
        let mut f = Self::with_draw_type(CONTENT_IGNORE, "ignore", DrawType::AirLike);
        f.light_propagates = false;
        f.sunlight_propagates = false;
        f
    }

    /// Features reported for ids nobody defined: an opaque, untextured cube.
    fn unknown(id: ContentId) -> Self {
        Self::with_draw_type(id, "unknown", DrawType::Normal)
    }

    #[inline]
    pub fn tile(&self, face_index: usize) -> &TileDef {
        &self.tiles[face_index % FACE_COUNT]
    }
}

/// Content classification queries. Implemented by [`ContentRegistry`]; tests may supply their own.
pub trait ContentClassifier {
    fn features(&self, id: ContentId) -> &ContentFeatures;

    #[inline]
    fn walkable(&self, id: ContentId) -> bool {
        self.features(id).walkable
    }

    #[inline]
    fn light_propagates(&self, id: ContentId) -> bool {
        self.features(id).light_propagates
    }

    #[inline]
    fn sunlight_propagates(&self, id: ContentId) -> bool {
        self.features(id).sunlight_propagates
    }

    #[inline]
    fn solidness(&self, id: ContentId) -> u8 {
        self.features(id).solidness
    }

    #[inline]
    fn light_source(&self, id: ContentId) -> u8 {
        self.features(id).light_source
    }

    #[inline]
    fn translate_to(&self, id: ContentId) -> Option<NodeTemplate> {
        self.features(id).translate_to
    }

    #[inline]
    fn is_liquid(&self, id: ContentId) -> bool {
        self.features(id).draw_type.is_liquid()
    }

    /// Flowing form of a liquid; flowing liquids map to themselves.
    #[inline]
    fn flowing_form(&self, id: ContentId) -> Option<ContentId> {
        let f = self.features(id);
        match f.draw_type {
            DrawType::FlowingLiquid => Some(f.liquid_flowing.unwrap_or(id)),
            DrawType::Liquid => f.liquid_flowing,
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContentRegistry {
    by_id: Vec<Option<ContentFeatures>>,
    by_name: HashMap<String, ContentId>,
    unknown: ContentFeatures,
}

impl Default for ContentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRegistry {
    /// Registry holding only the built-in air and ignore content.
    pub fn new() -> Self {
        let mut reg = Self {
            by_id: Vec::new(),
            by_name: HashMap::new(),
            unknown: ContentFeatures::unknown(0),
        };
        reg.insert(ContentFeatures::air());
        reg.insert(ContentFeatures::ignore());
        reg
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ContentError> {
        let cfg: ContentConfig = toml::from_str(s)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: ContentConfig) -> Result<Self, ContentError> {
        let mut reg = Self::new();

        // First pass assigns ids so that cross references may point forward.
        let mut next_id: ContentId = 0;
        let mut ids = Vec::with_capacity(cfg.content.len());
        for def in &cfg.content {
            let id = match def.id {
                Some(id) => id,
                None => {
                    while reg.by_id.get(next_id as usize).is_some_and(Option::is_some)
                        || ids.contains(&next_id)
                        || is_reserved(next_id)
                    {
                        next_id += 1;
                    }
                    next_id
                }
            };
            if is_reserved(id) {
                return Err(ContentError::ReservedId {
                    name: def.name.clone(),
                    id,
                });
            }
            if ids.contains(&id) {
                return Err(ContentError::DuplicateId(id));
            }
            ids.push(id);
            reg.by_name.insert(def.name.clone(), id);
        }

        for (def, id) in cfg.content.iter().zip(ids) {
            let features = reg.compile(def, id)?;
            reg.insert(features);
        }
        Ok(reg)
    }

    fn compile(&self, def: &ContentDef, id: ContentId) -> Result<ContentFeatures, ContentError> {
        let draw_type = match def.draw.as_deref() {
            None | Some("normal") => DrawType::Normal,
            Some("air_like") => DrawType::AirLike,
            Some("liquid") => DrawType::Liquid,
            Some("flowing_liquid") => DrawType::FlowingLiquid,
            Some("billboard") => DrawType::Billboard,
            Some("foliage") => DrawType::Foliage,
            Some(other) => {
                return Err(ContentError::UnknownDrawType(
                    def.name.clone(),
                    other.to_string(),
                ));
            }
        };
        let mut f = ContentFeatures::with_draw_type(id, &def.name, draw_type);
        f.walkable = def.walkable.unwrap_or(f.walkable);
        f.light_propagates = def.light_propagates.unwrap_or(f.light_propagates);
        f.sunlight_propagates = def.sunlight_propagates.unwrap_or(f.sunlight_propagates);
        f.solidness = def.solidness.unwrap_or(f.solidness).min(2);
        f.light_source = def.light_source.unwrap_or(0).min(15);

        let material = match def.material.as_deref() {
            None if draw_type.is_liquid() => MaterialKind::VertexAlpha,
            None | Some("opaque") => MaterialKind::Opaque,
            Some("vertex_alpha") => MaterialKind::VertexAlpha,
            Some("alpha_ref") => MaterialKind::AlphaRef,
            Some("alpha_blend") => MaterialKind::AlphaBlend,
            Some(other) => {
                return Err(ContentError::UnknownMaterial(
                    def.name.clone(),
                    other.to_string(),
                ));
            }
        };
        let tile_for = |texture: Option<&String>| TileDef {
            texture: texture.cloned().unwrap_or_default(),
            alpha: def.alpha.unwrap_or(255),
            material,
            backface_culling: def.backface_culling.unwrap_or(true),
        };
        f.tiles = match &def.tiles {
            None => Default::default(),
            Some(TilesConfig::All(t)) => std::array::from_fn(|_| tile_for(Some(t))),
            Some(TilesConfig::Faces {
                all,
                top,
                bottom,
                side,
            }) => std::array::from_fn(|i| {
                let pick = match i {
                    0 => top.as_ref(),
                    1 => bottom.as_ref(),
                    _ => side.as_ref(),
                };
                tile_for(pick.or(all.as_ref()))
            }),
        };
        f.billboard = def.billboard.as_ref().map(|b| BillboardTextures {
            floor: b.floor.clone(),
            ceiling: b.ceiling.clone(),
            wall: b.wall.clone(),
        });

        f.liquid_flowing = self.resolve_opt(&def.name, def.liquid_flowing.as_deref())?;
        f.liquid_source = self.resolve_opt(&def.name, def.liquid_source.as_deref())?;
        f.grows_into = self.resolve_opt(&def.name, def.grows_into.as_deref())?;
        if let Some(t) = &def.translate_to {
            let content = self.resolve(&def.name, t.name())?;
            let (param, param2) = match t {
                super::config::TranslateConfig::Name(_) => (0, 0),
                super::config::TranslateConfig::Detail { param, param2, .. } => (*param, *param2),
            };
            f.translate_to = Some(NodeTemplate {
                content,
                param,
                param2,
            });
        }
        Ok(f)
    }

    fn resolve(&self, owner: &str, name: &str) -> Result<ContentId, ContentError> {
        self.id_by_name(name)
            .ok_or_else(|| ContentError::UnknownName(owner.to_string(), name.to_string()))
    }

    fn resolve_opt(&self, owner: &str, name: Option<&str>) -> Result<Option<ContentId>, ContentError> {
        name.map(|n| self.resolve(owner, n)).transpose()
    }

    fn insert(&mut self, features: ContentFeatures) {
        let ix = features.id as usize;
        if self.by_id.len() <= ix {
            self.by_id.resize(ix + 1, None);
        }
        self.by_name.insert(features.name.clone(), features.id);
        self.by_id[ix] = Some(features);
    }

    #[inline]
    pub fn get(&self, id: ContentId) -> Option<&ContentFeatures> {
        self.by_id.get(id as usize).and_then(Option::as_ref)
    }

    pub fn id_by_name(&self, name: &str) -> Option<ContentId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.iter().filter(|f| f.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentFeatures> {
        self.by_id.iter().filter_map(Option::as_ref)
    }
}

impl ContentClassifier for ContentRegistry {
    #[inline]
    fn features(&self, id: ContentId) -> &ContentFeatures {
        self.get(id).unwrap_or(&self.unknown)
    }
}

#[inline]
fn is_reserved(id: ContentId) -> bool {
    id == CONTENT_AIR || id == CONTENT_IGNORE
}
