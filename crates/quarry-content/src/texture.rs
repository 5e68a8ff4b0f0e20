use std::collections::HashMap;
use std::fs;
use std::path::Path;

use parking_lot::RwLock;

use super::config::TexturesConfig;
use super::registry::ContentError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtlasId(pub u16);

/// Where a texture lives inside an atlas, in normalized atlas coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtlasPlacement {
    pub atlas: AtlasId,
    pub pos: [f32; 2],
    pub size: [f32; 2],
    /// Maximum repeats a merged face may span along one axis; 0 = unlimited.
    pub tile_limit: u16,
}

impl AtlasPlacement {
    /// Repeat limit as a count, treating 0 as unlimited.
    #[inline]
    pub fn max_repeat(&self) -> usize {
        if self.tile_limit == 0 {
            usize::MAX
        } else {
            self.tile_limit as usize
        }
    }
}

/// Separator between a base texture name and its modifiers, e.g. `stone.png^[crack2`.
pub const MODIFIER_SEP: &str = "^[";

/// Name of the crack overlay texture of stage `stage` drawn over `base`.
pub fn crack_texture_name(base: &str, stage: u8) -> String {
    format!("{base}{MODIFIER_SEP}crack{stage}")
}

/// Texture name to id lookup plus atlas placement. Shared across mesher threads.
pub trait TextureSource: Send + Sync {
    /// Id of `name`, registering it if it has not been seen.
    fn texture_id(&self, name: &str) -> TextureId;
    fn texture_name(&self, id: TextureId) -> Option<String>;
    fn placement(&self, id: TextureId) -> Option<AtlasPlacement>;
}

#[derive(Default, Debug)]
struct CatalogInner {
    names: Vec<String>,
    by_name: HashMap<String, TextureId>,
    placements: Vec<Option<AtlasPlacement>>,
}

/// Grid atlas: each configured texture occupies one square cell, filling atlases in order.
#[derive(Debug)]
pub struct TextureCatalog {
    columns: u32,
    inner: RwLock<CatalogInner>,
}

impl Default for TextureCatalog {
    fn default() -> Self {
        Self::from_config(TexturesConfig::default())
    }
}

impl TextureCatalog {
    pub fn from_config(cfg: TexturesConfig) -> Self {
        let columns = cfg.atlas_columns.max(1);
        let cells = columns * columns;
        let cell = 1.0 / columns as f32;
        let mut inner = CatalogInner::default();
        for (i, def) in cfg.texture.into_iter().enumerate() {
            let i = i as u32;
            let slot = i % cells;
            let placement = AtlasPlacement {
                atlas: AtlasId((i / cells) as u16),
                pos: [(slot % columns) as f32 * cell, (slot / columns) as f32 * cell],
                size: [cell, cell],
                tile_limit: def.tile_limit,
            };
            let id = TextureId(inner.names.len() as u32);
            inner.by_name.insert(def.name.clone(), id);
            inner.names.push(def.name);
            inner.placements.push(Some(placement));
        }
        Self {
            columns,
            inner: RwLock::new(inner),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ContentError> {
        let cfg: TexturesConfig = toml::from_str(s)?;
        Ok(Self::from_config(cfg))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.inner.read().names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TextureSource for TextureCatalog {
    fn texture_id(&self, name: &str) -> TextureId {
        if let Some(id) = self.inner.read().by_name.get(name) {
            return *id;
        }
        let mut inner = self.inner.write();
        // Another thread may have registered it between the two locks.
        if let Some(id) = inner.by_name.get(name) {
            return *id;
        }
        // Modified textures share the cell of their base.
        let placement = name
            .split_once(MODIFIER_SEP)
            .and_then(|(base, _)| inner.by_name.get(base).copied())
            .and_then(|base| inner.placements[base.0 as usize]);
        let id = TextureId(inner.names.len() as u32);
        inner.by_name.insert(name.to_string(), id);
        inner.names.push(name.to_string());
        inner.placements.push(placement);
        log::debug!("registered texture '{name}' as {id:?} (placed: {})", placement.is_some());
        id
    }

    fn texture_name(&self, id: TextureId) -> Option<String> {
        self.inner.read().names.get(id.0 as usize).cloned()
    }

    fn placement(&self, id: TextureId) -> Option<AtlasPlacement> {
        self.inner
            .read()
            .placements
            .get(id.0 as usize)
            .copied()
            .flatten()
    }
}
