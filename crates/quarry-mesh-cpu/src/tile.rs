use hashbrown::HashMap;
use quarry_content::{
    AtlasPlacement, ContentClassifier, ContentId, MaterialKind, TextureId, TextureSource, TileDef,
    texture::crack_texture_name,
};

use crate::batch::MaterialKey;

/// Resolved texture and material of one face of one node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileSpec {
    pub texture: TextureId,
    /// `None` when the texture has no atlas cell; such faces are not drawn.
    pub placement: Option<AtlasPlacement>,
    pub alpha: u8,
    pub material: MaterialKind,
    pub backface_culling: bool,
}

impl TileSpec {
    /// How many times the texture may repeat along one axis of a merged face.
    #[inline]
    pub fn max_repeat(&self) -> usize {
        self.placement.map_or(usize::MAX, |p| p.max_repeat())
    }

    pub fn material_key(&self) -> Option<MaterialKey> {
        self.placement.map(|p| MaterialKey {
            atlas: p.atlas,
            kind: self.material,
            backface_culling: self.backface_culling,
        })
    }

    /// Atlas cell as `[x0, y0, w, h]`.
    pub fn uv_rect(&self) -> Option<[f32; 4]> {
        self.placement
            .map(|p| [p.pos[0], p.pos[1], p.size[0], p.size[1]])
    }

    /// Corner UVs of one cell in quad order: bottom-left, bottom-right, top-right, top-left.
    pub fn cell_uvs(&self) -> Option<[[f32; 2]; 4]> {
        let [x0, y0, w, h] = self.uv_rect()?;
        let (x1, y1) = (x0 + w, y0 + h);
        Some([[x0, y1], [x1, y1], [x1, y0], [x0, y0]])
    }
}

/// Per-build cache in front of the shared texture source.
pub(crate) struct TileResolver<'a> {
    classifier: &'a dyn ContentClassifier,
    textures: &'a dyn TextureSource,
    cache: HashMap<(ContentId, usize, Option<u8>), TileSpec>,
}

impl<'a> TileResolver<'a> {
    pub(crate) fn new(classifier: &'a dyn ContentClassifier, textures: &'a dyn TextureSource) -> Self {
        Self {
            classifier,
            textures,
            cache: HashMap::new(),
        }
    }

    /// Tile of `content` on face `face_index`, with the crack of `crack` stage drawn over it.
    pub(crate) fn face_tile(
        &mut self,
        content: ContentId,
        face_index: usize,
        crack: Option<u8>,
    ) -> TileSpec {
        let key = (content, face_index, crack);
        if let Some(t) = self.cache.get(&key) {
            return *t;
        }
        let def = self.classifier.features(content).tile(face_index);
        let t = match crack {
            Some(stage) => self.named_tile(&crack_texture_name(&def.texture, stage), def),
            None => self.named_tile(&def.texture, def),
        };
        self.cache.insert(key, t);
        t
    }

    /// Tile for texture `name` using the material options of `def`.
    pub(crate) fn named_tile(&self, name: &str, def: &TileDef) -> TileSpec {
        let texture = self.textures.texture_id(name);
        TileSpec {
            texture,
            placement: self.textures.placement(texture),
            alpha: def.alpha,
            material: def.material,
            backface_culling: def.backface_culling,
        }
    }
}
