/// Identifier of a node's content (material and behavior).
pub type ContentId = u16;

/// Sentinel for "no data here". Never real terrain; renders nothing and carries no light.
pub const CONTENT_IGNORE: ContentId = 255;
/// Empty space.
pub const CONTENT_AIR: ContentId = 254;

/// Face directions in the order used by per-face tile tables.
pub const FACE_COUNT: usize = 6;

/// How the mesher treats a content kind.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DrawType {
    /// Full cube, faces produced by the merged sweep.
    #[default]
    Normal,
    /// Invisible (air, ignore).
    AirLike,
    /// Liquid source block.
    Liquid,
    /// Flowing liquid with a per-node fill level in `param2`.
    FlowingLiquid,
    /// Crossed/oriented flat sprite such as a torch.
    Billboard,
    /// Leaves and similar; full cube, or six loose quads in the new foliage style.
    Foliage,
}

impl DrawType {
    #[inline]
    pub fn is_liquid(self) -> bool {
        matches!(self, DrawType::Liquid | DrawType::FlowingLiquid)
    }
}

/// Blending mode of a tile's material.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum MaterialKind {
    #[default]
    Opaque,
    /// Alpha taken from vertex colors.
    VertexAlpha,
    /// Texture alpha with a cut-off.
    AlphaRef,
    /// Texture alpha blended.
    AlphaBlend,
}

/// Texture and material options of one face of a content kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileDef {
    pub texture: String,
    pub alpha: u8,
    pub material: MaterialKind,
    pub backface_culling: bool,
}

impl Default for TileDef {
    fn default() -> Self {
        Self {
            texture: String::new(),
            alpha: 255,
            material: MaterialKind::Opaque,
            backface_culling: true,
        }
    }
}

/// Orientation-dependent textures of billboard content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BillboardTextures {
    pub floor: String,
    pub ceiling: String,
    pub wall: String,
}

/// Node written in place of a legacy content id at load time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodeTemplate {
    pub content: ContentId,
    pub param: u8,
    pub param2: u8,
}
