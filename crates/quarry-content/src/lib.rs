//! Content definitions, the content registry and the texture catalog.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod texture;
pub mod types;

pub use registry::{ContentClassifier, ContentError, ContentFeatures, ContentRegistry};
pub use texture::{AtlasId, AtlasPlacement, TextureCatalog, TextureId, TextureSource};
pub use types::{
    BillboardTextures, CONTENT_AIR, CONTENT_IGNORE, ContentId, DrawType, FACE_COUNT, MaterialKind,
    NodeTemplate, TileDef,
};
