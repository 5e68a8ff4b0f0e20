use hashbrown::HashMap;
use quarry_content::ContentId;
use quarry_geom::V3i;

/// Transient per-node change applied only while building a mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeOverlay {
    /// Draw the node as if it held this content.
    ChangeContent(ContentId),
    /// Draw the node's own tiles with crack stage `n` on top.
    Crack(u8),
}

/// Overlays keyed by chunk-local position.
pub type OverlayMap = HashMap<V3i, NodeOverlay>;
