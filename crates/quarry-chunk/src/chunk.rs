use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use quarry_content::{CONTENT_AIR, ContentClassifier};
use quarry_geom::V3i;

use crate::container::NodeContainer;
use crate::error::GridError;
use crate::node::{LightBank, Node};
use crate::overlay::{NodeOverlay, OverlayMap};
use crate::{CHUNK_SIZE, NODE_COUNT};

/// A `CHUNK_SIZE`³ cube of nodes.
///
/// Positions passed to the `*_local` accessors are chunk-local; the plain
/// accessors additionally forward positions outside the cube to a parent
/// container in world coordinates.
#[derive(Debug)]
pub struct Chunk {
    pos: V3i,
    nodes: Option<Box<[Node]>>,
    /// No chunk above is assumed to be open sky unless this is set.
    pub is_underground: bool,
    pub day_night_differs: bool,
    pub lighting_expired: bool,
    /// Set on every local write; cleared by whoever persists the chunk.
    pub changed: bool,
    mesh_expired: AtomicBool,
    overlays: Mutex<OverlayMap>,
}

impl Chunk {
    /// Allocated chunk filled with air.
    pub fn new(pos: V3i) -> Self {
        Self::filled(pos, Node::AIR)
    }

    pub fn filled(pos: V3i, node: Node) -> Self {
        let mut c = Self::dummy(pos);
        c.nodes = Some(vec![node; NODE_COUNT].into_boxed_slice());
        c
    }

    /// Placeholder without node storage.
    pub fn dummy(pos: V3i) -> Self {
        Self {
            pos,
            nodes: None,
            is_underground: false,
            day_night_differs: false,
            lighting_expired: true,
            changed: true,
            mesh_expired: AtomicBool::new(false),
            overlays: Mutex::new(OverlayMap::new()),
        }
    }

    #[inline]
    pub fn pos(&self) -> V3i {
        self.pos
    }

    /// World position of the local origin.
    #[inline]
    pub fn origin(&self) -> V3i {
        self.pos * CHUNK_SIZE
    }

    #[inline]
    pub fn is_dummy(&self) -> bool {
        self.nodes.is_none()
    }

    /// Gives a dummy chunk storage (filled with air). No effect on allocated chunks.
    pub fn allocate(&mut self) {
        if self.nodes.is_none() {
            self.nodes = Some(vec![Node::AIR; NODE_COUNT].into_boxed_slice());
        }
    }

    pub fn unallocate(&mut self) {
        self.nodes = None;
    }

    #[inline]
    pub fn is_valid_position(p: V3i) -> bool {
        (0..CHUNK_SIZE).contains(&p.x)
            && (0..CHUNK_SIZE).contains(&p.y)
            && (0..CHUNK_SIZE).contains(&p.z)
    }

    /// Linear index of an in-bounds local position.
    #[inline]
    pub fn index(p: V3i) -> usize {
        ((p.z * CHUNK_SIZE + p.y) * CHUNK_SIZE + p.x) as usize
    }

    pub fn nodes(&self) -> Option<&[Node]> {
        self.nodes.as_deref()
    }

    pub fn nodes_mut(&mut self) -> Option<&mut [Node]> {
        self.nodes.as_deref_mut()
    }

    pub fn node_local(&self, p: V3i) -> Result<Node, GridError> {
        if !Self::is_valid_position(p) {
            return Err(GridError::InvalidPosition(self.origin() + p));
        }
        let nodes = self
            .nodes
            .as_ref()
            .ok_or(GridError::NotAllocated(self.origin() + p))?;
        Ok(nodes[Self::index(p)])
    }

    pub fn set_node_local(&mut self, p: V3i, node: Node) -> Result<(), GridError> {
        if !Self::is_valid_position(p) {
            return Err(GridError::InvalidPosition(self.origin() + p));
        }
        let origin = self.origin();
        let nodes = self
            .nodes
            .as_mut()
            .ok_or(GridError::NotAllocated(origin + p))?;
        nodes[Self::index(p)] = node;
        self.changed = true;
        self.mesh_expired.store(true, Ordering::Release);
        Ok(())
    }

    pub fn is_valid_position_parent(&self, p: V3i, parent: &dyn NodeContainer) -> bool {
        Self::is_valid_position(p) || parent.is_valid_position(self.origin() + p)
    }

    /// Node at `p`, asking `parent` for positions outside the chunk.
    pub fn node(&self, p: V3i, parent: &dyn NodeContainer) -> Result<Node, GridError> {
        if Self::is_valid_position(p) {
            self.node_local(p)
        } else {
            parent.node(self.origin() + p)
        }
    }

    /// Like [`Chunk::node`] but any failure yields [`Node::IGNORE`].
    #[inline]
    pub fn node_or_ignore(&self, p: V3i, parent: &dyn NodeContainer) -> Node {
        self.node(p, parent).unwrap_or(Node::IGNORE)
    }

    pub fn set_node(
        &mut self,
        p: V3i,
        node: Node,
        parent: &mut dyn NodeContainer,
    ) -> Result<(), GridError> {
        if Self::is_valid_position(p) {
            self.set_node_local(p, node)
        } else {
            parent.set_node(self.origin() + p, node)
        }
    }

    #[inline]
    pub fn mesh_expired(&self) -> bool {
        self.mesh_expired.load(Ordering::Acquire)
    }

    /// Callable from a mesher thread holding only a shared reference.
    #[inline]
    pub fn set_mesh_expired(&self, expired: bool) {
        self.mesh_expired.store(expired, Ordering::Release);
    }

    /// Sets or replaces the overlay at `p`; returns true if anything changed.
    pub fn set_overlay(&self, p: V3i, overlay: NodeOverlay) -> bool {
        let changed = self.overlays.lock().insert(p, overlay) != Some(overlay);
        if changed {
            self.set_mesh_expired(true);
        }
        changed
    }

    pub fn clear_overlay(&self, p: V3i) -> bool {
        let changed = self.overlays.lock().remove(&p).is_some();
        if changed {
            self.set_mesh_expired(true);
        }
        changed
    }

    pub fn clear_overlays(&self) -> bool {
        let mut overlays = self.overlays.lock();
        let changed = !overlays.is_empty();
        overlays.clear();
        drop(overlays);
        if changed {
            self.set_mesh_expired(true);
        }
        changed
    }

    /// Copy of the overlay map; the lock is released before this returns.
    pub fn overlays_snapshot(&self) -> OverlayMap {
        self.overlays.lock().clone()
    }

    /// Recomputes `day_night_differs` from the stored light.
    pub fn update_day_night_diff(&mut self, classifier: &dyn ContentClassifier) {
        let Some(nodes) = self.nodes.as_ref() else {
            self.day_night_differs = false;
            return;
        };
        let differs = nodes.iter().any(|n| {
            n.light(LightBank::Day, classifier) != n.light(LightBank::Night, classifier)
        });
        // A chunk of nothing but air never needs the night pass.
        self.day_night_differs = differs && nodes.iter().any(|n| n.content != CONTENT_AIR);
    }

    /// Local y of the highest walkable node in column (x, z).
    ///
    /// Returns -2 if that node is in the top layer, -1 if the column has no
    /// walkable node and -3 for a dummy chunk or a column outside the chunk.
    pub fn ground_level(&self, x: i32, z: i32, classifier: &dyn ContentClassifier) -> i32 {
        if self.is_dummy() {
            return -3;
        }
        for y in (0..CHUNK_SIZE).rev() {
            let Ok(n) = self.node_local(V3i::new(x, y, z)) else {
                return -3;
            };
            if classifier.walkable(n.content) {
                return if y == CHUNK_SIZE - 1 { -2 } else { y };
            }
        }
        -1
    }
}
