use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::scene::node::{Node, NodeHandle, NodeKind, ShapeData};
use crate::scene::transform::RigidTransform;
use crate::scene::visitor::SceneVisitor;

/// The transform hierarchy: an arena of nodes under a single root.
///
/// The tree structurally owns its nodes; everything else (interaction
/// state, the animator) holds [`NodeHandle`]s. A node has at most one
/// parent and the tree is acyclic, both enforced by construction, since
/// the only way to grow the graph is `add_transform`/`add_shape` under an
/// existing parent.
pub struct SceneGraph {
    nodes: SlotMap<NodeHandle, Node>,
    root: NodeHandle,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(NodeKind::Root));
        Self { nodes, root }
    }

    /// Handle of the unique root node.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Adds a transform node under `parent`. Returns the new handle, or
    /// `None` if the parent does not exist or is a shape (shapes are
    /// leaves).
    pub fn add_transform(
        &mut self,
        parent: NodeHandle,
        rbt: RigidTransform,
    ) -> Option<NodeHandle> {
        self.add_node(parent, NodeKind::Transform(rbt))
    }

    /// Adds a shape leaf under `parent`.
    pub fn add_shape(&mut self, parent: NodeHandle, shape: ShapeData) -> Option<NodeHandle> {
        self.add_node(parent, NodeKind::Shape(shape))
    }

    fn add_node(&mut self, parent: NodeHandle, kind: NodeKind) -> Option<NodeHandle> {
        match self.nodes.get(parent)?.kind {
            NodeKind::Shape(_) => {
                log::warn!("cannot attach children to a shape node");
                return None;
            }
            NodeKind::Root | NodeKind::Transform(_) => {}
        }
        let mut node = Node::new(kind);
        node.parent = Some(parent);
        let handle = self.nodes.insert(node);
        self.nodes[parent].children.push(handle);
        Some(handle)
    }

    /// Removes a node and its entire subtree. Removing the root is refused.
    ///
    /// Callers holding handles into the removed subtree (picked node,
    /// camera, animator) must re-seat them; the graph cannot do that for
    /// them.
    pub fn remove_subtree(&mut self, handle: NodeHandle) {
        if handle == self.root {
            log::warn!("cannot remove the scene root");
            return;
        }
        let Some(node) = self.nodes.get(handle) else {
            return;
        };
        let children = node.children.clone();
        for child in children {
            self.remove_subtree(child);
        }
        if let Some(parent) = self.nodes.get(handle).and_then(|n| n.parent)
            && let Some(parent_node) = self.nodes.get_mut(parent)
            && let Some(pos) = parent_node.children.iter().position(|&c| c == handle)
        {
            parent_node.children.remove(pos);
        }
        self.nodes.remove(handle);
    }

    // ========================================================================
    // Local transform access
    // ========================================================================

    /// The local RBT of a transform node. `None` for root, shape, or stale
    /// handles.
    #[must_use]
    pub fn rbt(&self, handle: NodeHandle) -> Option<RigidTransform> {
        self.nodes.get(handle).and_then(Node::rbt)
    }

    /// Overwrites the local RBT of a transform node. Returns `false` (and
    /// changes nothing) if the handle does not address a transform node.
    pub fn set_rbt(&mut self, handle: NodeHandle, rbt: RigidTransform) -> bool {
        match self.nodes.get_mut(handle) {
            Some(node) => match &mut node.kind {
                NodeKind::Transform(slot) => {
                    *slot = rbt;
                    true
                }
                _ => false,
            },
            None => false,
        }
    }

    // ========================================================================
    // Path accumulation
    // ========================================================================

    /// Composes the local RBTs of every transform node on the unique
    /// root-to-`target` path, in root-to-leaf order.
    ///
    /// `stop_short` drops that many innermost transform nodes from the
    /// composition: `stop_short == 1` yields the frame of `target`'s
    /// nearest transform ancestor, which is what conjugated manipulation
    /// needs. Returns `None` when `target` is not reachable from the root
    /// (stale handle).
    #[must_use]
    pub fn path_accum_rbt(
        &self,
        target: NodeHandle,
        stop_short: usize,
    ) -> Option<RigidTransform> {
        if !self.nodes.contains_key(target) {
            return None;
        }
        // Walk up the parent chain collecting transform RBTs leaf-to-root.
        let mut chain: SmallVec<[RigidTransform; 8]> = SmallVec::new();
        let mut cursor = target;
        loop {
            let node = self.nodes.get(cursor)?;
            if let NodeKind::Transform(rbt) = node.kind {
                chain.push(rbt);
            }
            match node.parent {
                Some(parent) => cursor = parent,
                None => break,
            }
        }
        if cursor != self.root {
            return None;
        }
        let keep = chain.len().saturating_sub(stop_short);
        let mut accum = RigidTransform::IDENTITY;
        for rbt in chain[..keep].iter().rev() {
            accum = accum * *rbt;
        }
        Some(accum)
    }

    /// Accumulated world RBT of `target`.
    ///
    /// # Panics
    ///
    /// Panics if `target` is not in the tree: an unreachable camera or
    /// manipulation target means the session state is corrupted and cannot
    /// be safely continued.
    #[must_use]
    pub fn world_rbt(&self, target: NodeHandle) -> RigidTransform {
        self.path_accum_rbt(target, 0)
            .expect("node not reachable from the scene root")
    }

    /// World RBT of `target`'s nearest transform ancestor (one level
    /// short). Panics like [`world_rbt`](Self::world_rbt).
    #[must_use]
    pub fn parent_world_rbt(&self, target: NodeHandle) -> RigidTransform {
        self.path_accum_rbt(target, 1)
            .expect("node not reachable from the scene root")
    }

    // ========================================================================
    // Enumeration and traversal
    // ========================================================================

    /// All transform nodes in stable pre-order (depth-first, children in
    /// insertion order). This is the flattening order keyframes are
    /// indexed by.
    #[must_use]
    pub fn transform_nodes(&self) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        self.collect_transforms(self.root, &mut out);
        out
    }

    fn collect_transforms(&self, handle: NodeHandle, out: &mut Vec<NodeHandle>) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };
        if matches!(node.kind, NodeKind::Transform(_)) {
            out.push(handle);
        }
        for &child in &node.children {
            self.collect_transforms(child, out);
        }
    }

    /// Pre-order traversal dispatching per node kind; see [`SceneVisitor`].
    pub fn accept<V: SceneVisitor>(&self, visitor: &mut V) {
        self.accept_from(self.root, visitor);
    }

    fn accept_from<V: SceneVisitor>(&self, handle: NodeHandle, visitor: &mut V) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };
        match &node.kind {
            NodeKind::Root => {
                for &child in &node.children {
                    self.accept_from(child, visitor);
                }
            }
            NodeKind::Transform(rbt) => {
                visitor.enter_transform(handle, rbt);
                for &child in &node.children {
                    self.accept_from(child, visitor);
                }
                visitor.leave_transform(handle);
            }
            NodeKind::Shape(shape) => {
                visitor.visit_shape(handle, shape);
            }
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
