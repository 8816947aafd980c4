use glam::DVec3;
use slotmap::new_key_type;

use crate::scene::transform::RigidTransform;

new_key_type! {
    /// Generational handle into the scene graph's node arena.
    ///
    /// Handles are the only way external systems (the animator's flattened
    /// node list, the "current camera" and "current picked" interaction
    /// state) refer to nodes: non-owning lookups by identity, re-seated
    /// explicitly when nodes are removed.
    pub struct NodeHandle;
}

/// Opaque reference to a geometry resource owned by the rendering
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryRef(pub u32);

/// Opaque reference to a material resource owned by the rendering
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialRef(pub u32);

/// Payload of a shape (leaf) node: what to draw and a fixed local offset
/// below the owning transform chain.
///
/// The offset is affine (it may carry non-uniform scale), which is why it
/// lives outside the rigid-transform hierarchy; it never participates in
/// path accumulation or manipulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeData {
    pub geometry: GeometryRef,
    pub material: MaterialRef,
    pub translation: DVec3,
    /// Euler rotation in degrees, XYZ order.
    pub rotation_deg: DVec3,
    pub scale: DVec3,
}

impl ShapeData {
    #[must_use]
    pub fn new(geometry: GeometryRef, material: MaterialRef) -> Self {
        Self {
            geometry,
            material,
            translation: DVec3::ZERO,
            rotation_deg: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }

    #[must_use]
    pub fn with_translation(mut self, translation: DVec3) -> Self {
        self.translation = translation;
        self
    }

    #[must_use]
    pub fn with_rotation_deg(mut self, rotation_deg: DVec3) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local offset matrix for the rendering collaborator.
    #[must_use]
    pub fn local_matrix(&self) -> glam::DMat4 {
        let r = self.rotation_deg;
        let rotation = glam::DQuat::from_euler(
            glam::EulerRot::XYZ,
            r.x.to_radians(),
            r.y.to_radians(),
            r.z.to_radians(),
        );
        glam::DMat4::from_scale_rotation_translation(self.scale, rotation, self.translation)
    }
}

/// Tagged node payload. The graph dispatches on the kind; there is no
/// downcasting anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// The unique tree root. Contributes the identity to every path.
    Root,
    /// An articulation point owning a rigid transform.
    Transform(RigidTransform),
    /// A renderable leaf.
    Shape(ShapeData),
}

/// A scene node: hierarchy links plus the tagged payload.
///
/// Only keeps the data traversed every frame; everything heavyweight
/// (geometry buffers, materials) lives with the rendering collaborator and
/// is referenced by id.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    pub kind: NodeKind,
}

impl Node {
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// The node's local rigid transform, if it is a transform node.
    #[inline]
    #[must_use]
    pub fn rbt(&self) -> Option<RigidTransform> {
        match self.kind {
            NodeKind::Transform(rbt) => Some(rbt),
            _ => None,
        }
    }
}
