use crate::scene::node::{NodeHandle, ShapeData};
use crate::scene::transform::RigidTransform;

/// Capability implemented by systems that walk the scene graph (renderers,
/// pickers, debug dumpers) without coupling to graph internals.
///
/// The graph drives a pre-order traversal and dispatches one callback per
/// node kind. Transform nodes are bracketed by `enter`/`leave` so a visitor
/// can maintain its own accumulated-transform stack; shape nodes are leaves
/// and get a single callback with their payload.
pub trait SceneVisitor {
    fn enter_transform(&mut self, _node: NodeHandle, _rbt: &RigidTransform) {}

    fn leave_transform(&mut self, _node: NodeHandle) {}

    fn visit_shape(&mut self, _node: NodeHandle, _shape: &ShapeData) {}
}
