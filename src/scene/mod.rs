//! Scene graph: rigid transforms, the node hierarchy, path-accumulated
//! world transforms, the viewing frustum, and the visitor capability used
//! by rendering and picking collaborators.

pub mod camera;
pub mod graph;
pub mod node;
pub mod transform;
pub mod visitor;

pub use camera::{Frustum, Viewport};
pub use graph::SceneGraph;
pub use node::{GeometryRef, MaterialRef, Node, NodeHandle, NodeKind, ShapeData};
pub use transform::RigidTransform;
pub use visitor::SceneVisitor;
