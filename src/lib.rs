//! Plume, an interactive 3D scene-graph playground.
//!
//! Teaches (and implements) transformation hierarchies, arcball
//! camera/object manipulation, keyframe animation over rigid transforms,
//! and a mass-spring shell-fur simulation. Rendering, windowing and
//! picking are external collaborators reached through the visitor surface,
//! normalized input events, and plain-old-data vertex buffers.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod engine;
pub mod errors;
pub mod interact;
pub mod scene;
pub mod sim;

pub use animation::{Animator, AnimatorState, KeyFrame, KeyFrameSequence, KeyframeEditor};
pub use engine::{Engine, FurRig, PickRequest};
pub use errors::{PlumeError, Result};
pub use interact::{InteractionState, ManipMode, MouseButton, MouseButtons, SkyMode};
pub use scene::{
    Frustum, GeometryRef, MaterialRef, Node, NodeHandle, NodeKind, RigidTransform, SceneGraph,
    SceneVisitor, ShapeData, Viewport,
};
pub use sim::{FurMesh, FurParams, FurSimulation, ShellLayer, ShellVertex, build_shells};
