//! Fur: the substrate mesh, the per-strand mass-spring simulation, and
//! shell geometry derivation for volumetric-looking coats.

pub mod fur;
pub mod mesh;
pub mod shells;

pub use fur::{FurParams, FurSimulation};
pub use mesh::FurMesh;
pub use shells::{ShellLayer, ShellVertex, build_shells};
