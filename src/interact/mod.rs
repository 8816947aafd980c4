//! Interaction: consolidated UI state, the arcball construction, and the
//! mixed-frame manipulation algorithm that maps mouse drags to rigid
//! transform updates.

pub mod arcball;
pub mod input;
pub mod manipulate;

pub use input::{InteractionState, MouseButton, MouseButtons, SkyMode};
pub use manipulate::ManipMode;
