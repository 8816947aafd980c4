//! Keyframe animation: whole-scene-graph snapshots, Catmull-Rom
//! interpolation over rigid transforms, the interactive editor with its
//! playback clock, and plain-text persistence.

pub mod animator;
pub mod editor;
pub mod interpolate;
pub mod io;
pub mod keyframe;

pub use animator::{Animator, MIN_PLAYABLE_FRAMES};
pub use editor::{AnimatorState, KeyframeEditor};
pub use keyframe::{KeyFrame, KeyFrameSequence};
