//! Error Types
//!
//! The recoverable half of the crate's error taxonomy. Invariant
//! violations (an unreachable manipulation target, an editor cursor out of
//! bounds) are not represented here; those panic, because they indicate a
//! corrupted in-memory state that cannot be safely continued.
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, PlumeError>`.

use thiserror::Error;

/// The main error type for user-facing failures.
///
/// Every variant leaves the originating subsystem's state unchanged:
/// a failed load keeps the previous keyframes, a rejected playback time
/// leaves the scene graph as it was.
#[derive(Error, Debug)]
pub enum PlumeError {
    // ========================================================================
    // Animation playback
    // ========================================================================
    /// Playback time outside the valid interpolation range.
    #[error("playback time {t} outside the valid range [0, {max}]")]
    InvalidPlaybackTime {
        /// The rejected play time, in keyframe intervals.
        t: f64,
        /// Largest valid play time (`frame_count - 3`).
        max: f64,
    },

    /// Playback requires at least four keyframes.
    #[error("cannot play animation with fewer than 4 keyframes (have {0})")]
    InsufficientKeyFrames(usize),

    // ========================================================================
    // Animation persistence
    // ========================================================================
    /// Loaded animation file does not match the attached scene graph.
    #[error(
        "animation file holds {found} transforms per frame but the attached scene graph has {expected}"
    )]
    NodeCountMismatch {
        /// Transform-node count of the attached scene graph.
        expected: usize,
        /// Per-frame transform count declared by the file.
        found: usize,
    },

    /// Animation file could not be parsed.
    #[error("malformed animation file: {0}")]
    MalformedAnimation(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, PlumeError>`.
pub type Result<T> = std::result::Result<T, PlumeError>;
