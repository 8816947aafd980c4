use std::path::Path;

use crate::animation::animator::{Animator, MIN_PLAYABLE_FRAMES};
use crate::errors::{PlumeError, Result};
use crate::scene::graph::SceneGraph;

/// Default pacing between consecutive keyframes during playback.
const DEFAULT_MS_BETWEEN_KEYFRAMES: u32 = 2000;
const MIN_MS_BETWEEN_KEYFRAMES: u32 = 100;
const MAX_MS_BETWEEN_KEYFRAMES: u32 = 10_000;

/// Observable editor state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatorState {
    /// No keyframes defined.
    Empty,
    /// Editing, with the index of the frame under the cursor.
    Editing(usize),
    /// Playing back, with the current play time in keyframe intervals.
    Playing(f64),
}

#[derive(Debug, Clone, Copy)]
struct Playback {
    elapsed_ms: f64,
}

/// Interactive layer over the [`Animator`]: a current-frame cursor,
/// named editing operations, and the playback clock.
///
/// Every editing operation is refused (with a warning, state unchanged)
/// while playback is running. The cursor is re-seated explicitly across
/// deletions and at the end of playback; it is always in bounds whenever
/// the sequence is non-empty.
#[derive(Debug, Default)]
pub struct KeyframeEditor {
    animator: Animator,
    current: Option<usize>,
    playback: Option<Playback>,
    ms_between_keyframes: u32,
}

impl KeyframeEditor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            animator: Animator::new(),
            current: None,
            playback: None,
            ms_between_keyframes: DEFAULT_MS_BETWEEN_KEYFRAMES,
        }
    }

    /// Re-attaches to the scene graph, clearing all keyframes and the
    /// cursor.
    pub fn attach(&mut self, graph: &SceneGraph) {
        self.animator.attach(graph);
        self.current = None;
        self.playback = None;
    }

    #[inline]
    #[must_use]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    #[must_use]
    pub fn state(&self) -> AnimatorState {
        match (&self.playback, self.current) {
            (Some(playback), _) => {
                AnimatorState::Playing(playback.elapsed_ms / f64::from(self.ms_between_keyframes))
            }
            (None, Some(index)) => AnimatorState::Editing(index),
            (None, None) => AnimatorState::Empty,
        }
    }

    #[inline]
    #[must_use]
    pub fn ms_between_keyframes(&self) -> u32 {
        self.ms_between_keyframes
    }

    /// Shortens the keyframe interval by 100 ms (faster playback).
    pub fn faster(&mut self) {
        self.ms_between_keyframes =
            (self.ms_between_keyframes - MIN_MS_BETWEEN_KEYFRAMES).max(MIN_MS_BETWEEN_KEYFRAMES);
        log::info!("{} ms between keyframes", self.ms_between_keyframes);
    }

    /// Lengthens the keyframe interval by 100 ms (slower playback).
    pub fn slower(&mut self) {
        self.ms_between_keyframes =
            (self.ms_between_keyframes + MIN_MS_BETWEEN_KEYFRAMES).min(MAX_MS_BETWEEN_KEYFRAMES);
        log::info!("{} ms between keyframes", self.ms_between_keyframes);
    }

    fn refuse_while_playing(&self, op: &str) -> bool {
        if self.playback.is_some() {
            log::warn!("cannot {op} while playing animation");
            return true;
        }
        false
    }

    fn assert_cursor_in_bounds(&self) {
        if let Some(index) = self.current {
            assert!(
                index < self.animator.frame_count(),
                "keyframe cursor out of bounds"
            );
        }
    }

    // ========================================================================
    // Editing operations
    // ========================================================================

    /// Copies the scene graph into the current frame, creating frame 0
    /// first when the sequence is empty.
    pub fn update_current(&mut self, graph: &SceneGraph) {
        if self.refuse_while_playing("update a keyframe") {
            return;
        }
        let index = match self.current {
            Some(index) => index,
            None => {
                log::info!("create new frame [0]");
                let index = self.animator.insert_identity_after(None);
                self.current = Some(index);
                index
            }
        };
        log::info!("copying scene graph to frame [{index}]");
        self.animator.pull_from_scene(index, graph);
        self.assert_cursor_in_bounds();
    }

    /// Inserts a new frame after the current one, fills it from the scene
    /// and moves the cursor onto it.
    pub fn new_frame(&mut self, graph: &SceneGraph) {
        if self.refuse_while_playing("create a keyframe") {
            return;
        }
        let index = self.animator.insert_identity_after(self.current);
        self.animator.pull_from_scene(index, graph);
        self.current = Some(index);
        log::info!("create new frame [{index}]");
        self.assert_cursor_in_bounds();
    }

    /// Pushes the current frame into the scene graph.
    pub fn recall_current(&mut self, graph: &mut SceneGraph) {
        if self.refuse_while_playing("recall a keyframe") {
            return;
        }
        match self.current {
            Some(index) => {
                log::info!("loading frame [{index}] into the scene graph");
                self.animator.push_to_scene(index, graph);
            }
            None => log::warn!("no key frame defined"),
        }
    }

    /// Deletes the current frame, re-seating the cursor to the previous
    /// frame if one exists (else the next) and pushing it to the scene.
    pub fn delete_current(&mut self, graph: &mut SceneGraph) {
        if self.refuse_while_playing("delete a keyframe") {
            return;
        }
        let Some(index) = self.current else {
            log::warn!("no key frame defined");
            return;
        };
        log::info!("deleting frame [{index}]");
        self.animator.delete(index);
        if self.animator.frame_count() == 0 {
            self.current = None;
            log::info!("frame list is now empty");
        } else {
            let reseated = index.saturating_sub(1);
            self.current = Some(reseated);
            self.animator.push_to_scene(reseated, graph);
            log::info!("now at frame [{reseated}]");
        }
        self.assert_cursor_in_bounds();
    }

    /// Advances the cursor to the next frame and pushes it to the scene.
    pub fn step_forward(&mut self, graph: &mut SceneGraph) {
        if self.refuse_while_playing("step between keyframes") {
            return;
        }
        if let Some(index) = self.current
            && index + 1 < self.animator.frame_count()
        {
            self.current = Some(index + 1);
            self.animator.push_to_scene(index + 1, graph);
            log::info!("stepped forward to frame [{}]", index + 1);
        }
    }

    /// Moves the cursor to the previous frame and pushes it to the scene.
    pub fn step_backward(&mut self, graph: &mut SceneGraph) {
        if self.refuse_while_playing("step between keyframes") {
            return;
        }
        if let Some(index) = self.current
            && index > 0
        {
            self.current = Some(index - 1);
            self.animator.push_to_scene(index - 1, graph);
            log::info!("stepped backward to frame [{}]", index - 1);
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.animator.save(path)
    }

    /// Loads a keyframe file, re-seating the cursor to frame 0 and pushing
    /// it to the scene. A failed load leaves everything unchanged.
    pub fn load<P: AsRef<Path>>(&mut self, path: P, graph: &mut SceneGraph) -> Result<()> {
        if self.refuse_while_playing("load an animation") {
            return Ok(());
        }
        self.animator.load(path)?;
        log::info!("{} frames read", self.animator.frame_count());
        if self.animator.frame_count() > 0 {
            self.current = Some(0);
            self.animator.push_to_scene(0, graph);
            log::info!("now at frame [0]");
        } else {
            self.current = None;
        }
        self.assert_cursor_in_bounds();
        Ok(())
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Starts playback from the beginning.
    ///
    /// # Errors
    ///
    /// [`PlumeError::InsufficientKeyFrames`] with fewer than four frames;
    /// the request is refused and nothing changes.
    pub fn start_playback(&mut self) -> Result<()> {
        if self.playback.is_some() {
            return Ok(());
        }
        let frames = self.animator.frame_count();
        if frames < MIN_PLAYABLE_FRAMES {
            return Err(PlumeError::InsufficientKeyFrames(frames));
        }
        self.playback = Some(Playback { elapsed_ms: 0.0 });
        log::info!("playing animation");
        Ok(())
    }

    /// Stops playback at the next frame boundary (this is that boundary:
    /// the flag flips immediately, no mid-computation cancellation
    /// exists).
    pub fn stop_playback(&mut self) {
        if self.playback.take().is_some() {
            log::info!("stopping animation");
        }
    }

    /// Advances the playback clock by `dt` seconds and pushes the
    /// interpolated pose to the scene. When play time passes
    /// `frame_count - 3` the clip is over: the cursor re-seats to the
    /// second-to-last frame, that frame is pushed, and playback stops.
    pub fn advance(&mut self, dt: f64, graph: &mut SceneGraph) {
        let Some(playback) = &mut self.playback else {
            return;
        };
        let t = playback.elapsed_ms / f64::from(self.ms_between_keyframes);
        if t > self.animator.max_play_time() {
            let last_editable = self.animator.frame_count() - 2;
            self.playback = None;
            self.current = Some(last_editable);
            self.animator.push_to_scene(last_editable, graph);
            log::info!("finished playing animation; now at frame [{last_editable}]");
            return;
        }
        if let Err(err) = self.animator.play(t, graph) {
            // Unreachable by construction (start_playback checked the
            // frame count and t is within range); degrade to a stop.
            log::error!("playback failed: {err}");
            self.playback = None;
            return;
        }
        if let Some(playback) = &mut self.playback {
            playback.elapsed_ms += dt * 1000.0;
        }
    }
}
