use crate::animation::interpolate::catmull_rom_rbt;
use crate::animation::keyframe::{KeyFrame, KeyFrameSequence};
use crate::errors::{PlumeError, Result};
use crate::scene::graph::SceneGraph;
use crate::scene::node::NodeHandle;

/// Interpolation needs one frame of padding on each side of the bracketing
/// pair, so four keyframes is the minimum playable sequence.
pub const MIN_PLAYABLE_FRAMES: usize = 4;

/// Ordered keyframe snapshots over a flat list of scene-graph nodes.
///
/// [`attach`](Self::attach) fixes the node list and its order; every
/// keyframe afterwards holds exactly one RBT per attached node, in that
/// order. Reordering the scene graph after attach invalidates the
/// correspondence: the animator deliberately owns a flat snapshot of node
/// identities from attach time, and must be re-attached after structural
/// scene changes.
#[derive(Debug, Default)]
pub struct Animator {
    nodes: Vec<NodeHandle>,
    frames: KeyFrameSequence,
}

impl Animator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens the scene graph into the fixed node order and clears all
    /// keyframes.
    pub fn attach(&mut self, graph: &SceneGraph) {
        self.nodes = graph.transform_nodes();
        self.frames.clear();
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    #[must_use]
    pub fn frames(&self) -> &KeyFrameSequence {
        &self.frames
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }

    /// Largest valid playback time, in keyframe intervals.
    #[must_use]
    pub fn max_play_time(&self) -> f64 {
        self.frame_count() as f64 - 3.0
    }

    // ========================================================================
    // Frame editing
    // ========================================================================

    /// Overwrites frame `index` with the live RBT of every attached node.
    ///
    /// # Panics
    ///
    /// Panics if an attached node is no longer in the graph; the animator
    /// must be re-attached after structural scene changes.
    pub fn pull_from_scene(&mut self, index: usize, graph: &SceneGraph) {
        let frame = self
            .frames
            .get_mut(index)
            .expect("keyframe index out of bounds");
        for (slot, &node) in frame.rbts_mut().iter_mut().zip(&self.nodes) {
            *slot = graph
                .rbt(node)
                .expect("animator node list out of sync with the scene graph");
        }
    }

    /// Overwrites every attached node's live RBT from frame `index`.
    pub fn push_to_scene(&self, index: usize, graph: &mut SceneGraph) {
        let frame = self
            .frames
            .get(index)
            .expect("keyframe index out of bounds");
        for (&rbt, &node) in frame.rbts().iter().zip(&self.nodes) {
            assert!(
                graph.set_rbt(node, rbt),
                "animator node list out of sync with the scene graph"
            );
        }
    }

    /// Inserts an all-identity keyframe after `after` (`None` inserts at
    /// the front of an empty or non-empty sequence). Returns its index.
    pub fn insert_identity_after(&mut self, after: Option<usize>) -> usize {
        self.frames.insert_identity_after(after, self.nodes.len())
    }

    /// Removes frame `index`. Any "current" cursor must be re-seated by
    /// the caller.
    pub fn delete(&mut self, index: usize) {
        self.frames.remove(index);
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Interpolates every node's RBT at play time `t` (in keyframe
    /// intervals, valid over `[0, frame_count - 3]`) and pushes the result
    /// into the scene graph.
    ///
    /// # Errors
    ///
    /// [`PlumeError::InsufficientKeyFrames`] with fewer than four frames;
    /// [`PlumeError::InvalidPlaybackTime`] outside the valid range. The
    /// scene graph is untouched on error.
    pub fn play(&self, t: f64, graph: &mut SceneGraph) -> Result<()> {
        if self.frame_count() < MIN_PLAYABLE_FRAMES {
            return Err(PlumeError::InsufficientKeyFrames(self.frame_count()));
        }
        let max = self.max_play_time();
        if !(0.0..=max).contains(&t) {
            return Err(PlumeError::InvalidPlaybackTime { t, max });
        }

        // Shift by one so integer times line up with frame indices: the
        // keyframes sit at t = -1, 0, 1, 2, ...
        let shifted = t + 1.0;
        let k = shifted.floor() as usize;
        let frac = shifted - k as f64;

        let f0 = self.frames.get(k - 1).expect("padded frame below range");
        let f1 = self.frames.get(k).expect("frame in range");
        let f2 = self.frames.get(k + 1).expect("frame in range");
        // The last interval has no frame beyond its right bracket; reuse it.
        let f3 = self.frames.get(k + 2).unwrap_or(f2);

        for (i, &node) in self.nodes.iter().enumerate() {
            let rbt = catmull_rom_rbt(
                &f0.rbts()[i],
                &f1.rbts()[i],
                &f2.rbts()[i],
                &f3.rbts()[i],
                frac,
            );
            assert!(
                graph.set_rbt(node, rbt),
                "animator node list out of sync with the scene graph"
            );
        }
        Ok(())
    }

    /// Replaces all keyframes (used by a successful load). Frames must
    /// already match the attached node count.
    pub(crate) fn replace_frames(&mut self, frames: Vec<KeyFrame>) {
        debug_assert!(frames.iter().all(|f| f.len() == self.nodes.len()));
        self.frames.replace(frames);
    }
}
