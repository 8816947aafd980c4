use crate::scene::transform::RigidTransform;

/// A full snapshot of every attached transform node's RBT at one point in
/// animated time, indexed by the stable node enumeration order fixed at
/// attach time.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyFrame {
    rbts: Vec<RigidTransform>,
}

impl KeyFrame {
    /// An all-identity frame with one slot per attached node.
    #[must_use]
    pub fn identity(node_count: usize) -> Self {
        Self {
            rbts: vec![RigidTransform::IDENTITY; node_count],
        }
    }

    #[must_use]
    pub fn from_rbts(rbts: Vec<RigidTransform>) -> Self {
        Self { rbts }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rbts.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rbts.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn rbts(&self) -> &[RigidTransform] {
        &self.rbts
    }

    #[inline]
    pub fn rbts_mut(&mut self) -> &mut [RigidTransform] {
        &mut self.rbts
    }
}

/// Ordered sequence of keyframes with insertion and deletion at arbitrary
/// positions.
///
/// Addressing is by index; whoever holds a "current" index (the keyframe
/// editor) re-seats it explicitly across mutations.
#[derive(Debug, Clone, Default)]
pub struct KeyFrameSequence {
    frames: Vec<KeyFrame>,
}

impl KeyFrameSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&KeyFrame> {
        self.frames.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut KeyFrame> {
        self.frames.get_mut(index)
    }

    /// Inserts an all-identity frame after `after` (or at the front when
    /// the sequence is empty and `after` is `None`). Returns the index of
    /// the new frame.
    pub fn insert_identity_after(&mut self, after: Option<usize>, node_count: usize) -> usize {
        let at = match after {
            Some(index) => {
                assert!(index < self.frames.len(), "insert position out of bounds");
                index + 1
            }
            None => 0,
        };
        self.frames.insert(at, KeyFrame::identity(node_count));
        at
    }

    /// Removes the frame at `index`.
    pub fn remove(&mut self, index: usize) -> KeyFrame {
        self.frames.remove(index)
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Replaces the whole sequence (used by a successful load).
    pub fn replace(&mut self, frames: Vec<KeyFrame>) {
        self.frames = frames;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyFrame> {
        self.frames.iter()
    }
}
