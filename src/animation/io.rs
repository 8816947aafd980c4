//! Plain-text persistence for keyframe sequences.
//!
//! First line: `num_frames num_nodes_per_frame`. Then one line per node
//! per frame, frames in sequence order: `tx ty tz qx qy qz qw`
//! (translation, then quaternion with the scalar part last).

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use glam::{DQuat, DVec3};

use crate::animation::animator::Animator;
use crate::animation::keyframe::KeyFrame;
use crate::errors::{PlumeError, Result};
use crate::scene::transform::RigidTransform;

impl Animator {
    /// Writes all keyframes to `path` in the text format above.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "{} {}", self.frame_count(), self.node_count())?;
        for frame in self.frames().iter() {
            for rbt in frame.rbts() {
                let t = rbt.translation;
                let q = rbt.rotation;
                writeln!(out, "{} {} {} {} {} {} {}", t.x, t.y, t.z, q.x, q.y, q.z, q.w)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Loads keyframes from `path`, replacing the current sequence.
    ///
    /// All-or-nothing: the file is fully parsed and validated against the
    /// attached node count before any existing keyframe is touched, so a
    /// failed load leaves the animator exactly as it was.
    ///
    /// # Errors
    ///
    /// [`PlumeError::NodeCountMismatch`] if the per-frame transform count
    /// does not match the attached scene graph;
    /// [`PlumeError::MalformedAnimation`] on parse failures;
    /// [`PlumeError::Io`] on read failures.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let reader = BufReader::new(File::open(path)?);
        let mut tokens = Tokens::new(reader);

        let num_frames = tokens.next_usize("frame count")?;
        let nodes_per_frame = tokens.next_usize("node count")?;
        if nodes_per_frame != self.node_count() {
            return Err(PlumeError::NodeCountMismatch {
                expected: self.node_count(),
                found: nodes_per_frame,
            });
        }

        let mut frames = Vec::with_capacity(num_frames);
        for _ in 0..num_frames {
            let mut rbts = Vec::with_capacity(nodes_per_frame);
            for _ in 0..nodes_per_frame {
                let t = DVec3::new(
                    tokens.next_f64("tx")?,
                    tokens.next_f64("ty")?,
                    tokens.next_f64("tz")?,
                );
                let q = DQuat::from_xyzw(
                    tokens.next_f64("qx")?,
                    tokens.next_f64("qy")?,
                    tokens.next_f64("qz")?,
                    tokens.next_f64("qw")?,
                );
                rbts.push(RigidTransform::new(t, q));
            }
            frames.push(KeyFrame::from_rbts(rbts));
        }

        self.replace_frames(frames);
        Ok(())
    }
}

/// Whitespace token stream over a buffered reader. Line boundaries are not
/// significant beyond separating tokens, which keeps the loader tolerant
/// of reflowed files.
struct Tokens<R: BufRead> {
    reader: R,
    line: Vec<String>,
    pos: usize,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pos: 0,
        }
    }

    fn next_token(&mut self, what: &str) -> Result<String> {
        while self.pos >= self.line.len() {
            let mut buf = String::new();
            if self.reader.read_line(&mut buf)? == 0 {
                return Err(PlumeError::MalformedAnimation(format!(
                    "unexpected end of file while reading {what}"
                )));
            }
            self.line = buf.split_whitespace().map(str::to_owned).collect();
            self.pos = 0;
        }
        let token = self.line[self.pos].clone();
        self.pos += 1;
        Ok(token)
    }

    fn next_usize(&mut self, what: &str) -> Result<usize> {
        let token = self.next_token(what)?;
        token
            .parse()
            .map_err(|_| PlumeError::MalformedAnimation(format!("bad {what}: {token:?}")))
    }

    fn next_f64(&mut self, what: &str) -> Result<f64> {
        let token = self.next_token(what)?;
        token
            .parse()
            .map_err(|_| PlumeError::MalformedAnimation(format!("bad {what}: {token:?}")))
    }
}
