use bitflags::bitflags;
use glam::DVec2;

use crate::scene::NodeHandle;

bitflags! {
    /// Currently held mouse buttons.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct MouseButtons: u32 {
        const LEFT   = 1 << 0;
        const RIGHT  = 1 << 1;
        const MIDDLE = 1 << 2;
    }
}

/// A single button in a normalized input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    #[must_use]
    pub fn flag(self) -> MouseButtons {
        match self {
            Self::Left => MouseButtons::LEFT,
            Self::Right => MouseButtons::RIGHT,
            Self::Middle => MouseButtons::MIDDLE,
        }
    }
}

/// Which frame the sky camera is edited with respect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkyMode {
    /// Orbit the world origin (world-sky frame).
    #[default]
    WorldSky,
    /// First-person motion of the sky camera itself (sky-sky frame).
    SkySky,
}

/// All mutable UI/mode state, consolidated in one place so manipulation
/// mode resolution is a pure function of `(InteractionState, SceneGraph)`.
///
/// `camera`, `sky` and `picked` are non-owning handles into the scene
/// graph; whoever removes nodes must re-seat them.
#[derive(Debug, Clone)]
pub struct InteractionState {
    pub buttons: MouseButtons,
    /// Space emulates the middle mouse button while held.
    pub space_down: bool,
    /// Last cursor position in window coordinates with y up
    /// (bottom-left origin), updated as drags are consumed.
    pub cursor: DVec2,

    pub sky_mode: SkyMode,
    /// The node the world is viewed from.
    pub camera: NodeHandle,
    /// The root "sky" camera frame.
    pub sky: NodeHandle,
    /// Node selected by the picking collaborator, if any.
    pub picked: Option<NodeHandle>,

    /// The next left click resolves a pick instead of starting a drag.
    pub picking_armed: bool,
    /// Whether the arcball sphere should be drawn.
    pub show_arcball: bool,
    /// Arcball radius in screen pixels; tracks the window size.
    pub arcball_screen_radius: f64,
    /// Eye-space units per screen pixel at the pivot's depth. Frozen while
    /// a translation chord is held so the grab point stays under the
    /// cursor.
    pub arcball_scale: f64,
}

impl InteractionState {
    #[must_use]
    pub fn new(sky: NodeHandle) -> Self {
        Self {
            buttons: MouseButtons::empty(),
            space_down: false,
            cursor: DVec2::ZERO,
            sky_mode: SkyMode::default(),
            camera: sky,
            sky,
            picked: None,
            picking_armed: false,
            show_arcball: true,
            arcball_screen_radius: 100.0,
            arcball_scale: 1.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn dragging(&self) -> bool {
        !self.buttons.is_empty()
    }

    /// Left button alone, without the space modifier: the rotate chord.
    #[inline]
    #[must_use]
    pub fn rotating(&self) -> bool {
        self.buttons == MouseButtons::LEFT && !self.space_down
    }

    /// Right button alone: translate in the screen plane.
    #[inline]
    #[must_use]
    pub fn translating_xy(&self) -> bool {
        self.buttons == MouseButtons::RIGHT
    }

    /// Middle button, left+right, or left+space: translate along depth.
    #[inline]
    #[must_use]
    pub fn translating_z(&self) -> bool {
        self.buttons.contains(MouseButtons::MIDDLE)
            || self.buttons == MouseButtons::LEFT | MouseButtons::RIGHT
            || (self.buttons.contains(MouseButtons::LEFT) && self.space_down)
    }

    #[inline]
    #[must_use]
    pub fn translating(&self) -> bool {
        self.translating_xy() || self.translating_z()
    }

    pub fn set_button(&mut self, button: MouseButtons, pressed: bool) {
        self.buttons.set(button, pressed);
    }
}
