//! Engine Core Module
//!
//! [`Engine`] is the frame-driven coordinator: it owns the scene graph,
//! interaction state, keyframe editor and fur rig, and exposes normalized
//! event entry points plus a per-frame [`update`](Engine::update). It is a
//! pure engine instance with no window management: any frontend that can
//! deliver cursor/button events and call `update` once per frame can drive
//! it.
//!
//! Everything runs single-threaded between frame boundaries: `update`
//! advances animation playback, steps the physical simulation through a
//! fixed-timestep accumulator, and refreshes the arcball depth scale.
//! Rendering and picking are external collaborators reached through the
//! visitor surface and the pick request/complete handshake.

use glam::DVec2;

use crate::animation::editor::KeyframeEditor;
use crate::errors::Result;
use crate::interact::input::{InteractionState, MouseButton, SkyMode};
use crate::interact::manipulate;
use crate::scene::camera::{Frustum, Viewport};
use crate::scene::graph::SceneGraph;
use crate::scene::node::NodeHandle;
use crate::scene::transform::RigidTransform;
use crate::sim::fur::{FurParams, FurSimulation};
use crate::sim::mesh::FurMesh;
use crate::sim::shells::{ShellLayer, build_shells};

/// Step applied to fur height / hairyness by the grow/shrink operations.
const FUR_ADJUST_FACTOR: f64 = 1.05;

/// Ask the picking collaborator which node covers this window position
/// (y-up window coordinates; the collaborator answers through
/// [`Engine::complete_pick`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRequest {
    pub x: f64,
    pub y: f64,
}

/// A fur-bearing body: the substrate mesh, its strand simulation, and the
/// transform node the coat hangs off.
pub struct FurRig {
    pub node: NodeHandle,
    pub mesh: FurMesh,
    pub sim: FurSimulation,
}

pub struct Engine {
    pub scene: SceneGraph,
    pub interaction: InteractionState,
    pub frustum: Frustum,
    pub editor: KeyframeEditor,
    viewport: Viewport,
    fur: Option<FurRig>,
}

impl Engine {
    /// Creates an engine with an empty scene containing only the sky
    /// camera frame, placed at `sky_rbt`.
    #[must_use]
    pub fn new(viewport: Viewport, sky_rbt: RigidTransform) -> Self {
        let mut scene = SceneGraph::new();
        let sky = scene
            .add_transform(scene.root(), sky_rbt)
            .expect("root accepts children");
        let mut engine = Self {
            scene,
            interaction: InteractionState::new(sky),
            frustum: Frustum::new(),
            editor: KeyframeEditor::new(),
            viewport,
            fur: None,
        };
        engine.resize(viewport.width, viewport.height);
        engine
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The sky camera frame created at construction.
    #[inline]
    #[must_use]
    pub fn sky(&self) -> NodeHandle {
        self.interaction.sky
    }

    /// Fixes the animator's node list to the current scene structure and
    /// clears all keyframes. Call once the scene is built, and again after
    /// any structural change.
    pub fn attach_animator(&mut self) {
        self.editor.attach(&self.scene);
    }

    // ========================================================================
    // Per-frame update
    // ========================================================================

    /// Advances one frame: playback first, then the simulation, then the
    /// arcball depth scale (frozen while a translation chord is held so
    /// the grab point stays under the cursor).
    pub fn update(&mut self, dt: f64) {
        self.editor.advance(dt, &mut self.scene);

        if let Some(fur) = &mut self.fur {
            let world = self.scene.world_rbt(fur.node);
            fur.sim.advance(dt, &fur.mesh, &world);
        }

        if !self.interaction.translating() {
            manipulate::update_arcball_scale(
                &mut self.interaction,
                &self.scene,
                &self.frustum,
                self.viewport,
            );
        }
    }

    // ========================================================================
    // Normalized input events
    // ========================================================================

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.frustum.update_fov(self.viewport);
        self.interaction.arcball_screen_radius =
            1.0_f64.max(0.25 * f64::from(width.min(height)));
    }

    /// Cursor motion in window coordinates (y down, as delivered by
    /// windowing systems). Applies the drag when a button chord is held.
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        let p = DVec2::new(x, f64::from(self.viewport.height) - y - 1.0);
        manipulate::drag(
            &mut self.interaction,
            &mut self.scene,
            &self.frustum,
            self.viewport,
            p,
        );
    }

    /// Button transition at window position `(x, y)` (y down). Returns a
    /// pick request when picking is armed and the left button goes down;
    /// the picking collaborator answers via
    /// [`complete_pick`](Self::complete_pick).
    pub fn mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        x: f64,
        y: f64,
    ) -> Option<PickRequest> {
        let p = DVec2::new(x, f64::from(self.viewport.height) - y - 1.0);
        self.interaction.cursor = p;
        self.interaction.set_button(button.flag(), pressed);

        if self.interaction.picking_armed && button == MouseButton::Left && pressed {
            return Some(PickRequest { x: p.x, y: p.y });
        }
        None
    }

    pub fn set_space_down(&mut self, down: bool) {
        self.interaction.space_down = down;
    }

    // ========================================================================
    // Picking handshake
    // ========================================================================

    /// Arms or disarms pick-on-click.
    pub fn toggle_picking(&mut self) {
        self.interaction.picking_armed = !self.interaction.picking_armed;
        log::info!(
            "picking mode is {}",
            if self.interaction.picking_armed { "on" } else { "off" }
        );
    }

    /// Answer to a [`PickRequest`]. `None` clears the selection.
    pub fn complete_pick(&mut self, picked: Option<NodeHandle>) {
        self.interaction.picked = picked.filter(|&node| self.scene.contains(node));
        self.interaction.picking_armed = false;
        log::info!(
            "{}",
            if self.interaction.picked.is_some() {
                "part picked"
            } else {
                "no part picked"
            }
        );
    }

    // ========================================================================
    // View and mode toggles
    // ========================================================================

    /// Switches which node the world is viewed from.
    pub fn set_camera(&mut self, camera: NodeHandle) {
        if self.scene.contains(camera) {
            self.interaction.camera = camera;
        } else {
            log::warn!("camera node is not in the scene graph");
        }
    }

    /// Toggles whether the sky camera is edited w.r.t. the world-sky or
    /// sky-sky frame.
    pub fn toggle_sky_mode(&mut self) {
        self.interaction.sky_mode = match self.interaction.sky_mode {
            SkyMode::WorldSky => SkyMode::SkySky,
            SkyMode::SkySky => SkyMode::WorldSky,
        };
        log::info!(
            "editing sky eye w.r.t. {}",
            match self.interaction.sky_mode {
                SkyMode::WorldSky => "world-sky frame",
                SkyMode::SkySky => "sky-sky frame",
            }
        );
    }

    pub fn toggle_arcball_display(&mut self) {
        self.interaction.show_arcball = !self.interaction.show_arcball;
    }

    /// Whether the renderer should draw the arcball sphere this frame,
    /// and at what world frame and eye-space scale.
    #[must_use]
    pub fn arcball_visual(&self) -> Option<(RigidTransform, f64)> {
        if !self.interaction.show_arcball || !manipulate::should_use_arcball(&self.interaction) {
            return None;
        }
        let frame = manipulate::arcball_rbt(&self.interaction, &self.scene);
        let scale = self.interaction.arcball_scale * self.interaction.arcball_screen_radius;
        Some((frame, scale))
    }

    // ========================================================================
    // Keyframe editor operations
    // ========================================================================

    pub fn keyframe_update(&mut self) {
        self.editor.update_current(&self.scene);
    }

    pub fn keyframe_new(&mut self) {
        self.editor.new_frame(&self.scene);
    }

    pub fn keyframe_recall(&mut self) {
        self.editor.recall_current(&mut self.scene);
    }

    pub fn keyframe_delete(&mut self) {
        self.editor.delete_current(&mut self.scene);
    }

    pub fn keyframe_step_forward(&mut self) {
        self.editor.step_forward(&mut self.scene);
    }

    pub fn keyframe_step_backward(&mut self) {
        self.editor.step_backward(&mut self.scene);
    }

    /// Starts playback, or stops it if already running.
    pub fn toggle_playback(&mut self) -> Result<()> {
        if self.editor.is_playing() {
            self.editor.stop_playback();
            Ok(())
        } else {
            self.editor.start_playback()
        }
    }

    pub fn save_animation<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        self.editor.save(path)
    }

    pub fn load_animation<P: AsRef<std::path::Path>>(&mut self, path: P) -> Result<()> {
        self.editor.load(path, &mut self.scene)
    }

    // ========================================================================
    // Fur
    // ========================================================================

    /// Hangs a fur coat off `node`, initialized at rest in the node's
    /// current world frame.
    pub fn attach_fur(&mut self, node: NodeHandle, mesh: FurMesh, params: FurParams) {
        let world = self.scene.world_rbt(node);
        let sim = FurSimulation::new(&mesh, &world, params);
        self.fur = Some(FurRig { node, mesh, sim });
    }

    #[inline]
    #[must_use]
    pub fn fur(&self) -> Option<&FurRig> {
        self.fur.as_ref()
    }

    /// Current shell geometry, rebuilt from the simulated tips. Call every
    /// frame the simulation or the body's transform may have changed.
    #[must_use]
    pub fn shell_layers(&self) -> Option<Vec<ShellLayer>> {
        let fur = self.fur.as_ref()?;
        let world = self.scene.world_rbt(fur.node);
        Some(build_shells(
            &fur.mesh,
            fur.sim.tips(),
            &world,
            &fur.sim.params,
        ))
    }

    pub fn grow_fur(&mut self) {
        self.adjust_fur(|params| {
            params.fur_height *= FUR_ADJUST_FACTOR;
            log::info!("fur height = {}", params.fur_height);
        });
    }

    pub fn shrink_fur(&mut self) {
        self.adjust_fur(|params| {
            params.fur_height /= FUR_ADJUST_FACTOR;
            log::info!("fur height = {}", params.fur_height);
        });
    }

    pub fn more_hairy(&mut self) {
        self.adjust_fur(|params| {
            params.hairyness *= FUR_ADJUST_FACTOR;
            log::info!("hairyness = {}", params.hairyness);
        });
    }

    pub fn less_hairy(&mut self) {
        self.adjust_fur(|params| {
            params.hairyness /= FUR_ADJUST_FACTOR;
            log::info!("hairyness = {}", params.hairyness);
        });
    }

    fn adjust_fur(&mut self, f: impl FnOnce(&mut FurParams)) {
        if let Some(fur) = &mut self.fur {
            f(&mut fur.sim.params);
        }
    }
}
