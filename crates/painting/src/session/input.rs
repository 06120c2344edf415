//! Pointer, toolbar and per-frame handling

use glam::{Vec2, Vec3};
use tracing::{debug, info};

use crate::painter::paint_sphere;
use crate::raycast::resolve_pointer;
use crate::tool::{CameraInput, ToolMode};
use crate::types::{HotSpot, SurfaceHit};

use super::ViewportSession;

impl ViewportSession {
    /// Switch tools. Returns the camera input settings the orbit controller
    /// should apply.
    pub fn set_tool(&mut self, mode: ToolMode) -> CameraInput {
        self.tools.set(mode)
    }

    /// Set the brush radius in world units. Returns the clamped value.
    pub fn set_brush_radius(&mut self, radius: f32) -> f32 {
        self.brush.set_radius(radius)
    }

    /// Record the pointer position. Resolution against the mesh happens in
    /// [`ViewportSession::frame`].
    pub fn on_pointer_move(&mut self, ndc: Vec2) {
        self.pointer_ndc = Some(ndc);
    }

    pub fn on_pointer_down(&mut self) {
        self.brush.press();
    }

    /// Finish the press.
    ///
    /// Commits the paint gesture, if any, as one history step. With the
    /// hot spot tool a release over the mesh places the hot spot. A discrete
    /// device (touch, pen) sends no further moves after lifting, so the brush
    /// stops tracking.
    pub fn on_pointer_up(&mut self, discrete: bool) {
        let was_pressed = self.brush.is_pressed();
        self.brush.release();

        if was_pressed && self.tools.mode() == ToolMode::HotSpotPlace {
            self.place_hot_spot();
        }

        self.commit_gesture();

        if discrete {
            self.brush.deactivate();
            self.pointer_ndc = None;
            self.last_hit = None;
        }
    }

    /// Pointer left the viewport.
    pub fn on_pointer_leave(&mut self) {
        self.pointer_ndc = None;
        self.last_hit = None;
        self.brush.deactivate();
    }

    /// Run one animation frame.
    ///
    /// Resolves the pointer against the mesh to refresh the hover point, then
    /// paints under the brush when the pointer is pressed and the tool paints.
    /// Returns the surface hit, `None` when the pointer is off the mesh.
    pub fn frame(&mut self) -> Option<SurfaceHit> {
        let hit = self.resolve_hover();
        self.last_hit = hit;
        if self.pointer_ndc.is_some() {
            self.brush.set_hover(hit.map(|h| h.local_point));
        }

        let mode = self.tools.mode();
        if !self.brush.is_pressed() {
            return hit;
        }
        let (Some(hit), Some(kind)) = (hit, mode.snapshot_kind()) else {
            return hit;
        };
        let Some(loaded) = self.current.as_mut() else {
            return Some(hit);
        };

        let color = match mode {
            ToolMode::Erase => self.baseline_color,
            _ => self.config.paint_color,
        };
        let written = paint_sphere(
            &mut loaded.mesh,
            &loaded.index,
            hit.point,
            self.brush.radius(),
            color,
        );
        if written > 0 {
            self.recorder.record_write(loaded.mesh.id(), kind, written);
        }

        Some(hit)
    }

    /// World-space brush preview `(center, radius)` for the renderer.
    ///
    /// Only shown for painting tools while the pointer hovers the mesh.
    pub fn brush_cursor(&self) -> Option<(Vec3, f32)> {
        if !self.tools.mode().paints() || !self.brush.is_active() {
            return None;
        }
        let local = self.brush.hover()?;
        let mesh = self.mesh()?;
        Some((mesh.transform().transform_point3(local), self.brush.radius()))
    }

    pub fn hot_spot(&self) -> Option<HotSpot> {
        self.hot_spot
    }

    /// Show a saved hot spot, or hide it with `None`.
    pub fn set_hot_spot(&mut self, hot_spot: Option<HotSpot>) {
        self.hot_spot = hot_spot;
    }

    /// Hide the hot spot.
    pub fn clear_hot_spot(&mut self) {
        if self.hot_spot.take().is_some() {
            debug!("Hot spot cleared");
        }
    }

    fn resolve_hover(&self) -> Option<SurfaceHit> {
        let ndc = self.pointer_ndc?;
        let loaded = self.current.as_ref()?;
        resolve_pointer(ndc, &self.camera, &loaded.mesh, &loaded.index)
    }

    fn place_hot_spot(&mut self) {
        let Some(hit) = self.resolve_hover() else {
            debug!("Hot spot release missed the mesh");
            return;
        };
        let hot_spot = HotSpot::from(hit.point);
        info!(
            "Hot spot placed at ({:.3}, {:.3}, {:.3})",
            hot_spot.x, hot_spot.y, hot_spot.z
        );
        self.hot_spot = Some(hot_spot);
    }
}
