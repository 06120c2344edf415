//! Viewport painting session
//!
//! [`ViewportSession`] owns everything one mesh-painting view needs: the
//! loaded mesh and its spatial index, the camera, the active tool, the brush,
//! the in-progress gesture and the undo history. Input handlers are methods on
//! the session; the surrounding application forwards pointer and toolbar
//! events to them and calls [`ViewportSession::frame`] once per display
//! refresh.
//!
//! The session does not depend on Bevy. With the `bevy` feature it derives
//! `Resource` so a Bevy app can hold it directly.

mod input;
mod loading;
mod undo;

use glam::{Mat4, Vec2};
use survey3d_config::{Rgb, ViewportConfig};
use thiserror::Error;

use crate::brush::BrushState;
use crate::history::{HistoryQueue, PaintEventRecorder};
use crate::mesh::PaintMesh;
use crate::painter::collect_non_default_vertices;
use crate::raycast::Camera;
use crate::spatial::SpatialIndex;
use crate::tool::ToolStateMachine;
use crate::types::{HotSpot, SurfaceHit, VertexSet};

pub use loading::{MeshLoad, SavedFields};

/// Errors from session operations
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("No mesh is loaded")]
    NoMesh,
    #[error("Mesh load failed: {0}")]
    MeshLoadFailed(String),
}

/// A mesh together with the spatial index built from it.
///
/// The index is only ever built here, so it cannot drift from the geometry.
#[derive(Debug)]
pub struct LoadedMesh {
    pub(crate) mesh: PaintMesh,
    pub(crate) index: SpatialIndex,
}

impl LoadedMesh {
    pub fn new(mesh: PaintMesh) -> Self {
        let index = SpatialIndex::build(&mesh);
        Self { mesh, index }
    }

    pub fn mesh(&self) -> &PaintMesh {
        &self.mesh
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }
}

/// State of one mesh-painting viewport
#[derive(Debug)]
#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
pub struct ViewportSession {
    pub(crate) config: ViewportConfig,
    pub(crate) camera: Camera,
    pub(crate) tools: ToolStateMachine,
    pub(crate) brush: BrushState,
    /// Active mesh, `None` until the first load completes
    pub(crate) current: Option<LoadedMesh>,
    pub(crate) recorder: PaintEventRecorder,
    pub(crate) history: HistoryQueue,
    pub(crate) hot_spot: Option<HotSpot>,
    /// Unpainted color of the active mesh; erase writes it back
    pub(crate) baseline_color: Rgb,
    /// Vertices of other saved fields shown for reference only
    pub(crate) reference_vertices: VertexSet,
    /// Last pointer position in NDC, `None` once the pointer has left
    pub(crate) pointer_ndc: Option<Vec2>,
    /// Surface hit resolved on the last frame
    pub(crate) last_hit: Option<SurfaceHit>,
}

impl ViewportSession {
    /// Create a session with no mesh loaded.
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            camera: Camera::default(),
            tools: ToolStateMachine::new(),
            brush: BrushState::new(config.brush),
            current: None,
            recorder: PaintEventRecorder::new(),
            history: HistoryQueue::new(config.history_capacity),
            hot_spot: None,
            baseline_color: config.default_color,
            reference_vertices: VertexSet::new(),
            pointer_ndc: None,
            last_hit: None,
            config,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replace the camera, e.g. after the orbit controller moved it.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn tools(&self) -> &ToolStateMachine {
        &self.tools
    }

    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    pub fn history(&self) -> &HistoryQueue {
        &self.history
    }

    pub fn mesh(&self) -> Option<&PaintMesh> {
        self.current.as_ref().map(|loaded| &loaded.mesh)
    }

    /// Mutable mesh access for the render loop's dirty-flag handshake.
    pub fn mesh_mut(&mut self) -> Option<&mut PaintMesh> {
        self.current.as_mut().map(|loaded| &mut loaded.mesh)
    }

    pub fn loaded(&self) -> Option<&LoadedMesh> {
        self.current.as_ref()
    }

    /// Update the active mesh's world transform.
    ///
    /// The index is built in local space, so it stays valid.
    pub fn set_mesh_transform(&mut self, transform: Mat4) -> Result<(), SessionError> {
        let loaded = self.current.as_mut().ok_or(SessionError::NoMesh)?;
        loaded.mesh.set_transform(transform);
        Ok(())
    }

    /// Surface hit from the most recent frame
    pub fn last_hit(&self) -> Option<&SurfaceHit> {
        self.last_hit.as_ref()
    }

    /// Color the active mesh treats as unpainted
    pub fn baseline_color(&self) -> Rgb {
        self.baseline_color
    }

    /// Vertices painted on the active field.
    ///
    /// This is the set the survey layer stores when a field is saved: every
    /// vertex whose color differs from the baseline, minus vertices of other
    /// fields that still show the reference color.
    pub fn painted_vertex_set(&self) -> Result<VertexSet, SessionError> {
        let mesh = self.mesh().ok_or(SessionError::NoMesh)?;
        let mut painted = collect_non_default_vertices(mesh, self.baseline_color);

        let reference_hex = self.config.field_color.to_hex();
        painted.retain(|&vertex| {
            !self.reference_vertices.contains(&vertex)
                || mesh.vertex_color(vertex).map(Rgb::hex_of) != Some(reference_hex)
        });
        Ok(painted)
    }
}

impl Default for ViewportSession {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}
