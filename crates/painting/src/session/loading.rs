//! Mesh replacement and history seeding

use survey3d_config::Rgb;
use tracing::{info, warn};

use crate::history::{PaintSnapshot, SnapshotKind};
use crate::mesh::PaintMesh;
use crate::painter::{fill_all, paint_vertices};
use crate::types::{HotSpot, VertexSet};

use super::{LoadedMesh, SessionError, ViewportSession};

/// Outcome of an asynchronous mesh load, as reported by the asset loader.
#[derive(Debug)]
pub enum MeshLoad {
    /// Still loading; the session keeps its current mesh
    Pending,
    /// Finished mesh, ready to paint
    Loaded(PaintMesh),
    /// Loader error message
    Failed(String),
}

/// Saved survey data to put back on a freshly loaded mesh.
#[derive(Debug, Clone, Copy, Default)]
pub struct SavedFields<'a> {
    /// Field being reopened for editing, painted in `paint_color`
    pub field: Option<&'a VertexSet>,
    /// Hot spot of the reopened field
    pub hot_spot: Option<HotSpot>,
    /// Other fields of the survey, shown in `field_color` for reference.
    /// They are not part of the painted set unless repainted.
    pub others: &'a [&'a VertexSet],
}

impl ViewportSession {
    /// Apply a mesh load result.
    ///
    /// On success the new mesh is filled with the default color, the saved
    /// fields are painted on top, and history is reset with that state as the
    /// baseline. Any uncommitted gesture is discarded and the hot spot is
    /// replaced by the saved one.
    ///
    /// Returns `Ok(false)` for a pending load. A failed load keeps the current
    /// mesh and history untouched.
    pub fn replace_mesh(
        &mut self,
        load: MeshLoad,
        saved: SavedFields<'_>,
    ) -> Result<bool, SessionError> {
        match load {
            MeshLoad::Pending => Ok(false),
            MeshLoad::Failed(reason) => {
                warn!("Mesh load failed: {}", reason);
                Err(SessionError::MeshLoadFailed(reason))
            }
            MeshLoad::Loaded(mesh) => {
                self.install_mesh(mesh, saved);
                Ok(true)
            }
        }
    }

    /// Replace the active mesh with a freshly loaded one, no saved paint.
    pub fn load_mesh(&mut self, mesh: PaintMesh) {
        self.install_mesh(mesh, SavedFields::default());
    }

    /// Fill the active mesh with `baseline` and restart history from it.
    ///
    /// `baseline` becomes the color erase writes and the color painted-set
    /// extraction treats as unpainted.
    pub fn reset_history(&mut self, baseline: Rgb) -> Result<(), SessionError> {
        let loaded = self.current.as_mut().ok_or(SessionError::NoMesh)?;
        self.recorder.discard();
        fill_all(&mut loaded.mesh, baseline);
        self.baseline_color = baseline;
        self.reference_vertices.clear();
        self.seed_history();
        Ok(())
    }

    fn install_mesh(&mut self, mut mesh: PaintMesh, saved: SavedFields<'_>) {
        if self.recorder.discard() {
            warn!("Discarded uncommitted gesture on mesh switch");
        }

        let mut reference: VertexSet = saved
            .others
            .iter()
            .flat_map(|set| set.iter().copied())
            .collect();
        if let Some(field) = saved.field {
            reference.retain(|vertex| !field.contains(vertex));
        }

        self.baseline_color = self.config.default_color;
        fill_all(&mut mesh, self.baseline_color);
        paint_vertices(&mut mesh, &reference, self.config.field_color);
        if let Some(field) = saved.field {
            paint_vertices(&mut mesh, field, self.config.paint_color);
        }

        info!(
            "Mesh {} loaded: {} triangles, {} saved fields shown",
            mesh.id(),
            mesh.triangle_count(),
            saved.others.len() + usize::from(saved.field.is_some())
        );

        self.current = Some(LoadedMesh::new(mesh));
        self.reference_vertices = reference;
        self.hot_spot = saved.hot_spot;
        self.last_hit = None;
        self.brush.deactivate();
        self.seed_history();
    }

    /// Reset the queue to a single baseline snapshot of the current colors.
    fn seed_history(&mut self) {
        self.history.reset();
        if let Some(loaded) = &self.current {
            self.history
                .push(PaintSnapshot::capture(&loaded.mesh, SnapshotKind::Baseline));
            info!("History reset for mesh {}", loaded.mesh.id());
        }
    }
}
