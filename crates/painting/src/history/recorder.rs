//! Gesture recorder: turns a pointer-down..pointer-up run of paint writes
//! into a single history snapshot.

use tracing::{debug, warn};

use crate::mesh::PaintMesh;

use super::snapshot::{PaintSnapshot, SnapshotKind};

/// A paint or erase gesture in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintGesture {
    /// Tool that started the gesture
    pub kind: SnapshotKind,
    /// Mesh the gesture writes to
    pub mesh_id: u32,
    /// Number of write calls so far
    pub writes: usize,
    /// Vertices written so far, counting repeats
    pub vertices_written: usize,
}

/// Records one gesture at a time.
///
/// A gesture starts lazily on the first write, so a press that never touches
/// the mesh produces no snapshot. Only the net result of the gesture is
/// captured, when it finishes.
#[derive(Debug, Default)]
pub struct PaintEventRecorder {
    gesture: Option<PaintGesture>,
}

impl PaintEventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a gesture is in progress.
    pub fn is_recording(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn gesture(&self) -> Option<&PaintGesture> {
        self.gesture.as_ref()
    }

    /// Note a write to `mesh_id`, starting a gesture if none is active.
    ///
    /// The gesture keeps the kind it started with even if the tool changes
    /// mid-drag.
    pub fn record_write(&mut self, mesh_id: u32, kind: SnapshotKind, vertices_written: usize) {
        let gesture = self.gesture.get_or_insert_with(|| {
            debug!("Gesture started: {:?} on mesh {}", kind, mesh_id);
            PaintGesture {
                kind,
                mesh_id,
                writes: 0,
                vertices_written: 0,
            }
        });
        gesture.writes += 1;
        gesture.vertices_written += vertices_written;
    }

    /// End the gesture and capture the mesh's colors.
    ///
    /// Returns `None` when no gesture was active, or when the gesture was
    /// recorded against a different mesh (it is dropped).
    pub fn finish(&mut self, mesh: &PaintMesh) -> Option<PaintSnapshot> {
        let gesture = self.gesture.take()?;

        if gesture.mesh_id != mesh.id() {
            warn!(
                "Dropping gesture for mesh {}: active mesh is now {}",
                gesture.mesh_id,
                mesh.id()
            );
            return None;
        }

        debug!(
            "Gesture finished: {:?}, {} writes, {} vertices",
            gesture.kind, gesture.writes, gesture.vertices_written
        );
        Some(PaintSnapshot::capture(mesh, gesture.kind))
    }

    /// Drop the active gesture without capturing anything.
    ///
    /// Returns `true` if a gesture was discarded.
    pub fn discard(&mut self) -> bool {
        self.gesture.take().is_some()
    }
}
