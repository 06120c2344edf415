//! Full copies of a mesh's color attribute.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::mesh::PaintMesh;

/// What produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotKind {
    /// State right after a mesh was loaded or history was reset
    Baseline,
    /// A paint gesture
    Paint,
    /// An erase gesture
    Erase,
    /// The whole mesh was reset to the default color
    Clear,
}

/// Immutable copy of a mesh's per-vertex colors at one point in history.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintSnapshot {
    mesh_id: u32,
    kind: SnapshotKind,
    colors: Box<[[f32; 3]]>,
}

impl PaintSnapshot {
    /// Deep-copy the mesh's current colors.
    pub fn capture(mesh: &PaintMesh, kind: SnapshotKind) -> Self {
        Self {
            mesh_id: mesh.id(),
            kind,
            colors: mesh.colors().into(),
        }
    }

    pub fn mesh_id(&self) -> u32 {
        self.mesh_id
    }

    pub fn kind(&self) -> SnapshotKind {
        self.kind
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Overwrite the mesh's colors with this snapshot, in place.
    ///
    /// Refuses (and returns `false`) when the snapshot belongs to another mesh.
    pub fn restore(&self, mesh: &mut PaintMesh) -> bool {
        if mesh.id() != self.mesh_id || mesh.vertex_count() != self.colors.len() {
            warn!(
                "Snapshot for mesh {} ({} vertices) not restored onto mesh {} ({} vertices)",
                self.mesh_id,
                self.colors.len(),
                mesh.id(),
                mesh.vertex_count()
            );
            return false;
        }

        mesh.colors_mut().copy_from_slice(&self.colors);
        true
    }
}
