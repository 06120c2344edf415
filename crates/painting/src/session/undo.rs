//! Undo/redo for the viewport session

use tracing::{debug, info};

use crate::history::{PaintSnapshot, SnapshotKind};
use crate::painter::fill_all;

use super::{SessionError, ViewportSession};

impl ViewportSession {
    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.recorder.is_recording()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo() && !self.recorder.is_recording()
    }

    /// Step back one gesture.
    ///
    /// A gesture still in progress is committed first, so it is the one
    /// undone. Returns true if colors were restored; at the oldest snapshot
    /// this is a silent no-op.
    pub fn undo(&mut self) -> bool {
        self.commit_gesture();

        let Some(loaded) = self.current.as_mut() else {
            return false;
        };
        let Some(snapshot) = self.history.previous() else {
            debug!("Undo: already at oldest snapshot");
            return false;
        };

        debug!("Undo to {:?} snapshot", snapshot.kind());
        snapshot.restore(&mut loaded.mesh)
    }

    /// Step forward one gesture.
    ///
    /// Returns true if colors were restored; at the newest snapshot this is a
    /// silent no-op.
    pub fn redo(&mut self) -> bool {
        self.commit_gesture();

        let Some(loaded) = self.current.as_mut() else {
            return false;
        };
        let Some(snapshot) = self.history.next() else {
            debug!("Redo: already at newest snapshot");
            return false;
        };

        debug!("Redo to {:?} snapshot", snapshot.kind());
        snapshot.restore(&mut loaded.mesh)
    }

    /// Reset every vertex to the baseline color as one undoable step.
    pub fn clear_paint(&mut self) -> Result<(), SessionError> {
        self.commit_gesture();

        let loaded = self.current.as_mut().ok_or(SessionError::NoMesh)?;
        fill_all(&mut loaded.mesh, self.baseline_color);
        self.history
            .push(PaintSnapshot::capture(&loaded.mesh, SnapshotKind::Clear));
        info!("Cleared paint on mesh {}", loaded.mesh.id());
        Ok(())
    }

    /// Push the active gesture, if any, onto the history.
    pub(crate) fn commit_gesture(&mut self) {
        let Some(loaded) = self.current.as_ref() else {
            self.recorder.discard();
            return;
        };
        if let Some(snapshot) = self.recorder.finish(&loaded.mesh) {
            self.history.push(snapshot);
        }
    }
}
