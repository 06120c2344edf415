//! Undo/redo history for mesh painting.
//!
//! This module provides:
//! - [`PaintSnapshot`] - A full copy of a mesh's colors, tagged with what produced it
//! - [`PaintEventRecorder`] - Collapses a whole gesture into one snapshot
//! - [`HistoryQueue`] - Bounded, cursor-addressed snapshot sequence
//!
//! Undo and redo restore whole snapshots (O(vertex count)) rather than
//! replaying deltas. History works at gesture granularity: a long drag that
//! paints and repaints the same vertices is one step holding the net result.

mod queue;
mod recorder;
mod snapshot;

pub use queue::HistoryQueue;
pub use recorder::{PaintEventRecorder, PaintGesture};
pub use snapshot::{PaintSnapshot, SnapshotKind};
