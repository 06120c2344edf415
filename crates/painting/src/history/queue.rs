//! Bounded undo/redo queue of paint snapshots.

use std::collections::VecDeque;

use tracing::debug;

use super::snapshot::PaintSnapshot;

/// Fixed-capacity, cursor-addressed sequence of snapshots.
///
/// The cursor is 1-based: position 1 is the oldest snapshot (the baseline of
/// a freshly loaded mesh) and the cursor names the snapshot currently shown.
/// While the queue is non-empty, `1 <= cursor <= len <= capacity`.
#[derive(Debug)]
pub struct HistoryQueue {
    snapshots: VecDeque<PaintSnapshot>,
    capacity: usize,
    cursor: usize,
}

impl HistoryQueue {
    /// Create an empty queue. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            snapshots: VecDeque::with_capacity(capacity + 1),
            capacity,
            cursor: 1,
        }
    }

    /// Store a snapshot as the newest state.
    ///
    /// Everything after the cursor (the redo branch) is discarded first. When
    /// the queue overflows, the oldest snapshot is evicted.
    pub fn push(&mut self, snapshot: PaintSnapshot) {
        self.snapshots.truncate(self.cursor);
        self.snapshots.push_back(snapshot);
        self.cursor = self.snapshots.len();

        if self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
            self.cursor -= 1;
        }

        debug!(
            "History push: cursor={} len={}",
            self.cursor,
            self.snapshots.len()
        );
    }

    /// Step back one snapshot.
    ///
    /// Returns `None` at the oldest snapshot.
    pub fn previous(&mut self) -> Option<&PaintSnapshot> {
        if self.cursor - 1 > 0 {
            self.cursor -= 1;
            debug!("History previous: cursor={}", self.cursor);
            self.snapshots.get(self.cursor - 1)
        } else {
            debug!("History previous: already at oldest");
            None
        }
    }

    /// Step forward one snapshot.
    ///
    /// Returns `None` at the newest snapshot. The bound is checked against the
    /// capacity as well as the stored snapshots; since the queue never holds
    /// more than `capacity` snapshots the second check is the one that bites.
    pub fn next(&mut self) -> Option<&PaintSnapshot> {
        if self.cursor < self.capacity && self.cursor < self.snapshots.len() {
            self.cursor += 1;
            debug!("History next: cursor={}", self.cursor);
            self.snapshots.get(self.cursor - 1)
        } else {
            debug!("History next: already at newest");
            None
        }
    }

    /// Drop every snapshot and move the cursor back to 1.
    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.cursor = 1;
    }

    /// Snapshot at the cursor
    pub fn current(&self) -> Option<&PaintSnapshot> {
        self.snapshots.get(self.cursor - 1)
    }

    /// 1-based cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 1 && !self.snapshots.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.snapshots.len()
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &PaintSnapshot> {
        self.snapshots.iter()
    }
}
