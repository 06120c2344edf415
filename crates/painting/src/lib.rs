//! Survey3d mesh painting core - vertex colors, brush queries and undo/redo
//!
//! This crate provides the painting side of the survey viewport:
//! - [`mesh`] - De-indexed triangle mesh with a per-vertex color buffer
//! - [`spatial`] - Bounding volume hierarchy for sphere and ray queries
//! - [`raycast`] - Camera rays and pointer-to-surface resolution
//! - [`painter`] - Vertex color writes and painted-set extraction
//! - [`history`] - Gesture snapshots and the bounded undo queue
//! - [`tool`] - Active tool and camera input gating
//! - [`brush`] - Brush radius and hover state
//! - [`session`] - Viewport session tying the above to pointer input
//!
//! The crate is renderer-agnostic. A render loop uploads
//! [`PaintMesh::color_bytes`] whenever [`PaintMesh::take_colors_dirty`]
//! reports a change.

pub mod brush;
pub mod constants;
pub mod history;
pub mod mesh;
pub mod painter;
pub mod raycast;
pub mod session;
pub mod spatial;
pub mod tool;
pub mod types;

#[cfg(test)]
mod testing;

pub use brush::*;
pub use constants::*;
pub use history::*;
pub use mesh::*;
pub use painter::*;
pub use raycast::*;
pub use session::*;
pub use spatial::*;
pub use tool::*;
pub use types::*;

pub use survey3d_config::{Rgb, ViewportConfig};
