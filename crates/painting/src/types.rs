use std::collections::BTreeSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Set of de-indexed vertex (triangle corner) indices.
///
/// Ordered so a saved field's vertex list is stable across runs.
pub type VertexSet = BTreeSet<u32>;

/// Perceived center of a projected field, in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HotSpot {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl HotSpot {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<Vec3> for HotSpot {
    fn from(point: Vec3) -> Self {
        Self {
            x: point.x,
            y: point.y,
            z: point.z,
        }
    }
}

/// Nearest intersection of a pointer ray with the active mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Hit point in world space
    pub point: Vec3,
    /// Hit point in mesh local space
    pub local_point: Vec3,
    /// Index of the triangle that was hit
    pub triangle: u32,
    /// De-indexed vertex indices of that triangle
    pub corners: [u32; 3],
    /// World-space distance from the ray origin
    pub distance: f32,
}
