//! Vertex color writes on a [`PaintMesh`].
//!
//! Every write marks the mesh's color attribute dirty. Nothing here triggers
//! a redraw; the render loop picks the flag up with
//! [`PaintMesh::take_colors_dirty`].

use glam::Vec3;
use survey3d_config::Rgb;
use tracing::{debug, warn};

use crate::mesh::PaintMesh;
use crate::spatial::SpatialIndex;
use crate::types::VertexSet;

/// Write `color` to each listed vertex.
///
/// Indices past the end of the color buffer are skipped. Returns the number of
/// vertices written.
pub fn paint_vertices<'a>(
    mesh: &mut PaintMesh,
    vertices: impl IntoIterator<Item = &'a u32>,
    color: Rgb,
) -> usize {
    let rgb = color.to_array();
    let colors = mesh.colors_mut();
    let mut written = 0;
    let mut skipped = 0;

    for &vertex in vertices {
        match colors.get_mut(vertex as usize) {
            Some(slot) => {
                *slot = rgb;
                written += 1;
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(
            "paint_vertices: skipped {} out-of-range vertices (mesh has {})",
            skipped,
            colors.len()
        );
    }
    written
}

/// Paint every triangle touching a world-space sphere.
///
/// Returns the number of vertices written.
pub fn paint_sphere(
    mesh: &mut PaintMesh,
    index: &SpatialIndex,
    center: Vec3,
    radius: f32,
    color: Rgb,
) -> usize {
    let vertices = index.query_sphere_world(mesh, center, radius);
    if vertices.is_empty() {
        return 0;
    }

    let written = paint_vertices(mesh, &vertices, color);
    debug!(
        "paint_sphere: center=({:.3}, {:.3}, {:.3}) r={:.3} color={} -> {} vertices",
        center.x, center.y, center.z, radius, color, written
    );
    written
}

/// Set every vertex to `color`.
pub fn fill_all(mesh: &mut PaintMesh, color: Rgb) {
    mesh.colors_mut().fill(color.to_array());
}

/// Collect every vertex whose color differs from `default_color`.
///
/// Colors are compared by their quantized hex value so float drift from
/// blending or restores does not count as paint.
pub fn collect_non_default_vertices(mesh: &PaintMesh, default_color: Rgb) -> VertexSet {
    let default_hex = default_color.to_hex();
    mesh.colors()
        .iter()
        .enumerate()
        .filter(|&(_, rgb)| Rgb::hex_of(*rgb) != default_hex)
        .map(|(vertex, _)| vertex as u32)
        .collect()
}
