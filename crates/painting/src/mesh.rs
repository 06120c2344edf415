//! Paintable triangle mesh with a per-vertex color attribute.
//!
//! Geometry is stored de-indexed: triangle `t` owns vertices `3t`, `3t + 1`
//! and `3t + 2`, so a triangle corner index and a vertex index are the same
//! thing. Positions and topology never change after construction; only the
//! color attribute is mutable. The color buffer always holds exactly one RGB
//! triple per vertex.

use glam::{Mat4, Vec3};
use thiserror::Error;
use tracing::debug;

/// Errors raised while building a [`PaintMesh`] from loader output.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("Mesh has no triangles")]
    Empty,
    #[error("Index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),
    #[error("Triangle soup vertex count {0} is not a multiple of 3")]
    VertexCountNotTriangles(usize),
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("Position {0} is not finite")]
    NonFinitePosition(usize),
    #[error("Mesh has {0} vertices, more than u32 indices can address")]
    TooManyVertices(usize),
}

/// A triangle mesh that can be vertex-painted.
#[derive(Debug, Clone)]
pub struct PaintMesh {
    /// Identifier of the model this mesh was loaded from
    mesh_id: u32,
    /// Local-space positions, 3 per triangle
    positions: Vec<Vec3>,
    /// RGB color per vertex
    colors: Vec<[f32; 3]>,
    /// Local to world transform
    transform: Mat4,
    /// Whether colors changed since the renderer last uploaded them
    colors_dirty: bool,
}

impl PaintMesh {
    /// Build a mesh from a de-indexed triangle list (3 positions per triangle).
    ///
    /// Colors start zeroed, matching a freshly allocated GPU attribute; the
    /// viewport fills its baseline color right after loading.
    pub fn from_triangle_soup(mesh_id: u32, positions: Vec<Vec3>) -> Result<Self, MeshError> {
        if positions.is_empty() {
            return Err(MeshError::Empty);
        }
        if positions.len() % 3 != 0 {
            return Err(MeshError::VertexCountNotTriangles(positions.len()));
        }
        if u32::try_from(positions.len()).is_err() {
            return Err(MeshError::TooManyVertices(positions.len()));
        }
        if let Some(bad) = positions.iter().position(|p| !p.is_finite()) {
            return Err(MeshError::NonFinitePosition(bad));
        }

        let vertex_count = positions.len();
        debug!(
            "PaintMesh {}: {} triangles, {} vertices",
            mesh_id,
            vertex_count / 3,
            vertex_count
        );

        Ok(Self {
            mesh_id,
            positions,
            colors: vec![[0.0; 3]; vertex_count],
            transform: Mat4::IDENTITY,
            colors_dirty: true,
        })
    }

    /// Build a mesh from indexed geometry, de-indexing it so every triangle
    /// owns its own corners.
    pub fn from_indexed(mesh_id: u32, positions: &[Vec3], indices: &[u32]) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangles(indices.len()));
        }

        let soup = indices
            .iter()
            .map(|&index| {
                positions
                    .get(index as usize)
                    .copied()
                    .ok_or(MeshError::IndexOutOfRange {
                        index,
                        vertex_count: positions.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_triangle_soup(mesh_id, soup)
    }

    /// Set the local to world transform (builder style)
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn id(&self) -> u32 {
        self.mesh_id
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Local-space vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Vertex indices of a triangle
    pub fn triangle_corners(&self, triangle: u32) -> [u32; 3] {
        let base = triangle * 3;
        [base, base + 1, base + 2]
    }

    /// Local-space positions of a triangle
    pub fn triangle_positions(&self, triangle: u32) -> [Vec3; 3] {
        let base = triangle as usize * 3;
        [
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        ]
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    /// World to local transform
    pub fn world_inverse(&self) -> Mat4 {
        self.transform.inverse()
    }

    /// Convert a world-space length to local space.
    ///
    /// Uses the largest axis scale, which is exact for uniform scaling. Under
    /// non-uniform scale the local sphere is inscribed in the world ellipsoid,
    /// so the brush covers less than its radius along the shorter axes.
    pub fn local_length(&self, world_length: f32) -> f32 {
        let (scale, _, _) = self.transform.to_scale_rotation_translation();
        let scale = scale.abs().max_element();
        if scale > 0.0 && scale.is_finite() {
            world_length / scale
        } else {
            world_length
        }
    }

    /// Per-vertex colors
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Flat color attribute, 3 floats per vertex
    pub fn color_attribute(&self) -> &[f32] {
        self.colors.as_flattened()
    }

    /// Color attribute as raw bytes for GPU upload
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn vertex_color(&self, vertex: u32) -> Option<[f32; 3]> {
        self.colors.get(vertex as usize).copied()
    }

    /// Mutable color access; marks the attribute dirty
    pub(crate) fn colors_mut(&mut self) -> &mut [[f32; 3]] {
        self.colors_dirty = true;
        &mut self.colors
    }

    /// Check if colors need re-uploading
    pub fn is_colors_dirty(&self) -> bool {
        self.colors_dirty
    }

    /// Return the dirty flag and clear it
    pub fn take_colors_dirty(&mut self) -> bool {
        std::mem::take(&mut self.colors_dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_indexed_deindexes() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let indices = [0, 1, 2, 0, 2, 3];

        let mesh = PaintMesh::from_indexed(7, &positions, &indices).unwrap();
        assert_eq!(mesh.id(), 7);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_positions(1), [Vec3::ZERO, Vec3::Y, Vec3::Z]);
        assert_eq!(mesh.triangle_corners(1), [3, 4, 5]);
        assert_eq!(mesh.color_attribute().len(), 3 * mesh.vertex_count());
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];

        assert_eq!(
            PaintMesh::from_indexed(0, &positions, &[0, 1]).unwrap_err(),
            MeshError::IndexCountNotTriangles(2)
        );
        assert_eq!(
            PaintMesh::from_indexed(0, &positions, &[0, 1, 9]).unwrap_err(),
            MeshError::IndexOutOfRange {
                index: 9,
                vertex_count: 3
            }
        );
        assert_eq!(
            PaintMesh::from_triangle_soup(0, vec![]).unwrap_err(),
            MeshError::Empty
        );
        assert_eq!(
            PaintMesh::from_triangle_soup(0, vec![Vec3::ZERO, Vec3::X]).unwrap_err(),
            MeshError::VertexCountNotTriangles(2)
        );
        assert_eq!(
            PaintMesh::from_triangle_soup(0, vec![Vec3::ZERO, Vec3::X, Vec3::NAN]).unwrap_err(),
            MeshError::NonFinitePosition(2)
        );
    }

    #[test]
    fn test_color_bytes_match_attribute() {
        let mut mesh =
            PaintMesh::from_triangle_soup(0, vec![Vec3::ZERO, Vec3::X, Vec3::Y]).unwrap();
        mesh.colors_mut()[1] = [1.0, 0.5, 0.25];

        assert_eq!(mesh.color_bytes().len(), 9 * 4);
        assert_eq!(mesh.color_attribute()[3..6], [1.0f32, 0.5, 0.25]);
    }

    #[test]
    fn test_take_colors_dirty() {
        let mut mesh =
            PaintMesh::from_triangle_soup(0, vec![Vec3::ZERO, Vec3::X, Vec3::Y]).unwrap();
        assert!(mesh.take_colors_dirty());
        assert!(!mesh.is_colors_dirty());

        mesh.colors_mut();
        assert!(mesh.take_colors_dirty());
    }

    #[test]
    fn test_local_length_uses_scale() {
        let mesh = PaintMesh::from_triangle_soup(0, vec![Vec3::ZERO, Vec3::X, Vec3::Y])
            .unwrap()
            .with_transform(Mat4::from_scale(Vec3::splat(2.0)));
        assert!((mesh.local_length(1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_local_length_non_uniform_uses_largest_axis() {
        let mesh = PaintMesh::from_triangle_soup(0, vec![Vec3::ZERO, Vec3::X, Vec3::Y])
            .unwrap()
            .with_transform(Mat4::from_scale(Vec3::new(1.0, 4.0, 2.0)));
        // Local radius 0.25 reaches 1.0 along world y but only 0.25 along x
        assert!((mesh.local_length(1.0) - 0.25).abs() < 1e-6);
    }
}
