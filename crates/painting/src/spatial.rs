//! Bounding volume hierarchy over a mesh's triangles.
//!
//! The index answers two questions for the viewport:
//! - which triangle corners lie inside the paint brush sphere
//! - which triangle a pointer ray hits first
//!
//! It is built once per [`PaintMesh`], in the mesh's local space. Mesh geometry
//! is immutable, so an index stays valid for the lifetime of the mesh it was
//! built from; color changes never require a rebuild. Querying an index with a
//! different mesh is a caller bug.

use glam::Vec3;
use tracing::debug;

use crate::constants::{BVH_MAX_DEPTH, BVH_MAX_LEAF_TRIANGLES};
use crate::mesh::PaintMesh;
use crate::raycast::{ray_triangle_intersection, Ray, TriangleHit};
use crate::types::VertexSet;

/// Configuration for BVH construction.
#[derive(Debug, Clone)]
pub struct BvhConfig {
    /// Leaves holding this many triangles or fewer are not split.
    pub max_leaf_triangles: usize,
    /// Maximum depth of the hierarchy.
    pub max_depth: u32,
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            max_leaf_triangles: BVH_MAX_LEAF_TRIANGLES,
            max_depth: BVH_MAX_DEPTH,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn from_triangle([a, b, c]: [Vec3; 3]) -> Self {
        Self {
            min: a.min(b).min(c),
            max: a.max(b).max(c),
        }
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index of the axis with the largest extent (0 = x, 1 = y, 2 = z).
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) <= radius * radius
    }

    /// True when every point of the box lies inside the sphere.
    pub fn inside_sphere(&self, center: Vec3, radius: f32) -> bool {
        let farthest = (center - self.min).abs().max((center - self.max).abs());
        farthest.length_squared() <= radius * radius
    }

    /// Distance along the ray at which it enters the box (slab test).
    ///
    /// `inv_dir` is the component-wise reciprocal of the ray direction.
    /// Returns 0 when the origin is inside the box.
    pub fn ray_entry(&self, ray: &Ray, inv_dir: Vec3) -> Option<f32> {
        let t1 = (self.min - ray.origin) * inv_dir;
        let t2 = (self.max - ray.origin) * inv_dir;
        let t_near = t1.min(t2).max_element().max(0.0);
        let t_far = t1.max(t2).min_element();
        (t_far >= t_near).then_some(t_near)
    }
}

/// Closest point on triangle `abc` to `p` (Ericson, Real-Time Collision Detection 5.1.5).
fn closest_point_on_triangle(p: Vec3, [a, b, c]: [Vec3; 3]) -> Vec3 {
    let ab = b - a;
    let ac = c - a;

    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
    }

    let denom = 1.0 / (va + vb + vc);
    a + ab * (vb * denom) + ac * (vc * denom)
}

pub(crate) fn triangle_intersects_sphere(triangle: [Vec3; 3], center: Vec3, radius: f32) -> bool {
    closest_point_on_triangle(center, triangle).distance_squared(center) <= radius * radius
}

#[derive(Debug)]
enum BvhNode {
    Leaf {
        bounds: Aabb,
        triangles: Vec<u32>,
    },
    Internal {
        bounds: Aabb,
        children: Box<[BvhNode; 2]>,
    },
}

impl BvhNode {
    fn bounds(&self) -> &Aabb {
        match self {
            BvhNode::Leaf { bounds, .. } | BvhNode::Internal { bounds, .. } => bounds,
        }
    }
}

/// Per-triangle data used only while building.
struct BuildItem {
    triangle: u32,
    bounds: Aabb,
    centroid: Vec3,
}

/// Triangle BVH for one mesh, in the mesh's local space.
#[derive(Debug)]
pub struct SpatialIndex {
    mesh_id: u32,
    triangles: Vec<[Vec3; 3]>,
    root: BvhNode,
}

impl SpatialIndex {
    /// Build an index with the default configuration.
    pub fn build(mesh: &PaintMesh) -> Self {
        Self::build_with_config(mesh, &BvhConfig::default())
    }

    pub fn build_with_config(mesh: &PaintMesh, config: &BvhConfig) -> Self {
        let triangles: Vec<[Vec3; 3]> = (0..mesh.triangle_count() as u32)
            .map(|t| mesh.triangle_positions(t))
            .collect();

        let mut items: Vec<BuildItem> = triangles
            .iter()
            .enumerate()
            .map(|(i, &tri)| BuildItem {
                triangle: i as u32,
                bounds: Aabb::from_triangle(tri),
                centroid: (tri[0] + tri[1] + tri[2]) / 3.0,
            })
            .collect();

        let leaf_size = config.max_leaf_triangles.max(1);
        let root = Self::build_node(&mut items, 0, leaf_size, config.max_depth);

        debug!(
            "SpatialIndex built for mesh {}: {} triangles",
            mesh.id(),
            triangles.len()
        );

        Self {
            mesh_id: mesh.id(),
            triangles,
            root,
        }
    }

    fn build_node(items: &mut [BuildItem], depth: u32, leaf_size: usize, max_depth: u32) -> BvhNode {
        let bounds = items
            .iter()
            .fold(Aabb::empty(), |acc, item| acc.union(&item.bounds));

        let leaf = |items: &[BuildItem]| BvhNode::Leaf {
            bounds,
            triangles: items.iter().map(|item| item.triangle).collect(),
        };

        if items.len() <= leaf_size || depth >= max_depth {
            return leaf(&*items);
        }

        // Split at the centroid median along the longest axis
        let mut centroid_bounds = Aabb::empty();
        for item in items.iter() {
            centroid_bounds.include_point(item.centroid);
        }
        let axis = centroid_bounds.longest_axis();
        if centroid_bounds.size()[axis] <= 0.0 {
            return leaf(&*items);
        }

        let mid = items.len() / 2;
        items.select_nth_unstable_by(mid, |a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));
        let (left, right) = items.split_at_mut(mid);

        BvhNode::Internal {
            bounds,
            children: Box::new([
                Self::build_node(left, depth + 1, leaf_size, max_depth),
                Self::build_node(right, depth + 1, leaf_size, max_depth),
            ]),
        }
    }

    /// Id of the mesh this index was built from.
    pub fn mesh_id(&self) -> u32 {
        self.mesh_id
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounds of the whole mesh in local space.
    pub fn bounds(&self) -> Aabb {
        *self.root.bounds()
    }

    /// Collect the corners of every triangle touching a local-space sphere.
    pub fn query_sphere(&self, center: Vec3, radius: f32) -> VertexSet {
        let mut corners = VertexSet::new();
        if radius.is_finite() && radius >= 0.0 && center.is_finite() {
            self.query_sphere_node(&self.root, center, radius, &mut corners);
        }
        corners
    }

    /// Same as [`SpatialIndex::query_sphere`], with the sphere given in world
    /// space and mapped through the mesh's inverse transform.
    pub fn query_sphere_world(&self, mesh: &PaintMesh, center: Vec3, radius: f32) -> VertexSet {
        debug_assert_eq!(
            mesh.id(),
            self.mesh_id,
            "spatial index queried with a mesh it was not built from"
        );
        let local_center = mesh.world_inverse().transform_point3(center);
        self.query_sphere(local_center, mesh.local_length(radius))
    }

    fn query_sphere_node(&self, node: &BvhNode, center: Vec3, radius: f32, out: &mut VertexSet) {
        let bounds = node.bounds();
        if !bounds.intersects_sphere(center, radius) {
            return;
        }
        if bounds.inside_sphere(center, radius) {
            Self::collect_all(node, out);
            return;
        }

        match node {
            BvhNode::Leaf { triangles, .. } => {
                for &t in triangles {
                    if triangle_intersects_sphere(self.triangles[t as usize], center, radius) {
                        push_corners(out, t);
                    }
                }
            }
            BvhNode::Internal { children, .. } => {
                for child in children.iter() {
                    self.query_sphere_node(child, center, radius, out);
                }
            }
        }
    }

    fn collect_all(node: &BvhNode, out: &mut VertexSet) {
        match node {
            BvhNode::Leaf { triangles, .. } => {
                for &t in triangles {
                    push_corners(out, t);
                }
            }
            BvhNode::Internal { children, .. } => {
                for child in children.iter() {
                    Self::collect_all(child, out);
                }
            }
        }
    }

    /// Nearest triangle hit along a local-space ray.
    pub fn raycast(&self, ray: &Ray) -> Option<(u32, TriangleHit)> {
        let inv_dir = ray.direction.recip();
        let mut best = None;
        self.raycast_node(&self.root, ray, inv_dir, &mut best);
        best
    }

    fn raycast_node(
        &self,
        node: &BvhNode,
        ray: &Ray,
        inv_dir: Vec3,
        best: &mut Option<(u32, TriangleHit)>,
    ) {
        let Some(entry) = node.bounds().ray_entry(ray, inv_dir) else {
            return;
        };
        if matches!(best, Some((_, hit)) if entry > hit.t) {
            return;
        }

        match node {
            BvhNode::Leaf { triangles, .. } => {
                for &t in triangles {
                    let [v0, v1, v2] = self.triangles[t as usize];
                    let Some(hit) = ray_triangle_intersection(ray.origin, ray.direction, v0, v1, v2)
                    else {
                        continue;
                    };
                    let closer = match best {
                        Some((_, prev)) => hit.t < prev.t,
                        None => true,
                    };
                    if closer {
                        *best = Some((t, hit));
                    }
                }
            }
            BvhNode::Internal { children, .. } => {
                // Visit the nearer child first so the farther one can be pruned
                let [left, right] = &**children;
                let left_entry = left.bounds().ray_entry(ray, inv_dir).unwrap_or(f32::INFINITY);
                let right_entry = right.bounds().ray_entry(ray, inv_dir).unwrap_or(f32::INFINITY);
                let (near, far) = if left_entry <= right_entry {
                    (left, right)
                } else {
                    (right, left)
                };
                self.raycast_node(near, ray, inv_dir, best);
                self.raycast_node(far, ray, inv_dir, best);
            }
        }
    }
}

fn push_corners(out: &mut VertexSet, triangle: u32) {
    let base = triangle * 3;
    out.extend([base, base + 1, base + 2]);
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use super::*;
    use crate::testing::{grid, icosphere};

    fn brute_force_sphere(mesh: &PaintMesh, center: Vec3, radius: f32) -> VertexSet {
        let mut out = VertexSet::new();
        for t in 0..mesh.triangle_count() as u32 {
            if triangle_intersects_sphere(mesh.triangle_positions(t), center, radius) {
                push_corners(&mut out, t);
            }
        }
        out
    }

    #[test]
    fn test_small_sphere_at_center_of_unit_sphere_is_empty() {
        let mesh = icosphere(0, 2);
        let index = SpatialIndex::build(&mesh);

        let result = index.query_sphere(Vec3::ZERO, 0.1);
        assert!(result.is_empty());
    }

    #[test]
    fn test_large_sphere_returns_every_vertex() {
        let mesh = icosphere(0, 2);
        let index = SpatialIndex::build(&mesh);

        let result = index.query_sphere(Vec3::ZERO, 1.5);
        assert_eq!(result.len(), mesh.vertex_count());
        assert_eq!(result, (0..mesh.vertex_count() as u32).collect::<VertexSet>());
    }

    #[test]
    fn test_query_matches_brute_force() {
        let mesh = icosphere(0, 3);
        let index = SpatialIndex::build(&mesh);

        let probes = [
            (Vec3::new(1.0, 0.0, 0.0), 0.05),
            (Vec3::new(0.0, 1.0, 0.0), 0.2),
            (Vec3::new(0.577, 0.577, 0.577), 0.3),
            (Vec3::new(-0.3, 0.9, 0.2), 0.15),
            (Vec3::new(0.0, 0.0, -1.2), 0.25),
            (Vec3::new(3.0, 3.0, 3.0), 0.5),
        ];

        for (center, radius) in probes {
            let expected = brute_force_sphere(&mesh, center, radius);
            assert_eq!(
                index.query_sphere(center, radius),
                expected,
                "mismatch at {center:?} r={radius}"
            );
        }
    }

    #[test]
    fn test_query_returns_whole_triangles() {
        let mesh = grid(0, 4, 1.0);
        let index = SpatialIndex::build(&mesh);

        let result = index.query_sphere(Vec3::new(0.5, 0.5, 0.0), 0.1);
        assert!(!result.is_empty());
        for &corner in &result {
            let base = corner - corner % 3;
            assert!(result.contains(&base));
            assert!(result.contains(&(base + 1)));
            assert!(result.contains(&(base + 2)));
        }
    }

    #[test]
    fn test_world_query_uses_mesh_transform() {
        let offset = Vec3::new(5.0, 0.0, 0.0);
        let mesh = icosphere(0, 2).with_transform(Mat4::from_translation(offset));
        let index = SpatialIndex::build(&mesh);

        let local = index.query_sphere(Vec3::X, 0.2);
        let world = index.query_sphere_world(&mesh, Vec3::X + offset, 0.2);
        assert!(!world.is_empty());
        assert_eq!(world, local);

        // The untransformed position is far from the moved mesh
        assert!(index.query_sphere_world(&mesh, Vec3::X, 0.2).is_empty());
    }

    #[test]
    fn test_invalid_radius_returns_empty() {
        let mesh = icosphere(0, 1);
        let index = SpatialIndex::build(&mesh);
        assert!(index.query_sphere(Vec3::X, -1.0).is_empty());
        assert!(index.query_sphere(Vec3::X, f32::NAN).is_empty());
    }

    #[test]
    fn test_raycast_hits_front_face() {
        let mesh = icosphere(0, 3);
        let index = SpatialIndex::build(&mesh);

        let ray = Ray::new(Vec3::new(0.013, 0.021, 5.0), Vec3::NEG_Z);
        let (triangle, hit) = index.raycast(&ray).expect("ray should hit the sphere");

        let point = ray.at(hit.t);
        assert!(point.z > 0.9 && point.z <= 1.0 + 1e-4);

        // Same answer as testing every triangle
        let mut nearest = f32::INFINITY;
        for t in 0..mesh.triangle_count() as u32 {
            let [a, b, c] = mesh.triangle_positions(t);
            if let Some(h) = ray_triangle_intersection(ray.origin, ray.direction, a, b, c) {
                nearest = nearest.min(h.t);
            }
        }
        assert!((hit.t - nearest).abs() < 1e-5);
        assert!(triangle < mesh.triangle_count() as u32);
    }

    #[test]
    fn test_raycast_miss() {
        let mesh = icosphere(0, 2);
        let index = SpatialIndex::build(&mesh);

        let ray = Ray::new(Vec3::new(0.0, 5.0, 5.0), Vec3::X);
        assert!(index.raycast(&ray).is_none());
    }

    #[test]
    fn test_small_leaves_still_cover_all_triangles() {
        let mesh = grid(0, 8, 0.5);
        let config = BvhConfig {
            max_leaf_triangles: 1,
            max_depth: 64,
        };
        let index = SpatialIndex::build_with_config(&mesh, &config);

        let all = index.query_sphere(Vec3::ZERO, 100.0);
        assert_eq!(all.len(), mesh.vertex_count());
    }
}
