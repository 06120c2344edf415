//! Pointer picking: camera rays and ray-mesh intersection.
//!
//! A pointer position in normalized device coordinates is unprojected through
//! the camera into a world-space ray, carried into the mesh's local space and
//! tested against the mesh's [`SpatialIndex`]. Only the nearest hit is kept.

use glam::{Mat4, Vec2, Vec3};

use crate::constants::RAY_EPSILON;
use crate::mesh::PaintMesh;
use crate::spatial::SpatialIndex;
use crate::types::SurfaceHit;

/// Result of a ray-triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Ray parameter of the intersection point
    pub t: f32,
    /// Barycentric coordinate u (weight for vertex 1)
    pub u: f32,
    /// Barycentric coordinate v (weight for vertex 2)
    pub v: f32,
}

/// Moller-Trumbore ray-triangle intersection.
///
/// Both faces count as hits, so a participant can paint the inside of an open
/// model. Hits behind the ray origin are rejected.
pub fn ray_triangle_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = ray_dir.cross(edge2);
    let det = edge1.dot(pvec);

    // Ray parallel to the triangle plane
    if det.abs() < RAY_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray_origin - v0;

    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray_dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    if t < RAY_EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

/// A ray with an origin and direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transform into another space.
    ///
    /// The direction is not re-normalized, so a parameter `t` names the same
    /// point in both spaces.
    pub fn transformed(&self, matrix: &Mat4) -> Ray {
        Ray {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }
}

/// View and projection of the viewport camera.
///
/// The projection uses OpenGL clip conventions (NDC depth in `[-1, 1]`),
/// matching WebGL renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World to view transform
    pub view: Mat4,
    /// View to clip transform
    pub projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        // Starting view of the survey viewport: slightly above and in front
        // of the model, 75 degree vertical field of view
        Self::perspective(
            Vec3::new(0.0, 0.75, 0.75),
            Vec3::ZERO,
            Vec3::Y,
            75f32.to_radians(),
            1.0,
            0.1,
            1000.0,
        )
    }
}

impl Camera {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    /// Right-handed perspective camera looking from `eye` to `target`.
    pub fn perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_radians: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, up),
            projection: Mat4::perspective_rh_gl(fov_y_radians, aspect, near, far),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// World-space ray through a pointer position in NDC (`[-1, 1]` on both axes,
    /// +y up). The ray starts on the near plane.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(ndc.extend(-1.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }
}

/// Resolve a pointer position to the nearest point on the mesh surface.
///
/// Returns `None` when the ray misses the mesh; that is the common case while
/// the pointer is over the background and is not an error.
pub fn resolve_pointer(
    ndc: Vec2,
    camera: &Camera,
    mesh: &PaintMesh,
    index: &SpatialIndex,
) -> Option<SurfaceHit> {
    let ray = camera.ray_from_ndc(ndc);
    if ray.direction == Vec3::ZERO {
        return None;
    }

    let local_ray = ray.transformed(&mesh.world_inverse());
    let (triangle, hit) = index.raycast(&local_ray)?;

    let local_point = local_ray.at(hit.t);
    let point = mesh.transform().transform_point3(local_point);

    Some(SurfaceHit {
        point,
        local_point,
        triangle,
        corners: mesh.triangle_corners(triangle),
        distance: point.distance(ray.origin),
    })
}
