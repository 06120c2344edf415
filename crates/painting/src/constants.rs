/// Maximum triangles stored in a BVH leaf before it is split.
pub const BVH_MAX_LEAF_TRIANGLES: usize = 8;

/// Depth cap for BVH construction. Not a magic number - deep enough for
/// meshes of a few million triangles with the leaf size above.
pub const BVH_MAX_DEPTH: u32 = 32;

/// Epsilon for ray-triangle determinant and hit distance tests.
pub const RAY_EPSILON: f32 = 1e-6;
