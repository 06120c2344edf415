//! Mesh fixtures shared by the unit tests.

use glam::Vec3;

use crate::mesh::PaintMesh;

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Unit icosphere centered at the origin.
pub(crate) fn icosphere(mesh_id: u32, subdivisions: u32) -> PaintMesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let base = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .map(Vec3::normalize);

    let mut triangles: Vec<[Vec3; 3]> = ICOSAHEDRON_FACES
        .iter()
        .map(|f| [base[f[0]], base[f[1]], base[f[2]]])
        .collect();

    for _ in 0..subdivisions {
        triangles = triangles
            .into_iter()
            .flat_map(|[a, b, c]| {
                let ab = ((a + b) * 0.5).normalize();
                let bc = ((b + c) * 0.5).normalize();
                let ca = ((c + a) * 0.5).normalize();
                [[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]
            })
            .collect();
    }

    PaintMesh::from_triangle_soup(mesh_id, triangles.into_iter().flatten().collect())
        .expect("icosphere is well formed")
}

/// Flat square grid in the XY plane (z = 0), centered at the origin,
/// facing +Z. Each cell is split into two triangles.
pub(crate) fn grid(mesh_id: u32, cells: u32, cell_size: f32) -> PaintMesh {
    let half = cells as f32 * cell_size * 0.5;
    let mut positions = Vec::with_capacity((cells * cells * 6) as usize);

    for row in 0..cells {
        for col in 0..cells {
            let x0 = col as f32 * cell_size - half;
            let y0 = row as f32 * cell_size - half;
            let x1 = x0 + cell_size;
            let y1 = y0 + cell_size;

            positions.extend([
                Vec3::new(x0, y0, 0.0),
                Vec3::new(x1, y0, 0.0),
                Vec3::new(x1, y1, 0.0),
                Vec3::new(x0, y0, 0.0),
                Vec3::new(x1, y1, 0.0),
                Vec3::new(x0, y1, 0.0),
            ]);
        }
    }

    PaintMesh::from_triangle_soup(mesh_id, positions).expect("grid is well formed")
}
