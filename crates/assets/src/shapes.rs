//! Procedural test geometry.

use ember_gpu::{DecodedMesh, Vertex};

fn vertex(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Vertex {
    Vertex {
        position,
        color: [1.0, 1.0, 1.0],
        normal,
        tex_coord,
    }
}

/// An axis-aligned unit cube centered on the origin, 24 vertices with
/// per-face normals, 36 indices.
pub fn unit_cube() -> DecodedMesh {
    const H: f32 = 0.5;

    // face order: +X, -X, +Y, -Y, +Z, -Z
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [1.0, 0.0, 0.0],
            [[H, -H, -H], [H, H, -H], [H, H, H], [H, -H, H]],
        ),
        (
            [-1.0, 0.0, 0.0],
            [[-H, -H, H], [-H, H, H], [-H, H, -H], [-H, -H, -H]],
        ),
        (
            [0.0, 1.0, 0.0],
            [[-H, H, -H], [-H, H, H], [H, H, H], [H, H, -H]],
        ),
        (
            [0.0, -1.0, 0.0],
            [[-H, -H, H], [-H, -H, -H], [H, -H, -H], [H, -H, H]],
        ),
        (
            [0.0, 0.0, 1.0],
            [[-H, -H, H], [H, -H, H], [H, H, H], [-H, H, H]],
        ),
        (
            [0.0, 0.0, -1.0],
            [[H, -H, -H], [-H, -H, -H], [-H, H, -H], [H, H, -H]],
        ),
    ];
    const UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut mesh = DecodedMesh::default();
    for (normal, corners) in faces {
        let base = mesh.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(UVS) {
            mesh.vertices.push(vertex(*corner, normal, uv));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}

/// A unit quad in the XY plane facing +Z.
pub fn unit_quad() -> DecodedMesh {
    const H: f32 = 0.5;
    let normal = [0.0, 0.0, 1.0];
    DecodedMesh {
        vertices: vec![
            vertex([-H, -H, 0.0], normal, [0.0, 1.0]),
            vertex([H, -H, 0.0], normal, [1.0, 1.0]),
            vertex([H, H, 0.0], normal, [1.0, 0.0]),
            vertex([-H, H, 0.0], normal, [0.0, 0.0]),
        ],
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}
