//! Built-in meshes for when no model file is configured.
//!
//! The cube uses 24 unique vertices (4 per face, so every face gets the full
//! texture) and 36 indices (2 triangles per face × 6 faces).
use super::{Mesh, Vertex};

// face corner UVs in the same order as the face vertices below
const UV: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

pub fn cube() -> Mesh {
    let face = |corners: [[f32; 3]; 4]| -> [Vertex; 4] {
        [0, 1, 2, 3].map(|i| Vertex::new(corners[i], UV[i]))
    };

    const H: f32 = 0.5;

    #[rustfmt::skip]
    let faces = [
        // front  (z+)
        face([[-H, -H,  H], [ H, -H,  H], [ H,  H,  H], [-H,  H,  H]]),
        // back   (z-)
        face([[ H, -H, -H], [-H, -H, -H], [-H,  H, -H], [ H,  H, -H]]),
        // left   (x-)
        face([[-H, -H, -H], [-H, -H,  H], [-H,  H,  H], [-H,  H, -H]]),
        // right  (x+)
        face([[ H, -H,  H], [ H, -H, -H], [ H,  H, -H], [ H,  H,  H]]),
        // top    (y+)
        face([[-H,  H,  H], [ H,  H,  H], [ H,  H, -H], [-H,  H, -H]]),
        // bottom (y-)
        face([[-H, -H, -H], [ H, -H, -H], [ H, -H,  H], [-H, -H,  H]]),
    ];

    let vertices: Vec<Vertex> = faces.iter().flatten().copied().collect();
    let indices: Vec<u32> = (0..6u32)
        .flat_map(|f| {
            let b = f * 4;
            [b, b + 1, b + 2, b + 2, b + 3, b]
        })
        .collect();

    Mesh { vertices, indices }
}

pub fn quad() -> Mesh {
    let vertices = vec![
        Vertex::new([-0.5, -0.5, 0.0], UV[0]),
        Vertex::new([ 0.5, -0.5, 0.0], UV[1]),
        Vertex::new([ 0.5,  0.5, 0.0], UV[2]),
        Vertex::new([-0.5,  0.5, 0.0], UV[3]),
    ];
    Mesh { vertices, indices: vec![0, 1, 2, 2, 3, 0] }
}
