use crate::{mesh::Mesh, Pos};

/// Corners of the unit cube.
pub const CUBE_VERTICES: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Two triangles per side, indexing [`CUBE_VERTICES`]. Wound counter
/// clockwise when viewed from outside the cube.
pub const CUBE_FACES: [[u32; 3]; 12] = [
    [0, 3, 1],
    [1, 3, 2],
    [0, 4, 7],
    [0, 7, 3],
    [4, 5, 6],
    [4, 6, 7],
    [5, 1, 2],
    [5, 2, 6],
    [2, 3, 6],
    [3, 7, 6],
    [0, 1, 5],
    [0, 5, 4],
];

/// Creates a cube by scaling the unit cube by `multiplier` and then moving it
/// by `offset`, both per axis.
pub fn cube_mesh(multiplier: Pos, offset: Pos) -> Mesh {
    let triangles = CUBE_FACES
        .iter()
        .map(|&face| face.map(|idx| Pos::from(CUBE_VERTICES[idx as usize])))
        .map(|triangle| triangle.map(|v| v.component_mul(&multiplier) + offset))
        .collect();
    Mesh::new(triangles)
}
