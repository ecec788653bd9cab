use stl_io::{IndexedMesh, Triangle, Vector};

use crate::Pos;

/// A list of triangles, each stored as its three corner positions. Vertices
/// are not shared between triangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    triangles: Vec<[Pos; 3]>,
}

impl Mesh {
    pub fn new(triangles: Vec<[Pos; 3]>) -> Self {
        Self { triangles }
    }

    /// Joins meshes into one, keeping the triangles in iteration order.
    pub fn concat(meshes: impl IntoIterator<Item = Mesh>) -> Self {
        let mut out = Self::default();
        for mesh in meshes {
            out.extend(mesh);
        }
        out
    }

    pub fn extend(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    pub fn triangles(&self) -> &[[Pos; 3]] {
        &self.triangles
    }

    /// # Panics
    ///
    /// Panics if `index` is not below [`Mesh::triangle_count`].
    pub fn triangle(&self, index: usize) -> &[Pos; 3] {
        &self.triangles[index]
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Every corner of every triangle, duplicates included.
    pub fn points(&self) -> impl Iterator<Item = &Pos> + '_ {
        self.triangles.iter().flatten()
    }

    /// Unit normal following the right hand rule over the triangle's
    /// corners. Degenerate triangles get a zero normal.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`Mesh::triangle_count`].
    pub fn normal(&self, index: usize) -> Pos {
        let [a, b, c] = self.triangle(index);
        (b - a)
            .cross(&(c - a))
            .try_normalize(0.0)
            .unwrap_or_else(Pos::zeros)
    }

    /// Get the minimum and maximum of each component of every point in the
    /// mesh, or `None` if there are no triangles.
    pub fn bounds(&self) -> Option<(Pos, Pos)> {
        let mut points = self.points();
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), v| {
            (min.inf(v), max.sup(v))
        }))
    }

    pub fn to_stl_triangles(&self) -> Vec<Triangle> {
        (0..self.triangle_count())
            .map(|idx| Triangle {
                normal: to_stl_vector(&self.normal(idx)),
                vertices: self.triangles[idx].map(|v| to_stl_vector(&v)),
            })
            .collect()
    }

    /// Expands an indexed mesh, as returned by [`stl_io::read_stl`], back
    /// into a triangle list.
    pub fn from_indexed(mesh: &IndexedMesh) -> Self {
        let triangles = mesh
            .faces
            .iter()
            .map(|face| {
                face.vertices.map(|idx| {
                    let v = mesh.vertices[idx];
                    Pos::new(v[0], v[1], v[2])
                })
            })
            .collect();
        Self { triangles }
    }
}

fn to_stl_vector(pos: &Pos) -> Vector<f32> {
    Vector::new([pos.x, pos.y, pos.z])
}
