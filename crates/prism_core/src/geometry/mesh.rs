//! CPU-side triangle-list mesh, loaded once at startup and read-only after.
//!
//! Construction validates the triangle-list invariants so everything
//! downstream (upload, draw) can rely on them:
//! - the index count is a multiple of 3,
//! - every index addresses an existing vertex.
use thiserror::Error;

use super::Vertex;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("mesh has no geometry ({vertices} vertices, {indices} indices)")]
    Empty { vertices: usize, indices: usize },
    #[error("index count {0} is not a multiple of 3")]
    NotTriangleList(usize),
    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("mesh has {0} vertices, more than a 32-bit index can address")]
    TooManyVertices(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub(super) vertices: Vec<Vertex>,
    pub(super) indices: Vec<u32>,
}

/// The only part of a mesh the renderer keeps after upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshCounts {
    pub vertices: u32,
    pub indices: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, MeshError> {
        if vertices.is_empty() || indices.is_empty() {
            return Err(MeshError::Empty {
                vertices: vertices.len(),
                indices: indices.len(),
            });
        }
        if u32::try_from(vertices.len()).is_err() {
            return Err(MeshError::TooManyVertices(vertices.len()));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::NotTriangleList(indices.len()));
        }
        if let Some((position, &index)) = indices
            .iter()
            .enumerate()
            .find(|&(_, &i)| i as usize >= vertices.len())
        {
            return Err(MeshError::IndexOutOfRange {
                position,
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    /// Unit cube centred at the origin with one full texture per face.
    pub fn cube() -> Self {
        super::primitives::cube()
    }

    /// Unit quad in the XY plane (4 vertices, 2 triangles).
    pub fn quad() -> Self {
        super::primitives::quad()
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn counts(&self) -> MeshCounts {
        // both lengths were range-checked in `new`
        MeshCounts {
            vertices: self.vertices.len() as u32,
            indices: self.indices.len() as u32,
        }
    }

    /// Size of the vertex array in bytes (`N × size_of::<Vertex>()`).
    #[inline]
    pub fn vertex_bytes(&self) -> u64 {
        self.vertices.len() as u64 * Vertex::SIZE
    }

    /// Size of the index array in bytes (`M × 4`).
    #[inline]
    pub fn index_bytes(&self) -> u64 {
        self.indices.len() as u64 * std::mem::size_of::<u32>() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Vec<Vertex> {
        vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0], [1.0, 0.0]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 1.0]),
        ]
    }

    #[test]
    fn accepts_valid_triangle() {
        let mesh = Mesh::new(tri(), vec![0, 1, 2]).unwrap();
        assert_eq!(mesh.counts(), MeshCounts { vertices: 3, indices: 3 });
        assert_eq!(mesh.vertex_bytes(), 60);
        assert_eq!(mesh.index_bytes(), 12);
    }

    #[test]
    fn rejects_partial_triangle() {
        assert_eq!(
            Mesh::new(tri(), vec![0, 1]),
            Err(MeshError::NotTriangleList(2))
        );
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = Mesh::new(tri(), vec![0, 1, 3]).unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange { position: 2, index: 3, vertex_count: 3 }
        );
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            Mesh::new(Vec::new(), Vec::new()),
            Err(MeshError::Empty { .. })
        ));
    }
}
