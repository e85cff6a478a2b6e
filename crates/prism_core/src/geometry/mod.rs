pub mod mesh;
pub mod primitives;
pub mod vertex;

pub use mesh::{Mesh, MeshCounts, MeshError};
pub use vertex::Vertex;
