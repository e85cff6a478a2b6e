//! OBJ import.
//!
//! Faces are triangulated and every model in the file is flattened into one
//! vertex/index stream, with each model's indices rebased past the vertices
//! that came before it. Texture coordinates are taken as stored in the file;
//! vertices without them get (0, 0).
use std::path::Path;

use prism_core::{ContentPaths, Mesh, Vertex};

use crate::error::AssetError;

#[derive(Debug, Clone)]
pub struct MeshLoader {
    paths: ContentPaths,
}

impl MeshLoader {
    pub fn new(paths: ContentPaths) -> Self {
        Self { paths }
    }

    /// Loads `Content/Models/<file_name>`.
    pub fn load(&self, file_name: &str) -> Result<Mesh, AssetError> {
        load_path(&self.paths.model(file_name))
    }
}

pub fn load_path(path: &Path) -> Result<Mesh, AssetError> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj(path, &options).map_err(|source| AssetError::ModelLoad {
        path: path.to_path_buf(),
        source,
    })?;
    if let Err(err) = materials {
        // materials are not used for rendering
        log::debug!("ignoring materials of {}: {err}", path.display());
    }

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let base = vertices.len() as u32;
        let count = mesh.positions.len() / 3;
        let has_uv = mesh.texcoords.len() >= count * 2;

        vertices.extend((0..count).map(|i| {
            let position = [
                mesh.positions[3 * i],
                mesh.positions[3 * i + 1],
                mesh.positions[3 * i + 2],
            ];
            let uv = if has_uv {
                [mesh.texcoords[2 * i], mesh.texcoords[2 * i + 1]]
            } else {
                [0.0, 0.0]
            };
            Vertex::new(position, uv)
        }));
        indices.extend(mesh.indices.iter().map(|&i| base + i));
    }

    let mesh = Mesh::new(vertices, indices)?;
    let counts = mesh.counts();
    log::info!(
        "Loaded model {} ({} objects, {} vertices, {} indices)",
        path.display(),
        models.len(),
        counts.vertices,
        counts.indices
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn write_model(dir: &str, file: &str, obj: &str) -> MeshLoader {
        let paths = ContentPaths::new(fixtures::dir(dir));
        std::fs::create_dir_all(paths.models_dir()).unwrap();
        std::fs::write(paths.model(file), obj).unwrap();
        MeshLoader::new(paths)
    }

    #[test]
    fn quad_is_triangulated() {
        let loader = write_model(
            "mesh_quad",
            "quad.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
             f 1/1 2/2 3/3 4/4\n",
        );
        let mesh = loader.load("quad.obj").unwrap();
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.indices().len(), 6);
        assert_eq!(mesh.vertices()[0], Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0]));
        assert_eq!(mesh.vertices()[2], Vertex::new([1.0, 1.0, 0.0], [1.0, 1.0]));
    }

    #[test]
    fn texcoords_pass_through_unchanged() {
        let loader = write_model(
            "mesh_uv",
            "uv.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vt 0.25 0.25\nvt 0.75 0.25\nvt 0.25 0.5\n\
             f 1/1 2/2 3/3\n",
        );
        let mesh = loader.load("uv.obj").unwrap();
        let uvs: Vec<[f32; 2]> = mesh.vertices().iter().map(|v| v.uv).collect();
        assert_eq!(uvs, [[0.25, 0.25], [0.75, 0.25], [0.25, 0.5]]);
    }

    #[test]
    fn objects_are_rebased() {
        let loader = write_model(
            "mesh_multi",
            "two.obj",
            "o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
             o b\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        );
        let mesh = loader.load("two.obj").unwrap();
        assert_eq!(mesh.vertices().len(), 6);
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.vertices()[3].position, [0.0, 0.0, 1.0]);
        // no vt lines
        assert!(mesh.vertices().iter().all(|v| v.uv == [0.0, 0.0]));
    }

    #[test]
    fn missing_file_is_model_error() {
        let loader = MeshLoader::new(ContentPaths::new(fixtures::dir("mesh_missing")));
        assert!(matches!(loader.load("absent.obj"), Err(AssetError::ModelLoad { .. })));
    }

    #[test]
    fn empty_file_is_mesh_error() {
        let loader = write_model("mesh_empty", "empty.obj", "# nothing\n");
        assert!(matches!(loader.load("empty.obj"), Err(AssetError::Mesh(_))));
    }
}
