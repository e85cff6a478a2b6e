//! prism_assets: the loaders that turn files under `Content/` into data the
//! renderer can upload.
//!
//! Every loader takes a [`ContentPaths`](prism_core::ContentPaths) at
//! construction; none of them reads global state.

pub mod error;
pub mod image;
pub mod mesh;
pub mod shader;

pub use error::AssetError;
pub use self::image::ImageLoader;
pub use mesh::MeshLoader;
pub use shader::{ResolvedShader, ShaderLoader};
