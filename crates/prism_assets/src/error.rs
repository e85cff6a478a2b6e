use std::path::PathBuf;

use prism_core::{ImageError, MeshError};
use prism_gpu::{GpuError, ShaderFormats};
use thiserror::Error;

/// Usage and content errors raised while loading assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unrecognized shader stage in '{0}' (expected '.vert' or '.frag')")]
    UnrecognizedShaderStage(String),
    #[error("no supported shader formats available (device offers {0:?})")]
    NoSupportedShaderFormat(ShaderFormats),
    #[error("unsupported number of channels: {0} (only 4 is supported)")]
    UnsupportedChannelCount(u32),
    #[error("couldn't read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't load image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("couldn't load model {}: {source}", path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
}
