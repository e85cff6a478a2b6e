use prism_assets::AssetError;
use prism_gpu::GpuError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("couldn't find a suitable depth stencil format")]
    NoDepthFormat,
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
}
