use thiserror::Error;

use crate::types::ShaderFormat;

/// Device and platform failures. Each variant carries the backend's own
/// message so the log line explains what the driver rejected.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter was found")]
    AdapterUnavailable,
    #[error("couldn't request GPU device: {0}")]
    DeviceRequest(String),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("couldn't create {what}: {reason}")]
    ResourceCreation { what: String, reason: String },
    #[error("couldn't map transfer buffer: {0}")]
    MapFailed(String),
    #[error("command submission was rejected: {0}")]
    Submission(String),
    #[error("couldn't acquire swapchain image: {0}")]
    SwapchainAcquire(String),
    #[error("{backend} backend can't ingest {format:?} shaders")]
    UnsupportedShaderFormat {
        format: ShaderFormat,
        backend: &'static str,
    },
    #[error("render pass targets the swapchain but no image was acquired")]
    NoSwapchainImage,
}

impl GpuError {
    pub(crate) fn creation(what: impl Into<String>, reason: impl ToString) -> Self {
        Self::ResourceCreation {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

pub type GpuResult<T> = Result<T, GpuError>;
