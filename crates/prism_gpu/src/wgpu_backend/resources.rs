//! Owning wrappers around wgpu objects. wgpu destroys an object when its
//! last handle drops, so `Drop` on these types is the release.
use std::sync::Arc;

use crate::device::{GpuBuffer, GpuTexture};
use crate::types::{SampleCount, ShaderResources, ShaderStage, TextureFormat};

pub struct WgpuBuffer {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) size: u64,
}

impl GpuBuffer for WgpuBuffer {
    fn size(&self) -> u64 {
        self.size
    }
}

pub struct WgpuTexture {
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) format: TextureFormat,
    pub(crate) sample_count: SampleCount,
}

impl GpuTexture for WgpuTexture {
    fn width(&self) -> u32 {
        self.texture.width()
    }

    fn height(&self) -> u32 {
        self.texture.height()
    }

    fn sample_count(&self) -> SampleCount {
        self.sample_count
    }

    fn format(&self) -> TextureFormat {
        self.format
    }
}

pub struct WgpuSampler {
    pub(crate) sampler: wgpu::Sampler,
}

pub struct WgpuShader {
    pub(crate) module: wgpu::ShaderModule,
    pub(crate) entry_point: String,
    pub(crate) stage: ShaderStage,
    pub(crate) resources: ShaderResources,
}

/// Push-uniform emulation: one small uniform buffer per declared vertex
/// uniform slot, all bound through group 0.
pub(crate) struct PipelineInner {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffers: Vec<wgpu::Buffer>,
    pub(crate) uniform_group: wgpu::BindGroup,
    pub(crate) sampler_layout: wgpu::BindGroupLayout,
    pub(crate) sampler_count: u32,
}

pub struct WgpuPipeline {
    pub(crate) inner: Arc<PipelineInner>,
}

pub struct WgpuTransferBuffer {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) size: u64,
    /// Created mapped; cleared once written and unmapped.
    pub(crate) mapped: bool,
}

impl GpuBuffer for WgpuTransferBuffer {
    fn size(&self) -> u64 {
        self.size
    }
}
