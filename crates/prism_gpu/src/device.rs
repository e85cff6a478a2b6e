//! The device seam.
//!
//! The renderer is written against these traits only. A backend supplies one
//! type per GPU object; each of them releases its object when dropped, so a
//! handle is released exactly once no matter how its owner goes away.
//!
//! Recording follows the explicit-API shape:
//!
//! ```text
//! acquire_commands ─┬─ begin_copy_pass … end
//!                   ├─ acquire_swapchain_image
//!                   └─ begin_render_pass … end
//! submit(commands)
//! ```
use crate::error::GpuResult;
use crate::types::{
    BufferDesc, Extent, IndexFormat, PipelineDesc, RenderPassDesc, SampleCount, SamplerDesc,
    ShaderDesc, ShaderFormats, TextureDesc, TextureFormat, TextureUsage, TransferBufferDesc,
};

pub trait GpuBuffer {
    /// Size in bytes as requested at creation.
    fn size(&self) -> u64;
}

pub trait GpuTexture {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn sample_count(&self) -> SampleCount;
    fn format(&self) -> TextureFormat;
}

pub trait GpuDevice: Sized {
    type Buffer: GpuBuffer;
    type Texture: GpuTexture;
    type Sampler;
    type Shader;
    type Pipeline;
    type TransferBuffer: GpuBuffer;
    type Commands: CommandContext<Self>;

    fn driver_name(&self) -> &str;

    /// Shader encodings this device accepts.
    fn shader_formats(&self) -> ShaderFormats;

    fn supports_texture_format(&self, format: TextureFormat, usage: TextureUsage) -> bool;

    fn swapchain_format(&self) -> TextureFormat;

    /// Window client-area size in physical pixels. Zero while minimized,
    /// even when the backend keeps a 1×1 surface configured.
    fn swapchain_size(&self) -> Extent;

    /// Required multiple for `bytes_per_row` in texture uploads.
    fn texture_row_alignment(&self) -> u32;

    /// Reconfigures the swapchain for a new window size. A zero-sized request
    /// is recorded by [`GpuDevice::swapchain_size`] but leaves the surface
    /// configured.
    fn resize_swapchain(&mut self, width: u32, height: u32) -> GpuResult<()>;

    fn create_shader(&self, desc: &ShaderDesc<'_>) -> GpuResult<Self::Shader>;

    fn create_pipeline(&self, desc: &PipelineDesc<'_, Self::Shader>) -> GpuResult<Self::Pipeline>;

    fn create_texture(&self, desc: &TextureDesc<'_>) -> GpuResult<Self::Texture>;

    fn create_buffer(&self, desc: &BufferDesc<'_>) -> GpuResult<Self::Buffer>;

    fn create_sampler(&self, desc: &SamplerDesc<'_>) -> GpuResult<Self::Sampler>;

    fn create_transfer_buffer(&self, desc: &TransferBufferDesc<'_>) -> GpuResult<Self::TransferBuffer>;

    /// Maps `buffer`, copies `chunks` back to back from offset 0 and unmaps.
    fn write_transfer_buffer(&self, buffer: &mut Self::TransferBuffer, chunks: &[&[u8]]) -> GpuResult<()>;

    fn acquire_commands(&mut self, label: &str) -> GpuResult<Self::Commands>;

    /// Submits without waiting. A swapchain image acquired on `commands` is
    /// presented afterwards.
    fn submit(&mut self, commands: Self::Commands) -> GpuResult<()>;

    /// Blocks until all submitted work has completed.
    fn wait_idle(&self) -> GpuResult<()>;
}

pub trait CommandContext<D: GpuDevice> {
    type CopyPass<'a>: CopyPass<D>
    where
        Self: 'a;
    type Pass<'a>: RenderPassEncoder<D>
    where
        Self: 'a;

    fn begin_copy_pass(&mut self) -> Self::CopyPass<'_>;

    /// `Ok(None)` is the valid "no image this frame" case (occluded or
    /// outdated surface). The context stays usable and must still be
    /// submitted.
    fn acquire_swapchain_image(&mut self) -> GpuResult<Option<Extent>>;

    fn begin_render_pass<'a>(
        &'a mut self,
        desc: &RenderPassDesc<'_, D::Texture>,
    ) -> GpuResult<Self::Pass<'a>>;
}

pub trait CopyPass<D: GpuDevice> {
    fn upload_to_buffer(&mut self, src: &D::TransferBuffer, src_offset: u64, dst: &D::Buffer, size: u64);

    /// Copies a full `width × height × 1` region. `bytes_per_row` must be a
    /// multiple of [`GpuDevice::texture_row_alignment`].
    fn upload_to_texture(
        &mut self,
        src: &D::TransferBuffer,
        bytes_per_row: u32,
        dst: &D::Texture,
        width: u32,
        height: u32,
    );

    fn end(self);
}

pub trait RenderPassEncoder<D: GpuDevice> {
    fn bind_pipeline(&mut self, pipeline: &D::Pipeline);

    fn bind_vertex_buffer(&mut self, slot: u32, buffer: &D::Buffer, offset: u64);

    fn bind_index_buffer(&mut self, buffer: &D::Buffer, format: IndexFormat, offset: u64);

    /// Binds texture/sampler pairs to consecutive fragment sampler slots.
    fn bind_fragment_samplers(&mut self, first_slot: u32, bindings: &[(&D::Texture, &D::Sampler)]) -> GpuResult<()>;

    /// Per-draw uniform data for vertex uniform slot `slot`.
    fn push_vertex_uniform(&mut self, slot: u32, data: &[u8]) -> GpuResult<()>;

    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    );

    fn end(self);
}
