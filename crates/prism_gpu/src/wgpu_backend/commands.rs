use std::sync::Arc;

use crate::device::{CommandContext, CopyPass, RenderPassEncoder};
use crate::error::{GpuError, GpuResult};
use crate::types::{ColorView, Extent, IndexFormat, RenderPassDesc};

use super::context::WgpuContext;
use super::conv;
use super::resources::{PipelineInner, WgpuBuffer, WgpuPipeline, WgpuSampler, WgpuTexture, WgpuTransferBuffer};
use super::{WgpuDevice, UNIFORM_SLOT_SIZE};

struct Frame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

/// One frame's worth of recorded work plus, once acquired, the swapchain
/// image it will present.
pub struct WgpuCommands {
    encoder: wgpu::CommandEncoder,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    surface: Arc<wgpu::Surface<'static>>,
    config: wgpu::SurfaceConfiguration,
    frame: Option<Frame>,
}

impl WgpuCommands {
    pub(super) fn new(ctx: &WgpuContext, label: &str) -> Self {
        let encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
        Self {
            encoder,
            device: Arc::clone(&ctx.device),
            queue: Arc::clone(&ctx.queue),
            surface: Arc::clone(&ctx.surface),
            config: ctx.config.clone(),
            frame: None,
        }
    }

    /// Submits the encoder and hands back the image to present.
    pub(super) fn submit(self, queue: &wgpu::Queue) -> Option<wgpu::SurfaceTexture> {
        queue.submit(Some(self.encoder.finish()));
        self.frame.map(|f| f.texture)
    }
}

fn color_view<'v>(view: ColorView<'v, WgpuTexture>, frame: Option<&'v Frame>) -> GpuResult<&'v wgpu::TextureView> {
    match view {
        ColorView::Texture(t) => Ok(&t.view),
        ColorView::Swapchain => frame.map(|f| &f.view).ok_or(GpuError::NoSwapchainImage),
    }
}

impl CommandContext<WgpuDevice> for WgpuCommands {
    type CopyPass<'a> = WgpuCopyPass<'a>;
    type Pass<'a> = WgpuRenderPass<'a>;

    fn begin_copy_pass(&mut self) -> WgpuCopyPass<'_> {
        WgpuCopyPass { encoder: &mut self.encoder }
    }

    fn acquire_swapchain_image(&mut self) -> GpuResult<Option<Extent>> {
        match self.surface.get_current_texture() {
            Ok(texture) => {
                if texture.suboptimal {
                    log::debug!("swapchain image is suboptimal");
                }
                let extent = Extent::new(texture.texture.width(), texture.texture.height());
                let view = texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
                self.frame = Some(Frame { texture, view });
                Ok(Some(extent))
            }
            Err(wgpu::SurfaceError::Timeout) => Ok(None),
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                // the next acquisition gets a fresh image
                self.surface.configure(&self.device, &self.config);
                Ok(None)
            }
            Err(err) => Err(GpuError::SwapchainAcquire(err.to_string())),
        }
    }

    fn begin_render_pass<'a>(&'a mut self, desc: &RenderPassDesc<'_, WgpuTexture>) -> GpuResult<WgpuRenderPass<'a>> {
        let Self { encoder, device, queue, frame, .. } = self;
        let frame = frame.as_ref();

        let view = color_view(desc.color.view, frame)?;
        let resolve_target = desc.color.resolve.map(|r| color_view(r, frame)).transpose()?;

        let depth_stencil_attachment = desc.depth_stencil.as_ref().map(|ds| {
            wgpu::RenderPassDepthStencilAttachment {
                view: &ds.texture.view,
                depth_ops: Some(conv::operations(ds.depth_load, ds.depth_store, |d| d)),
                stencil_ops: ds
                    .texture
                    .format
                    .has_stencil()
                    .then(|| conv::operations(ds.stencil_load, ds.stencil_store, |s| s)),
            }
        });

        let pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(desc.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: conv::operations(desc.color.load, desc.color.store, conv::color),
            })],
            depth_stencil_attachment,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        Ok(WgpuRenderPass {
            pass,
            device: &**device,
            queue: &**queue,
            pipeline: None,
        })
    }
}

pub struct WgpuCopyPass<'a> {
    encoder: &'a mut wgpu::CommandEncoder,
}

impl CopyPass<WgpuDevice> for WgpuCopyPass<'_> {
    fn upload_to_buffer(&mut self, src: &WgpuTransferBuffer, src_offset: u64, dst: &WgpuBuffer, size: u64) {
        self.encoder.copy_buffer_to_buffer(&src.buffer, src_offset, &dst.buffer, 0, size);
    }

    fn upload_to_texture(
        &mut self,
        src: &WgpuTransferBuffer,
        bytes_per_row: u32,
        dst: &WgpuTexture,
        width: u32,
        height: u32,
    ) {
        self.encoder.copy_buffer_to_texture(
            wgpu::ImageCopyBuffer {
                buffer: &src.buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::ImageCopyTexture {
                texture: &dst.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    // copies are recorded straight into the encoder
    fn end(self) {}
}

pub struct WgpuRenderPass<'a> {
    pass: wgpu::RenderPass<'a>,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    pipeline: Option<Arc<PipelineInner>>,
}

impl RenderPassEncoder<WgpuDevice> for WgpuRenderPass<'_> {
    fn bind_pipeline(&mut self, pipeline: &WgpuPipeline) {
        self.pass.set_pipeline(&pipeline.inner.pipeline);
        self.pass.set_bind_group(0, &pipeline.inner.uniform_group, &[]);
        self.pipeline = Some(Arc::clone(&pipeline.inner));
    }

    fn bind_vertex_buffer(&mut self, slot: u32, buffer: &WgpuBuffer, offset: u64) {
        self.pass.set_vertex_buffer(slot, buffer.buffer.slice(offset..));
    }

    fn bind_index_buffer(&mut self, buffer: &WgpuBuffer, format: IndexFormat, offset: u64) {
        self.pass
            .set_index_buffer(buffer.buffer.slice(offset..), conv::index_format(format));
    }

    fn bind_fragment_samplers(&mut self, first_slot: u32, bindings: &[(&WgpuTexture, &WgpuSampler)]) -> GpuResult<()> {
        let pipeline = self
            .pipeline
            .as_ref()
            .ok_or_else(|| GpuError::creation("sampler bind group", "no pipeline bound"))?;
        if first_slot != 0 || bindings.len() as u32 != pipeline.sampler_count {
            return Err(GpuError::creation(
                "sampler bind group",
                format!(
                    "pipeline declares {} samplers, got {} starting at slot {first_slot}",
                    pipeline.sampler_count,
                    bindings.len()
                ),
            ));
        }
        let entries: Vec<wgpu::BindGroupEntry> = bindings
            .iter()
            .enumerate()
            .flat_map(|(i, (texture, sampler))| {
                let i = i as u32;
                [
                    wgpu::BindGroupEntry {
                        binding: 2 * i,
                        resource: wgpu::BindingResource::TextureView(&texture.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2 * i + 1,
                        resource: wgpu::BindingResource::Sampler(&sampler.sampler),
                    },
                ]
            })
            .collect();
        let group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Fragment Samplers"),
            layout: &pipeline.sampler_layout,
            entries: &entries,
        });
        self.pass.set_bind_group(1, &group, &[]);
        Ok(())
    }

    fn push_vertex_uniform(&mut self, slot: u32, data: &[u8]) -> GpuResult<()> {
        let pipeline = self
            .pipeline
            .as_ref()
            .ok_or_else(|| GpuError::creation("vertex uniform", "no pipeline bound"))?;
        let buffer = pipeline.uniform_buffers.get(slot as usize).ok_or_else(|| {
            GpuError::creation("vertex uniform", format!("pipeline has no uniform slot {slot}"))
        })?;
        if data.len() as u64 > UNIFORM_SLOT_SIZE {
            return Err(GpuError::creation(
                "vertex uniform",
                format!("{} bytes exceed the {UNIFORM_SLOT_SIZE}-byte slot", data.len()),
            ));
        }
        self.queue.write_buffer(buffer, 0, data);
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) {
        self.pass.draw_indexed(
            first_index..first_index + index_count,
            vertex_offset,
            first_instance..first_instance + instance_count,
        );
    }

    // dropping the wgpu pass ends it
    fn end(self) {}
}
