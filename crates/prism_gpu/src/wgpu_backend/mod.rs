//! `wgpu` implementation of the device traits.
//!
//! | Concept            | wgpu realisation                                          |
//! |--------------------|-----------------------------------------------------------|
//! | transfer buffer    | `MAP_WRITE | COPY_SRC` buffer created mapped, written once |
//! | copy pass          | copies recorded on the frame's `CommandEncoder`           |
//! | push uniform       | `queue.write_buffer` into a per-slot uniform (group 0)    |
//! | fragment samplers  | group 1, texture at binding `2i`, sampler at `2i + 1`     |
//! | swapchain image    | `SurfaceTexture`, presented right after submit            |
mod commands;
mod context;
mod conv;
mod resources;

use std::borrow::Cow;
use std::sync::Arc;

pub use commands::{WgpuCommands, WgpuCopyPass, WgpuRenderPass};
pub use context::WgpuContext;
pub use resources::{WgpuBuffer, WgpuPipeline, WgpuSampler, WgpuShader, WgpuTexture, WgpuTransferBuffer};

use resources::PipelineInner;

use crate::device::GpuDevice;
use crate::error::{GpuError, GpuResult};
use crate::types::{
    BufferDesc, Extent, PipelineDesc, SamplerDesc, ShaderDesc, ShaderFormat, ShaderFormats,
    ShaderStage, TextureDesc, TextureFormat, TextureUsage, TransferBufferDesc,
};

/// Bytes reserved for each emulated push-uniform slot.
pub const UNIFORM_SLOT_SIZE: u64 = 256;

pub struct WgpuDevice {
    context: WgpuContext,
    driver_name: String,
}

impl WgpuDevice {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> GpuResult<Self> {
        let context = WgpuContext::new(target, width, height, vsync).await?;
        let info = context.adapter.get_info();
        let driver_name = format!("{} ({:?})", info.name, info.backend);
        Ok(Self { context, driver_name })
    }

    pub fn context(&self) -> &WgpuContext {
        &self.context
    }

    /// Runs `f` inside validation and out-of-memory error scopes so a
    /// rejected creation comes back as an error instead of a panic.
    fn scoped<T>(&self, what: &str, f: impl FnOnce(&wgpu::Device) -> T) -> GpuResult<T> {
        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f(device);
        let validation = pollster::block_on(device.pop_error_scope());
        let oom = pollster::block_on(device.pop_error_scope());
        match validation.or(oom) {
            Some(err) => Err(GpuError::creation(what, err)),
            None => Ok(value),
        }
    }

    fn shader_source<'a>(desc: &ShaderDesc<'a>) -> GpuResult<wgpu::ShaderSource<'a>> {
        match desc.format {
            ShaderFormat::Wgsl => {
                let text = std::str::from_utf8(desc.code)
                    .map_err(|e| GpuError::creation(desc.label, format!("WGSL is not UTF-8: {e}")))?;
                Ok(wgpu::ShaderSource::Wgsl(Cow::Borrowed(text)))
            }
            #[cfg(feature = "spirv")]
            ShaderFormat::Spirv => Ok(wgpu::util::make_spirv(desc.code)),
            format => Err(GpuError::UnsupportedShaderFormat { format, backend: "wgpu" }),
        }
    }
}

fn uniform_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn sampler_layout_entries(count: u32) -> Vec<wgpu::BindGroupLayoutEntry> {
    (0..count)
        .flat_map(|i| {
            [
                wgpu::BindGroupLayoutEntry {
                    binding: 2 * i,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2 * i + 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ]
        })
        .collect()
}

impl GpuDevice for WgpuDevice {
    type Buffer = WgpuBuffer;
    type Texture = WgpuTexture;
    type Sampler = WgpuSampler;
    type Shader = WgpuShader;
    type Pipeline = WgpuPipeline;
    type TransferBuffer = WgpuTransferBuffer;
    type Commands = WgpuCommands;

    fn driver_name(&self) -> &str {
        &self.driver_name
    }

    fn shader_formats(&self) -> ShaderFormats {
        if cfg!(feature = "spirv") {
            ShaderFormats::WGSL | ShaderFormats::SPIRV
        } else {
            ShaderFormats::WGSL
        }
    }

    fn supports_texture_format(&self, format: TextureFormat, usage: TextureUsage) -> bool {
        if format == TextureFormat::Depth32FloatStencil8
            && !self.context.device.features().contains(wgpu::Features::DEPTH32FLOAT_STENCIL8)
        {
            return false;
        }
        let features = self.context.adapter.get_texture_format_features(conv::to_wgpu_format(format));
        features.allowed_usages.contains(conv::texture_usages(usage))
    }

    fn swapchain_format(&self) -> TextureFormat {
        // the surface format was picked from the mappable set in `WgpuContext::new`
        conv::from_wgpu_format(self.context.config.format).unwrap_or(TextureFormat::Bgra8UnormSrgb)
    }

    fn swapchain_size(&self) -> Extent {
        self.context.window_size
    }

    fn texture_row_alignment(&self) -> u32 {
        wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
    }

    fn resize_swapchain(&mut self, width: u32, height: u32) -> GpuResult<()> {
        self.context.resize(width, height);
        Ok(())
    }

    fn create_shader(&self, desc: &ShaderDesc<'_>) -> GpuResult<WgpuShader> {
        if desc.resources.storage_buffers > 0 || desc.resources.storage_textures > 0 {
            return Err(GpuError::creation(desc.label, "storage bindings are not supported"));
        }
        if desc.stage == ShaderStage::Fragment && desc.resources.uniform_buffers > 0 {
            return Err(GpuError::creation(desc.label, "fragment uniforms are not supported"));
        }
        let source = Self::shader_source(desc)?;
        let module = self.scoped(desc.label, |device| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(desc.label),
                source,
            })
        })?;
        Ok(WgpuShader {
            module,
            entry_point: desc.entry_point.to_owned(),
            stage: desc.stage,
            resources: desc.resources,
        })
    }

    fn create_pipeline(&self, desc: &PipelineDesc<'_, WgpuShader>) -> GpuResult<WgpuPipeline> {
        let vs = desc.vertex_shader;
        let fs = desc.fragment_shader;
        if vs.stage != ShaderStage::Vertex || fs.stage != ShaderStage::Fragment {
            return Err(GpuError::creation(desc.label, "shader stages don't match their slots"));
        }

        let uniform_count = vs.resources.uniform_buffers;
        let uniform_entries: Vec<_> = (0..uniform_count).map(uniform_layout_entry).collect();
        let sampler_count = fs.resources.samplers;

        let inner = self.scoped(desc.label, |device| {
            let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Vertex Uniforms"),
                entries: &uniform_entries,
            });
            let sampler_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Layout: Fragment Samplers"),
                entries: &sampler_layout_entries(sampler_count),
            });

            let uniform_buffers: Vec<wgpu::Buffer> = (0..uniform_count)
                .map(|slot| {
                    device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(&format!("Vertex Uniform {slot}")),
                        size: UNIFORM_SLOT_SIZE,
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    })
                })
                .collect();
            let uniform_bindings: Vec<_> = uniform_buffers
                .iter()
                .enumerate()
                .map(|(i, buffer)| wgpu::BindGroupEntry {
                    binding: i as u32,
                    resource: buffer.as_entire_binding(),
                })
                .collect();
            let uniform_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Vertex Uniforms"),
                layout: &uniform_layout,
                entries: &uniform_bindings,
            });

            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(desc.label),
                bind_group_layouts: &[&uniform_layout, &sampler_layout],
                push_constant_ranges: &[],
            });

            let attributes: Vec<Vec<wgpu::VertexAttribute>> = desc
                .vertex_buffers
                .iter()
                .map(|vb| {
                    vb.attributes
                        .iter()
                        .map(|a| wgpu::VertexAttribute {
                            format: conv::vertex_format(a.format),
                            offset: a.offset,
                            shader_location: a.location,
                        })
                        .collect()
                })
                .collect();
            let buffers: Vec<wgpu::VertexBufferLayout> = desc
                .vertex_buffers
                .iter()
                .zip(&attributes)
                .map(|(vb, attrs)| wgpu::VertexBufferLayout {
                    array_stride: vb.stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: attrs,
                })
                .collect();

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &vs.module,
                    entry_point: Some(vs.entry_point.as_str()),
                    buffers: &buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fs.module,
                    entry_point: Some(fs.entry_point.as_str()),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: conv::to_wgpu_format(desc.color_format),
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: conv::cull(desc.cull_mode),
                    ..Default::default()
                },
                depth_stencil: desc.depth_stencil.map(|ds| wgpu::DepthStencilState {
                    format: conv::to_wgpu_format(ds.format),
                    depth_write_enabled: ds.write_enabled,
                    depth_compare: conv::compare(ds.compare),
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: desc.sample_count.count(),
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            });

            PipelineInner {
                pipeline,
                uniform_buffers,
                uniform_group,
                sampler_layout,
                sampler_count,
            }
        })?;

        Ok(WgpuPipeline { inner: Arc::new(inner) })
    }

    fn create_texture(&self, desc: &TextureDesc<'_>) -> GpuResult<WgpuTexture> {
        if desc.width == 0 || desc.height == 0 {
            return Err(GpuError::creation(
                desc.label,
                format!("zero-sized texture ({}x{})", desc.width, desc.height),
            ));
        }
        let texture = self.scoped(desc.label, |device| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(desc.label),
                size: wgpu::Extent3d {
                    width: desc.width,
                    height: desc.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: desc.sample_count.count(),
                dimension: wgpu::TextureDimension::D2,
                format: conv::to_wgpu_format(desc.format),
                usage: conv::texture_usages(desc.usage),
                view_formats: &[],
            })
        })?;
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(WgpuTexture {
            texture,
            view,
            format: desc.format,
            sample_count: desc.sample_count,
        })
    }

    fn create_buffer(&self, desc: &BufferDesc<'_>) -> GpuResult<WgpuBuffer> {
        let buffer = self.scoped(desc.label, |device| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(desc.label),
                size: desc.size,
                usage: conv::buffer_usages(desc.usage),
                mapped_at_creation: false,
            })
        })?;
        Ok(WgpuBuffer { buffer, size: desc.size })
    }

    fn create_sampler(&self, desc: &SamplerDesc<'_>) -> GpuResult<WgpuSampler> {
        let sampler = self.scoped(desc.label, |device| {
            device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some(desc.label),
                address_mode_u: conv::address(desc.address_mode),
                address_mode_v: conv::address(desc.address_mode),
                address_mode_w: conv::address(desc.address_mode),
                mag_filter: conv::filter(desc.mag_filter),
                min_filter: conv::filter(desc.min_filter),
                mipmap_filter: conv::filter(desc.mipmap_filter),
                ..Default::default()
            })
        })?;
        Ok(WgpuSampler { sampler })
    }

    fn create_transfer_buffer(&self, desc: &TransferBufferDesc<'_>) -> GpuResult<WgpuTransferBuffer> {
        // mapped-at-creation buffers must be a multiple of COPY_BUFFER_ALIGNMENT
        let padded = desc.size.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT);
        let buffer = self.scoped(desc.label, |device| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(desc.label),
                size: padded,
                usage: wgpu::BufferUsages::MAP_WRITE | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: true,
            })
        })?;
        Ok(WgpuTransferBuffer { buffer, size: desc.size, mapped: true })
    }

    fn write_transfer_buffer(&self, buffer: &mut WgpuTransferBuffer, chunks: &[&[u8]]) -> GpuResult<()> {
        if !buffer.mapped {
            return Err(GpuError::MapFailed("transfer buffer was already written and unmapped".into()));
        }
        let total: usize = chunks.iter().map(|c| c.len()).sum();
        if total as u64 > buffer.size {
            return Err(GpuError::MapFailed(format!(
                "{total} bytes don't fit in a {}-byte transfer buffer",
                buffer.size
            )));
        }
        {
            let mut mapped = buffer.buffer.slice(..).get_mapped_range_mut();
            let mut offset = 0;
            for chunk in chunks {
                mapped[offset..offset + chunk.len()].copy_from_slice(chunk);
                offset += chunk.len();
            }
        }
        buffer.buffer.unmap();
        buffer.mapped = false;
        Ok(())
    }

    fn acquire_commands(&mut self, label: &str) -> GpuResult<WgpuCommands> {
        Ok(WgpuCommands::new(&self.context, label))
    }

    fn submit(&mut self, commands: WgpuCommands) -> GpuResult<()> {
        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let frame = commands.submit(&self.context.queue);
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(GpuError::Submission(err.to_string()));
        }
        if let Some(frame) = frame {
            frame.present();
        }
        Ok(())
    }

    fn wait_idle(&self) -> GpuResult<()> {
        let result = self.context.device.poll(wgpu::Maintain::Wait);
        if !queue_drained(&result) {
            log::warn!("device poll returned with submissions still queued");
        }
        Ok(())
    }
}

/// Whether a blocking poll left no submitted work behind.
fn queue_drained(result: &wgpu::MaintainResult) -> bool {
    result.is_queue_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_results() {
        assert!(queue_drained(&wgpu::MaintainResult::SubmissionQueueEmpty));
        assert!(!queue_drained(&wgpu::MaintainResult::Ok));
    }
}
