//! Every GPU handle the renderer owns.
//!
//! Creation order: depth format probe, pipeline, render targets, sampler,
//! then the uploaded scene. Fields are declared so they drop in the reverse
//! of that order.
//!
//! Dropping the set is its teardown. It does not wait for the GPU itself: the
//! owner waits for idle first, as [`crate::Renderer`] does in its `Drop`.
use prism_core::{ImageBuffer, Mesh, MeshCounts};
use prism_gpu::{
    Extent, GpuDevice, GpuResult, SampleCount, SamplerDesc, TextureFormat, TextureUsage,
};

use crate::error::RenderError;
use crate::pipeline::{create_pipeline, PipelineFormats, ShaderPair};
use crate::render_target::RenderTarget;
use crate::upload::{upload, UploadedScene};

/// Depth/stencil formats in order of preference.
pub const DEPTH_FORMAT_CANDIDATES: [TextureFormat; 2] =
    [TextureFormat::Depth24PlusStencil8, TextureFormat::Depth32FloatStencil8];

/// First of [`DEPTH_FORMAT_CANDIDATES`] the device can render depth into.
pub fn select_depth_format<D: GpuDevice>(device: &D) -> Result<TextureFormat, RenderError> {
    let format = DEPTH_FORMAT_CANDIDATES
        .into_iter()
        .find(|&f| device.supports_texture_format(f, TextureUsage::DEPTH_STENCIL_TARGET))
        .ok_or(RenderError::NoDepthFormat)?;
    log::info!("Using depth stencil format {format:?}");
    Ok(format)
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceSetDesc<'a> {
    pub sample_count: SampleCount,
    /// Debug name of the uploaded texture, usually its file name.
    pub texture_label: &'a str,
}

pub struct GpuResourceSet<D: GpuDevice> {
    texture: D::Texture,
    index_buffer: D::Buffer,
    vertex_buffer: D::Buffer,
    sampler: D::Sampler,
    target: RenderTarget<D>,
    pipeline: D::Pipeline,
    counts: MeshCounts,
}

impl<D: GpuDevice> GpuResourceSet<D> {
    /// Builds the pipeline from `shaders`, sizes the attachments to the
    /// current swapchain and uploads `mesh` and `image`.
    ///
    /// The shaders are released once the pipeline is linked and the image
    /// once its pixels are staged.
    pub fn create(
        device: &mut D,
        shaders: ShaderPair<D::Shader>,
        mesh: &Mesh,
        image: ImageBuffer,
        desc: &ResourceSetDesc<'_>,
    ) -> Result<Self, RenderError> {
        let formats = PipelineFormats {
            color: device.swapchain_format(),
            depth: select_depth_format(device)?,
            sample_count: desc.sample_count,
        };
        let pipeline = create_pipeline(device, &shaders, formats)?;
        let target = RenderTarget::new(device, device.swapchain_size(), formats)?;
        drop(shaders);

        let sampler = device.create_sampler(&SamplerDesc::LINEAR_CLAMP)?;
        let UploadedScene { vertex_buffer, index_buffer, texture, counts } =
            upload(device, mesh, image, desc.texture_label)?;

        Ok(Self { texture, index_buffer, vertex_buffer, sampler, target, pipeline, counts })
    }

    /// Recreates the size-dependent attachments for a `width × height`
    /// window. See [`RenderTarget::resize`].
    pub fn resize(&mut self, device: &D, width: u32, height: u32) -> GpuResult<bool> {
        self.target.resize(device, width, height)
    }

    pub fn pipeline(&self) -> &D::Pipeline {
        &self.pipeline
    }

    pub fn vertex_buffer(&self) -> &D::Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &D::Buffer {
        &self.index_buffer
    }

    pub fn texture(&self) -> &D::Texture {
        &self.texture
    }

    pub fn sampler(&self) -> &D::Sampler {
        &self.sampler
    }

    pub fn target(&self) -> &RenderTarget<D> {
        &self.target
    }

    pub fn counts(&self) -> MeshCounts {
        self.counts
    }

    /// Attachment size, `None` while minimized.
    pub fn size(&self) -> Option<Extent> {
        self.target.size()
    }
}

#[cfg(test)]
mod tests {
    use prism_gpu::headless::{Event, HeadlessConfig, HeadlessDevice, HeadlessShader, ResourceKind};
    use prism_gpu::{ShaderDesc, ShaderFormat, ShaderResources, ShaderStage};

    use super::*;

    fn shaders(device: &HeadlessDevice) -> ShaderPair<HeadlessShader> {
        let make = |label, stage| {
            device
                .create_shader(&ShaderDesc {
                    label,
                    code: b"bytecode",
                    entry_point: "main",
                    format: ShaderFormat::Spirv,
                    stage,
                    resources: ShaderResources::default(),
                })
                .unwrap()
        };
        ShaderPair::new(make("Mesh.vert", ShaderStage::Vertex), make("Mesh.frag", ShaderStage::Fragment))
    }

    fn image() -> ImageBuffer {
        ImageBuffer::from_rgba8(1, 1, vec![9, 9, 9, 255]).unwrap()
    }

    const DESC: ResourceSetDesc<'static> =
        ResourceSetDesc { sample_count: SampleCount::X4, texture_label: "pixel.png" };

    #[test]
    fn prefers_d24s8() {
        let device = HeadlessDevice::default();
        assert_eq!(select_depth_format(&device).unwrap(), TextureFormat::Depth24PlusStencil8);
    }

    #[test]
    fn falls_back_to_d32s8() {
        let device = HeadlessDevice::new(HeadlessConfig {
            depth_formats: vec![TextureFormat::Depth32FloatStencil8],
            ..Default::default()
        });
        assert_eq!(select_depth_format(&device).unwrap(), TextureFormat::Depth32FloatStencil8);
    }

    #[test]
    fn no_depth_format_is_fatal() {
        let mut device = HeadlessDevice::new(HeadlessConfig {
            depth_formats: vec![TextureFormat::Depth32Float],
            ..Default::default()
        });
        let shaders = shaders(&device);
        let err = GpuResourceSet::create(&mut device, shaders, &Mesh::quad(), image(), &DESC)
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::NoDepthFormat));
        // nothing survives the failure
        assert_eq!(device.ledger().borrow().live_total(), 0);
    }

    #[test]
    fn create_holds_one_of_each() {
        let mut device = HeadlessDevice::default();
        let shaders = shaders(&device);
        let set = GpuResourceSet::create(&mut device, shaders, &Mesh::cube(), image(), &DESC).unwrap();

        let ledger = device.ledger();
        let ledger = ledger.borrow();
        assert_eq!(ledger.live_count(ResourceKind::Pipeline), 1);
        assert_eq!(ledger.live_count(ResourceKind::Shader), 0);
        assert_eq!(ledger.live_count(ResourceKind::Sampler), 1);
        // msaa, depth and the mesh texture
        assert_eq!(ledger.live_count(ResourceKind::Texture), 3);
        assert_eq!(ledger.live_count(ResourceKind::Buffer), 2);
        assert_eq!(ledger.live_count(ResourceKind::TransferBuffer), 0);
        assert_eq!(set.counts().indices, 36);
        assert_eq!(set.size(), Some(Extent::new(800, 600)));
        assert_eq!(set.pipeline().sample_count(), SampleCount::X4);
    }

    #[test]
    fn shaders_released_before_sampler_is_created() {
        let mut device = HeadlessDevice::default();
        let shaders = shaders(&device);
        let _set = GpuResourceSet::create(&mut device, shaders, &Mesh::quad(), image(), &DESC).unwrap();

        let ledger = device.ledger();
        let ledger = ledger.borrow();
        let events = ledger.events();
        let last_shader_release = events
            .iter()
            .rposition(|e| matches!(e, Event::Released { kind: ResourceKind::Shader, .. }))
            .unwrap();
        let sampler_created = events
            .iter()
            .position(|e| matches!(e, Event::Created { kind: ResourceKind::Sampler, .. }))
            .unwrap();
        let depth_created = events
            .iter()
            .position(|e| matches!(e, Event::Created { label, .. } if label == "Depth Stencil Texture"))
            .unwrap();
        assert!(depth_created < last_shader_release);
        assert!(last_shader_release < sampler_created);
    }

    #[test]
    fn drop_releases_in_reverse_creation_order() {
        let mut device = HeadlessDevice::default();
        let shaders = shaders(&device);
        let set = GpuResourceSet::create(&mut device, shaders, &Mesh::quad(), image(), &DESC).unwrap();
        let ledger = device.ledger();
        ledger.borrow_mut().clear_events();

        drop(set);

        let ledger = ledger.borrow();
        let labels: Vec<_> = ledger
            .events()
            .iter()
            .map(|e| match e {
                Event::Released { label, .. } => label.clone(),
                other => format!("{other:?}"),
            })
            .collect();
        assert_eq!(
            labels,
            [
                "pixel.png",
                "Index Buffer",
                "Vertex Buffer",
                "Linear Clamp Sampler",
                "Depth Stencil Texture",
                "MSAA Texture",
                "Textured Mesh Pipeline",
            ]
        );
        assert_eq!(ledger.live_total(), 0);
    }

    #[test]
    fn pipeline_failure_leaves_nothing_behind() {
        let mut device = HeadlessDevice::default();
        device.fail_pipeline_creation(true);
        let shaders = shaders(&device);
        let result = GpuResourceSet::create(&mut device, shaders, &Mesh::quad(), image(), &DESC);
        assert!(matches!(result, Err(RenderError::Gpu(_))));
        assert_eq!(device.ledger().borrow().live_total(), 0);
    }
}
