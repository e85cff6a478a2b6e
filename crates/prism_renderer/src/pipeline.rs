//! The textured-mesh pipeline.
//!
//! One vertex buffer at slot 0 laid out as [`Vertex`], one vertex uniform
//! (the MVP matrix) and one fragment texture/sampler pair. Depth testing uses
//! `Less` with writes enabled; no face culling.
use prism_assets::ShaderLoader;
use prism_core::Vertex;
use prism_gpu::{
    CompareFunction, CullMode, DepthStencilState, GpuDevice, GpuResult, PipelineDesc,
    SampleCount, ShaderResources, TextureFormat, VertexAttribute, VertexBufferLayout, VertexFormat,
};

use crate::error::RenderError;

pub const VERTEX_SHADER_RESOURCES: ShaderResources = ShaderResources {
    samplers: 0,
    uniform_buffers: 1,
    storage_buffers: 0,
    storage_textures: 0,
};

pub const FRAGMENT_SHADER_RESOURCES: ShaderResources = ShaderResources {
    samplers: 1,
    uniform_buffers: 0,
    storage_buffers: 0,
    storage_textures: 0,
};

/// `@location(0)` position, `@location(1)` uv.
pub const VERTEX_ATTRIBUTES: [VertexAttribute; 2] = [
    VertexAttribute { location: 0, format: VertexFormat::Float32x3, offset: Vertex::POSITION_OFFSET },
    VertexAttribute { location: 1, format: VertexFormat::Float32x2, offset: Vertex::UV_OFFSET },
];

pub fn vertex_layout() -> VertexBufferLayout<'static> {
    VertexBufferLayout { slot: 0, stride: Vertex::SIZE, attributes: &VERTEX_ATTRIBUTES }
}

/// The two shader stages the pipeline is linked from.
///
/// Shaders are only needed until the pipeline exists; [`GpuResourceSet::create`]
/// takes the pair by value and releases both once linking is done.
///
/// [`GpuResourceSet::create`]: crate::GpuResourceSet::create
pub struct ShaderPair<S> {
    pub vertex: S,
    pub fragment: S,
}

impl<S> ShaderPair<S> {
    pub fn new(vertex: S, fragment: S) -> Self {
        Self { vertex, fragment }
    }

    /// Loads `vertex_name` and `fragment_name` with the resource counts the
    /// pipeline binds.
    pub fn load<D>(
        loader: &ShaderLoader,
        device: &D,
        vertex_name: &str,
        fragment_name: &str,
    ) -> Result<Self, RenderError>
    where
        D: GpuDevice<Shader = S>,
    {
        let vertex = loader.load(device, vertex_name, VERTEX_SHADER_RESOURCES)?;
        let fragment = loader.load(device, fragment_name, FRAGMENT_SHADER_RESOURCES)?;
        Ok(Self { vertex, fragment })
    }
}

/// Formats the pipeline is compiled against. Attachments must match them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineFormats {
    pub color: TextureFormat,
    pub depth: TextureFormat,
    pub sample_count: SampleCount,
}

pub fn create_pipeline<D: GpuDevice>(
    device: &D,
    shaders: &ShaderPair<D::Shader>,
    formats: PipelineFormats,
) -> GpuResult<D::Pipeline> {
    device.create_pipeline(&PipelineDesc {
        label: "Textured Mesh Pipeline",
        vertex_shader: &shaders.vertex,
        fragment_shader: &shaders.fragment,
        vertex_buffers: &[vertex_layout()],
        color_format: formats.color,
        depth_stencil: Some(DepthStencilState {
            format: formats.depth,
            compare: CompareFunction::Less,
            write_enabled: true,
        }),
        sample_count: formats.sample_count,
        cull_mode: CullMode::None,
    })
}

#[cfg(test)]
mod tests {
    use prism_gpu::headless::{HeadlessDevice, ResourceKind};
    use prism_gpu::{ShaderDesc, ShaderFormat, ShaderStage};

    use super::*;

    fn shader(device: &HeadlessDevice, stage: ShaderStage) -> prism_gpu::headless::HeadlessShader {
        device
            .create_shader(&ShaderDesc {
                label: "test",
                code: b"code",
                entry_point: "main",
                format: ShaderFormat::Spirv,
                stage,
                resources: ShaderResources::default(),
            })
            .unwrap()
    }

    #[test]
    fn layout_matches_vertex() {
        let layout = vertex_layout();
        assert_eq!(layout.stride, 20);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[0].format.size() + layout.attributes[1].format.size(), layout.stride);
    }

    #[test]
    fn pipeline_uses_requested_formats() {
        let device = HeadlessDevice::default();
        let shaders = ShaderPair::new(shader(&device, ShaderStage::Vertex), shader(&device, ShaderStage::Fragment));
        let formats = PipelineFormats {
            color: TextureFormat::Bgra8UnormSrgb,
            depth: TextureFormat::Depth32FloatStencil8,
            sample_count: SampleCount::X4,
        };
        let pipeline = create_pipeline(&device, &shaders, formats).unwrap();
        assert_eq!(pipeline.sample_count(), SampleCount::X4);
        assert_eq!(pipeline.depth_format(), Some(TextureFormat::Depth32FloatStencil8));
        assert_eq!(pipeline.color_format(), TextureFormat::Bgra8UnormSrgb);

        drop(shaders);
        // the pipeline outlives its shaders
        let ledger = device.ledger();
        assert_eq!(ledger.borrow().live_count(ResourceKind::Shader), 0);
        assert_eq!(ledger.borrow().live_count(ResourceKind::Pipeline), 1);
    }

    #[test]
    fn swapped_stages_are_rejected() {
        let device = HeadlessDevice::default();
        let shaders = ShaderPair::new(shader(&device, ShaderStage::Fragment), shader(&device, ShaderStage::Vertex));
        let formats = PipelineFormats {
            color: TextureFormat::Bgra8UnormSrgb,
            depth: TextureFormat::Depth24PlusStencil8,
            sample_count: SampleCount::X1,
        };
        assert!(create_pipeline(&device, &shaders, formats).is_err());
    }
}
