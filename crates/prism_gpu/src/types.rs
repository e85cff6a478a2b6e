//! Backend-neutral descriptors.
//!
//! These mirror the subset of a modern explicit GPU API that the renderer
//! needs. Each backend maps them onto its own types; nothing here depends on
//! `wgpu`.
use bitflags::bitflags;
use prism_core::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Depth24PlusStencil8,
    Depth32FloatStencil8,
    Depth32Float,
}

impl TextureFormat {
    #[inline]
    pub fn is_depth(self) -> bool {
        matches!(
            self,
            Self::Depth24PlusStencil8 | Self::Depth32FloatStencil8 | Self::Depth32Float
        )
    }

    #[inline]
    pub fn has_stencil(self) -> bool {
        matches!(self, Self::Depth24PlusStencil8 | Self::Depth32FloatStencil8)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        /// Sampled from a shader.
        const SAMPLER              = 1 << 0;
        const COLOR_TARGET         = 1 << 1;
        const DEPTH_STENCIL_TARGET = 1 << 2;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        const VERTEX = 1 << 0;
        const INDEX  = 1 << 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleCount {
    X1,
    X2,
    #[default]
    X4,
    X8,
}

impl SampleCount {
    #[inline]
    pub fn count(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }

    #[inline]
    pub fn is_multisampled(self) -> bool {
        self != Self::X1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// One compiled shader encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderFormat {
    Spirv,
    Msl,
    Dxil,
    Wgsl,
}

impl ShaderFormat {
    #[inline]
    pub fn flag(self) -> ShaderFormats {
        match self {
            Self::Spirv => ShaderFormats::SPIRV,
            Self::Msl => ShaderFormats::MSL,
            Self::Dxil => ShaderFormats::DXIL,
            Self::Wgsl => ShaderFormats::WGSL,
        }
    }
}

bitflags! {
    /// Set of shader encodings a device can ingest.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderFormats: u32 {
        const SPIRV = 1 << 0;
        const MSL   = 1 << 1;
        const DXIL  = 1 << 2;
        const WGSL  = 1 << 3;
    }
}

/// Resource slots a shader declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShaderResources {
    pub samplers: u32,
    pub uniform_buffers: u32,
    pub storage_buffers: u32,
    pub storage_textures: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct ShaderDesc<'a> {
    pub label: &'a str,
    pub code: &'a [u8],
    pub entry_point: &'a str,
    pub format: ShaderFormat,
    pub stage: ShaderStage,
    pub resources: ShaderResources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
    Float32x4,
}

impl VertexFormat {
    #[inline]
    pub fn size(self) -> u64 {
        match self {
            Self::Float32x2 => 8,
            Self::Float32x3 => 12,
            Self::Float32x4 => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: VertexFormat,
    pub offset: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBufferLayout<'a> {
    pub slot: u32,
    pub stride: u64,
    pub attributes: &'a [VertexAttribute],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFunction {
    Never,
    Less,
    LessEqual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilState {
    pub format: TextureFormat,
    pub compare: CompareFunction,
    pub write_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    #[default]
    None,
    Front,
    Back,
}

/// Graphics pipeline description. Shader handles are backend types, hence
/// the generic parameter.
pub struct PipelineDesc<'a, S> {
    pub label: &'a str,
    pub vertex_shader: &'a S,
    pub fragment_shader: &'a S,
    pub vertex_buffers: &'a [VertexBufferLayout<'a>],
    pub color_format: TextureFormat,
    pub depth_stencil: Option<DepthStencilState>,
    pub sample_count: SampleCount,
    pub cull_mode: CullMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc<'a> {
    pub label: &'a str,
    pub format: TextureFormat,
    pub usage: TextureUsage,
    pub width: u32,
    pub height: u32,
    pub sample_count: SampleCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub usage: BufferUsage,
    pub size: u64,
}

/// CPU-visible upload memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferBufferDesc<'a> {
    pub label: &'a str,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerDesc<'a> {
    pub label: &'a str,
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub mipmap_filter: Filter,
    pub address_mode: AddressMode,
}

impl SamplerDesc<'_> {
    /// Linear filtering on every axis, clamped at the edges.
    pub const LINEAR_CLAMP: SamplerDesc<'static> = SamplerDesc {
        label: "Linear Clamp Sampler",
        min_filter: Filter::Linear,
        mag_filter: Filter::Linear,
        mipmap_filter: Filter::Linear,
        address_mode: AddressMode::ClampToEdge,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    Uint16,
    Uint32,
}

impl IndexFormat {
    #[inline]
    pub fn size(self) -> u64 {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOp<T> {
    Load,
    Clear(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Store,
    Discard,
}

/// What a color attachment renders into or resolves into.
#[derive(Debug)]
pub enum ColorView<'a, T> {
    /// The swapchain image acquired on the same command context.
    Swapchain,
    Texture(&'a T),
}

// manual impls: a derive would demand `T: Copy` of the backend texture
impl<T> Clone for ColorView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ColorView<'_, T> {}

#[derive(Debug)]
pub struct ColorAttachment<'a, T> {
    pub view: ColorView<'a, T>,
    pub resolve: Option<ColorView<'a, T>>,
    pub load: LoadOp<Color>,
    pub store: StoreOp,
}

#[derive(Debug)]
pub struct DepthStencilAttachment<'a, T> {
    pub texture: &'a T,
    pub depth_load: LoadOp<f32>,
    pub depth_store: StoreOp,
    /// Ignored for formats without a stencil aspect.
    pub stencil_load: LoadOp<u32>,
    pub stencil_store: StoreOp,
}

#[derive(Debug)]
pub struct RenderPassDesc<'a, T> {
    pub label: &'a str,
    pub color: ColorAttachment<'a, T>,
    pub depth_stencil: Option<DepthStencilAttachment<'a, T>>,
}

impl<T> RenderPassDesc<'_, T> {
    /// Whether any attachment reads or writes the swapchain image.
    pub fn uses_swapchain(&self) -> bool {
        matches!(self.color.view, ColorView::Swapchain)
            || matches!(self.color.resolve, Some(ColorView::Swapchain))
    }
}
