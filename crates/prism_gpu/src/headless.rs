//! Recording backend.
//!
//! `HeadlessDevice` implements the device traits without a GPU. Every call is
//! appended to a shared [`Ledger`] in order, and every handle reports its
//! release from `Drop`, so tests can check ordering, leaks and double
//! releases. Transfer, buffer and texture handles keep their bytes, which
//! lets tests follow data from a staging buffer into its destination.
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use prism_core::Color;

use crate::device::{CommandContext, CopyPass, GpuBuffer, GpuDevice, GpuTexture, RenderPassEncoder};
use crate::error::{GpuError, GpuResult};
use crate::types::{
    BufferDesc, BufferUsage, ColorView, Extent, IndexFormat, LoadOp, PipelineDesc, RenderPassDesc,
    SampleCount, SamplerDesc, ShaderDesc, ShaderFormats, ShaderResources, ShaderStage, TextureDesc,
    TextureFormat, TextureUsage, TransferBufferDesc,
};

pub type ObjectId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Buffer,
    Texture,
    Sampler,
    Shader,
    Pipeline,
    TransferBuffer,
}

/// Color target of a recorded render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetId {
    Swapchain,
    Texture(ObjectId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Created { id: ObjectId, kind: ResourceKind, label: String },
    Released { id: ObjectId, kind: ResourceKind, label: String },
    TransferWritten { id: ObjectId, bytes: usize },
    CommandsAcquired { label: String },
    CopyPassBegin,
    UploadToBuffer { src: ObjectId, src_offset: u64, dst: ObjectId, size: u64 },
    UploadToTexture { src: ObjectId, bytes_per_row: u32, dst: ObjectId, width: u32, height: u32 },
    CopyPassEnd,
    SwapchainAcquired { image: Option<Extent> },
    RenderPassBegin {
        color: TargetId,
        resolve: Option<TargetId>,
        depth: Option<ObjectId>,
        clear_color: Option<Color>,
        clear_depth: Option<f32>,
    },
    BindPipeline(ObjectId),
    BindVertexBuffer { slot: u32, buffer: ObjectId, offset: u64 },
    BindIndexBuffer { buffer: ObjectId, format: IndexFormat, offset: u64 },
    BindFragmentSamplers { first_slot: u32, pairs: Vec<(ObjectId, ObjectId)> },
    PushVertexUniform { slot: u32, data: Vec<u8> },
    DrawIndexed {
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    },
    RenderPassEnd,
    Submitted { label: String, presented: bool },
    SwapchainResized(Extent),
    WaitIdle,
}

/// Everything the device has seen, in order.
#[derive(Debug, Default)]
pub struct Ledger {
    events: Vec<Event>,
    live: BTreeMap<ObjectId, (ResourceKind, String)>,
    releases: BTreeMap<ObjectId, usize>,
    next_id: ObjectId,
}

impl Ledger {
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Handles of `kind` that are created and not yet released.
    pub fn live_count(&self, kind: ResourceKind) -> usize {
        self.live.values().filter(|(k, _)| *k == kind).count()
    }

    pub fn live_total(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, id: ObjectId) -> bool {
        self.live.contains_key(&id)
    }

    /// How many times `id` has been released. Anything above 1 is a double
    /// release.
    pub fn released(&self, id: ObjectId) -> usize {
        self.releases.get(&id).copied().unwrap_or(0)
    }

    /// Ids of every handle ever created with `label`, oldest first.
    pub fn created_with_label(&self, label: &str) -> Vec<ObjectId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Created { id, label: l, .. } if l == label => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    fn push(&mut self, event: Event) {
        log::trace!("headless: {event:?}");
        self.events.push(event);
    }

    fn create(&mut self, kind: ResourceKind, label: &str) -> ObjectId {
        self.next_id += 1;
        let id = self.next_id;
        self.live.insert(id, (kind, label.to_owned()));
        self.push(Event::Created { id, kind, label: label.to_owned() });
        id
    }

    fn release(&mut self, id: ObjectId, kind: ResourceKind, label: &str) {
        self.live.remove(&id);
        *self.releases.entry(id).or_default() += 1;
        self.push(Event::Released { id, kind, label: label.to_owned() });
    }
}

pub type SharedLedger = Rc<RefCell<Ledger>>;

/// Identity shared by every headless handle; reports the release on drop.
#[derive(Debug)]
struct Tracked {
    id: ObjectId,
    kind: ResourceKind,
    label: String,
    ledger: SharedLedger,
}

impl Tracked {
    fn new(ledger: &SharedLedger, kind: ResourceKind, label: &str) -> Self {
        let id = ledger.borrow_mut().create(kind, label);
        Self { id, kind, label: label.to_owned(), ledger: Rc::clone(ledger) }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.ledger.borrow_mut().release(self.id, self.kind, &self.label);
    }
}

// ─── Handles ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct HeadlessBuffer {
    tracked: Tracked,
    usage: BufferUsage,
    contents: RefCell<Vec<u8>>,
}

impl HeadlessBuffer {
    pub fn id(&self) -> ObjectId {
        self.tracked.id
    }

    pub fn label(&self) -> &str {
        &self.tracked.label
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn contents(&self) -> Vec<u8> {
        self.contents.borrow().clone()
    }
}

impl GpuBuffer for HeadlessBuffer {
    fn size(&self) -> u64 {
        self.contents.borrow().len() as u64
    }
}

#[derive(Debug)]
pub struct HeadlessTexture {
    tracked: Tracked,
    format: TextureFormat,
    usage: TextureUsage,
    width: u32,
    height: u32,
    sample_count: SampleCount,
    /// Tightly packed rows written by uploads.
    contents: RefCell<Vec<u8>>,
}

impl HeadlessTexture {
    pub fn id(&self) -> ObjectId {
        self.tracked.id
    }

    pub fn label(&self) -> &str {
        &self.tracked.label
    }

    pub fn usage(&self) -> TextureUsage {
        self.usage
    }

    pub fn contents(&self) -> Vec<u8> {
        self.contents.borrow().clone()
    }
}

impl GpuTexture for HeadlessTexture {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn sample_count(&self) -> SampleCount {
        self.sample_count
    }

    fn format(&self) -> TextureFormat {
        self.format
    }
}

#[derive(Debug)]
pub struct HeadlessSampler {
    tracked: Tracked,
}

impl HeadlessSampler {
    pub fn id(&self) -> ObjectId {
        self.tracked.id
    }
}

#[derive(Debug)]
pub struct HeadlessShader {
    tracked: Tracked,
    stage: ShaderStage,
    entry_point: String,
    resources: ShaderResources,
}

impl HeadlessShader {
    pub fn id(&self) -> ObjectId {
        self.tracked.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn resources(&self) -> ShaderResources {
        self.resources
    }
}

#[derive(Debug)]
pub struct HeadlessPipeline {
    tracked: Tracked,
    sample_count: SampleCount,
    depth_format: Option<TextureFormat>,
    color_format: TextureFormat,
}

impl HeadlessPipeline {
    pub fn id(&self) -> ObjectId {
        self.tracked.id
    }

    pub fn sample_count(&self) -> SampleCount {
        self.sample_count
    }

    pub fn depth_format(&self) -> Option<TextureFormat> {
        self.depth_format
    }

    pub fn color_format(&self) -> TextureFormat {
        self.color_format
    }
}

#[derive(Debug)]
pub struct HeadlessTransferBuffer {
    tracked: Tracked,
    size: u64,
    data: Vec<u8>,
    written: bool,
}

impl HeadlessTransferBuffer {
    pub fn id(&self) -> ObjectId {
        self.tracked.id
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl GpuBuffer for HeadlessTransferBuffer {
    fn size(&self) -> u64 {
        self.size
    }
}

// ─── Device ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub driver_name: String,
    pub shader_formats: ShaderFormats,
    /// Depth formats reported as usable depth/stencil targets.
    pub depth_formats: Vec<TextureFormat>,
    pub swapchain_format: TextureFormat,
    pub swapchain_size: Extent,
    pub row_alignment: u32,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            driver_name: "headless".to_owned(),
            shader_formats: ShaderFormats::SPIRV,
            depth_formats: vec![TextureFormat::Depth24PlusStencil8, TextureFormat::Depth32FloatStencil8],
            swapchain_format: TextureFormat::Bgra8UnormSrgb,
            swapchain_size: Extent::new(800, 600),
            row_alignment: 1,
        }
    }
}

pub struct HeadlessDevice {
    config: HeadlessConfig,
    ledger: SharedLedger,
    swapchain_available: Rc<Cell<bool>>,
    fail_pipeline: Cell<bool>,
    fail_submit: Cell<bool>,
}

impl HeadlessDevice {
    pub fn new(config: HeadlessConfig) -> Self {
        Self {
            config,
            ledger: SharedLedger::default(),
            swapchain_available: Rc::new(Cell::new(true)),
            fail_pipeline: Cell::new(false),
            fail_submit: Cell::new(false),
        }
    }

    /// Shared handle to the recording; stays valid after the device is gone.
    pub fn ledger(&self) -> SharedLedger {
        Rc::clone(&self.ledger)
    }

    /// When `false`, swapchain acquisition reports "no image".
    pub fn set_swapchain_available(&self, available: bool) {
        self.swapchain_available.set(available);
    }

    /// Handle that flips swapchain availability while the device itself is
    /// owned elsewhere.
    pub fn swapchain_switch(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.swapchain_available)
    }

    pub fn fail_pipeline_creation(&self, fail: bool) {
        self.fail_pipeline.set(fail);
    }

    pub fn fail_submission(&self, fail: bool) {
        self.fail_submit.set(fail);
    }

    fn push(&self, event: Event) {
        self.ledger.borrow_mut().push(event);
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new(HeadlessConfig::default())
    }
}

impl GpuDevice for HeadlessDevice {
    type Buffer = HeadlessBuffer;
    type Texture = HeadlessTexture;
    type Sampler = HeadlessSampler;
    type Shader = HeadlessShader;
    type Pipeline = HeadlessPipeline;
    type TransferBuffer = HeadlessTransferBuffer;
    type Commands = HeadlessCommands;

    fn driver_name(&self) -> &str {
        &self.config.driver_name
    }

    fn shader_formats(&self) -> ShaderFormats {
        self.config.shader_formats
    }

    fn supports_texture_format(&self, format: TextureFormat, usage: TextureUsage) -> bool {
        if usage.contains(TextureUsage::DEPTH_STENCIL_TARGET) {
            return self.config.depth_formats.contains(&format);
        }
        !format.is_depth()
    }

    fn swapchain_format(&self) -> TextureFormat {
        self.config.swapchain_format
    }

    fn swapchain_size(&self) -> Extent {
        self.config.swapchain_size
    }

    fn texture_row_alignment(&self) -> u32 {
        self.config.row_alignment
    }

    fn resize_swapchain(&mut self, width: u32, height: u32) -> GpuResult<()> {
        let size = Extent::new(width, height);
        self.config.swapchain_size = size;
        // a minimized window leaves the surface as it was
        if !size.is_empty() {
            self.push(Event::SwapchainResized(size));
        }
        Ok(())
    }

    fn create_shader(&self, desc: &ShaderDesc<'_>) -> GpuResult<HeadlessShader> {
        if !self.config.shader_formats.contains(desc.format.flag()) {
            return Err(GpuError::UnsupportedShaderFormat { format: desc.format, backend: "headless" });
        }
        Ok(HeadlessShader {
            tracked: Tracked::new(&self.ledger, ResourceKind::Shader, desc.label),
            stage: desc.stage,
            entry_point: desc.entry_point.to_owned(),
            resources: desc.resources,
        })
    }

    fn create_pipeline(&self, desc: &PipelineDesc<'_, HeadlessShader>) -> GpuResult<HeadlessPipeline> {
        if self.fail_pipeline.get() {
            return Err(GpuError::creation(desc.label, "pipeline rejected (injected failure)"));
        }
        if desc.vertex_shader.stage != ShaderStage::Vertex || desc.fragment_shader.stage != ShaderStage::Fragment {
            return Err(GpuError::creation(desc.label, "shader stages don't match their slots"));
        }
        Ok(HeadlessPipeline {
            tracked: Tracked::new(&self.ledger, ResourceKind::Pipeline, desc.label),
            sample_count: desc.sample_count,
            depth_format: desc.depth_stencil.map(|d| d.format),
            color_format: desc.color_format,
        })
    }

    fn create_texture(&self, desc: &TextureDesc<'_>) -> GpuResult<HeadlessTexture> {
        if desc.width == 0 || desc.height == 0 {
            return Err(GpuError::creation(
                desc.label,
                format!("zero-sized texture ({}x{})", desc.width, desc.height),
            ));
        }
        if !self.supports_texture_format(desc.format, desc.usage) {
            return Err(GpuError::creation(desc.label, format!("{:?} unsupported for {:?}", desc.format, desc.usage)));
        }
        Ok(HeadlessTexture {
            tracked: Tracked::new(&self.ledger, ResourceKind::Texture, desc.label),
            format: desc.format,
            usage: desc.usage,
            width: desc.width,
            height: desc.height,
            sample_count: desc.sample_count,
            contents: RefCell::new(Vec::new()),
        })
    }

    fn create_buffer(&self, desc: &BufferDesc<'_>) -> GpuResult<HeadlessBuffer> {
        if desc.size == 0 {
            return Err(GpuError::creation(desc.label, "zero-sized buffer"));
        }
        Ok(HeadlessBuffer {
            tracked: Tracked::new(&self.ledger, ResourceKind::Buffer, desc.label),
            usage: desc.usage,
            contents: RefCell::new(vec![0; desc.size as usize]),
        })
    }

    fn create_sampler(&self, desc: &SamplerDesc<'_>) -> GpuResult<HeadlessSampler> {
        Ok(HeadlessSampler { tracked: Tracked::new(&self.ledger, ResourceKind::Sampler, desc.label) })
    }

    fn create_transfer_buffer(&self, desc: &TransferBufferDesc<'_>) -> GpuResult<HeadlessTransferBuffer> {
        if desc.size == 0 {
            return Err(GpuError::creation(desc.label, "zero-sized transfer buffer"));
        }
        Ok(HeadlessTransferBuffer {
            tracked: Tracked::new(&self.ledger, ResourceKind::TransferBuffer, desc.label),
            size: desc.size,
            data: vec![0; desc.size as usize],
            written: false,
        })
    }

    fn write_transfer_buffer(&self, buffer: &mut HeadlessTransferBuffer, chunks: &[&[u8]]) -> GpuResult<()> {
        if buffer.written {
            return Err(GpuError::MapFailed(format!("'{}' was already written", buffer.tracked.label)));
        }
        let total: usize = chunks.iter().map(|c| c.len()).sum();
        if total as u64 > buffer.size {
            return Err(GpuError::MapFailed(format!(
                "{total} bytes don't fit in '{}' ({} bytes)",
                buffer.tracked.label, buffer.size
            )));
        }
        let mut offset = 0;
        for chunk in chunks {
            buffer.data[offset..offset + chunk.len()].copy_from_slice(chunk);
            offset += chunk.len();
        }
        buffer.written = true;
        self.push(Event::TransferWritten { id: buffer.tracked.id, bytes: total });
        Ok(())
    }

    fn acquire_commands(&mut self, label: &str) -> GpuResult<HeadlessCommands> {
        self.push(Event::CommandsAcquired { label: label.to_owned() });
        Ok(HeadlessCommands {
            label: label.to_owned(),
            ledger: Rc::clone(&self.ledger),
            swapchain_available: self.swapchain_available.get(),
            swapchain_size: self.config.swapchain_size,
            image: None,
        })
    }

    fn submit(&mut self, commands: HeadlessCommands) -> GpuResult<()> {
        if self.fail_submit.get() {
            return Err(GpuError::Submission(format!("'{}' rejected (injected failure)", commands.label)));
        }
        self.push(Event::Submitted { label: commands.label, presented: commands.image.is_some() });
        Ok(())
    }

    fn wait_idle(&self) -> GpuResult<()> {
        self.push(Event::WaitIdle);
        Ok(())
    }
}

// ─── Recording ──────────────────────────────────────────────────────────────

pub struct HeadlessCommands {
    label: String,
    ledger: SharedLedger,
    swapchain_available: bool,
    swapchain_size: Extent,
    image: Option<Extent>,
}

impl HeadlessCommands {
    fn push(&self, event: Event) {
        self.ledger.borrow_mut().push(event);
    }
}

fn target_id(view: &ColorView<'_, HeadlessTexture>) -> TargetId {
    match view {
        ColorView::Swapchain => TargetId::Swapchain,
        ColorView::Texture(t) => TargetId::Texture(t.id()),
    }
}

impl CommandContext<HeadlessDevice> for HeadlessCommands {
    type CopyPass<'a> = HeadlessCopyPass<'a>;
    type Pass<'a> = HeadlessRenderPass<'a>;

    fn begin_copy_pass(&mut self) -> HeadlessCopyPass<'_> {
        self.push(Event::CopyPassBegin);
        HeadlessCopyPass { commands: self }
    }

    fn acquire_swapchain_image(&mut self) -> GpuResult<Option<Extent>> {
        let image = self.swapchain_available.then_some(self.swapchain_size);
        self.image = image;
        self.push(Event::SwapchainAcquired { image });
        Ok(image)
    }

    fn begin_render_pass<'a>(
        &'a mut self,
        desc: &RenderPassDesc<'_, HeadlessTexture>,
    ) -> GpuResult<HeadlessRenderPass<'a>> {
        if desc.uses_swapchain() && self.image.is_none() {
            return Err(GpuError::NoSwapchainImage);
        }
        self.push(Event::RenderPassBegin {
            color: target_id(&desc.color.view),
            resolve: desc.color.resolve.as_ref().map(target_id),
            depth: desc.depth_stencil.as_ref().map(|d| d.texture.id()),
            clear_color: match desc.color.load {
                LoadOp::Clear(c) => Some(c),
                LoadOp::Load => None,
            },
            clear_depth: desc.depth_stencil.as_ref().and_then(|d| match d.depth_load {
                LoadOp::Clear(v) => Some(v),
                LoadOp::Load => None,
            }),
        });
        Ok(HeadlessRenderPass { commands: self })
    }
}

pub struct HeadlessCopyPass<'a> {
    commands: &'a mut HeadlessCommands,
}

impl CopyPass<HeadlessDevice> for HeadlessCopyPass<'_> {
    fn upload_to_buffer(&mut self, src: &HeadlessTransferBuffer, src_offset: u64, dst: &HeadlessBuffer, size: u64) {
        let start = src_offset as usize;
        {
            let mut contents = dst.contents.borrow_mut();
            let n = (size as usize).min(contents.len());
            contents[..n].copy_from_slice(&src.data[start..start + n]);
        }
        self.commands.push(Event::UploadToBuffer { src: src.id(), src_offset, dst: dst.id(), size });
    }

    fn upload_to_texture(
        &mut self,
        src: &HeadlessTransferBuffer,
        bytes_per_row: u32,
        dst: &HeadlessTexture,
        width: u32,
        height: u32,
    ) {
        // textures in this backend are always 4 bytes per texel
        let row = width as usize * 4;
        let mut packed = Vec::with_capacity(row * height as usize);
        for y in 0..height as usize {
            let start = y * bytes_per_row as usize;
            packed.extend_from_slice(&src.data[start..start + row]);
        }
        *dst.contents.borrow_mut() = packed;
        self.commands.push(Event::UploadToTexture {
            src: src.id(),
            bytes_per_row,
            dst: dst.id(),
            width,
            height,
        });
    }

    fn end(self) {
        self.commands.push(Event::CopyPassEnd);
    }
}

pub struct HeadlessRenderPass<'a> {
    commands: &'a mut HeadlessCommands,
}

impl RenderPassEncoder<HeadlessDevice> for HeadlessRenderPass<'_> {
    fn bind_pipeline(&mut self, pipeline: &HeadlessPipeline) {
        self.commands.push(Event::BindPipeline(pipeline.id()));
    }

    fn bind_vertex_buffer(&mut self, slot: u32, buffer: &HeadlessBuffer, offset: u64) {
        self.commands.push(Event::BindVertexBuffer { slot, buffer: buffer.id(), offset });
    }

    fn bind_index_buffer(&mut self, buffer: &HeadlessBuffer, format: IndexFormat, offset: u64) {
        self.commands.push(Event::BindIndexBuffer { buffer: buffer.id(), format, offset });
    }

    fn bind_fragment_samplers(
        &mut self,
        first_slot: u32,
        bindings: &[(&HeadlessTexture, &HeadlessSampler)],
    ) -> GpuResult<()> {
        let pairs = bindings.iter().map(|(t, s)| (t.id(), s.id())).collect();
        self.commands.push(Event::BindFragmentSamplers { first_slot, pairs });
        Ok(())
    }

    fn push_vertex_uniform(&mut self, slot: u32, data: &[u8]) -> GpuResult<()> {
        self.commands.push(Event::PushVertexUniform { slot, data: data.to_vec() });
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
        self.commands.push(Event::DrawIndexed {
            index_count,
            instance_count,
            first_index,
            vertex_offset,
            first_instance,
        });
    }

    fn end(self) {
        self.commands.push(Event::RenderPassEnd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(device: &HeadlessDevice, label: &str) -> HeadlessTexture {
        device
            .create_texture(&TextureDesc {
                label,
                format: TextureFormat::Bgra8UnormSrgb,
                usage: TextureUsage::COLOR_TARGET,
                width: 4,
                height: 4,
                sample_count: SampleCount::X4,
            })
            .unwrap()
    }

    #[test]
    fn drop_releases_exactly_once() {
        let device = HeadlessDevice::default();
        let ledger = device.ledger();
        let tex = texture(&device, "t");
        let id = tex.id();
        assert!(ledger.borrow().is_live(id));
        drop(tex);
        assert!(!ledger.borrow().is_live(id));
        assert_eq!(ledger.borrow().released(id), 1);
        assert_eq!(ledger.borrow().live_total(), 0);
    }

    #[test]
    fn transfer_buffer_is_write_once() {
        let device = HeadlessDevice::default();
        let mut staging = device
            .create_transfer_buffer(&TransferBufferDesc { label: "s", size: 8 })
            .unwrap();
        device.write_transfer_buffer(&mut staging, &[&[1, 2], &[3, 4, 5]]).unwrap();
        assert_eq!(&staging.data()[..5], &[1, 2, 3, 4, 5]);
        assert!(matches!(
            device.write_transfer_buffer(&mut staging, &[&[0]]),
            Err(GpuError::MapFailed(_))
        ));
    }

    #[test]
    fn oversized_write_is_rejected() {
        let device = HeadlessDevice::default();
        let mut staging = device
            .create_transfer_buffer(&TransferBufferDesc { label: "s", size: 2 })
            .unwrap();
        assert!(device.write_transfer_buffer(&mut staging, &[&[1, 2, 3]]).is_err());
    }

    #[test]
    fn no_image_blocks_swapchain_pass() {
        let mut device = HeadlessDevice::default();
        device.set_swapchain_available(false);
        let msaa = texture(&device, "msaa");
        let mut cmds = device.acquire_commands("frame").unwrap();
        assert_eq!(cmds.acquire_swapchain_image().unwrap(), None);
        let desc = RenderPassDesc {
            label: "pass",
            color: crate::types::ColorAttachment {
                view: ColorView::Texture(&msaa),
                resolve: Some(ColorView::Swapchain),
                load: LoadOp::Clear(Color::rgb(0.0, 0.0, 0.0)),
                store: crate::types::StoreOp::Discard,
            },
            depth_stencil: None,
        };
        assert!(matches!(cmds.begin_render_pass(&desc), Err(GpuError::NoSwapchainImage)));
        device.submit(cmds).unwrap();
        let ledger = device.ledger();
        assert!(ledger
            .borrow()
            .events()
            .contains(&Event::Submitted { label: "frame".into(), presented: false }));
    }

    #[test]
    fn zero_resize_reports_size_without_reconfiguring() {
        let mut device = HeadlessDevice::default();
        device.resize_swapchain(0, 600).unwrap();
        assert_eq!(device.swapchain_size(), Extent::new(0, 600));
        assert_eq!(device.ledger().borrow().count(|e| matches!(e, Event::SwapchainResized(_))), 0);
        device.resize_swapchain(1024, 768).unwrap();
        assert_eq!(device.swapchain_size(), Extent::new(1024, 768));
    }

    #[test]
    fn depth_support_follows_config() {
        let device = HeadlessDevice::new(HeadlessConfig {
            depth_formats: vec![TextureFormat::Depth32FloatStencil8],
            ..Default::default()
        });
        assert!(!device.supports_texture_format(TextureFormat::Depth24PlusStencil8, TextureUsage::DEPTH_STENCIL_TARGET));
        assert!(device.supports_texture_format(TextureFormat::Depth32FloatStencil8, TextureUsage::DEPTH_STENCIL_TARGET));
    }
}
