//! Size-dependent attachments: the multisampled color target and the
//! depth/stencil target.
//!
//! Both always match the window's client area. A resize releases the old
//! color target, recreates it, then does the same for depth. A zero-sized
//! window leaves the attachments alone and marks the target
//! [`SurfaceState::Minimized`]; nothing is rendered until a later non-zero
//! resize.
use prism_core::Color;
use prism_gpu::{
    ColorAttachment, ColorView, DepthStencilAttachment, Extent, GpuDevice, GpuResult,
    LoadOp, RenderPassDesc, StoreOp, TextureDesc, TextureUsage,
};

use crate::pipeline::PipelineFormats;

pub const MSAA_TEXTURE_LABEL: &str = "MSAA Texture";
pub const DEPTH_TEXTURE_LABEL: &str = "Depth Stencil Texture";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Attachments exist and are `Extent` in size.
    Sized(Extent),
    /// Attachments are being recreated. Only observable if recreation failed.
    Resizing,
    /// The window has no area; rendering is suspended.
    Minimized,
}

pub struct RenderTarget<D: GpuDevice> {
    // depth is created after color, so it is declared (and dropped) first
    depth: Option<D::Texture>,
    /// `None` when rendering single-sampled straight into the swapchain.
    color: Option<D::Texture>,
    /// Size the attachments were last built at.
    extent: Extent,
    formats: PipelineFormats,
    state: SurfaceState,
}

impl<D: GpuDevice> RenderTarget<D> {
    pub fn new(device: &D, size: Extent, formats: PipelineFormats) -> GpuResult<Self> {
        let mut target = Self {
            depth: None,
            color: None,
            extent: Extent::new(0, 0),
            formats,
            state: SurfaceState::Minimized,
        };
        if !size.is_empty() {
            target.rebuild(device, size)?;
        }
        Ok(target)
    }

    /// Matches the attachments to a `width × height` window.
    ///
    /// Returns whether the attachments were recreated.
    pub fn resize(&mut self, device: &D, width: u32, height: u32) -> GpuResult<bool> {
        let size = Extent::new(width, height);
        if size.is_empty() {
            if self.state != SurfaceState::Minimized {
                log::debug!("Window minimized, suspending rendering");
            }
            self.state = SurfaceState::Minimized;
            return Ok(false);
        }
        if size == self.extent && self.color_ready() && self.depth.is_some() {
            self.state = SurfaceState::Sized(size);
            return Ok(false);
        }
        self.rebuild(device, size)?;
        Ok(true)
    }

    fn rebuild(&mut self, device: &D, size: Extent) -> GpuResult<()> {
        log::debug!("Recreating render targets at {}x{}", size.width, size.height);
        self.state = SurfaceState::Resizing;

        drop(self.color.take());
        if self.formats.sample_count.is_multisampled() {
            self.color = Some(device.create_texture(&TextureDesc {
                label: MSAA_TEXTURE_LABEL,
                format: self.formats.color,
                usage: TextureUsage::COLOR_TARGET,
                width: size.width,
                height: size.height,
                sample_count: self.formats.sample_count,
            })?);
        }

        drop(self.depth.take());
        self.depth = Some(device.create_texture(&TextureDesc {
            label: DEPTH_TEXTURE_LABEL,
            format: self.formats.depth,
            usage: TextureUsage::DEPTH_STENCIL_TARGET,
            width: size.width,
            height: size.height,
            sample_count: self.formats.sample_count,
        })?);

        self.extent = size;
        self.state = SurfaceState::Sized(size);
        Ok(())
    }

    fn color_ready(&self) -> bool {
        self.color.is_some() || !self.formats.sample_count.is_multisampled()
    }

    #[inline]
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Current attachment size, or `None` while nothing can be rendered.
    #[inline]
    pub fn size(&self) -> Option<Extent> {
        match self.state {
            SurfaceState::Sized(size) => Some(size),
            SurfaceState::Resizing | SurfaceState::Minimized => None,
        }
    }

    #[inline]
    pub fn formats(&self) -> PipelineFormats {
        self.formats
    }

    pub fn color_texture(&self) -> Option<&D::Texture> {
        self.color.as_ref()
    }

    pub fn depth_texture(&self) -> Option<&D::Texture> {
        self.depth.as_ref()
    }

    /// Pass targeting this frame's swapchain image: color cleared to
    /// `clear` (and resolved into the swapchain when multisampled), depth
    /// cleared to 1.0.
    pub fn pass_desc(&self, clear: Color) -> Option<RenderPassDesc<'_, D::Texture>> {
        self.size()?;
        let depth = self.depth.as_ref()?;
        let color = match &self.color {
            Some(msaa) => ColorAttachment {
                view: ColorView::Texture(msaa),
                resolve: Some(ColorView::Swapchain),
                load: LoadOp::Clear(clear),
                // only the resolved image is kept
                store: StoreOp::Discard,
            },
            None => ColorAttachment {
                view: ColorView::Swapchain,
                resolve: None,
                load: LoadOp::Clear(clear),
                store: StoreOp::Store,
            },
        };
        Some(RenderPassDesc {
            label: "Textured Mesh Pass",
            color,
            depth_stencil: Some(DepthStencilAttachment {
                texture: depth,
                depth_load: LoadOp::Clear(1.0),
                depth_store: StoreOp::Discard,
                stencil_load: LoadOp::Clear(0),
                stencil_store: StoreOp::Discard,
            }),
        })
    }
}
