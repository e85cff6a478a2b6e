//! prism_renderer: the GPU resource and frame lifecycle.
//!
//! | Module          | Responsibility                                                |
//! |-----------------|---------------------------------------------------------------|
//! | `pipeline`      | Vertex layout, shader pair, textured-mesh pipeline            |
//! | `render_target` | MSAA color + depth attachments sized to the window            |
//! | `upload`        | Staging-buffer upload of mesh and texture                     |
//! | `resource_set`  | `GpuResourceSet`: every handle, created and released in order |
//! | `frame`         | `FrameRenderer`: the per-frame acquire → draw → submit cycle  |
//!
//! [`Renderer`] ties a device to its resource set and frame renderer.
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod render_target;
pub mod resource_set;
pub mod upload;

pub use error::RenderError;
pub use frame::{DrawStats, FrameOutcome, FrameRenderer};
pub use pipeline::{PipelineFormats, ShaderPair};
pub use render_target::{RenderTarget, SurfaceState};
pub use resource_set::{select_depth_format, GpuResourceSet, ResourceSetDesc};
pub use upload::{upload, UploadedScene};

use prism_core::{ImageBuffer, Mesh};
use prism_gpu::GpuDevice;

/// A device together with everything rendered on it.
///
/// Dropping the renderer waits for the device to go idle before any handle
/// is released, then releases the resource set ahead of the device.
pub struct Renderer<D: GpuDevice> {
    resources: GpuResourceSet<D>,
    frames: FrameRenderer,
    device: D,
}

impl<D: GpuDevice> Renderer<D> {
    pub fn new(
        mut device: D,
        shaders: ShaderPair<D::Shader>,
        mesh: &Mesh,
        image: ImageBuffer,
        desc: &ResourceSetDesc<'_>,
        frames: FrameRenderer,
    ) -> Result<Self, RenderError> {
        let resources = GpuResourceSet::create(&mut device, shaders, mesh, image, desc)?;
        Ok(Self { resources, frames, device })
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn resources(&self) -> &GpuResourceSet<D> {
        &self.resources
    }

    /// Follows a window resize: swapchain first, then the attachments.
    ///
    /// Returns whether the attachments were recreated.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool, RenderError> {
        self.device.resize_swapchain(width, height)?;
        Ok(self.resources.resize(&self.device, width, height)?)
    }

    pub fn render(&mut self, elapsed_ms: u64) -> Result<FrameOutcome, RenderError> {
        self.frames.render_frame(&mut self.device, &self.resources, elapsed_ms)
    }
}

impl<D: GpuDevice> Drop for Renderer<D> {
    fn drop(&mut self) {
        if let Err(err) = self.device.wait_idle() {
            log::error!("device didn't go idle before teardown: {err}");
        }
    }
}
