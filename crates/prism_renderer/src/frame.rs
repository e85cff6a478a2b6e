//! Per-frame recording.
//!
//! ```text
//! acquire commands → acquire swapchain image ─┬─ none → submit empty
//!                                            └─ image → pass: bind, push MVP, draw → end → submit
//! ```
use prism_core::{transform, Color};
use prism_gpu::{CommandContext, Extent, GpuDevice, IndexFormat, RenderPassEncoder};

use crate::error::RenderError;
use crate::resource_set::GpuResourceSet;

/// What one call to [`FrameRenderer::render_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn(DrawStats),
    /// The device had no image this frame; an empty submission was made.
    NoSwapchainImage,
    /// The window has no area; nothing was recorded.
    Minimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawStats {
    pub target: Extent,
    pub index_count: u32,
    pub instance_count: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct FrameRenderer {
    pub clear_color: Color,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self { clear_color: Color::CHARCOAL }
    }
}

impl FrameRenderer {
    pub fn new(clear_color: Color) -> Self {
        Self { clear_color }
    }

    /// Records and submits one frame of `set` rotated to `elapsed_ms`.
    pub fn render_frame<D: GpuDevice>(
        &self,
        device: &mut D,
        set: &GpuResourceSet<D>,
        elapsed_ms: u64,
    ) -> Result<FrameOutcome, RenderError> {
        let (Some(size), Some(desc)) = (set.size(), set.target().pass_desc(self.clear_color)) else {
            log::debug!("skipping frame: window minimized");
            return Ok(FrameOutcome::Minimized);
        };

        let mut commands = device.acquire_commands("Frame")?;
        if commands.acquire_swapchain_image()?.is_none() {
            log::debug!("skipping frame: no swapchain image");
            device.submit(commands)?;
            return Ok(FrameOutcome::NoSwapchainImage);
        }

        let counts = set.counts();
        let mvp = transform::model_view_projection(size.width, size.height, elapsed_ms);
        {
            let mut pass = commands.begin_render_pass(&desc)?;
            pass.bind_pipeline(set.pipeline());
            pass.bind_vertex_buffer(0, set.vertex_buffer(), 0);
            pass.bind_index_buffer(set.index_buffer(), IndexFormat::Uint32, 0);
            pass.bind_fragment_samplers(0, &[(set.texture(), set.sampler())])?;
            pass.push_vertex_uniform(0, bytemuck::cast_slice(&mvp.to_cols_array()))?;
            pass.draw_indexed(counts.indices, 1, 0, 0, 0);
            pass.end();
        }
        device.submit(commands)?;

        Ok(FrameOutcome::Drawn(DrawStats {
            target: size,
            index_count: counts.indices,
            instance_count: 1,
        }))
    }
}
