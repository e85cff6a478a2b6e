//! The main loop state machine, independent of the windowing layer.
//!
//! ```text
//! init ──► ┬─ handle_event(Resized) ─┐
//!          ├─ iterate ───────────────┤ (repeat)
//!          └─ handle_event(Quit) ──► quit
//! ```
//!
//! Any error returned from here is fatal: the runner logs it, leaves the
//! event loop and tears down through [`Lifecycle::quit`].
use anyhow::Context as _;
use prism_assets::{ImageLoader, MeshLoader, ShaderLoader};
use prism_core::{ContentPaths, Mesh, TimeClock};
use prism_gpu::GpuDevice;
use prism_renderer::{FrameOutcome, FrameRenderer, Renderer, ResourceSetDesc, ShaderPair};

use crate::builder::{AppConfig, ModelSource};

/// Signals from the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// New client-area size in physical pixels; may be zero when minimized.
    Resized { width: u32, height: u32 },
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    Exit,
}

pub struct Lifecycle<D: GpuDevice> {
    renderer: Renderer<D>,
    clock: TimeClock,
}

impl<D: GpuDevice> Lifecycle<D> {
    /// Loads the scene described by `config` from `paths` and creates every
    /// GPU resource on `device`.
    pub fn init(device: D, config: &AppConfig, paths: &ContentPaths) -> anyhow::Result<Self> {
        log::debug!("initializing on {}", device.driver_name());

        let shaders = ShaderPair::load(
            &ShaderLoader::new(paths.clone()),
            &device,
            &config.vertex_shader,
            &config.fragment_shader,
        )
        .context("couldn't load shaders")?;

        let image = ImageLoader::new(paths.clone())
            .load(&config.texture, prism_assets::image::RGBA_CHANNELS)
            .with_context(|| format!("couldn't load texture {}", config.texture))?;

        let mesh = match &config.model {
            ModelSource::Obj(file_name) => MeshLoader::new(paths.clone())
                .load(file_name)
                .with_context(|| format!("couldn't load model {file_name}"))?,
            ModelSource::Cube => Mesh::cube(),
        };

        let desc = ResourceSetDesc { sample_count: config.sample_count, texture_label: &config.texture };
        let renderer = Renderer::new(device, shaders, &mesh, image, &desc, FrameRenderer::new(config.clear_color))
            .context("couldn't create GPU resources")?;

        Ok(Self { renderer, clock: TimeClock::new() })
    }

    pub fn handle_event(&mut self, event: AppEvent) -> anyhow::Result<LoopAction> {
        match event {
            AppEvent::Resized { width, height } => {
                self.renderer
                    .resize(width, height)
                    .with_context(|| format!("couldn't resize to {width}x{height}"))?;
                Ok(LoopAction::Continue)
            }
            AppEvent::Quit => Ok(LoopAction::Exit),
        }
    }

    /// Renders one frame at the current clock time.
    pub fn iterate(&mut self) -> anyhow::Result<FrameOutcome> {
        self.renderer.render(self.clock.elapsed_ms()).context("couldn't render frame")
    }

    pub fn renderer(&self) -> &Renderer<D> {
        &self.renderer
    }

    /// Waits for the device to finish, then releases everything.
    pub fn quit(self) {
        log::info!("Shutting down");
        drop(self);
    }
}
