//! winit driver for [`Lifecycle`].
//!
//! The window is created hidden, the device and scene are initialised, and
//! only then is the window shown. Each redraw renders one frame and requests
//! the next. The first fatal error is kept, the loop exits, and [`run`]
//! returns it after teardown.
use std::sync::Arc;

use anyhow::Context as _;
use prism_gpu::WgpuDevice;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::builder::AppConfig;
use crate::lifecycle::{AppEvent, Lifecycle, LoopAction};

struct Runner {
    config: AppConfig,
    // declared before the window: GPU resources go first
    lifecycle: Option<Lifecycle<WgpuDevice>>,
    window: Option<Arc<Window>>,
    error: Option<anyhow::Error>,
}

impl Runner {
    fn new(config: AppConfig) -> Self {
        Self { config, lifecycle: None, window: None, error: None }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_resizable(self.config.resizable)
            .with_visible(false)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attributes).context("couldn't create window")?);

        let size = window.inner_size();
        let device = pollster::block_on(WgpuDevice::new(
            Arc::clone(&window),
            size.width,
            size.height,
            self.config.vsync,
        ))
        .context("couldn't create GPU device")?;

        let paths = self.config.content_paths();
        log::info!("Loading content from {}", paths.content_dir().display());
        let lifecycle = Lifecycle::init(device, &self.config, &paths)?;

        window.set_visible(true);
        window.request_redraw();
        self.lifecycle = Some(lifecycle);
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: AppEvent) {
        let Some(lifecycle) = self.lifecycle.as_mut() else {
            return;
        };
        match lifecycle.handle_event(event) {
            Ok(LoopAction::Continue) => {}
            Ok(LoopAction::Exit) => event_loop.exit(),
            Err(err) => self.fail(event_loop, err),
        }
    }
}

impl ApplicationHandler for Runner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.dispatch(event_loop, AppEvent::Quit),
            WindowEvent::Resized(size) => self.dispatch(
                event_loop,
                AppEvent::Resized { width: size.width, height: size.height },
            ),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.dispatch(event_loop, AppEvent::Resized { width: size.width, height: size.height });
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(lifecycle) = self.lifecycle.as_mut() else {
                    return;
                };
                if let Err(err) = lifecycle.iterate() {
                    self.fail(event_loop, err);
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(lifecycle) = self.lifecycle.take() {
            lifecycle.quit();
        }
    }
}

/// Runs the application until the window closes. Returns the first fatal
/// error, if any, after the GPU resources have been released.
pub(crate) fn run(config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("couldn't create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = Runner::new(config);
    event_loop.run_app(&mut runner).context("event loop failed")?;

    // in case the loop ended without `exiting`
    if let Some(lifecycle) = runner.lifecycle.take() {
        lifecycle.quit();
    }
    match runner.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
