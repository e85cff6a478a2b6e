use std::sync::Arc;

use crate::error::{GpuError, GpuResult};
use crate::types::Extent;

use super::conv;

/// The wgpu objects shared by the device and every command context.
///
/// `Device`, `Queue` and `Surface` sit behind `Arc` so a command context can
/// hold them while the device is borrowed mutably for the next resize.
pub struct WgpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub surface: Arc<wgpu::Surface<'static>>,
    pub config: wgpu::SurfaceConfiguration,
    /// Client-area size as last reported, zero while minimized. The surface
    /// itself never drops below 1×1.
    pub window_size: Extent,
}

impl WgpuContext {
    /// Creates the device for `target` and configures its surface at
    /// `width × height`.
    ///
    /// The adapter is requested with the surface as `compatible_surface` so
    /// presentation never goes through a cross-adapter copy.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> GpuResult<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(target)
            .map_err(|e| GpuError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::AdapterUnavailable)?;

        let info = adapter.get_info();
        log::info!("Using GPU device driver: {} ({:?})", info.name, info.backend);

        // the second depth candidate needs an optional feature
        let required_features = adapter.features() & wgpu::Features::DEPTH32FLOAT_STENCIL8;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Prism Device"),
                    required_features,
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| GpuError::DeviceRequest(e.to_string()))?;

        device.on_uncaptured_error(Box::new(|err| {
            log::error!("uncaptured wgpu error: {err}");
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .filter(|f| conv::from_wgpu_format(*f).is_some())
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.iter().copied().find(|f| conv::from_wgpu_format(*f).is_some()))
            .ok_or_else(|| GpuError::Surface(format!("no usable swapchain format in {:?}", caps.formats)))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::debug!("swapchain configured: {format:?} {}x{} {present_mode:?}", config.width, config.height);

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
            surface: Arc::new(surface),
            config,
            window_size: Extent::new(width, height),
        })
    }

    /// Records the new window size and reconfigures the surface unless the
    /// window is minimized.
    pub fn resize(&mut self, width: u32, height: u32) {
        if track_resize(&mut self.window_size, &mut self.config, width, height) {
            self.surface.configure(&self.device, &self.config);
        }
    }
}

/// Returns whether `config` changed and the surface needs configuring.
fn track_resize(window: &mut Extent, config: &mut wgpu::SurfaceConfiguration, width: u32, height: u32) -> bool {
    *window = Extent::new(width, height);
    if window.is_empty() || (config.width == width && config.height == height) {
        return false;
    }
    config.width = width;
    config.height = height;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: u32, height: u32) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    #[test]
    fn minimize_keeps_surface_but_reports_zero() {
        let mut window = Extent::new(800, 600);
        let mut cfg = config(800, 600);
        assert!(!track_resize(&mut window, &mut cfg, 0, 0));
        assert!(window.is_empty());
        assert_eq!((cfg.width, cfg.height), (800, 600));
    }

    #[test]
    fn restore_reconfigures_only_on_change() {
        // surface created 1×1 for a window that started minimized
        let mut window = Extent::new(0, 0);
        let mut cfg = config(1, 1);
        assert!(track_resize(&mut window, &mut cfg, 1024, 768));
        assert_eq!(window, Extent::new(1024, 768));
        assert_eq!((cfg.width, cfg.height), (1024, 768));
        assert!(!track_resize(&mut window, &mut cfg, 1024, 768));
    }
}
