//! prism_app: window, main loop and logging for the Prism viewer.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use prism_app::{App, ModelSource};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _ = prism_app::logging::init();
//!     App::new()
//!         .with_title("Spinning cube")
//!         .with_model(ModelSource::Cube)
//!         .with_texture("checker.png")
//!         .run()
//! }
//! ```

pub mod builder;
pub mod lifecycle;
pub mod logging;
mod runner;

pub use builder::{App, AppConfig, ModelSource};
pub use lifecycle::{AppEvent, Lifecycle, LoopAction};

// Re-exported so binaries don't need the renderer crates directly.
pub use prism_core::{Color, ContentPaths};
pub use prism_gpu::SampleCount;
pub use prism_renderer::FrameOutcome;
