//! prism_gpu: the GPU device seam.
//!
//! | Module         | Responsibility                                            |
//! |----------------|-----------------------------------------------------------|
//! | `device`       | `GpuDevice`, `CommandContext`, `CopyPass`, `RenderPassEncoder` |
//! | `types`        | Backend-neutral descriptors and enums                     |
//! | `error`        | `GpuError`                                                |
//! | `wgpu_backend` | The real device, built on `wgpu`                          |
//! | `headless`     | Recording device for tests (`headless` feature)           |

pub mod device;
pub mod error;
pub mod types;
pub mod wgpu_backend;

#[cfg(any(test, feature = "headless"))]
pub mod headless;

pub use device::{CommandContext, CopyPass, GpuBuffer, GpuDevice, GpuTexture, RenderPassEncoder};
pub use error::{GpuError, GpuResult};
pub use types::*;
pub use wgpu_backend::{WgpuContext, WgpuDevice};
