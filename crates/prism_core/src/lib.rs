//! prism_core: CPU-side building blocks shared by every Prism crate.
//!
//! | Module      | Responsibility                                          |
//! |-------------|---------------------------------------------------------|
//! | `geometry`  | `Vertex`, `Mesh` and the built-in primitives            |
//! | `image`     | `ImageBuffer`, the decoded RGBA8 pixel rows             |
//! | `color`     | Linear RGBA colour used for clear values                |
//! | `time`      | Frame clock driving the rotation                        |
//! | `transform` | Projection / view / model matrices for the spinning mesh|
//! | `paths`     | `ContentPaths`, the root of the on-disk content layout  |

pub mod color;
pub mod geometry;
pub mod image;
pub mod paths;
pub mod time;
pub mod transform;

pub use color::Color;
pub use geometry::{Mesh, MeshCounts, MeshError, Vertex};
pub use image::{ImageBuffer, ImageError, PixelFormat};
pub use paths::ContentPaths;
pub use time::TimeClock;

// glam is part of the public API (matrices handed to the renderer)
pub use glam;
