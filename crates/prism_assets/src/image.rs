//! Image decoding into [`ImageBuffer`]s.
//!
//! Whatever the source layout (RGB, grey, 16-bit...), the result is RGBA8;
//! missing alpha becomes fully opaque.
use std::path::Path;

use prism_core::{ContentPaths, ImageBuffer};

use crate::error::AssetError;

/// The only channel count the renderer uploads.
pub const RGBA_CHANNELS: u32 = 4;

#[derive(Debug, Clone)]
pub struct ImageLoader {
    paths: ContentPaths,
}

impl ImageLoader {
    pub fn new(paths: ContentPaths) -> Self {
        Self { paths }
    }

    /// Loads `Content/Images/<file_name>` with `desired_channels` per pixel.
    pub fn load(&self, file_name: &str, desired_channels: u32) -> Result<ImageBuffer, AssetError> {
        load_path(&self.paths.image(file_name), desired_channels)
    }
}

pub fn load_path(path: &Path, desired_channels: u32) -> Result<ImageBuffer, AssetError> {
    if desired_channels != RGBA_CHANNELS {
        return Err(AssetError::UnsupportedChannelCount(desired_channels));
    }

    let decoded = image::open(path).map_err(|source| AssetError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    if !matches!(decoded, image::DynamicImage::ImageRgba8(_)) {
        log::debug!("converting {} from {:?} to RGBA8", path.display(), decoded.color());
    }

    let rgba = decoded.into_rgba8();
    let (width, height) = rgba.dimensions();
    log::info!("Loaded image {} ({width}x{height})", path.display());
    Ok(ImageBuffer::from_rgba8(width, height, rgba.into_raw())?)
}
