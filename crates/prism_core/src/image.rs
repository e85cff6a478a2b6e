//! Decoded pixel data waiting to be uploaded.
//!
//! An `ImageBuffer` is produced by the image loader, moved into the upload
//! pipeline and dropped there once its rows are in the staging buffer.
use thiserror::Error;

/// Channel layout of an [`ImageBuffer`]. Only RGBA8 exists today: the loader
/// converts every decoded image to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
}

impl PixelFormat {
    #[inline]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            PixelFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("image has a zero dimension ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },
    #[error("pitch {pitch} is smaller than one row of {width} pixels ({min} bytes)")]
    PitchTooSmall { pitch: u32, width: u32, min: u32 },
    #[error("pixel buffer holds {actual} bytes, expected pitch × height = {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pitch: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl ImageBuffer {
    /// Wraps raw rows. `pitch` is the byte distance between rows and may
    /// include padding past `width × 4`.
    pub fn new(width: u32, height: u32, pitch: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        let format = PixelFormat::Rgba8;
        if width == 0 || height == 0 {
            return Err(ImageError::ZeroSize { width, height });
        }
        let min = width.saturating_mul(format.bytes_per_pixel());
        if pitch < min {
            return Err(ImageError::PitchTooSmall { pitch, width, min });
        }
        let expected = pitch as usize * height as usize;
        if pixels.len() != expected {
            return Err(ImageError::SizeMismatch { expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pitch, format, pixels })
    }

    /// Tightly packed RGBA8 rows (`pitch == width × 4`).
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        Self::new(width, height, width.saturating_mul(4), pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// All rows including any per-row padding.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bytes of visible pixel data in one row (`width × 4`).
    #[inline]
    pub fn row_bytes(&self) -> u32 {
        self.width * self.format.bytes_per_pixel()
    }

    /// Visible pixels of row `y`, without padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.pitch as usize;
        &self.pixels[start..start + self.row_bytes() as usize]
    }

    /// RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let row = self.row(y);
        let i = x as usize * 4;
        [row[i], row[i + 1], row[i + 2], row[i + 3]]
    }
}

// pixel dumps are useless in logs
impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch)
            .field("format", &self.format)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}
