//! Read-only RGB pixel grids fed to the converter.
//!
//! [`Bitmap`] is the owned grid produced by [`load`]. The converter itself only
//! needs the [`PixelSource`] trait, so anything that can answer "what colour is
//! pixel (x, y)" can be converted, including `image::RgbImage` directly.

use std::path::{Path, PathBuf};

/// One pixel's channel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Sum of the three channels (0-765).
    #[inline]
    pub fn brightness(&self) -> u16 {
        self.r as u16 + self.g as u16 + self.b as u16
    }
}

/// Errors raised while reading a single pixel.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PixelError {
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("pixel ({x}, {y}) could not be read: {reason}")]
    Unreadable { x: u32, y: u32, reason: String },
}

/// Errors raised when building a [`Bitmap`] from raw parts.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BitmapError {
    #[error("bitmap must be at least 1x1 pixels")]
    ZeroSize,

    #[error("RGB buffer has {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Errors raised while loading an image file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to load image '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image '{}' has no pixels", .path.display())]
    EmptyImage { path: PathBuf },
}

/// Anything the converter can sample from.
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn pixel(&self, x: u32, y: u32) -> Result<Rgb, PixelError>;
}

/// An owned, immutable RGB image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Bitmap {
    /// Build a bitmap from row-major RGB bytes (3 per pixel).
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::ZeroSize);
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(BitmapError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a bitmap from a list of pixels in row-major order.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Rgb]) -> Result<Self, BitmapError> {
        let data = pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect();
        Self::from_raw(width, height, data)
    }

    /// Convert a decoded image, dropping any alpha channel.
    pub fn from_image(image: &image::DynamicImage) -> Result<Self, BitmapError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::from_raw(width, height, rgb.into_raw())
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl PixelSource for Bitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Result<Rgb, PixelError> {
        if x >= self.width || y >= self.height {
            return Err(PixelError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        match self.data.get(idx..idx + 3) {
            Some(rgb) => Ok(Rgb::new(rgb[0], rgb[1], rgb[2])),
            None => Err(PixelError::Unreadable {
                x,
                y,
                reason: "buffer too short".to_string(),
            }),
        }
    }
}

impl PixelSource for image::RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> Result<Rgb, PixelError> {
        let (width, height) = self.dimensions();
        self.get_pixel_checked(x, y)
            .map(|p| Rgb::new(p[0], p[1], p[2]))
            .ok_or(PixelError::OutOfBounds {
                x,
                y,
                width,
                height,
            })
    }
}

/// Decode an image file into a [`Bitmap`].
///
/// Any format the `image` crate can decode is accepted.
pub fn load(path: &Path) -> Result<Bitmap, LoadError> {
    let decoded = image::open(path).map_err(|e| LoadError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    let bitmap = Bitmap::from_image(&decoded).map_err(|_| LoadError::EmptyImage {
        path: path.to_path_buf(),
    })?;
    log::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        bitmap.width,
        bitmap.height
    );
    Ok(bitmap)
}
