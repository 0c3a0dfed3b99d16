//! Decoded pixel buffers.
//!
//! This module provides [`Bitmap`], an owned ARGB image with 8 bits per
//! channel. Pixels are read and written as packed `0xAARRGGBB` words, the
//! form the icon transforms operate on.
//!
//! # Example
//!
//! ```
//! use shorebar_raster::Bitmap;
//!
//! let mut bitmap = Bitmap::new(32, 32);
//! bitmap.put_pixel(0, 0, 0xffff_0000);
//!
//! assert_eq!(bitmap.get_pixel(0, 0), Some(0xffff_0000));
//! assert_eq!(bitmap.byte_count(), 32 * 32 * 4);
//! ```

use image::{Rgba, RgbaImage};

use crate::error::{RasterError, RasterResult};

/// An owned, decoded ARGB pixel buffer.
///
/// `Bitmap` wraps `image::RgbaImage` and exposes packed-word pixel access.
/// Out-of-bounds reads return `None` and out-of-bounds writes are ignored.
///
/// The [`byte_count`](Self::byte_count) of a bitmap is the length of its
/// decoded pixel data (width × height × 4) and is what the icon cache
/// charges against its budget.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    inner: RgbaImage,
}

impl Bitmap {
    /// Create a transparent bitmap with the given dimensions.
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: RgbaImage::new(width, height),
        }
    }

    /// Create a bitmap filled with a single packed ARGB color.
    pub fn filled(width: u32, height: u32, argb: u32) -> Self {
        let mut inner = RgbaImage::new(width, height);
        let pixel = unpack(argb);
        for p in inner.pixels_mut() {
            *p = pixel;
        }
        Self { inner }
    }

    /// Decode an encoded image (PNG, JPEG, ...) into a bitmap.
    pub fn from_bytes(bytes: &[u8]) -> RasterResult<Self> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self {
            inner: decoded.to_rgba8(),
        })
    }

    /// Build a bitmap from packed ARGB words in row-major order.
    ///
    /// `data` must hold exactly `width * height` words.
    pub fn from_argb(width: u32, height: u32, data: &[u32]) -> RasterResult<Self> {
        let expected = (width as usize) * (height as usize);
        if data.len() != expected {
            return Err(RasterError::InvalidBuffer {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        let mut raw = Vec::with_capacity(expected * 4);
        for &argb in data {
            raw.extend_from_slice(&unpack(argb).0);
        }
        let inner = RgbaImage::from_raw(width, height, raw).ok_or(RasterError::InvalidBuffer {
            width,
            height,
            expected,
            actual: data.len(),
        })?;
        Ok(Self { inner })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Dimensions as a (width, height) tuple.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Length of the decoded pixel data in bytes.
    #[inline]
    pub fn byte_count(&self) -> usize {
        self.inner.as_raw().len()
    }

    /// Read a pixel as a packed `0xAARRGGBB` word.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(pack(*self.inner.get_pixel(x, y)))
    }

    /// Write a pixel from a packed `0xAARRGGBB` word.
    ///
    /// Does nothing if the coordinates are out of bounds.
    pub fn put_pixel(&mut self, x: u32, y: u32, argb: u32) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        self.inner.put_pixel(x, y, unpack(argb));
    }

    /// Iterate over all pixels as ((x, y), packed word) tuples.
    pub fn pixels(&self) -> impl Iterator<Item = ((u32, u32), u32)> + '_ {
        self.inner
            .enumerate_pixels()
            .map(|(x, y, p)| ((x, y), pack(*p)))
    }

    /// Build a new bitmap by transforming every pixel.
    ///
    /// The function receives the (x, y) coordinates and the packed word,
    /// and returns the new packed word.
    #[must_use]
    pub fn map_pixels<F>(&self, mut f: F) -> Self
    where
        F: FnMut(u32, u32, u32) -> u32,
    {
        let mut out = self.inner.clone();
        for (x, y, p) in out.enumerate_pixels_mut() {
            *p = unpack(f(x, y, pack(*p)));
        }
        Self { inner: out }
    }

    /// Raw RGBA bytes in row-major order, 4 bytes per pixel.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_raw()
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[inline]
fn pack(pixel: Rgba<u8>) -> u32 {
    let [r, g, b, a] = pixel.0;
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[inline]
fn unpack(argb: u32) -> Rgba<u8> {
    Rgba([
        (argb >> 16) as u8,
        (argb >> 8) as u8,
        argb as u8,
        (argb >> 24) as u8,
    ])
}
