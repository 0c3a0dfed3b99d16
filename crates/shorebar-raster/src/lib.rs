//! Pixel buffers and icon image transforms for Shorebar.
//!
//! This crate provides the CPU-side image types the icon engine works with:
//!
//! - [`Bitmap`]: a decoded ARGB pixel buffer with packed `0xAARRGGBB` access
//! - [`IconImage`] / [`IconPainter`]: resolved icons, decoded or painted on demand
//! - [`to_bitmap`] / [`to_monochrome`]: the transforms applied to resolved icons
//!
//! # Example
//!
//! ```
//! use shorebar_raster::{Bitmap, IconImage, to_monochrome};
//!
//! // A light gray icon reduced to white-on-transparent.
//! let icon = IconImage::Bitmap(Bitmap::filled(4, 4, 0xffc0_c0c0));
//! let mono = to_monochrome(icon, 0.5);
//!
//! assert_eq!(mono.get_pixel(0, 0), Some(0xffff_ffff));
//! ```

mod bitmap;
mod error;
mod icon_image;
mod transform;

pub use bitmap::Bitmap;
pub use error::{RasterError, RasterResult};
pub use icon_image::{IconImage, IconPainter};
pub use transform::{to_bitmap, to_monochrome, value_channel};
