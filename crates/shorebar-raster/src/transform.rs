//! Icon image transforms.
//!
//! Two transforms cover the icon pipeline: [`to_bitmap`] turns any
//! [`IconImage`] into a decoded [`Bitmap`], and [`to_monochrome`] reduces
//! an image to a two-level white-on-transparent rendition for status bars
//! and notification surfaces.

use crate::bitmap::Bitmap;
use crate::icon_image::IconImage;

/// The "lit" monochrome output pixel: opaque white.
const MONO_ON: u32 = 0xffff_ffff;
/// The "unlit" monochrome output pixel: transparent black.
const MONO_OFF: u32 = 0x0000_0000;

/// Convert an icon image into a decoded bitmap.
///
/// Bitmaps pass through unchanged, without copying. Painters are
/// rasterized at their intrinsic size; non-positive dimensions are
/// substituted with 1, so the result is always at least 1x1.
pub fn to_bitmap(image: IconImage) -> Bitmap {
    match image {
        IconImage::Bitmap(bitmap) => bitmap,
        IconImage::Painter(painter) => {
            let width = painter.intrinsic_width().max(1) as u32;
            let height = painter.intrinsic_height().max(1) as u32;
            let mut target = Bitmap::new(width, height);
            painter.paint(&mut target);
            target
        }
    }
}

/// Reduce an icon image to a two-level monochrome bitmap.
///
/// Every pixel whose HSV value channel exceeds `threshold` becomes opaque
/// white; every other pixel becomes transparent black. The threshold is
/// not clamped, so values outside `[0, 1]` legitimately produce all-white
/// or all-transparent output.
pub fn to_monochrome(image: IconImage, threshold: f32) -> Bitmap {
    let source = to_bitmap(image);
    source.map_pixels(|_x, _y, argb| {
        if value_channel(argb) > threshold {
            MONO_ON
        } else {
            MONO_OFF
        }
    })
}

/// The HSV value channel of a packed ARGB pixel, in `[0, 1]`.
///
/// Computed directly as `max(r, g, b) / 255`. Alpha is ignored.
pub fn value_channel(argb: u32) -> f32 {
    let r = ((argb >> 16) & 0xff) as u8;
    let g = ((argb >> 8) & 0xff) as u8;
    let b = (argb & 0xff) as u8;
    r.max(g).max(b) as f32 / 255.0
}
