//! Icon image sources.
//!
//! [`IconImage`] is the currency of icon resolution: either a decoded
//! [`Bitmap`] or an [`IconPainter`] that rasterizes itself on demand
//! (vector art, layered compositions, anything without a fixed pixel
//! buffer).

use std::fmt;
use std::sync::Arc;

use crate::bitmap::Bitmap;

/// An icon that paints itself when rasterized.
///
/// Implementations report an intrinsic size and draw over the full extent
/// of a target buffer. Non-positive intrinsic dimensions mean the painter
/// has no preferred size; rasterization substitutes 1 pixel per axis.
pub trait IconPainter: Send + Sync {
    /// Preferred width in pixels, or a non-positive value if unsized.
    fn intrinsic_width(&self) -> i32;

    /// Preferred height in pixels, or a non-positive value if unsized.
    fn intrinsic_height(&self) -> i32;

    /// Paint the icon across the entire target, origin at the top left.
    fn paint(&self, target: &mut Bitmap);
}

/// An image produced by icon resolution.
#[derive(Clone)]
pub enum IconImage {
    /// A decoded, pixel-addressable bitmap.
    Bitmap(Bitmap),
    /// A shared painter that rasterizes on demand.
    Painter(Arc<dyn IconPainter>),
}

impl IconImage {
    /// Whether this image is already a decoded bitmap.
    #[inline]
    pub fn is_bitmap(&self) -> bool {
        matches!(self, IconImage::Bitmap(_))
    }

    /// The decoded bitmap, if this image is one.
    pub fn as_bitmap(&self) -> Option<&Bitmap> {
        match self {
            IconImage::Bitmap(bitmap) => Some(bitmap),
            IconImage::Painter(_) => None,
        }
    }
}

impl From<Bitmap> for IconImage {
    fn from(bitmap: Bitmap) -> Self {
        IconImage::Bitmap(bitmap)
    }
}

impl fmt::Debug for IconImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconImage::Bitmap(bitmap) => f.debug_tuple("Bitmap").field(bitmap).finish(),
            IconImage::Painter(painter) => f
                .debug_struct("Painter")
                .field("intrinsic_width", &painter.intrinsic_width())
                .field("intrinsic_height", &painter.intrinsic_height())
                .finish(),
        }
    }
}
