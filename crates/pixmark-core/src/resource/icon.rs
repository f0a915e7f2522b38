//! Icon resources.

use super::{ImageResource, ResourceKind, ResourceResult, decode_ico, encode_ico};
use crate::drawing::{
    CompositingQuality, InterpolationMode, PixelOffsetMode, RenderHints, SmoothingMode,
};
use image::RgbaImage;
use std::sync::Arc;

/// A decoded icon (ICO container).
///
/// The encoded bytes and pixels are immutable once decoded; clones share
/// them.
#[derive(Debug, Clone)]
pub struct IconImage {
    encoded: Arc<[u8]>,
    bitmap: Arc<RgbaImage>,
}

impl IconImage {
    /// Build an icon from raw pixels.
    pub fn from_bitmap(bitmap: RgbaImage) -> ResourceResult<Self> {
        let encoded = encode_ico(&bitmap)?;
        Ok(Self {
            encoded: encoded.into(),
            bitmap: Arc::new(bitmap),
        })
    }
}

impl ImageResource for IconImage {
    const KIND: ResourceKind = ResourceKind::Icon;

    const RENDER_HINTS: RenderHints = RenderHints {
        smoothing: SmoothingMode::HighQuality,
        interpolation: InterpolationMode::NearestNeighbor,
        compositing: CompositingQuality::Default,
        pixel_offset: PixelOffsetMode::HighQuality,
    };

    const HAS_DEFAULT_SIZE: bool = true;

    fn decode(bytes: &[u8]) -> ResourceResult<Self> {
        let bitmap = decode_ico(bytes)?;
        Ok(Self {
            encoded: bytes.into(),
            bitmap: Arc::new(bitmap),
        })
    }

    fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::fixtures;
    use kurbo::Size;

    #[test]
    fn test_decode_icon() {
        let bytes = fixtures::ico_bytes(24, 16);
        let icon = IconImage::decode(&bytes).unwrap();
        assert_eq!(icon.size(), Size::new(24.0, 16.0));
        assert_eq!(icon.encoded(), bytes.as_slice());
    }

    #[test]
    fn test_from_bitmap_roundtrips() {
        let icon = IconImage::from_bitmap(fixtures::bitmap(8, 8, [1, 2, 3, 255])).unwrap();
        let again = IconImage::decode(icon.encoded()).unwrap();
        assert_eq!(again.bitmap().get_pixel(4, 4).0, [1, 2, 3, 255]);
    }
}
