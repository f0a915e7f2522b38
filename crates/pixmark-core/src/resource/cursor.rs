//! Cursor resources.
//!
//! CUR files share the ICO layout; the directory `type` is 2 and the
//! planes/bit-count fields of each entry hold the hotspot instead.

use super::{
    ICON_DIR_ENTRY_LEN, ICON_DIR_LEN, ImageResource, ResourceError, ResourceKind,
    ResourceResult, TYPE_CURSOR, TYPE_ICON, decode_ico, encode_ico, icon_dir_type, read_u16,
    write_u16,
};
use crate::drawing::{
    CompositingQuality, InterpolationMode, PixelOffsetMode, RenderHints, SmoothingMode,
};
use image::RgbaImage;
use kurbo::Point;
use std::sync::Arc;

const ENTRY_HOTSPOT_X: usize = ICON_DIR_LEN + 4;
const ENTRY_HOTSPOT_Y: usize = ICON_DIR_LEN + 6;

fn entry_extent(byte: u8) -> u32 {
    match byte {
        0 => 256,
        n => u32::from(n),
    }
}

/// Decode a CUR file, returning the hotspot of the entry whose bitmap is
/// returned.
///
/// The ICO decoder ranks entries by bit count and area, and in a CUR the bit
/// count field is the hotspot's y. Every entry is rewritten to 32 bpp so the
/// ranking is by area alone, and the same entry is picked here: the largest,
/// with the last entry winning a tie against earlier ones.
fn decode_cursor(bytes: &[u8]) -> ResourceResult<((u16, u16), RgbaImage)> {
    let count = usize::from(read_u16(bytes, 4));
    let dir_len = ICON_DIR_LEN + count * ICON_DIR_ENTRY_LEN;
    if bytes.len() < dir_len {
        return Err(ResourceError::Malformed(format!(
            "{} bytes is too short for {} cursor entries",
            bytes.len(),
            count
        )));
    }

    let mut patched = bytes.to_vec();
    let mut areas = Vec::with_capacity(count);
    for i in 0..count {
        let entry = ICON_DIR_LEN + i * ICON_DIR_ENTRY_LEN;
        areas.push(entry_extent(bytes[entry]) * entry_extent(bytes[entry + 1]));
        write_u16(&mut patched, entry + 4, 1);
        write_u16(&mut patched, entry + 6, 32);
    }
    let last = count - 1;
    let mut chosen = last;
    for i in 0..last {
        if areas[i] > areas[chosen] {
            chosen = i;
        }
    }

    let entry = chosen * ICON_DIR_ENTRY_LEN;
    let hotspot = (
        read_u16(bytes, ENTRY_HOTSPOT_X + entry),
        read_u16(bytes, ENTRY_HOTSPOT_Y + entry),
    );
    log::trace!("Cursor entry {} of {} has hotspot {:?}", chosen, count, hotspot);
    Ok((hotspot, decode_ico(&patched)?))
}

/// A decoded cursor with its hotspot.
#[derive(Debug, Clone)]
pub struct CursorImage {
    encoded: Arc<[u8]>,
    bitmap: Arc<RgbaImage>,
    hotspot: (u16, u16),
}

impl CursorImage {
    /// Synthesize a cursor from a bitmap and hotspot.
    pub fn from_bitmap(bitmap: RgbaImage, hotspot: (u16, u16)) -> ResourceResult<Self> {
        let mut encoded = encode_ico(&bitmap)?;
        write_u16(&mut encoded, 2, TYPE_CURSOR);
        write_u16(&mut encoded, ENTRY_HOTSPOT_X, hotspot.0);
        write_u16(&mut encoded, ENTRY_HOTSPOT_Y, hotspot.1);
        Ok(Self {
            encoded: encoded.into(),
            bitmap: Arc::new(bitmap),
            hotspot,
        })
    }

    /// Hotspot in bitmap pixels.
    pub fn hotspot(&self) -> (u16, u16) {
        self.hotspot
    }

    /// Hotspot as a point.
    pub fn hotspot_point(&self) -> Point {
        Point::new(f64::from(self.hotspot.0), f64::from(self.hotspot.1))
    }
}

impl ImageResource for CursorImage {
    const KIND: ResourceKind = ResourceKind::Cursor;

    const RENDER_HINTS: RenderHints = RenderHints {
        smoothing: SmoothingMode::HighQuality,
        interpolation: InterpolationMode::NearestNeighbor,
        compositing: CompositingQuality::Default,
        pixel_offset: PixelOffsetMode::None,
    };

    const HAS_DEFAULT_SIZE: bool = false;

    fn decode(bytes: &[u8]) -> ResourceResult<Self> {
        let kind = icon_dir_type(bytes)?;
        let (hotspot, bitmap) = match kind {
            TYPE_CURSOR => decode_cursor(bytes)?,
            TYPE_ICON => ((0, 0), decode_ico(bytes)?),
            other => {
                return Err(ResourceError::Malformed(format!(
                    "unknown icon directory type {}",
                    other
                )));
            }
        };
        Ok(Self {
            encoded: bytes.into(),
            bitmap: Arc::new(bitmap),
            hotspot,
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
    fn test_decode_cursor_reads_hotspot() {
        let bytes = fixtures::cur_bytes(32, 32, (3, 7));
        let cursor = CursorImage::decode(&bytes).unwrap();
        assert_eq!(cursor.hotspot(), (3, 7));
        assert_eq!(cursor.size(), Size::new(32.0, 32.0));
        assert_eq!(cursor.bitmap().get_pixel(0, 0).0, [255, 0, 0, 255]);
        // Persisted bytes are the original file, hotspot included.
        assert_eq!(cursor.encoded(), bytes.as_slice());
    }

    #[test]
    fn test_hotspot_follows_decoded_entry() {
        // The larger entry is decoded whatever order or hotspots the entries have.
        let bytes = fixtures::multi_cur_bytes(&[(16, (1, 2)), (64, (5, 40))]);
        let cursor = CursorImage::decode(&bytes).unwrap();
        assert_eq!(cursor.bitmap().dimensions(), (64, 64));
        assert_eq!(cursor.hotspot(), (5, 40));

        let bytes = fixtures::multi_cur_bytes(&[(64, (5, 6)), (16, (1, 50))]);
        let cursor = CursorImage::decode(&bytes).unwrap();
        assert_eq!(cursor.bitmap().dimensions(), (64, 64));
        assert_eq!(cursor.hotspot(), (5, 6));
        assert_eq!(cursor.encoded(), bytes.as_slice());
    }

    #[test]
    fn test_truncated_cursor_directory() {
        let mut bytes = fixtures::cur_bytes(16, 16, (0, 0));
        write_u16(&mut bytes, 4, 40);
        assert!(matches!(CursorImage::decode(&bytes), Err(ResourceError::Malformed(_))));
    }

    #[test]
    fn test_icon_file_as_cursor() {
        let cursor = CursorImage::decode(&fixtures::ico_bytes(16, 16)).unwrap();
        assert_eq!(cursor.hotspot(), (0, 0));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let mut bytes = fixtures::ico_bytes(16, 16);
        write_u16(&mut bytes, 2, 9);
        assert!(matches!(CursorImage::decode(&bytes), Err(ResourceError::Malformed(_))));
    }

    #[test]
    fn test_synthesized_cursor_persists_hotspot() {
        let bitmap = fixtures::bitmap(16, 16, [0, 0, 0, 255]);
        let cursor = CursorImage::from_bitmap(bitmap, (1, 14)).unwrap();
        assert_eq!(cursor.hotspot_point(), Point::new(1.0, 14.0));

        let restored = CursorImage::decode(cursor.encoded()).unwrap();
        assert_eq!(restored.hotspot(), (1, 14));
        assert_eq!(restored.bitmap().dimensions(), (16, 16));
    }
}
