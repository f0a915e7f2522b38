//! Image resources held by drawable containers.
//!
//! A resource keeps the bytes it was decoded from (so it can be persisted
//! as-is) next to the decoded RGBA bitmap used for drawing.

mod cursor;
mod icon;

pub use cursor::CursorImage;
pub use icon::IconImage;

use crate::drawing::RenderHints;
use image::codecs::ico::IcoEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Resource errors.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Malformed resource: {0}")]
    Malformed(String),
    #[error("Resource has no pixels")]
    Empty,
}

/// Result type for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Kind of image resource a container holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Cursor,
    Icon,
}

/// A decoded image resource owned by a container.
pub trait ImageResource: Clone + fmt::Debug {
    /// Which kind of resource this is.
    const KIND: ResourceKind;

    /// Surface hints used when drawing this resource.
    const RENDER_HINTS: RenderHints;

    /// Whether containers of this resource report a default size.
    const HAS_DEFAULT_SIZE: bool;

    /// Decode a resource from its file bytes.
    fn decode(bytes: &[u8]) -> ResourceResult<Self>;

    /// The bytes this resource persists as.
    fn encoded(&self) -> &[u8];

    /// The decoded pixels.
    fn bitmap(&self) -> &RgbaImage;

    /// Native size in pixels.
    fn size(&self) -> Size {
        let (w, h) = self.bitmap().dimensions();
        Size::new(f64::from(w), f64::from(h))
    }
}

/// Size of the ICONDIR header.
pub(crate) const ICON_DIR_LEN: usize = 6;
/// Size of one ICONDIRENTRY.
pub(crate) const ICON_DIR_ENTRY_LEN: usize = 16;
/// `type` value of icon files.
pub(crate) const TYPE_ICON: u16 = 1;
/// `type` value of cursor files.
pub(crate) const TYPE_CURSOR: u16 = 2;

pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

pub(crate) fn write_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Validate the ICONDIR header and return its `type` field.
pub(crate) fn icon_dir_type(bytes: &[u8]) -> ResourceResult<u16> {
    if bytes.len() < ICON_DIR_LEN + ICON_DIR_ENTRY_LEN {
        return Err(ResourceError::Malformed(format!(
            "{} bytes is too short for an icon directory",
            bytes.len()
        )));
    }
    if read_u16(bytes, 0) != 0 {
        return Err(ResourceError::Malformed("reserved header field is not zero".to_string()));
    }
    if read_u16(bytes, 4) == 0 {
        return Err(ResourceError::Malformed("icon directory has no images".to_string()));
    }
    Ok(read_u16(bytes, 2))
}

/// Decode an ICO container into RGBA pixels.
pub(crate) fn decode_ico(bytes: &[u8]) -> ResourceResult<RgbaImage> {
    let bitmap = image::load_from_memory_with_format(bytes, ImageFormat::Ico)?.to_rgba8();
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Err(ResourceError::Empty);
    }
    Ok(bitmap)
}

/// Encode RGBA pixels as a single-image ICO container.
pub(crate) fn encode_ico(bitmap: &RgbaImage) -> ResourceResult<Vec<u8>> {
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Err(ResourceError::Empty);
    }
    let mut bytes = Vec::new();
    IcoEncoder::new(&mut bytes).write_image(
        bitmap.as_raw(),
        bitmap.width(),
        bitmap.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use image::Rgba;

    /// A bitmap whose top-left pixel is red and the rest is `fill`.
    pub fn bitmap(width: u32, height: u32, fill: [u8; 4]) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(width, height, Rgba(fill));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img
    }

    /// ICO file bytes for a `width`x`height` bitmap.
    pub fn ico_bytes(width: u32, height: u32) -> Vec<u8> {
        encode_ico(&bitmap(width, height, [0, 0, 255, 255])).unwrap()
    }

    /// CUR file bytes for a `width`x`height` bitmap.
    pub fn cur_bytes(width: u32, height: u32, hotspot: (u16, u16)) -> Vec<u8> {
        let mut bytes = ico_bytes(width, height);
        write_u16(&mut bytes, 2, TYPE_CURSOR);
        write_u16(&mut bytes, ICON_DIR_LEN + 4, hotspot.0);
        write_u16(&mut bytes, ICON_DIR_LEN + 6, hotspot.1);
        bytes
    }

    /// CUR file bytes with one square entry per `(size, hotspot)`, in order.
    pub fn multi_cur_bytes(entries: &[(u32, (u16, u16))]) -> Vec<u8> {
        let dir_len = ICON_DIR_LEN + entries.len() * ICON_DIR_ENTRY_LEN;
        let mut dir = vec![0u8; dir_len];
        write_u16(&mut dir, 2, TYPE_CURSOR);
        write_u16(&mut dir, 4, entries.len() as u16);
        let mut data = Vec::new();
        for (i, &(size, hotspot)) in entries.iter().enumerate() {
            let single = cur_bytes(size, size, hotspot);
            let header = &single[ICON_DIR_LEN..ICON_DIR_LEN + ICON_DIR_ENTRY_LEN];
            let offset = u32::from_le_bytes(header[12..16].try_into().unwrap()) as usize;
            let entry = ICON_DIR_LEN + i * ICON_DIR_ENTRY_LEN;
            dir[entry..entry + ICON_DIR_ENTRY_LEN].copy_from_slice(header);
            let moved = (dir_len + data.len()) as u32;
            dir[entry + 12..entry + 16].copy_from_slice(&moved.to_le_bytes());
            data.extend_from_slice(&single[offset..]);
        }
        dir.extend(data);
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ico_roundtrip_keeps_pixels() {
        let bitmap = fixtures::bitmap(16, 16, [0, 255, 0, 255]);
        let bytes = encode_ico(&bitmap).unwrap();
        assert_eq!(icon_dir_type(&bytes).unwrap(), TYPE_ICON);

        let decoded = decode_ico(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(5, 5).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_short_header_rejected() {
        assert!(matches!(icon_dir_type(&[0, 0, 1, 0]), Err(ResourceError::Malformed(_))));
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let garbage = vec![7u8; 64];
        assert!(decode_ico(&garbage).is_err());
    }

    #[test]
    fn test_empty_bitmap_rejected() {
        assert!(matches!(encode_ico(&RgbaImage::new(0, 0)), Err(ResourceError::Empty)));
    }
}
