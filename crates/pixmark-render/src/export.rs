//! Encoding rendered images to the configured output format.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use pixmark_core::OutputFormat;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Nothing to export")]
    Empty,
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

fn image_format(format: OutputFormat) -> ImageFormat {
    match format {
        OutputFormat::Bmp => ImageFormat::Bmp,
        OutputFormat::Gif => ImageFormat::Gif,
        OutputFormat::Jpg => ImageFormat::Jpeg,
        OutputFormat::Png => ImageFormat::Png,
        OutputFormat::Tiff => ImageFormat::Tiff,
    }
}

/// Encode `image` as `format`. `jpeg_quality` only applies to JPEG and is
/// clamped to 1..=100; JPEG output drops the alpha channel.
pub fn encode(image: &RgbaImage, format: OutputFormat, jpeg_quality: i32) -> ExportResult<Vec<u8>> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ExportError::Empty);
    }
    let mut bytes = Vec::new();
    let dynamic = DynamicImage::ImageRgba8(image.clone());
    match format {
        OutputFormat::Jpg => {
            let quality = jpeg_quality.clamp(1, 100) as u8;
            let rgb = dynamic.to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(&rgb)?;
        }
        other => dynamic.write_to(&mut Cursor::new(&mut bytes), image_format(other))?,
    }
    log::debug!(
        "Encoded {}x{} image as {} ({} bytes)",
        image.width(),
        image.height(),
        format.extension(),
        bytes.len()
    );
    Ok(bytes)
}

/// Encode and write `image` to `path`.
pub fn export_to_file(
    image: &RgbaImage,
    path: impl AsRef<Path>,
    format: OutputFormat,
    jpeg_quality: i32,
) -> ExportResult<()> {
    let path = path.as_ref();
    let bytes = encode(image, format, jpeg_quality)?;
    fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
