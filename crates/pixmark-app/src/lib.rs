//! Pixmark command line shell.
//!
//! Loads a cursor or icon into a container, renders it at the requested
//! scale and writes it out according to the output settings.

use kurbo::{Point, Rect};
use pixmark_core::config::{ConfigError, ConfigStore, OutputConfig};
use pixmark_core::container::{ContainerError, CursorContainer, DrawableContainer, IconContainer};
use pixmark_core::{EditorSurface, RenderMode};
use pixmark_render::{ExportError, RasterSurface, export_to_file};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("usage: pixmark <file.cur|file.ico> [scale]")]
    Usage,
    #[error("Invalid scale {0:?}, expected a positive number within the export size limit")]
    InvalidScale(String),
    #[error("Unsupported input {}, expected a .cur or .ico file", .0.display())]
    UnsupportedInput(PathBuf),
    #[error("Nothing to export from {}", .0.display())]
    Empty(PathBuf),
    #[error("{} already exists and overwriting is disabled", .0.display())]
    Exists(PathBuf),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Largest image `run` will render, in pixels.
pub const MAX_EXPORT_PIXELS: f64 = 8192.0 * 8192.0;

/// One export requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub input: PathBuf,
    pub scale: f64,
}

/// Parse the arguments following the program name.
pub fn parse_args<I>(args: I) -> Result<ExportJob, AppError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let input = args.next().ok_or(AppError::Usage)?;
    let scale = match args.next() {
        Some(raw) => match raw.parse::<f64>() {
            Ok(s) if s.is_finite() && s > 0.0 => s,
            _ => return Err(AppError::InvalidScale(raw)),
        },
        None => 1.0,
    };
    if args.next().is_some() {
        return Err(AppError::Usage);
    }
    Ok(ExportJob {
        input: PathBuf::from(input),
        scale,
    })
}

fn load_container(path: &Path) -> Result<Box<dyn DrawableContainer>, AppError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("cur") => Ok(Box::new(CursorContainer::from_file(path)?)),
        Some("ico") => Ok(Box::new(IconContainer::from_file(path)?)),
        _ => Err(AppError::UnsupportedInput(path.to_path_buf())),
    }
}

/// Where the next capture goes, advancing the counter.
fn output_path(config: &mut OutputConfig, input: &Path) -> PathBuf {
    let counter = config.take_counter();
    let full_override = config.full_path_override.trim();
    if !full_override.is_empty() {
        return PathBuf::from(full_override);
    }
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("capture");
    let dir = config.output_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(format!("{}-{}.{}", stem, counter, config.file_format.extension()))
}

/// Render and write one job. Returns the written path.
pub fn run(job: &ExportJob, store: &mut dyn ConfigStore) -> Result<PathBuf, AppError> {
    let mut container = load_container(&job.input)?;
    let size = container.default_size() * job.scale;
    if size.width < 1.0 || size.height < 1.0 {
        return Err(AppError::Empty(job.input.clone()));
    }
    if size.width * size.height > MAX_EXPORT_PIXELS {
        log::warn!("Refusing to render {}x{} pixels", size.width, size.height);
        return Err(AppError::InvalidScale(job.scale.to_string()));
    }
    container.set_bounds(Rect::from_origin_size(Point::ZERO, size));

    let mut surface = EditorSurface::new();
    surface.add(container);
    let mut raster = RasterSurface::new(size.width.ceil() as u32, size.height.ceil() as u32);
    surface.draw(&mut raster, RenderMode::Export);

    let mut config = OutputConfig::load(store)?;
    let path = output_path(&mut config, &job.input);
    if !config.allow_overwrite && path.exists() {
        return Err(AppError::Exists(path));
    }
    export_to_file(raster.image(), &path, config.file_format, config.jpeg_quality)?;
    config.save(store)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use pixmark_core::config::{MemoryConfigStore, OutputFormat};
    use pixmark_core::{CursorImage, IconImage, ImageResource};
    use serde_json::json;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn write_cursor(dir: &Path) -> PathBuf {
        let bitmap = RgbaImage::from_pixel(16, 16, Rgba([0, 128, 255, 255]));
        let cursor = CursorImage::from_bitmap(bitmap, (2, 2)).unwrap();
        let path = dir.join("arrow.cur");
        std::fs::write(&path, cursor.encoded()).unwrap();
        path
    }

    fn store_for(dir: &Path) -> MemoryConfigStore {
        let mut store = MemoryConfigStore::new();
        store.set("outputPath", json!(dir.to_string_lossy())).unwrap();
        store
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            parse_args(args(&["a.cur"])).unwrap(),
            ExportJob {
                input: PathBuf::from("a.cur"),
                scale: 1.0
            }
        );
        assert_eq!(parse_args(args(&["a.ico", "2.5"])).unwrap().scale, 2.5);
        assert!(matches!(parse_args(args(&[])), Err(AppError::Usage)));
        assert!(matches!(parse_args(args(&["a", "1", "x"])), Err(AppError::Usage)));
        assert!(matches!(
            parse_args(args(&["a.cur", "-2"])),
            Err(AppError::InvalidScale(_))
        ));
        assert!(matches!(
            parse_args(args(&["a.cur", "big"])),
            Err(AppError::InvalidScale(_))
        ));
    }

    #[test]
    fn test_exports_scaled_cursor_and_advances_counter() {
        let dir = tempdir().unwrap();
        let input = write_cursor(dir.path());
        let mut store = store_for(dir.path());

        let job = ExportJob { input, scale: 2.0 };
        let first = run(&job, &mut store).unwrap();
        assert_eq!(first, dir.path().join("arrow-1.png"));
        let written = image::open(&first).unwrap().to_rgba8();
        assert_eq!(written.dimensions(), (32, 32));
        assert_eq!(*written.get_pixel(20, 20), Rgba([0, 128, 255, 255]));

        let second = run(&job, &mut store).unwrap();
        assert_eq!(second, dir.path().join("arrow-2.png"));
        assert_eq!(store.get("incrementingCounter").unwrap(), Some(json!(3)));
    }

    #[test]
    fn test_exports_icon_as_configured_format() {
        let dir = tempdir().unwrap();
        let bitmap = RgbaImage::from_pixel(8, 8, Rgba([9, 9, 9, 255]));
        let icon = IconImage::from_bitmap(bitmap).unwrap();
        let input = dir.path().join("app.ico");
        std::fs::write(&input, icon.encoded()).unwrap();

        let mut store = store_for(dir.path());
        store.set("fileFormat", json!(OutputFormat::Jpg)).unwrap();

        let path = run(&ExportJob { input, scale: 1.0 }, &mut store).unwrap();
        assert_eq!(path.extension().unwrap(), "jpg");
        assert_eq!(image::open(&path).unwrap().width(), 8);
    }

    #[test]
    fn test_overwrite_disabled() {
        let dir = tempdir().unwrap();
        let input = write_cursor(dir.path());
        let mut store = store_for(dir.path());
        store.set("allowOverwrite", json!(false)).unwrap();
        std::fs::write(dir.path().join("arrow-1.png"), b"taken").unwrap();

        let result = run(&ExportJob { input, scale: 1.0 }, &mut store);
        assert!(matches!(result, Err(AppError::Exists(_))));
        // The counter is only saved after a successful write.
        assert_eq!(store.get("incrementingCounter").unwrap(), None);
    }

    #[test]
    fn test_scale_beyond_size_limit() {
        let dir = tempdir().unwrap();
        let input = write_cursor(dir.path());
        let mut store = store_for(dir.path());

        let job = parse_args(args(&[input.to_str().unwrap(), "1e9"])).unwrap();
        assert!(matches!(run(&job, &mut store), Err(AppError::InvalidScale(_))));
        assert!(!dir.path().join("arrow-1.png").exists());
        assert_eq!(store.get("incrementingCounter").unwrap(), None);
    }

    #[test]
    fn test_missing_input_has_nothing_to_export() {
        let dir = tempdir().unwrap();
        let mut store = store_for(dir.path());
        let job = ExportJob {
            input: dir.path().join("gone.cur"),
            scale: 1.0,
        };
        assert!(matches!(run(&job, &mut store), Err(AppError::Empty(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let mut store = MemoryConfigStore::new();
        let job = ExportJob {
            input: PathBuf::from("shot.png"),
            scale: 1.0,
        };
        assert!(matches!(
            run(&job, &mut store),
            Err(AppError::UnsupportedInput(_))
        ));
    }
}
