//! Pixmark Render Library
//!
//! CPU raster backend for the core drawing surface and encoders for the
//! configured output formats.

mod export;
mod raster;

pub use export::{ExportError, ExportResult, encode, export_to_file};
pub use raster::{RasterSurface, filter_for};
