//! CPU raster implementation of [`DrawSurface`].

use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};
use kurbo::Rect;
use peniko::Color;
use pixmark_core::SampledColor;
use pixmark_core::drawing::{DrawSurface, InterpolationMode, RenderHints};
use std::borrow::Cow;

/// Resampling filter for an interpolation hint.
pub fn filter_for(mode: InterpolationMode) -> FilterType {
    match mode {
        InterpolationMode::NearestNeighbor => FilterType::Nearest,
        InterpolationMode::Bilinear => FilterType::Triangle,
        InterpolationMode::Default | InterpolationMode::HighQualityBicubic => {
            FilterType::CatmullRom
        }
    }
}

/// A drawing surface backed by an RGBA image.
///
/// Coordinates are pixels; rectangles are rounded to the pixel grid and
/// clipped to the image.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    target: RgbaImage,
    hints: RenderHints,
    stack: Vec<RenderHints>,
}

impl RasterSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    /// Create a surface filled with `background`.
    pub fn with_background(width: u32, height: u32, background: Color) -> Self {
        let pixel: Rgba<u8> = SampledColor::from(background).into();
        Self::from_image(RgbaImage::from_pixel(width, height, pixel))
    }

    /// Draw on top of an existing image, e.g. a capture.
    pub fn from_image(target: RgbaImage) -> Self {
        Self {
            target,
            hints: RenderHints::default(),
            stack: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.target
    }

    pub fn into_image(self) -> RgbaImage {
        self.target
    }

    /// Number of saved states not yet restored.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Pixel span of `rect` clipped to the image, as `(x0, y0, x1, y1)`.
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let r = rect.abs().round();
        let x0 = r.x0.max(0.0) as u32;
        let y0 = r.y0.max(0.0) as u32;
        let x1 = (r.x1.max(0.0) as u32).min(self.target.width());
        let y1 = (r.y1.max(0.0) as u32).min(self.target.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Draw only the pixels of `dest` that land on the image, sampling the
    /// source per target pixel. Used when `dest` sticks out of the image.
    fn sample_visible(&mut self, image: &RgbaImage, dest: Rect, visible: (u32, u32, u32, u32)) {
        let (x0, y0, x1, y1) = visible;
        let nearest = self.hints.interpolation == InterpolationMode::NearestNeighbor;
        for y in y0..y1 {
            let v = ((y as f64 + 0.5 - dest.y0) / dest.height()) as f32;
            for x in x0..x1 {
                let u = ((x as f64 + 0.5 - dest.x0) / dest.width()) as f32;
                let sample = if nearest {
                    imageops::sample_nearest(image, u, v)
                } else {
                    imageops::sample_bilinear(image, u, v)
                };
                if let Some(src) = sample {
                    self.target.get_pixel_mut(x, y).blend(&src);
                }
            }
        }
    }

    fn blend_region(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let src: Rgba<u8> = SampledColor::from(color).into();
        for y in y0..y1 {
            for x in x0..x1 {
                self.target.get_pixel_mut(x, y).blend(&src);
            }
        }
    }
}

impl DrawSurface for RasterSurface {
    fn hints(&self) -> RenderHints {
        self.hints
    }

    fn set_hints(&mut self, hints: RenderHints) {
        self.hints = hints;
    }

    fn save(&mut self) {
        self.stack.push(self.hints);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(hints) => self.hints = hints,
            None => log::warn!("Unbalanced restore on raster surface"),
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) {
        let dest = dest.abs().round();
        if dest.width() < 1.0 || dest.height() < 1.0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let Some(visible) = self.clip(dest) else {
            return;
        };
        let (x0, y0, x1, y1) = visible;
        if Rect::new(x0 as f64, y0 as f64, x1 as f64, y1 as f64) != dest {
            self.sample_visible(image, dest, visible);
            return;
        }
        let (width, height) = (x1 - x0, y1 - y0);
        let scaled = if image.dimensions() == (width, height) {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(imageops::resize(image, width, height, filter_for(self.hints.interpolation)))
        };
        imageops::overlay(&mut self.target, scaled.as_ref(), x0 as i64, y0 as i64);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.blend_region(rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        let r = rect.abs();
        let w = width.max(1.0);
        // Four bands inside the rectangle, without overlapping corners.
        self.blend_region(Rect::new(r.x0, r.y0, r.x1, r.y0 + w), color);
        self.blend_region(Rect::new(r.x0, r.y1 - w, r.x1, r.y1), color);
        self.blend_region(Rect::new(r.x0, r.y0 + w, r.x0 + w, r.y1 - w), color);
        self.blend_region(Rect::new(r.x1 - w, r.y0 + w, r.x1, r.y1 - w), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmark_core::drawing::SavedState;

    fn checker() -> RgbaImage {
        RgbaImage::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn test_filter_mapping() {
        assert_eq!(filter_for(InterpolationMode::NearestNeighbor), FilterType::Nearest);
        assert_eq!(filter_for(InterpolationMode::Bilinear), FilterType::Triangle);
        assert_eq!(filter_for(InterpolationMode::Default), FilterType::CatmullRom);
        assert_eq!(filter_for(InterpolationMode::HighQualityBicubic), FilterType::CatmullRom);
    }

    #[test]
    fn test_draw_image_unscaled() {
        let mut surface = RasterSurface::new(4, 4);
        surface.draw_image(&checker(), Rect::new(1.0, 1.0, 3.0, 3.0));
        let img = surface.image();
        assert_eq!(*img.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(2, 1), Rgba([0, 0, 255, 255]));
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_image_stretched_nearest() {
        let mut surface = RasterSurface::new(8, 8);
        surface.set_hints(RenderHints {
            interpolation: InterpolationMode::NearestNeighbor,
            ..RenderHints::default()
        });
        surface.draw_image(&checker(), Rect::new(0.0, 0.0, 8.0, 8.0));
        let img = surface.image();
        assert_eq!(*img.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(3, 3), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(4, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*img.get_pixel(7, 7), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_draw_image_clipped_and_degenerate() {
        let mut surface = RasterSurface::new(4, 4);
        surface.draw_image(&checker(), Rect::new(-1.0, -1.0, 1.0, 1.0));
        assert_eq!(*surface.image().get_pixel(0, 0), Rgba([255, 0, 0, 255]));

        surface.draw_image(&checker(), Rect::new(2.0, 2.0, 2.0, 5.0));
        assert_eq!(*surface.image().get_pixel(2, 2), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_draw_image_huge_dest_samples_visible_part() {
        let mut surface = RasterSurface::new(4, 4);
        surface.draw_image(&checker(), Rect::new(0.0, 0.0, 1e9, 1e9));
        assert!(surface.image().pixels().all(|p| *p == Rgba([255, 0, 0, 255])));

        let mut surface = RasterSurface::new(4, 4);
        surface.set_hints(RenderHints {
            interpolation: InterpolationMode::NearestNeighbor,
            ..RenderHints::default()
        });
        surface.draw_image(&checker(), Rect::new(-1e9, 0.0, 2.0, 2.0));
        // Only the last source column reaches the image.
        assert_eq!(*surface.image().get_pixel(0, 0), Rgba([0, 0, 255, 255]));
        assert_eq!(*surface.image().get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*surface.image().get_pixel(2, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_fill_blends() {
        let mut surface = RasterSurface::with_background(4, 4, Color::WHITE);
        surface.fill_rect(Rect::new(0.0, 0.0, 2.0, 4.0), Color::from_rgba8(0, 0, 0, 255));
        assert_eq!(*surface.image().get_pixel(1, 3), Rgba([0, 0, 0, 255]));
        assert_eq!(*surface.image().get_pixel(2, 0), Rgba([255, 255, 255, 255]));

        // Fully transparent paint leaves pixels alone.
        surface.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::from_rgba8(255, 0, 0, 0));
        assert_eq!(*surface.image().get_pixel(3, 3), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_stroke_outlines() {
        let mut surface = RasterSurface::new(6, 6);
        surface.stroke_rect(Rect::new(0.0, 0.0, 6.0, 6.0), Color::BLACK, 1.0);
        let img = surface.image();
        assert_eq!(img.get_pixel(0, 0)[3], 255);
        assert_eq!(img.get_pixel(5, 3)[3], 255);
        assert_eq!(img.get_pixel(3, 5)[3], 255);
        assert_eq!(img.get_pixel(3, 3)[3], 0);
    }

    #[test]
    fn test_saved_state_restores_hints() {
        let mut surface = RasterSurface::new(1, 1);
        {
            let mut guard = SavedState::new(&mut surface);
            guard.set_hints(RenderHints {
                interpolation: InterpolationMode::Bilinear,
                ..RenderHints::default()
            });
            assert_eq!(guard.depth(), 1);
        }
        assert_eq!(surface.hints(), RenderHints::default());
        assert_eq!(surface.depth(), 0);

        // Unbalanced restore is ignored.
        surface.restore();
        assert_eq!(surface.depth(), 0);
    }
}
