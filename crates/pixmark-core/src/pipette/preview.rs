//! Floating color preview shown while the pipette is dragged.

use crate::color::SampledColor;
use image::RgbaImage;
use kurbo::{Point, Rect, Size, Vec2};

/// Default size of the preview window.
pub const PREVIEW_SIZE: Size = Size::new(120.0, 100.0);
/// Gap between the pointer and the preview window.
pub const PREVIEW_OFFSET: f64 = 20.0;

/// A popup that follows the pointer and samples the color under it.
pub trait ColorPreview {
    /// Move to the pointer's screen position and sample there.
    fn move_to(&mut self, screen: Point);

    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;

    /// The last sampled color.
    fn color(&self) -> SampledColor;
}

/// Preview that samples a snapshot of the screen.
#[derive(Debug, Clone)]
pub struct MagnifierPreview {
    snapshot: RgbaImage,
    /// Screen position of the snapshot's top-left pixel.
    origin: Point,
    size: Size,
    window: Rect,
    visible: bool,
    color: SampledColor,
}

impl MagnifierPreview {
    /// Create a preview over a snapshot whose top-left pixel sits at `origin`
    /// on screen.
    pub fn new(snapshot: RgbaImage, origin: Point) -> Self {
        Self {
            snapshot,
            origin,
            size: PREVIEW_SIZE,
            window: Rect::from_origin_size(origin, PREVIEW_SIZE),
            visible: false,
            color: SampledColor::transparent(),
        }
    }

    /// Use a different window size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self.window = Rect::from_origin_size(self.window.origin(), size);
        self
    }

    /// Where the preview window currently is.
    pub fn window(&self) -> Rect {
        self.window
    }

    fn screen_bounds(&self) -> Rect {
        let (w, h) = self.snapshot.dimensions();
        Rect::from_origin_size(self.origin, Size::new(f64::from(w), f64::from(h)))
    }

    fn sample(&self, screen: Point) -> Option<SampledColor> {
        let local = screen - self.origin;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (x, y) = (local.x.floor() as u32, local.y.floor() as u32);
        self.snapshot
            .get_pixel_checked(x, y)
            .map(|pixel| SampledColor::from(*pixel))
    }

    /// Right of and below the pointer, flipped to the other side of an axis
    /// where the window would leave the screen.
    fn place(&self, screen: Point) -> Rect {
        let bounds = self.screen_bounds();
        let mut origin = screen + Vec2::new(PREVIEW_OFFSET, PREVIEW_OFFSET);
        if origin.x + self.size.width > bounds.x1 {
            origin.x = screen.x - PREVIEW_OFFSET - self.size.width;
        }
        if origin.y + self.size.height > bounds.y1 {
            origin.y = screen.y - PREVIEW_OFFSET - self.size.height;
        }
        Rect::from_origin_size(origin, self.size)
    }
}

impl ColorPreview for MagnifierPreview {
    fn move_to(&mut self, screen: Point) {
        if let Some(color) = self.sample(screen) {
            self.color = color;
        }
        self.window = self.place(screen);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn color(&self) -> SampledColor {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn snapshot() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(400, 300, Rgba([10, 20, 30, 255]));
        img.put_pixel(50, 60, Rgba([200, 100, 0, 255]));
        img
    }

    #[test]
    fn test_samples_under_pointer() {
        let mut preview = MagnifierPreview::new(snapshot(), Point::ZERO);
        preview.move_to(Point::new(50.5, 60.2));
        assert_eq!(preview.color(), SampledColor::new(200, 100, 0, 255));
        preview.move_to(Point::new(10.0, 10.0));
        assert_eq!(preview.color(), SampledColor::new(10, 20, 30, 255));
    }

    #[test]
    fn test_snapshot_origin_offset() {
        let mut preview = MagnifierPreview::new(snapshot(), Point::new(1000.0, 0.0));
        preview.move_to(Point::new(1050.0, 60.0));
        assert_eq!(preview.color(), SampledColor::new(200, 100, 0, 255));
    }

    #[test]
    fn test_outside_keeps_last_color() {
        let mut preview = MagnifierPreview::new(snapshot(), Point::ZERO);
        preview.move_to(Point::new(50.0, 60.0));
        preview.move_to(Point::new(-5.0, 10.0));
        preview.move_to(Point::new(900.0, 10.0));
        assert_eq!(preview.color(), SampledColor::new(200, 100, 0, 255));
    }

    #[test]
    fn test_window_placement_flips_at_edges() {
        let mut preview = MagnifierPreview::new(snapshot(), Point::ZERO);
        preview.move_to(Point::new(100.0, 100.0));
        assert_eq!(preview.window().origin(), Point::new(120.0, 120.0));

        preview.move_to(Point::new(390.0, 290.0));
        assert_eq!(preview.window().origin(), Point::new(250.0, 170.0));
        assert_eq!(preview.window().size(), PREVIEW_SIZE);
    }

    #[test]
    fn test_visibility() {
        let mut preview =
            MagnifierPreview::new(snapshot(), Point::ZERO).with_size(Size::new(10.0, 10.0));
        assert!(!preview.is_visible());
        preview.set_visible(true);
        assert!(preview.is_visible());
    }
}
