//! Drawing surface abstraction.
//!
//! Containers and adorners draw through [`DrawSurface`]. Anything that
//! changes surface state does so inside a [`SavedState`] guard, which
//! restores the previous state when it goes out of scope.

use image::RgbaImage;
use kurbo::Rect;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Anti-aliasing applied to lines and shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SmoothingMode {
    #[default]
    Default,
    None,
    HighQuality,
}

/// Resampling used when an image is stretched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    #[default]
    Default,
    NearestNeighbor,
    Bilinear,
    HighQualityBicubic,
}

/// Quality of alpha compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompositingQuality {
    #[default]
    Default,
    HighSpeed,
    HighQuality,
}

/// How pixel centers are offset during rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelOffsetMode {
    #[default]
    Default,
    None,
    Half,
    HighQuality,
}

/// The mutable state of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderHints {
    pub smoothing: SmoothingMode,
    pub interpolation: InterpolationMode,
    pub compositing: CompositingQuality,
    pub pixel_offset: PixelOffsetMode,
}

/// What a draw call is producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Interactive editing on screen.
    #[default]
    Edit,
    /// Final output for export.
    Export,
}

/// A target that containers and adorners draw onto.
pub trait DrawSurface {
    /// Current hints.
    fn hints(&self) -> RenderHints;

    /// Replace the current hints.
    fn set_hints(&mut self, hints: RenderHints);

    /// Push the current state.
    fn save(&mut self);

    /// Pop the last saved state. Unbalanced calls are ignored.
    fn restore(&mut self);

    /// Draw `image` stretched to exactly fill `dest`.
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect);

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline a rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);
}

/// Saves the surface state on creation and restores it on drop.
pub struct SavedState<'a, S: DrawSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DrawSurface + ?Sized> SavedState<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: DrawSurface + ?Sized> Deref for SavedState<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DrawSurface + ?Sized> DerefMut for SavedState<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DrawSurface + ?Sized> Drop for SavedState<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// Records draw calls; used by tests across the crate.
#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawOp {
        Image { size: (u32, u32), dest: Rect, hints: RenderHints },
        Fill(Rect),
        Stroke(Rect),
    }

    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub hints: RenderHints,
        pub stack: Vec<RenderHints>,
        pub ops: Vec<DrawOp>,
        pub max_depth: usize,
    }

    impl DrawSurface for RecordingSurface {
        fn hints(&self) -> RenderHints {
            self.hints
        }

        fn set_hints(&mut self, hints: RenderHints) {
            self.hints = hints;
        }

        fn save(&mut self) {
            self.stack.push(self.hints);
            self.max_depth = self.max_depth.max(self.stack.len());
        }

        fn restore(&mut self) {
            if let Some(hints) = self.stack.pop() {
                self.hints = hints;
            }
        }

        fn draw_image(&mut self, image: &RgbaImage, dest: Rect) {
            self.ops.push(DrawOp::Image {
                size: image.dimensions(),
                dest,
                hints: self.hints,
            });
        }

        fn fill_rect(&mut self, rect: Rect, _color: Color) {
            self.ops.push(DrawOp::Fill(rect));
        }

        fn stroke_rect(&mut self, rect: Rect, _color: Color, _width: f64) {
            self.ops.push(DrawOp::Stroke(rect));
        }
    }
}
