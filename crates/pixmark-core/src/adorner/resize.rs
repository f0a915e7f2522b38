//! Resize handle.

use super::{ADORNER_HIT_TOLERANCE, Adorner, AdornerCursor, EditStatus, Position, handle_rect};
use crate::drawing::{DrawSurface, SavedState};
use crate::input::MouseEvent;
use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Color;

#[derive(Debug, Clone, Copy)]
struct ResizeDrag {
    start_bounds: Rect,
}

/// Drags one corner or edge of the owner's bounds.
///
/// Holding Shift on a corner keeps the aspect ratio the owner had when the
/// drag started.
#[derive(Debug, Clone)]
pub struct ResizeAdorner {
    position: Position,
    owner: Rect,
    drag: Option<ResizeDrag>,
}

impl ResizeAdorner {
    pub fn new(position: Position, owner: Rect) -> Self {
        Self {
            position,
            owner,
            drag: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Handle center.
    pub fn anchor(&self) -> Point {
        self.position.anchor(self.owner)
    }

    fn resized(&self, start: Rect, pointer: Point, keep_aspect: bool) -> Rect {
        let mut r = start;
        match self.position {
            Position::TopLeft => {
                r.x0 = pointer.x;
                r.y0 = pointer.y;
            }
            Position::Top => r.y0 = pointer.y,
            Position::TopRight => {
                r.x1 = pointer.x;
                r.y0 = pointer.y;
            }
            Position::Right => r.x1 = pointer.x,
            Position::BottomRight => {
                r.x1 = pointer.x;
                r.y1 = pointer.y;
            }
            Position::Bottom => r.y1 = pointer.y,
            Position::BottomLeft => {
                r.x0 = pointer.x;
                r.y1 = pointer.y;
            }
            Position::Left => r.x0 = pointer.x,
        }

        if keep_aspect && self.position.is_corner() && start.width() > 0.0 && start.height() > 0.0 {
            r = keep_aspect_ratio(start, self.position, pointer);
        }
        r.abs()
    }
}

/// Scale `start` about the corner opposite `corner` so the dragged corner
/// follows `pointer` as closely as the original aspect ratio allows.
fn keep_aspect_ratio(start: Rect, corner: Position, pointer: Point) -> Rect {
    let fixed = match corner {
        Position::TopLeft => Point::new(start.x1, start.y1),
        Position::TopRight => Point::new(start.x0, start.y1),
        Position::BottomRight => Point::new(start.x0, start.y0),
        _ => Point::new(start.x1, start.y0),
    };
    let aspect = start.width() / start.height();
    let delta = pointer - fixed;
    let mut w = delta.x.abs();
    let mut h = delta.y.abs();
    if w / aspect >= h {
        h = w / aspect;
    } else {
        w = h * aspect;
    }
    let sx = if delta.x < 0.0 { -1.0 } else { 1.0 };
    let sy = if delta.y < 0.0 { -1.0 } else { 1.0 };
    Rect::from_points(fixed, fixed + Vec2::new(sx * w, sy * h))
}

impl Adorner for ResizeAdorner {
    fn edit_status(&self) -> EditStatus {
        EditStatus::Resizing
    }

    fn cursor(&self) -> AdornerCursor {
        self.position.cursor()
    }

    fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    fn hit_test(&self, point: Point) -> bool {
        handle_rect(self.anchor())
            .inflate(ADORNER_HIT_TOLERANCE, ADORNER_HIT_TOLERANCE)
            .contains(point)
    }

    fn mouse_down(&mut self, owner: &mut Rect, event: &MouseEvent) {
        self.owner = *owner;
        if event.is_primary() && self.hit_test(event.position) {
            self.drag = Some(ResizeDrag { start_bounds: *owner });
        }
    }

    fn mouse_move(&mut self, owner: &mut Rect, event: &MouseEvent) {
        if let Some(drag) = self.drag {
            *owner = self.resized(drag.start_bounds, event.position, event.modifiers.shift);
            self.owner = *owner;
        }
    }

    fn mouse_up(&mut self, owner: &mut Rect, event: &MouseEvent) {
        if self.drag.is_some() {
            self.mouse_move(owner, event);
            self.drag = None;
        }
    }

    fn cancel(&mut self) {
        self.drag = None;
    }

    fn paint(&self, surface: &mut dyn DrawSurface) {
        let mut surface = SavedState::new(surface);
        let rect = handle_rect(self.anchor());
        surface.fill_rect(rect, Color::WHITE);
        surface.stroke_rect(rect, Color::BLACK, 1.0);
    }

    fn transform(&mut self, matrix: Affine) {
        self.owner = matrix.transform_rect_bbox(self.owner);
    }

    fn owner_changed(&mut self, owner: Rect) {
        self.owner = owner;
    }
}
