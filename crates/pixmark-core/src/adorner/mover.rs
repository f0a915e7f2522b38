//! Move handle.

use super::{Adorner, AdornerCursor, EditStatus, handle_rect};
use crate::drawing::{DrawSurface, SavedState};
use crate::input::MouseEvent;
use kurbo::{Affine, Point, Rect};
use peniko::Color;

#[derive(Debug, Clone, Copy)]
struct MoveDrag {
    start_pointer: Point,
    start_bounds: Rect,
}

/// Translates the owner when dragged from anywhere inside it.
#[derive(Debug, Clone)]
pub struct MoveAdorner {
    owner: Rect,
    drag: Option<MoveDrag>,
}

impl MoveAdorner {
    pub fn new(owner: Rect) -> Self {
        Self { owner, drag: None }
    }
}

impl Adorner for MoveAdorner {
    fn edit_status(&self) -> EditStatus {
        EditStatus::Moving
    }

    fn cursor(&self) -> AdornerCursor {
        AdornerCursor::SizeAll
    }

    fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    fn hit_test(&self, point: Point) -> bool {
        self.owner.contains(point)
    }

    fn mouse_down(&mut self, owner: &mut Rect, event: &MouseEvent) {
        self.owner = *owner;
        if event.is_primary() && self.hit_test(event.position) {
            self.drag = Some(MoveDrag {
                start_pointer: event.position,
                start_bounds: *owner,
            });
        }
    }

    fn mouse_move(&mut self, owner: &mut Rect, event: &MouseEvent) {
        if let Some(drag) = self.drag {
            *owner = drag.start_bounds + (event.position - drag.start_pointer);
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
        // Only a grip in the middle; the container itself is the handle.
        let mut surface = SavedState::new(surface);
        surface.stroke_rect(handle_rect(self.owner.center()), Color::BLACK, 1.0);
    }

    fn transform(&mut self, matrix: Affine) {
        self.owner = matrix.transform_rect_bbox(self.owner);
    }

    fn owner_changed(&mut self, owner: Rect) {
        self.owner = owner;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;

    fn left(x: f64, y: f64) -> MouseEvent {
        MouseEvent::button(Point::new(x, y), MouseButton::Left)
    }

    #[test]
    fn test_drag_translates_owner() {
        let mut bounds = Rect::new(0.0, 0.0, 20.0, 10.0);
        let mut adorner = MoveAdorner::new(bounds);

        adorner.mouse_down(&mut bounds, &left(5.0, 5.0));
        adorner.mouse_move(&mut bounds, &MouseEvent::moved(Point::new(15.0, 25.0)));
        assert_eq!(bounds, Rect::new(10.0, 20.0, 30.0, 30.0));

        adorner.mouse_up(&mut bounds, &left(15.0, 25.0));
        assert!(!adorner.is_active());
        assert!(adorner.hit_test(Point::new(29.0, 29.0)));
        assert!(!adorner.hit_test(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_press_outside_does_not_arm() {
        let mut bounds = Rect::new(0.0, 0.0, 20.0, 10.0);
        let mut adorner = MoveAdorner::new(bounds);
        adorner.mouse_down(&mut bounds, &left(50.0, 50.0));
        adorner.mouse_move(&mut bounds, &MouseEvent::moved(Point::new(60.0, 60.0)));
        assert_eq!(bounds, Rect::new(0.0, 0.0, 20.0, 10.0));
    }
}
