//! Adorners: interactive handles attached to a drawable container.
//!
//! Every adorner implements the same flat [`Adorner`] interface. The owning
//! container passes its bounds in on every call that may change them, so an
//! adorner never holds a reference to its owner.

mod mover;
mod resize;

pub use mover::MoveAdorner;
pub use resize::ResizeAdorner;

use crate::drawing::DrawSurface;
use crate::input::MouseEvent;
use kurbo::{Affine, Point, Rect, Size};
use std::fmt;

/// Edge length of a painted handle, in surface pixels.
pub const ADORNER_SIZE: f64 = 8.0;
/// Extra slack around a handle that still counts as a hit.
pub const ADORNER_HIT_TOLERANCE: f64 = 2.0;

/// The edit mode an adorner drives; the surface routes events by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditStatus {
    /// Container created but not drawn yet.
    Undrawn,
    /// Container is being drawn.
    Drawing,
    /// Container is being moved.
    Moving,
    /// Container is being resized.
    Resizing,
    #[default]
    Idle,
}

/// Pointer shape the host shows while hovering an adorner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdornerCursor {
    SizeAll,
    SizeNWSE,
    SizeNESW,
    SizeNS,
    SizeWE,
}

/// Where on the owner's bounds a handle sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Position {
    /// All positions, clockwise from the top-left corner.
    pub const ALL: [Position; 8] = [
        Position::TopLeft,
        Position::Top,
        Position::TopRight,
        Position::Right,
        Position::BottomRight,
        Position::Bottom,
        Position::BottomLeft,
        Position::Left,
    ];

    /// Handle center for the given owner bounds.
    pub fn anchor(self, bounds: Rect) -> Point {
        let c = bounds.center();
        match self {
            Position::TopLeft => Point::new(bounds.x0, bounds.y0),
            Position::Top => Point::new(c.x, bounds.y0),
            Position::TopRight => Point::new(bounds.x1, bounds.y0),
            Position::Right => Point::new(bounds.x1, c.y),
            Position::BottomRight => Point::new(bounds.x1, bounds.y1),
            Position::Bottom => Point::new(c.x, bounds.y1),
            Position::BottomLeft => Point::new(bounds.x0, bounds.y1),
            Position::Left => Point::new(bounds.x0, c.y),
        }
    }

    /// Check if this is a corner position.
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Position::TopLeft | Position::TopRight | Position::BottomRight | Position::BottomLeft
        )
    }

    /// Resize cursor for this position.
    pub fn cursor(self) -> AdornerCursor {
        match self {
            Position::TopLeft | Position::BottomRight => AdornerCursor::SizeNWSE,
            Position::TopRight | Position::BottomLeft => AdornerCursor::SizeNESW,
            Position::Top | Position::Bottom => AdornerCursor::SizeNS,
            Position::Left | Position::Right => AdornerCursor::SizeWE,
        }
    }
}

/// Handle square centered on `anchor`.
pub(crate) fn handle_rect(anchor: Point) -> Rect {
    Rect::from_center_size(anchor, Size::new(ADORNER_SIZE, ADORNER_SIZE))
}

/// Capability set shared by all adorner variants.
///
/// Move and up events are delivered to every adorner of a container; an
/// adorner only reacts to them while armed by its own mouse down.
pub trait Adorner: fmt::Debug {
    /// Edit mode this adorner represents.
    fn edit_status(&self) -> EditStatus;

    /// Pointer shape to show while hovering.
    fn cursor(&self) -> AdornerCursor;

    /// True while a drag started on this adorner is in progress.
    fn is_active(&self) -> bool;

    /// True iff `point` lies within the interactive region. No side effects.
    fn hit_test(&self, point: Point) -> bool;

    /// Arm on a primary press inside the region.
    fn mouse_down(&mut self, owner: &mut Rect, event: &MouseEvent);

    /// Update the owner's geometry while armed.
    fn mouse_move(&mut self, owner: &mut Rect, event: &MouseEvent);

    /// Finish the drag, if armed.
    fn mouse_up(&mut self, owner: &mut Rect, event: &MouseEvent);

    /// Disarm without touching the owner.
    fn cancel(&mut self);

    /// Draw the handle. Surface state is left as found.
    fn paint(&self, surface: &mut dyn DrawSurface);

    /// The owner was transformed by `matrix`.
    fn transform(&mut self, matrix: Affine);

    /// The owner's bounds changed for any other reason.
    fn owner_changed(&mut self, owner: Rect);
}

/// The default adorners of a rectangular container: eight resize handles,
/// then a move handle covering the interior.
pub fn default_adorners(owner: Rect) -> Vec<Box<dyn Adorner>> {
    let mut adorners: Vec<Box<dyn Adorner>> = Position::ALL
        .iter()
        .map(|&position| Box::new(ResizeAdorner::new(position, owner)) as Box<dyn Adorner>)
        .collect();
    adorners.push(Box::new(MoveAdorner::new(owner)));
    adorners
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchors() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(Position::TopLeft.anchor(bounds), Point::new(0.0, 0.0));
        assert_eq!(Position::Right.anchor(bounds), Point::new(100.0, 25.0));
        assert_eq!(Position::Bottom.anchor(bounds), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_default_adorner_set() {
        let adorners = default_adorners(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(adorners.len(), 9);
        let resizing = adorners
            .iter()
            .filter(|a| a.edit_status() == EditStatus::Resizing)
            .count();
        assert_eq!(resizing, 8);
        assert_eq!(adorners[8].edit_status(), EditStatus::Moving);
        assert!(adorners.iter().all(|a| !a.is_active()));
    }

    #[test]
    fn test_cursors() {
        assert_eq!(Position::TopLeft.cursor(), AdornerCursor::SizeNWSE);
        assert_eq!(Position::BottomLeft.cursor(), AdornerCursor::SizeNESW);
        assert_eq!(Position::Top.cursor(), AdornerCursor::SizeNS);
        assert_eq!(Position::Left.cursor(), AdornerCursor::SizeWE);
    }
}
