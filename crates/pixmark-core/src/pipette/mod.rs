//! Pipette: drag from the widget to anywhere on screen to pick a color.
//!
//! Pressing the primary button on the widget takes pointer capture and
//! enters the dragging state; the color preview follows the pointer until
//! the button is released, which reports the sampled color. Escape cancels
//! the drag without reporting a color. Losing capture for any other reason
//! also ends the drag.

mod capture;
mod preview;

pub use capture::{LocalCapture, PointerCapture};
pub use preview::{ColorPreview, MagnifierPreview, PREVIEW_OFFSET, PREVIEW_SIZE};

use crate::color::SampledColor;
use crate::input::{ESCAPE_KEY, InputHub, KeyEvent, KeyFilter, MouseEvent, Subscription};
use crate::resource::{CursorImage, ResourceResult};
use image::RgbaImage;
use kurbo::Point;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Hotspot of the drag cursor within the pipette glyph.
pub const DRAG_CURSOR_HOTSPOT: (u16, u16) = (1, 14);

/// Events produced by the pipette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipetteEvent {
    /// A drag finished normally; `color` was under the pointer on release.
    Used { color: SampledColor },
}

/// Cursor the host should show over the pipette.
#[derive(Debug, Clone, Copy)]
pub enum PipetteCursor<'a> {
    Arrow,
    Drag(&'a CursorImage),
}

/// State shared with the Escape filter.
struct DragState {
    dragging: bool,
    capture: Rc<dyn PointerCapture>,
    preview: Option<Box<dyn ColorPreview>>,
}

impl DragState {
    fn enter_drag(&mut self, screen: Point) {
        self.dragging = true;
        if let Some(preview) = self.preview.as_mut() {
            preview.move_to(screen);
            preview.set_visible(true);
        }
        log::debug!("Pipette drag started at {:?}", screen);
    }

    fn exit_drag(&mut self) {
        if self.capture.is_captured() {
            self.capture.release();
        }
        self.dragging = false;
        if let Some(preview) = self.preview.as_mut() {
            preview.set_visible(false);
        }
        log::debug!("Pipette drag ended");
    }

    /// End the drag if capture went away behind our back.
    fn resync(&mut self) {
        if self.dragging && !self.capture.is_captured() {
            log::debug!("Pipette lost pointer capture");
            self.exit_drag();
        }
    }
}

/// Cancels a drag when Escape is pressed, wherever focus is.
struct EscapeFilter {
    state: Weak<RefCell<DragState>>,
}

impl KeyFilter for EscapeFilter {
    fn pre_filter(&mut self, event: &KeyEvent) -> bool {
        let Some(shared) = self.state.upgrade() else {
            return false;
        };
        let Ok(mut state) = shared.try_borrow_mut() else {
            log::warn!("Pipette is busy, skipping {:?}", event);
            return false;
        };
        if state.dragging && event.is_press_of(ESCAPE_KEY) {
            log::debug!("Pipette drag cancelled");
            state.exit_drag();
        }
        false
    }
}

/// Interactive color picker widget.
pub struct Pipette {
    glyph: RgbaImage,
    drag_cursor: Option<CursorImage>,
    state: Rc<RefCell<DragState>>,
    /// Screen position of the widget's top-left corner.
    location: Point,
    subscription: Option<Subscription>,
}

impl Pipette {
    /// Create the widget and install its Escape filter on `hub`.
    ///
    /// The drag cursor is built from `glyph` with [`DRAG_CURSOR_HOTSPOT`].
    pub fn new(
        glyph: RgbaImage,
        capture: Rc<dyn PointerCapture>,
        preview: Box<dyn ColorPreview>,
        hub: &InputHub,
    ) -> ResourceResult<Self> {
        let drag_cursor = CursorImage::from_bitmap(glyph.clone(), DRAG_CURSOR_HOTSPOT)?;
        let state = Rc::new(RefCell::new(DragState {
            dragging: false,
            capture,
            preview: Some(preview),
        }));
        let filter = Rc::new(RefCell::new(EscapeFilter {
            state: Rc::downgrade(&state),
        }));
        let subscription = hub.subscribe(filter);
        Ok(Self {
            glyph,
            drag_cursor: Some(drag_cursor),
            state,
            location: Point::ZERO,
            subscription: Some(subscription),
        })
    }

    /// Tell the widget where it is on screen.
    pub fn set_location(&mut self, location: Point) {
        self.location = location;
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().dragging
    }

    /// The glyph shown in the widget; hidden while dragging.
    pub fn displayed_image(&self) -> Option<&RgbaImage> {
        if self.is_dragging() { None } else { Some(&self.glyph) }
    }

    /// The cursor to show.
    pub fn cursor(&self) -> PipetteCursor<'_> {
        match (&self.drag_cursor, self.is_dragging()) {
            (Some(cursor), true) => PipetteCursor::Drag(cursor),
            _ => PipetteCursor::Arrow,
        }
    }

    /// Whether the color preview is showing.
    pub fn is_preview_visible(&self) -> bool {
        self.state
            .borrow()
            .preview
            .as_ref()
            .is_some_and(|p| p.is_visible())
    }

    /// The color currently under the pointer, as far as the preview knows.
    pub fn current_color(&self) -> Option<SampledColor> {
        self.state.borrow().preview.as_ref().map(|p| p.color())
    }

    fn to_screen(&self, position: Point) -> Point {
        self.location + position.to_vec2()
    }

    /// Handle a press on the widget.
    pub fn mouse_down(&mut self, event: &MouseEvent) {
        let screen = self.to_screen(event.position);
        let mut state = self.state.borrow_mut();
        state.resync();
        if !event.is_primary() || state.dragging || state.preview.is_none() {
            return;
        }
        if !state.capture.acquire() {
            log::debug!("Pipette could not take pointer capture");
            return;
        }
        state.enter_drag(screen);
    }

    /// Handle a pointer move; while dragging the preview follows.
    pub fn mouse_move(&mut self, event: &MouseEvent) {
        let screen = self.to_screen(event.position);
        let mut state = self.state.borrow_mut();
        state.resync();
        if !state.dragging {
            return;
        }
        if let Some(preview) = state.preview.as_mut() {
            preview.move_to(screen);
        }
    }

    /// Handle a release. Finishing a drag reports the sampled color.
    pub fn mouse_up(&mut self, event: &MouseEvent) -> Option<PipetteEvent> {
        let mut state = self.state.borrow_mut();
        state.resync();
        if !event.is_primary() || !state.dragging {
            return None;
        }
        let color = state.preview.as_ref()?.color();
        state.exit_drag();
        log::debug!("Pipette picked {}", color.to_hex());
        Some(PipetteEvent::Used { color })
    }

    /// The host noticed a capture change.
    pub fn on_capture_changed(&mut self) {
        self.state.borrow_mut().resync();
    }

    /// Check if the widget has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.subscription.is_none()
    }

    /// End any drag, uninstall the key filter and release the cursor and
    /// preview. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.subscription = None;
        let mut state = self.state.borrow_mut();
        if state.dragging {
            state.exit_drag();
        }
        state.preview = None;
        self.drag_cursor = None;
    }
}

impl Drop for Pipette {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Pipette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipette")
            .field("dragging", &self.is_dragging())
            .field("location", &self.location)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
