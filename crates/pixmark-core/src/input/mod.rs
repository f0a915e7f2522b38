//! Pointer and keyboard events delivered by the host windowing system.

mod hub;

pub use hub::{InputHub, KeyFilter, Subscription, SubscriptionId};

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Name of the Escape key in [`KeyEvent`]s.
pub const ESCAPE_KEY: &str = "Escape";

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// The button that starts drags and picks colors.
    pub const PRIMARY: MouseButton = MouseButton::Left;
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// A pointer event in the receiving widget's coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseEvent {
    /// Pointer position relative to the widget (or editing surface).
    pub position: Point,
    /// Button that changed state; `None` for plain moves.
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// A button press or release at `position`.
    pub fn button(position: Point, button: MouseButton) -> Self {
        Self {
            position,
            button: Some(button),
            modifiers: Modifiers::default(),
        }
    }

    /// A move without button change.
    pub fn moved(position: Point) -> Self {
        Self {
            position,
            button: None,
            modifiers: Modifiers::default(),
        }
    }

    /// Set the modifier state.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check whether this event concerns the primary button.
    pub fn is_primary(&self) -> bool {
        self.button == Some(MouseButton::PRIMARY)
    }
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

impl KeyEvent {
    /// Check if this is a press of the named key.
    pub fn is_press_of(&self, key: &str) -> bool {
        matches!(self, KeyEvent::Pressed(k) if k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_button() {
        let down = MouseEvent::button(Point::new(1.0, 2.0), MouseButton::Left);
        assert!(down.is_primary());
        assert!(!MouseEvent::button(Point::ZERO, MouseButton::Right).is_primary());
        assert!(!MouseEvent::moved(Point::ZERO).is_primary());
    }

    #[test]
    fn test_key_press_of() {
        assert!(KeyEvent::Pressed(ESCAPE_KEY.to_string()).is_press_of(ESCAPE_KEY));
        assert!(!KeyEvent::Released(ESCAPE_KEY.to_string()).is_press_of(ESCAPE_KEY));
        assert!(!KeyEvent::Pressed("a".to_string()).is_press_of(ESCAPE_KEY));
    }
}
