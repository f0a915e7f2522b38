//! Exclusive pointer capture.

use std::cell::Cell;

/// Routes all pointer input to one widget until released.
///
/// Implemented by the host's native layer. Capture can also be revoked by
/// the system at any time; widgets must not assume it is still held.
pub trait PointerCapture {
    /// Try to take capture. Returns false if the system refused.
    fn acquire(&self) -> bool;

    /// Give capture back. Harmless when not held.
    fn release(&self);

    /// Whether capture is currently held.
    fn is_captured(&self) -> bool;
}

/// Capture bookkeeping for hosts without a native capture primitive.
#[derive(Debug)]
pub struct LocalCapture {
    captured: Cell<bool>,
    available: Cell<bool>,
}

impl LocalCapture {
    pub fn new() -> Self {
        Self {
            captured: Cell::new(false),
            available: Cell::new(true),
        }
    }

    /// Make future [`PointerCapture::acquire`] calls fail or succeed.
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    /// Drop capture without the owner asking, as when another window grabs
    /// the pointer.
    pub fn revoke(&self) {
        if self.captured.replace(false) {
            log::debug!("Pointer capture revoked");
        }
    }
}

impl Default for LocalCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerCapture for LocalCapture {
    fn acquire(&self) -> bool {
        if self.available.get() {
            self.captured.set(true);
        }
        self.captured.get()
    }

    fn release(&self) {
        self.captured.set(false);
    }

    fn is_captured(&self) -> bool {
        self.captured.get()
    }
}
