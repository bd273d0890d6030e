//! Scoped pointer tracking for resize gestures.
//!
//! While a resize is active the host must keep reporting pointer moves and
//! the release even when the pointer wanders off the appointment. The host
//! installs that tracking through [`PointerTracker::install`]; the returned
//! [`PointerCapture`] uninstalls it when dropped, so every way out of a
//! session (release, cancel, controller teardown) releases it.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

pub trait PointerTracker {
    fn install(&mut self) -> PointerCapture;
}

/// Guard for installed pointer tracking.
pub struct PointerCapture {
    release: Option<Box<dyn FnOnce()>>,
}

impl PointerCapture {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for PointerCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerCapture")
            .field("held", &self.release.is_some())
            .finish()
    }
}

/// Tracker backed by a shared flag the host polls each frame.
#[derive(Clone, Debug, Default)]
pub struct FlagPointerTracker {
    active: Rc<Cell<bool>>,
}

impl FlagPointerTracker {
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl PointerTracker for FlagPointerTracker {
    fn install(&mut self) -> PointerCapture {
        self.active.set(true);
        let active = Rc::clone(&self.active);
        PointerCapture::new(move || active.set(false))
    }
}
