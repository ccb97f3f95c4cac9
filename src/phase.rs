//! Single-subscriber handler slot for one gesture phase.

#[cfg(test)]
#[path = "phase_test.rs"]
mod phase_test;

use std::cell::RefCell;

/// Boxed phase handler.
pub type Handler<T> = Box<dyn FnMut(&T)>;

/// Holds at most one handler for a phase.
///
/// Emission takes the handler out of the slot for the duration of the call,
/// so a handler may re-enter the recognizer that owns it. A re-entrant
/// emission of the same phase while its handler runs is dropped.
pub struct Phase<T> {
    handler: RefCell<Option<Handler<T>>>,
}

impl<T> Phase<T> {
    /// A registered phase that fires nothing.
    #[must_use]
    pub fn silent() -> Self {
        Self { handler: RefCell::new(None) }
    }

    #[must_use]
    pub fn new(handler: impl FnMut(&T) + 'static) -> Self {
        Self { handler: RefCell::new(Some(Box::new(handler))) }
    }

    /// Invoke the handler, if any, with `data`.
    pub fn emit(&self, data: &T) {
        let taken = self.handler.borrow_mut().take();
        let Some(mut handler) = taken else {
            return;
        };
        handler(data);
        let mut slot = self.handler.borrow_mut();
        if slot.is_none() {
            *slot = Some(handler);
        }
    }
}

impl<T> Default for Phase<T> {
    fn default() -> Self {
        Self::silent()
    }
}
