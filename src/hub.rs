//! In-memory input source for native hosts, replay tools and tests.
//!
//! A host event loop (winit, a recorded trace, a test) calls
//! [`InputHub::dispatch`] for every raw event; the hub fans it out to the
//! listeners registered for that channel. The hub has no element tree, so
//! `capture` is accepted but has no effect on ordering.

#[cfg(test)]
#[path = "hub_test.rs"]
mod hub_test;

use std::cell::{Cell, RefCell};

use tracing::trace;

use crate::env::{InputHandler, InputSource, ListenerId};
use crate::event::{EventKind, InputEvent, ListenOptions, PointerEvent, WheelEvent};

struct Registration {
    kind: EventKind,
    id: ListenerId,
    handler: InputHandler,
    options: ListenOptions,
}

/// Fan-out dispatcher implementing [`InputSource`].
#[derive(Default)]
pub struct InputHub {
    next_id: Cell<u64>,
    registrations: RefCell<Vec<Registration>>,
}

impl InputHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every listener on `kind`, in registration order.
    ///
    /// The recipients are fixed when dispatch begins; a recipient removed by
    /// an earlier handler in the same dispatch is skipped. Returns the number
    /// of handlers invoked.
    pub fn dispatch(&self, kind: EventKind, event: &InputEvent) -> usize {
        let recipients: Vec<(ListenerId, InputHandler, bool)> = self
            .registrations
            .borrow()
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| (r.id, InputHandler::clone(&r.handler), r.options.once))
            .collect();

        let mut delivered = 0;
        for (id, handler, once) in recipients {
            if !self.is_registered(id) {
                continue;
            }
            if once {
                self.unregister(id);
            }
            handler(event);
            delivered += 1;
        }
        trace!(kind = kind.as_str(), delivered, "hub: dispatched");
        delivered
    }

    pub fn press(&self, event: PointerEvent) -> usize {
        self.dispatch(EventKind::PointerDown, &event.into())
    }

    pub fn move_to(&self, event: PointerEvent) -> usize {
        self.dispatch(EventKind::PointerMove, &event.into())
    }

    pub fn release(&self, event: PointerEvent) -> usize {
        self.dispatch(EventKind::PointerUp, &event.into())
    }

    pub fn wheel(&self, event: WheelEvent) -> usize {
        self.dispatch(EventKind::Wheel, &event.into())
    }

    /// Live registrations on `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registrations.borrow().iter().filter(|r| r.kind == kind).count()
    }

    /// Live registrations across all channels.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.registrations.borrow().len()
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.registrations.borrow().iter().any(|r| r.id == id)
    }

    fn unregister(&self, id: ListenerId) {
        self.take_where(|r| r.id == id);
    }

    /// Remove matching registrations, dropping their handlers only after the
    /// borrow is released so a handler's captures may touch the hub on drop.
    fn take_where(&self, matches: impl Fn(&Registration) -> bool) {
        let removed: Vec<Registration> = {
            let mut registrations = self.registrations.borrow_mut();
            let (removed, kept) = registrations.drain(..).partition(|r| matches(r));
            *registrations = kept;
            removed
        };
        drop(removed);
    }
}

impl InputSource for InputHub {
    fn add_listener(&self, kind: EventKind, handler: InputHandler, options: ListenOptions) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.registrations
            .borrow_mut()
            .push(Registration { kind, id, handler, options });
        id
    }

    fn remove_listener(&self, kind: EventKind, id: ListenerId, _options: ListenOptions) {
        self.take_where(|r| r.kind == kind && r.id == id);
    }
}
