//! Environment capabilities the recognizers depend on.
//!
//! DESIGN
//! ======
//! The recognizers never talk to a window system directly. They consume four
//! small capabilities: an input source (subscribe/unsubscribe to named input
//! channels), a frame scheduler (run a callback before the next repaint),
//! timers (run a callback after a delay) and an optional pointer lock.
//! Browser hosts get them from [`crate::web`]; native hosts and tests use
//! [`crate::hub::InputHub`] with [`crate::manual::ManualScheduler`] or the
//! tokio driver.
//!
//! Everything here is single-threaded: capabilities are shared through `Rc`
//! and callbacks are not `Send`.
//!
//! Every registration is paired with its release through a guard type
//! ([`Listener`], [`PointerLockGuard`]), so teardown paths cannot forget one.

#[cfg(test)]
#[path = "env_test.rs"]
mod env_test;

use std::rc::Rc;
use std::time::Duration;

use crate::event::{EventKind, InputEvent, ListenOptions};

/// Handler invoked for every event delivered on a subscribed channel.
pub type InputHandler = Rc<dyn Fn(&InputEvent)>;

/// Identifies one listener registration on an [`InputSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Identifies one pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Identifies one pending timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// A global source of named input events.
pub trait InputSource {
    fn add_listener(&self, kind: EventKind, handler: InputHandler, options: ListenOptions) -> ListenerId;

    /// Remove a registration. Unknown ids (already removed, or dropped after a
    /// `once` delivery) must be ignored.
    fn remove_listener(&self, kind: EventKind, id: ListenerId, options: ListenOptions);
}

/// Runs callbacks before the next repaint.
pub trait FrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> FrameHandle;

    /// Cancel a pending frame callback. Cancelling a callback that already ran is a no-op.
    fn cancel_frame(&self, handle: FrameHandle);
}

/// Runs callbacks after a delay.
pub trait Timers {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;

    /// Cancel a pending timeout. Clearing a timeout that already fired is a no-op.
    fn clear_timeout(&self, handle: TimerHandle);
}

/// Exclusive pointer capture on the input surface.
///
/// While held, absolute pointer positions are not observable and only
/// relative motion is reported.
pub trait PointerLock {
    fn acquire(&self);
    fn release(&self);
}

/// An active listener registration. Removed on [`Listener::remove`] or drop.
pub struct Listener {
    source: Rc<dyn InputSource>,
    kind: EventKind,
    id: ListenerId,
    options: ListenOptions,
    removed: bool,
}

impl Listener {
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Unregister now instead of at drop.
    pub fn remove(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;
        self.source.remove_listener(self.kind, self.id, self.options);
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Subscribe `handler` to `kind` and return the guard that unsubscribes it.
pub fn listen(
    source: &Rc<dyn InputSource>,
    kind: EventKind,
    options: ListenOptions,
    handler: impl Fn(&InputEvent) + 'static,
) -> Listener {
    let id = source.add_listener(kind, Rc::new(handler), options);
    Listener { source: Rc::clone(source), kind, id, options, removed: false }
}

/// A held pointer lock; released exactly once when dropped.
pub struct PointerLockGuard {
    lock: Rc<dyn PointerLock>,
}

impl PointerLockGuard {
    #[must_use]
    pub fn acquire(lock: &Rc<dyn PointerLock>) -> Self {
        lock.acquire();
        Self { lock: Rc::clone(lock) }
    }
}

impl Drop for PointerLockGuard {
    fn drop(&mut self) {
        self.lock.release();
    }
}

/// The capability bundle handed to a recognizer.
#[derive(Clone)]
pub struct Environment {
    pub input: Rc<dyn InputSource>,
    pub frames: Rc<dyn FrameScheduler>,
    pub timers: Rc<dyn Timers>,
    pub pointer_lock: Option<Rc<dyn PointerLock>>,
}

impl Environment {
    #[must_use]
    pub fn new(input: Rc<dyn InputSource>, frames: Rc<dyn FrameScheduler>, timers: Rc<dyn Timers>) -> Self {
        Self { input, frames, timers, pointer_lock: None }
    }

    #[must_use]
    pub fn with_pointer_lock(mut self, lock: Rc<dyn PointerLock>) -> Self {
        self.pointer_lock = Some(lock);
        self
    }
}
