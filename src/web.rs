//! Browser capabilities backed by `web-sys`.
//!
//! Input listeners go on the window, frames use `requestAnimationFrame`,
//! timeouts use `gloo-timers` and the pointer lock targets `document.body`.
//! Browser failures are logged and absorbed; the recognizers never see them.

#[cfg(test)]
#[path = "web_test.rs"]
mod web_test;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use gloo_timers::callback::Timeout;
use tracing::warn;
use wasm_bindgen::{JsCast, closure::Closure};

use crate::env::{
    Environment, FrameHandle, FrameScheduler, InputHandler, InputSource, ListenerId, PointerLock, TimerHandle, Timers,
};
use crate::event::{Button, EventKind, InputEvent, ListenOptions, Modifiers, PointerEvent, WheelEvent};
use crate::geometry::Point;

type DomCallback = Closure<dyn FnMut(web_sys::Event)>;

// =============================================================================
// DOM → InputEvent
// =============================================================================

fn modifiers(ev: &web_sys::MouseEvent) -> Modifiers {
    Modifiers { shift: ev.shift_key(), ctrl: ev.ctrl_key(), alt: ev.alt_key(), meta: ev.meta_key() }
}

fn pointer_event(ev: &web_sys::MouseEvent) -> PointerEvent {
    PointerEvent {
        position: Point::new(f64::from(ev.client_x()), f64::from(ev.client_y())),
        movement: Point::new(f64::from(ev.movement_x()), f64::from(ev.movement_y())),
        button: Button::from_dom(ev.button()).unwrap_or_default(),
        modifiers: modifiers(ev),
    }
}

fn wheel_event(ev: &web_sys::WheelEvent) -> WheelEvent {
    WheelEvent {
        position: Point::new(f64::from(ev.client_x()), f64::from(ev.client_y())),
        delta_x: ev.delta_x(),
        delta_y: ev.delta_y(),
        modifiers: modifiers(ev),
    }
}

fn translate(kind: EventKind, event: &web_sys::Event) -> Option<InputEvent> {
    match kind {
        EventKind::Wheel => event.dyn_ref::<web_sys::WheelEvent>().map(|ev| wheel_event(ev).into()),
        EventKind::PointerDown | EventKind::PointerMove | EventKind::PointerUp => {
            event.dyn_ref::<web_sys::MouseEvent>().map(|ev| pointer_event(ev).into())
        }
    }
}

/// Slots keyed by id for closures the browser still references.
type Slots<T> = Rc<RefCell<HashMap<u64, T>>>;

/// Remove a slot from inside its own callback. The caller drops the entry
/// only after the callback body has run.
fn retire<T>(slots: &Weak<RefCell<HashMap<u64, T>>>, id: u64) -> Option<T> {
    slots.upgrade().and_then(|slots| slots.borrow_mut().remove(&id))
}

/// Whole milliseconds for `setTimeout`, saturating at `u32::MAX`.
fn timeout_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}

// =============================================================================
// Input
// =============================================================================

/// Window-level listeners.
pub struct WebInput {
    target: web_sys::EventTarget,
    next_id: Cell<u64>,
    callbacks: Slots<DomCallback>,
}

impl WebInput {
    #[must_use]
    pub fn new(target: web_sys::EventTarget) -> Self {
        Self { target, next_id: Cell::new(0), callbacks: Rc::new(RefCell::new(HashMap::new())) }
    }
}

impl InputSource for WebInput {
    fn add_listener(&self, kind: EventKind, handler: InputHandler, options: ListenOptions) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        // The DOM drops a `once` listener after its first event; drop the closure with it.
        let slots = options.once.then(|| Rc::downgrade(&self.callbacks));
        let callback: DomCallback = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let entry = slots.as_ref().and_then(|slots| retire(slots, id));
            if let Some(input) = translate(kind, &event) {
                handler(&input);
            }
            drop(entry);
        }) as Box<dyn FnMut(web_sys::Event)>);

        let dom_options = web_sys::AddEventListenerOptions::new();
        dom_options.set_capture(options.capture);
        dom_options.set_once(options.once);
        if let Err(err) = self.target.add_event_listener_with_callback_and_add_event_listener_options(
            kind.as_str(),
            callback.as_ref().unchecked_ref(),
            &dom_options,
        ) {
            warn!(event = kind.as_str(), ?err, "web: addEventListener failed");
        }
        self.callbacks.borrow_mut().insert(id, callback);
        ListenerId(id)
    }

    fn remove_listener(&self, kind: EventKind, id: ListenerId, options: ListenOptions) {
        let Some(callback) = self.callbacks.borrow_mut().remove(&id.0) else {
            return;
        };
        if let Err(err) = self.target.remove_event_listener_with_callback_and_bool(
            kind.as_str(),
            callback.as_ref().unchecked_ref(),
            options.capture,
        ) {
            warn!(event = kind.as_str(), ?err, "web: removeEventListener failed");
        }
    }
}

// =============================================================================
// Frames
// =============================================================================

/// `requestAnimationFrame` scheduler.
pub struct WebFrames {
    window: web_sys::Window,
    next_id: Cell<u64>,
    pending: Slots<(i32, Closure<dyn FnMut(f64)>)>,
}

impl WebFrames {
    #[must_use]
    pub fn new(window: web_sys::Window) -> Self {
        Self { window, next_id: Cell::new(0), pending: Rc::new(RefCell::new(HashMap::new())) }
    }
}

impl FrameScheduler for WebFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let callback = Rc::new(RefCell::new(Some(callback)));
        let pending = Rc::downgrade(&self.pending);
        let run = Rc::clone(&callback);
        let closure = Closure::wrap(Box::new(move |_ts: f64| {
            let entry = retire(&pending, id);
            let taken = run.borrow_mut().take();
            if let Some(callback) = taken {
                callback();
            }
            drop(entry);
        }) as Box<dyn FnMut(f64)>);

        match self.window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(raf) => {
                self.pending.borrow_mut().insert(id, (raf, closure));
            }
            Err(err) => {
                warn!(?err, "web: requestAnimationFrame failed; running frame now");
                let taken = callback.borrow_mut().take();
                if let Some(callback) = taken {
                    callback();
                }
            }
        }
        FrameHandle(id)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let entry = self.pending.borrow_mut().remove(&handle.0);
        if let Some((raf, _closure)) = entry {
            if let Err(err) = self.window.cancel_animation_frame(raf) {
                warn!(?err, "web: cancelAnimationFrame failed");
            }
        }
    }
}

// =============================================================================
// Timers
// =============================================================================

/// `setTimeout` via `gloo-timers`; dropping a [`Timeout`] clears it.
#[derive(Default)]
pub struct WebTimers {
    next_id: Cell<u64>,
    pending: Slots<Timeout>,
}

impl Timers for WebTimers {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let pending = Rc::downgrade(&self.pending);
        let timeout = Timeout::new(timeout_millis(delay), move || {
            let entry = retire(&pending, id);
            callback();
            drop(entry);
        });
        self.pending.borrow_mut().insert(id, timeout);
        TimerHandle(id)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        let entry = self.pending.borrow_mut().remove(&handle.0);
        drop(entry);
    }
}

// =============================================================================
// Pointer lock
// =============================================================================

/// Locks the pointer to `document.body`.
pub struct WebPointerLock {
    document: web_sys::Document,
}

impl WebPointerLock {
    #[must_use]
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl PointerLock for WebPointerLock {
    fn acquire(&self) {
        match self.document.body() {
            Some(body) => body.request_pointer_lock(),
            None => warn!("web: no document body to lock the pointer to"),
        }
    }

    fn release(&self) {
        self.document.exit_pointer_lock();
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// The browser capability set for the current window.
pub struct WebEnvironment {
    pub input: Rc<WebInput>,
    pub frames: Rc<WebFrames>,
    pub timers: Rc<WebTimers>,
    pub pointer_lock: Option<Rc<WebPointerLock>>,
}

impl WebEnvironment {
    /// `None` outside a browser window.
    #[must_use]
    pub fn new() -> Option<Self> {
        let Some(window) = web_sys::window() else {
            warn!("web: no window; browser environment unavailable");
            return None;
        };
        let pointer_lock = window.document().map(|document| Rc::new(WebPointerLock::new(document)));
        Some(Self {
            input: Rc::new(WebInput::new(window.clone().unchecked_into())),
            frames: Rc::new(WebFrames::new(window)),
            timers: Rc::new(WebTimers::default()),
            pointer_lock,
        })
    }

    /// Capabilities in the shape the recognizers consume.
    #[must_use]
    pub fn environment(&self) -> Environment {
        let env = Environment::new(self.input.clone(), self.frames.clone(), self.timers.clone());
        match &self.pointer_lock {
            Some(lock) => env.with_pointer_lock(lock.clone()),
            None => env,
        }
    }
}
