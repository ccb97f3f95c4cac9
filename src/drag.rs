//! Drag recognizer: press → throttled moves → release.
//!
//! DESIGN
//! ======
//! A [`DragGesture`] is attached once and drives a single drag. Press opens a
//! [`DragSession`]; move events are folded into a position source and emitted
//! at most once per animation frame; release emits the end phase and tears the
//! gesture down. After the end transition (or [`DragGesture::destroy`]) the
//! gesture is inert.
//!
//! Phase handlers live in a [`DragHandlers`] value fixed at attach time, one
//! slot per phase. A phase that was never registered installs no environment
//! listener.
//!
//! EDGE CASES
//! ==========
//! - Release without a session is ignored (pending move input is discarded).
//! - A move frame that finds no session synthesizes the start phase at the
//!   first pending move position. This covers hosts that attach the gesture
//!   from inside the press dispatch and so never observe the press itself.
//! - A release while a move is still waiting for its frame flushes that move
//!   first, so the end payload reflects the final pointer position.
//! - A press while a session is open is ignored.
//! - A press discards move input recorded before it and cancels its frame;
//!   the session only sees motion that follows the press.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::config::GestureConfig;
use crate::env::{Environment, FrameHandle, Listener, PointerLockGuard, listen};
use crate::event::{EventKind, InputEvent, ListenOptions, PointerEvent};
use crate::geometry::{Point, Rect};
use crate::phase::Phase;
use crate::position::{self, PositionSource};

// =============================================================================
// PAYLOADS
// =============================================================================

/// Snapshot passed to start and move handlers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragData {
    pub current: Point,
    pub start: Point,
    /// `current - start`.
    pub shift: Point,
    /// Displacement since the previously emitted move. Zero for start and end.
    pub delta: Point,
    /// Bounding box of `start` and `current`.
    pub marquee: Rect,
}

/// Snapshot passed to the end handler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragEnd {
    #[serde(flatten)]
    pub data: DragData,
    /// Whether the pointer ended anywhere other than where it started.
    pub moved: bool,
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Phase handlers for one drag. First registration of a phase wins.
#[derive(Default)]
pub struct DragHandlers {
    start: Option<Phase<DragData>>,
    moving: Option<Phase<DragData>>,
    end: Option<Phase<DragEnd>>,
}

impl DragHandlers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the start phase with a handler.
    #[must_use]
    pub fn on_start(mut self, handler: impl FnMut(&DragData) + 'static) -> Self {
        if self.start.is_none() {
            self.start = Some(Phase::new(handler));
        }
        self
    }

    /// Register the start phase without a handler, so presses are observed.
    #[must_use]
    pub fn track_start(mut self) -> Self {
        if self.start.is_none() {
            self.start = Some(Phase::silent());
        }
        self
    }

    #[must_use]
    pub fn on_move(mut self, handler: impl FnMut(&DragData) + 'static) -> Self {
        if self.moving.is_none() {
            self.moving = Some(Phase::new(handler));
        }
        self
    }

    #[must_use]
    pub fn on_end(mut self, handler: impl FnMut(&DragEnd) + 'static) -> Self {
        if self.end.is_none() {
            self.end = Some(Phase::new(handler));
        }
        self
    }

    /// Register the end phase without a handler, so releases are observed.
    #[must_use]
    pub fn track_end(mut self) -> Self {
        if self.end.is_none() {
            self.end = Some(Phase::silent());
        }
        self
    }

    /// Observe the whole drag but only report moves.
    #[must_use]
    pub fn slide(self, handler: impl FnMut(&DragData) + 'static) -> Self {
        self.track_start().on_move(handler).track_end()
    }
}

/// Mode switches fixed for the lifetime of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragOptions {
    /// Lock the pointer and integrate relative motion instead of reading positions.
    pub infinite: bool,
    /// Emit at most one move per animation frame. When off, moves emit synchronously.
    pub throttle: bool,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self { infinite: false, throttle: true }
    }
}

impl DragOptions {
    #[must_use]
    pub fn from_config(config: &GestureConfig) -> Self {
        Self { throttle: config.drag_throttle, ..Self::default() }
    }

    #[must_use]
    pub fn use_infinite_mode(mut self) -> Self {
        self.infinite = true;
        self
    }

    #[must_use]
    pub fn without_throttle(mut self) -> Self {
        self.throttle = false;
        self
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// State of one active drag. Dropping it releases the pointer lock.
struct DragSession {
    id: Uuid,
    start: Point,
    current: Point,
    last_emitted: Point,
    _lock: Option<PointerLockGuard>,
}

impl DragSession {
    fn begin(at: Point, lock: Option<PointerLockGuard>) -> Self {
        Self { id: Uuid::new_v4(), start: at, current: at, last_emitted: at, _lock: lock }
    }

    fn snapshot(&self, delta: Point) -> DragData {
        DragData {
            current: self.current,
            start: self.start,
            shift: self.current - self.start,
            delta,
            marquee: Rect::from_corners(self.start, self.current),
        }
    }

    fn finish(&self) -> DragEnd {
        let data = self.snapshot(Point::ZERO);
        DragEnd { data, moved: !data.shift.is_zero() }
    }
}

struct DragCore {
    session: Option<DragSession>,
    source: Box<dyn PositionSource>,
    move_pending: bool,
    move_frame: Option<FrameHandle>,
    listeners: Vec<Listener>,
    finished: bool,
}

struct DragShared {
    env: Environment,
    options: DragOptions,
    handlers: DragHandlers,
    core: RefCell<DragCore>,
}

// =============================================================================
// GESTURE
// =============================================================================

/// A single-use drag recognizer bound to an [`Environment`].
pub struct DragGesture {
    shared: Rc<DragShared>,
}

impl DragGesture {
    /// Install listeners for every registered phase and return the gesture.
    #[must_use]
    pub fn attach(env: &Environment, handlers: DragHandlers, options: DragOptions) -> Self {
        let watch_press = handlers.start.is_some();
        let watch_move = handlers.moving.is_some();
        let watch_release = handlers.end.is_some();

        let shared = Rc::new(DragShared {
            env: env.clone(),
            options,
            handlers,
            core: RefCell::new(DragCore {
                session: None,
                source: position::for_mode(options.infinite),
                move_pending: false,
                move_frame: None,
                listeners: Vec::new(),
                finished: false,
            }),
        });

        let mut listeners = Vec::new();
        if watch_press {
            listeners.push(route(&shared, EventKind::PointerDown, DragShared::pressed));
        }
        if watch_move {
            listeners.push(route(&shared, EventKind::PointerMove, DragShared::moved));
        }
        if watch_release {
            listeners.push(route(&shared, EventKind::PointerUp, DragShared::released));
        }
        shared.core.borrow_mut().listeners = listeners;

        debug!(
            infinite = options.infinite,
            throttle = options.throttle,
            press = watch_press,
            moves = watch_move,
            release = watch_release,
            "drag: attached"
        );
        Self { shared }
    }

    /// Start the drag from a press the host already observed.
    ///
    /// Same transition as a press delivered through the input source.
    pub fn begin(&self, event: &PointerEvent) {
        self.shared.pressed(event);
    }

    /// Whether a drag session is open.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.shared.core.borrow().session.is_some()
    }

    /// Whether the gesture still listens for input.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.shared.core.borrow().finished
    }

    /// Tear down without emitting the end phase: cancels a pending move,
    /// removes every listener and releases the pointer lock.
    pub fn destroy(&self) {
        if self.is_dragging() {
            debug!("drag: destroyed mid-session");
        }
        self.shared.teardown();
    }
}

impl Drop for DragGesture {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

/// Subscribe a pointer handler that holds the gesture weakly.
fn route(shared: &Rc<DragShared>, kind: EventKind, handler: fn(&Rc<DragShared>, &PointerEvent)) -> Listener {
    let weak = Rc::downgrade(shared);
    listen(&shared.env.input, kind, ListenOptions::default(), move |event: &InputEvent| {
        let (Some(shared), Some(pointer)) = (weak.upgrade(), event.as_pointer()) else {
            return;
        };
        handler(&shared, pointer);
    })
}

impl DragShared {
    fn acquire_lock(&self) -> Option<PointerLockGuard> {
        if !self.options.infinite {
            return None;
        }
        if self.env.pointer_lock.is_none() {
            debug!("drag: infinite mode without a pointer lock capability");
        }
        self.env.pointer_lock.as_ref().map(PointerLockGuard::acquire)
    }

    fn pressed(self: &Rc<Self>, event: &PointerEvent) {
        let (data, stale) = {
            let mut core = self.core.borrow_mut();
            if core.finished || core.session.is_some() {
                return;
            }
            // Hover motion recorded before the press never reaches the session.
            core.move_pending = false;
            core.source.resolve(Point::ZERO);
            let stale = core.move_frame.take();

            let session = DragSession::begin(event.position, self.acquire_lock());
            debug!(session = %session.id, x = event.position.x, y = event.position.y, "drag: start");
            let data = session.snapshot(Point::ZERO);
            core.session = Some(session);
            (data, stale)
        };
        if let Some(handle) = stale {
            self.env.frames.cancel_frame(handle);
        }
        if let Some(phase) = &self.handlers.start {
            phase.emit(&data);
        }
    }

    fn moved(self: &Rc<Self>, event: &PointerEvent) {
        {
            let mut core = self.core.borrow_mut();
            if core.finished {
                return;
            }
            core.source.record(event);
            if core.move_pending {
                return;
            }
            core.move_pending = true;
        }

        if !self.options.throttle {
            self.flush_move();
            return;
        }

        let weak = Rc::downgrade(self);
        let handle = self.env.frames.request_frame(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.flush_move();
            }
        }));
        let mut core = self.core.borrow_mut();
        if core.move_pending {
            core.move_frame = Some(handle);
        }
    }

    /// Emit the accumulated move, synthesizing the start phase if needed.
    fn flush_move(&self) {
        let (synthesized, data) = {
            let mut core = self.core.borrow_mut();
            core.move_pending = false;
            core.move_frame = None;
            if core.finished {
                return;
            }

            let mut synthesized = None;
            if core.session.is_none() {
                let Some(origin) = core.source.origin() else {
                    return;
                };
                let session = DragSession::begin(origin, self.acquire_lock());
                debug!(session = %session.id, x = origin.x, y = origin.y, "drag: start synthesized from move");
                synthesized = Some(session.snapshot(Point::ZERO));
                core.session = Some(session);
            }

            let DragCore { session, source, .. } = &mut *core;
            let Some(session) = session.as_mut() else {
                return;
            };
            session.current = source.resolve(session.current);
            let delta = session.current - session.last_emitted;
            session.last_emitted = session.current;
            trace!(session = %session.id, x = session.current.x, y = session.current.y, "drag: move");
            (synthesized, session.snapshot(delta))
        };

        if let Some(start) = synthesized {
            if let Some(phase) = &self.handlers.start {
                phase.emit(&start);
            }
            if self.core.borrow().session.is_none() {
                return;
            }
        }
        if let Some(phase) = &self.handlers.moving {
            phase.emit(&data);
        }
    }

    fn released(self: &Rc<Self>, _event: &PointerEvent) {
        let (open, pending) = {
            let mut core = self.core.borrow_mut();
            if core.finished {
                return;
            }
            let pending = if core.move_pending { Some(core.move_frame.take()) } else { None };
            (core.session.is_some(), pending)
        };
        if let Some(Some(handle)) = pending {
            self.env.frames.cancel_frame(handle);
        }

        if !open {
            // Motion recorded without a press is dropped, not turned into a drag.
            let mut core = self.core.borrow_mut();
            core.move_pending = false;
            core.source.resolve(Point::ZERO);
            return;
        }
        if pending.is_some() {
            self.flush_move();
        }

        let Some(session) = self.core.borrow_mut().session.take() else {
            return;
        };
        let end = session.finish();
        debug!(session = %session.id, moved = end.moved, "drag: end");
        if let Some(phase) = &self.handlers.end {
            phase.emit(&end);
        }
        drop(session);
        self.teardown();
    }

    /// Reset to the inert state: no session, no pending move, no listeners.
    fn teardown(&self) {
        let (listeners, frame, session) = {
            let mut core = self.core.borrow_mut();
            core.finished = true;
            core.move_pending = false;
            core.source.resolve(Point::ZERO);
            (std::mem::take(&mut core.listeners), core.move_frame.take(), core.session.take())
        };
        if let Some(handle) = frame {
            self.env.frames.cancel_frame(handle);
        }
        drop(session);
        drop(listeners);
    }
}
