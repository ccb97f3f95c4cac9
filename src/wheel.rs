//! Wheel burst recognizer: before → during (per frame) → after.
//!
//! DESIGN
//! ======
//! The gesture does not subscribe to any input channel on its own; the host
//! calls [`WheelGesture::feed`] for every raw wheel tick (or wires a channel
//! with [`WheelGesture::listen_on`]). A burst is a run of ticks with no gap of
//! the settle interval or more.
//!
//! - before: first tick of a burst (no settle timer pending).
//! - during: first tick of each animation frame; the frame closes the gate.
//! - after: settle interval elapsed since the last tick; carries that tick.

#[cfg(test)]
#[path = "wheel_test.rs"]
mod wheel_test;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::config::GestureConfig;
use crate::consts::WHEEL_SETTLE;
use crate::env::{Environment, FrameHandle, InputSource, Listener, TimerHandle, listen};
use crate::event::{EventKind, InputEvent, ListenOptions, WheelEvent};
use crate::phase::Phase;

/// Sign of a tick's vertical delta. Serialized as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelDirection {
    #[default]
    Positive,
    Negative,
}

impl WheelDirection {
    /// `delta_y >= 0` is positive.
    #[must_use]
    pub fn of(delta_y: f64) -> Self {
        if delta_y >= 0.0 { Self::Positive } else { Self::Negative }
    }

    #[must_use]
    pub fn sign(self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }
}

impl Serialize for WheelDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.sign())
    }
}

/// Payload for every wheel phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheelData {
    pub event: WheelEvent,
    pub direction: WheelDirection,
}

/// Phase handlers for a wheel gesture. Setting a slot again replaces it.
#[derive(Default)]
pub struct WheelHandlers {
    before: Phase<WheelData>,
    during: Phase<WheelData>,
    after: Phase<WheelData>,
}

impl WheelHandlers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn before_tick(mut self, handler: impl FnMut(&WheelData) + 'static) -> Self {
        self.before = Phase::new(handler);
        self
    }

    #[must_use]
    pub fn during_tick(mut self, handler: impl FnMut(&WheelData) + 'static) -> Self {
        self.during = Phase::new(handler);
        self
    }

    #[must_use]
    pub fn after_tick(mut self, handler: impl FnMut(&WheelData) + 'static) -> Self {
        self.after = Phase::new(handler);
        self
    }
}

#[derive(Default)]
struct WheelCore {
    quiet_timer: Option<TimerHandle>,
    gate_open: bool,
    gate_frame: Option<FrameHandle>,
    direction: WheelDirection,
    ticks: u32,
}

struct WheelShared {
    env: Environment,
    settle: Duration,
    handlers: WheelHandlers,
    core: RefCell<WheelCore>,
}

/// Turns a stream of wheel ticks into burst phases.
pub struct WheelGesture {
    shared: Rc<WheelShared>,
}

impl WheelGesture {
    /// Gesture with the default 250 ms settle interval.
    #[must_use]
    pub fn new(env: &Environment, handlers: WheelHandlers) -> Self {
        Self::with_settle(env, handlers, WHEEL_SETTLE)
    }

    #[must_use]
    pub fn with_config(env: &Environment, handlers: WheelHandlers, config: &GestureConfig) -> Self {
        Self::with_settle(env, handlers, config.wheel_settle)
    }

    fn with_settle(env: &Environment, handlers: WheelHandlers, settle: Duration) -> Self {
        let shared = WheelShared { env: env.clone(), settle, handlers, core: RefCell::new(WheelCore::default()) };
        Self { shared: Rc::new(shared) }
    }

    /// Ingest one raw wheel tick.
    pub fn feed(&self, event: &WheelEvent) {
        self.shared.feed(event);
    }

    /// Feed every wheel event delivered on `source` until the guard drops.
    #[must_use]
    pub fn listen_on(&self, source: &Rc<dyn InputSource>, options: ListenOptions) -> Listener {
        let weak = Rc::downgrade(&self.shared);
        listen(source, EventKind::Wheel, options, move |event: &InputEvent| {
            let (Some(shared), Some(wheel)) = (weak.upgrade(), event.as_wheel()) else {
                return;
            };
            shared.feed(wheel);
        })
    }

    /// Whether a burst is in progress (settle timer pending).
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.shared.core.borrow().quiet_timer.is_some()
    }

    /// Direction of the most recent tick.
    #[must_use]
    pub fn direction(&self) -> WheelDirection {
        self.shared.core.borrow().direction
    }

    #[must_use]
    pub fn settle(&self) -> Duration {
        self.shared.settle
    }
}

impl Drop for WheelGesture {
    fn drop(&mut self) {
        let (timer, frame) = {
            let mut core = self.shared.core.borrow_mut();
            core.gate_open = false;
            (core.quiet_timer.take(), core.gate_frame.take())
        };
        if let Some(handle) = timer {
            self.shared.env.timers.clear_timeout(handle);
        }
        if let Some(handle) = frame {
            self.shared.env.frames.cancel_frame(handle);
        }
    }
}

impl WheelShared {
    fn feed(self: &Rc<Self>, event: &WheelEvent) {
        let direction = WheelDirection::of(event.delta_y);
        let data = WheelData { event: *event, direction };

        let pending = {
            let mut core = self.core.borrow_mut();
            core.direction = direction;
            let pending = core.quiet_timer.take();
            core.ticks = if pending.is_some() { core.ticks.saturating_add(1) } else { 1 };
            pending
        };
        match pending {
            Some(handle) => self.env.timers.clear_timeout(handle),
            None => {
                debug!(direction = direction.sign(), "wheel: burst start");
                self.handlers.before.emit(&data);
            }
        }

        let open_gate = {
            let mut core = self.core.borrow_mut();
            !std::mem::replace(&mut core.gate_open, true)
        };
        if open_gate {
            trace!(direction = direction.sign(), delta_y = event.delta_y, "wheel: during");
            self.handlers.during.emit(&data);
            let weak = Rc::downgrade(self);
            let handle = self.env.frames.request_frame(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.close_gate();
                }
            }));
            let mut core = self.core.borrow_mut();
            if core.gate_open {
                core.gate_frame = Some(handle);
            }
        }

        let weak = Rc::downgrade(self);
        let handle = self.env.timers.set_timeout(
            self.settle,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.settled(&data);
                }
            }),
        );
        let replaced = self.core.borrow_mut().quiet_timer.replace(handle);
        // A handler fed a nested tick; only the newest timer survives.
        if let Some(stale) = replaced {
            self.env.timers.clear_timeout(stale);
        }
    }

    fn close_gate(&self) {
        let mut core = self.core.borrow_mut();
        core.gate_open = false;
        core.gate_frame = None;
    }

    fn settled(&self, data: &WheelData) {
        let ticks = {
            let mut core = self.core.borrow_mut();
            core.quiet_timer = None;
            core.ticks
        };
        debug!(direction = data.direction.sign(), ticks, "wheel: settled");
        self.handlers.after.emit(data);
    }
}
