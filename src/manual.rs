//! Deterministic frame scheduler and timers driven by a virtual clock.
//!
//! Nothing runs on its own: [`ManualScheduler::run_frame`] plays the role of
//! a repaint and [`ManualScheduler::advance`] moves the clock, firing due
//! timeouts in deadline order. Used for headless replay and tests.

#[cfg(test)]
#[path = "manual_test.rs"]
mod manual_test;

use std::cell::{Cell, RefCell};
use std::time::Duration;

use crate::env::{FrameHandle, FrameScheduler, TimerHandle, Timers};

struct PendingFrame {
    handle: FrameHandle,
    callback: Box<dyn FnOnce()>,
}

struct PendingTimer {
    handle: TimerHandle,
    deadline: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    frames_run: Cell<u64>,
    frames: RefCell<Vec<PendingFrame>>,
    timers: RefCell<Vec<PendingTimer>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since construction.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of frames run so far.
    #[must_use]
    pub fn frames_run(&self) -> u64 {
        self.frames_run.get()
    }

    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Run one repaint: every frame callback requested before this call.
    ///
    /// Callbacks requested while the frame runs wait for the next frame.
    /// Returns the number of callbacks run.
    pub fn run_frame(&self) -> usize {
        let due = std::mem::take(&mut *self.frames.borrow_mut());
        self.frames_run.set(self.frames_run.get() + 1);
        let count = due.len();
        for frame in due {
            (frame.callback)();
        }
        count
    }

    /// Move the clock forward by `by`, firing every timeout that falls due.
    ///
    /// Timeouts fire in deadline order, ties in scheduling order, with the
    /// clock set to each deadline as it fires. Timeouts scheduled by a
    /// firing callback also fire if they fall inside the window. Returns the
    /// number of timeouts fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now.get() + by;
        let mut fired = 0;
        while let Some(timer) = self.pop_due(target) {
            self.now.set(timer.deadline);
            (timer.callback)();
            fired += 1;
        }
        self.now.set(target);
        fired
    }

    pub fn advance_ms(&self, millis: u64) -> usize {
        self.advance(Duration::from_millis(millis))
    }

    fn pop_due(&self, target: Duration) -> Option<PendingTimer> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= target)
            .min_by_key(|(_, t)| (t.deadline, t.handle.0))
            .map(|(index, _)| index)?;
        Some(timers.remove(index))
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.borrow_mut().push(PendingFrame { handle, callback });
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let removed: Vec<PendingFrame> = {
            let mut frames = self.frames.borrow_mut();
            let (removed, kept) = frames.drain(..).partition(|f| f.handle == handle);
            *frames = kept;
            removed
        };
        drop(removed);
    }
}

impl Timers for ManualScheduler {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        let deadline = self.now.get() + delay;
        self.timers
            .borrow_mut()
            .push(PendingTimer { handle, deadline, callback });
        handle
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        let removed: Vec<PendingTimer> = {
            let mut timers = self.timers.borrow_mut();
            let (removed, kept) = timers.drain(..).partition(|t| t.handle == handle);
            *timers = kept;
            removed
        };
        drop(removed);
    }
}
