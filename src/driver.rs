//! Tokio-backed frame scheduler and timers for native hosts.
//!
//! Callbacks are not `Send`, so everything is spawned with
//! [`tokio::task::spawn_local`]: a [`TokioScheduler`] must be used from
//! inside a [`tokio::task::LocalSet`]. Frames are aligned to a fixed grid of
//! `frame_interval` ticks measured from construction, so all frames
//! requested within one interval run on the same tick.

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

use crate::config::GestureConfig;
use crate::consts::DEFAULT_FRAME_INTERVAL;
use crate::env::{FrameHandle, FrameScheduler, TimerHandle, Timers};

type Tasks = Rc<RefCell<HashMap<u64, JoinHandle<()>>>>;

pub struct TokioScheduler {
    frame_interval: Duration,
    epoch: Instant,
    next_id: Cell<u64>,
    tasks: Tasks,
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl TokioScheduler {
    #[must_use]
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            epoch: Instant::now(),
            next_id: Cell::new(0),
            tasks: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(config.frame_interval)
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Spawned callbacks that have neither run nor been cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Start of the first frame tick strictly after now.
    fn next_frame_at(&self) -> Instant {
        let interval = self.frame_interval.as_nanos().max(1);
        let ticks = self.epoch.elapsed().as_nanos() / interval + 1;
        let offset = u64::try_from(ticks * interval).unwrap_or(u64::MAX);
        self.epoch + Duration::from_nanos(offset)
    }

    fn spawn_at(&self, deadline: Instant, callback: Box<dyn FnOnce()>) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let tasks = Rc::downgrade(&self.tasks);
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep_until(deadline).await;
            // Deregister first so a callback that schedules again sees a clean map.
            if let Some(tasks) = tasks.upgrade() {
                tasks.borrow_mut().remove(&id);
            }
            callback();
        });
        self.tasks.borrow_mut().insert(id, handle);
        id
    }

    fn abort(&self, id: u64) {
        let handle = self.tasks.borrow_mut().remove(&id);
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.borrow_mut().drain() {
            handle.abort();
        }
    }
}

impl FrameScheduler for TokioScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> FrameHandle {
        let at = self.next_frame_at();
        let id = self.spawn_at(at, callback);
        trace!(id, "driver: frame requested");
        FrameHandle(id)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.abort(handle.0);
    }
}

impl Timers for TokioScheduler {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let id = self.spawn_at(Instant::now() + delay, callback);
        TimerHandle(id)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.abort(handle.0);
    }
}
