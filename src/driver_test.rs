use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tokio::task::LocalSet;
use tokio::time::{Instant, sleep};

use super::*;
use crate::drag::{DragGesture, DragHandlers, DragOptions};
use crate::env::Environment;
use crate::event::{PointerEvent, WheelEvent};
use crate::hub::InputHub;
use crate::wheel::{WheelGesture, WheelHandlers};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

// =============================================================================
// Timers
// =============================================================================

#[tokio::test(start_paused = true)]
async fn timeout_fires_after_delay() {
    LocalSet::new()
        .run_until(async {
            let scheduler = TokioScheduler::default();
            let fired = Rc::new(Cell::new(false));
            let flag = Rc::clone(&fired);
            scheduler.set_timeout(ms(250), Box::new(move || flag.set(true)));
            assert_eq!(scheduler.pending(), 1);

            sleep(ms(249)).await;
            assert!(!fired.get());
            sleep(ms(2)).await;
            assert!(fired.get());
            assert_eq!(scheduler.pending(), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn cleared_timeout_never_fires() {
    LocalSet::new()
        .run_until(async {
            let scheduler = TokioScheduler::default();
            let fired = Rc::new(Cell::new(false));
            let flag = Rc::clone(&fired);
            let handle = scheduler.set_timeout(ms(10), Box::new(move || flag.set(true)));
            scheduler.clear_timeout(handle);
            assert_eq!(scheduler.pending(), 0);

            sleep(ms(50)).await;
            assert!(!fired.get());

            // Clearing again is a no-op.
            scheduler.clear_timeout(handle);
        })
        .await;
}

// =============================================================================
// Frames
// =============================================================================

#[tokio::test(start_paused = true)]
async fn frames_in_one_interval_share_a_tick() {
    LocalSet::new()
        .run_until(async {
            let scheduler = TokioScheduler::new(ms(16));
            let epoch = Instant::now();
            let ran = Rc::new(RefCell::new(Vec::new()));

            let log = Rc::clone(&ran);
            scheduler.request_frame(Box::new(move || log.borrow_mut().push(Instant::now())));
            sleep(ms(5)).await;
            let log = Rc::clone(&ran);
            scheduler.request_frame(Box::new(move || log.borrow_mut().push(Instant::now())));

            sleep(ms(12)).await;
            let ran = ran.borrow();
            assert_eq!(ran.len(), 2);
            assert_eq!(ran[0], ran[1]);
            assert_eq!(ran[0] - epoch, ms(16));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn cancelled_frame_does_not_run() {
    LocalSet::new()
        .run_until(async {
            let scheduler = TokioScheduler::new(ms(16));
            let ran = Rc::new(Cell::new(0));
            let count = Rc::clone(&ran);
            let handle = scheduler.request_frame(Box::new(move || count.set(count.get() + 1)));
            scheduler.cancel_frame(handle);

            sleep(ms(40)).await;
            assert_eq!(ran.get(), 0);
        })
        .await;
}

#[test]
fn from_config_uses_frame_interval() {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().expect("runtime");
    let _guard = runtime.enter();
    let config = GestureConfig { frame_interval: ms(8), ..GestureConfig::default() };
    assert_eq!(TokioScheduler::from_config(&config).frame_interval(), ms(8));
    assert_eq!(TokioScheduler::default().frame_interval(), ms(16));
}

// =============================================================================
// Gestures on tokio
// =============================================================================

#[tokio::test(start_paused = true)]
async fn drag_runs_on_tokio_frames() {
    LocalSet::new()
        .run_until(async {
            let hub = Rc::new(InputHub::new());
            let scheduler = Rc::new(TokioScheduler::default());
            let env = Environment::new(hub.clone(), scheduler.clone(), scheduler.clone());

            let phases = Rc::new(RefCell::new(Vec::new()));
            let (start, moving, end) = (Rc::clone(&phases), Rc::clone(&phases), Rc::clone(&phases));
            let handlers = DragHandlers::new()
                .on_start(move |_| start.borrow_mut().push("start"))
                .on_move(move |_| moving.borrow_mut().push("move"))
                .on_end(move |_| end.borrow_mut().push("end"));
            let gesture = DragGesture::attach(&env, handlers, DragOptions::default());

            hub.press(PointerEvent::at(0.0, 0.0));
            hub.move_to(PointerEvent::at(1.0, 0.0));
            hub.move_to(PointerEvent::at(2.0, 0.0));
            assert_eq!(*phases.borrow(), vec!["start"]);

            sleep(ms(20)).await;
            assert_eq!(*phases.borrow(), vec!["start", "move"]);

            hub.release(PointerEvent::at(2.0, 0.0));
            assert_eq!(*phases.borrow(), vec!["start", "move", "end"]);
            assert!(!gesture.is_active());
            assert_eq!(scheduler.pending(), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn wheel_settles_on_tokio_timers() {
    LocalSet::new()
        .run_until(async {
            let hub = Rc::new(InputHub::new());
            let scheduler = Rc::new(TokioScheduler::default());
            let env = Environment::new(hub, scheduler.clone(), scheduler);

            let settled = Rc::new(Cell::new(0));
            let count = Rc::clone(&settled);
            let gesture = WheelGesture::new(&env, WheelHandlers::new().after_tick(move |_| count.set(count.get() + 1)));

            gesture.feed(&WheelEvent::vertical(10.0));
            sleep(ms(50)).await;
            gesture.feed(&WheelEvent::vertical(10.0));
            sleep(ms(190)).await;
            gesture.feed(&WheelEvent::vertical(10.0));

            sleep(ms(249)).await;
            assert_eq!(settled.get(), 0);
            sleep(ms(2)).await;
            assert_eq!(settled.get(), 1);
            assert!(!gesture.is_ticking());
        })
        .await;
}
