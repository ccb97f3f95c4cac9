use std::cell::{Cell, RefCell};

use super::*;

#[derive(Default)]
struct CountingSource {
    next: Cell<u64>,
    added: RefCell<Vec<(EventKind, ListenerId)>>,
    removed: RefCell<Vec<(EventKind, ListenerId)>>,
}

impl InputSource for CountingSource {
    fn add_listener(&self, kind: EventKind, _handler: InputHandler, _options: ListenOptions) -> ListenerId {
        let id = ListenerId(self.next.get());
        self.next.set(id.0 + 1);
        self.added.borrow_mut().push((kind, id));
        id
    }

    fn remove_listener(&self, kind: EventKind, id: ListenerId, _options: ListenOptions) {
        self.removed.borrow_mut().push((kind, id));
    }
}

#[derive(Default)]
struct CountingLock {
    acquired: Cell<u32>,
    released: Cell<u32>,
}

impl PointerLock for CountingLock {
    fn acquire(&self) {
        self.acquired.set(self.acquired.get() + 1);
    }

    fn release(&self) {
        self.released.set(self.released.get() + 1);
    }
}

// =============================================================================
// Listener
// =============================================================================

#[test]
fn listener_is_removed_on_drop() {
    let counting = Rc::new(CountingSource::default());
    let source: Rc<dyn InputSource> = counting.clone();

    let listener = listen(&source, EventKind::PointerMove, ListenOptions::default(), |_| {});
    assert_eq!(listener.kind(), EventKind::PointerMove);
    assert_eq!(counting.added.borrow().len(), 1);
    assert!(counting.removed.borrow().is_empty());

    let id = listener.id();
    drop(listener);
    assert_eq!(*counting.removed.borrow(), vec![(EventKind::PointerMove, id)]);
}

#[test]
fn explicit_remove_detaches_exactly_once() {
    let counting = Rc::new(CountingSource::default());
    let source: Rc<dyn InputSource> = counting.clone();

    let listener = listen(&source, EventKind::PointerUp, ListenOptions::default(), |_| {});
    listener.remove();
    assert_eq!(counting.removed.borrow().len(), 1);
}

#[test]
fn listeners_get_distinct_ids() {
    let counting = Rc::new(CountingSource::default());
    let source: Rc<dyn InputSource> = counting.clone();

    let a = listen(&source, EventKind::Wheel, ListenOptions::default(), |_| {});
    let b = listen(&source, EventKind::Wheel, ListenOptions::default(), |_| {});
    assert_ne!(a.id(), b.id());
}

// =============================================================================
// PointerLockGuard
// =============================================================================

#[test]
fn pointer_lock_guard_pairs_acquire_and_release() {
    let counting = Rc::new(CountingLock::default());
    let lock: Rc<dyn PointerLock> = counting.clone();

    let guard = PointerLockGuard::acquire(&lock);
    assert_eq!(counting.acquired.get(), 1);
    assert_eq!(counting.released.get(), 0);

    drop(guard);
    assert_eq!(counting.acquired.get(), 1);
    assert_eq!(counting.released.get(), 1);
}

#[test]
fn environment_pointer_lock_is_optional() {
    let source: Rc<dyn InputSource> = Rc::new(CountingSource::default());
    let scheduler = Rc::new(crate::manual::ManualScheduler::new());

    let env = Environment::new(source, scheduler.clone(), scheduler);
    assert!(env.pointer_lock.is_none());

    let env = env.with_pointer_lock(Rc::new(CountingLock::default()));
    assert!(env.pointer_lock.is_some());
}
