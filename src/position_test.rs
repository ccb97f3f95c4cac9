use super::*;

// --- Absolute ---

#[test]
fn absolute_resolves_to_latest_position() {
    let mut source = AbsolutePositionSource::default();
    source.record(&PointerEvent::at(1.0, 1.0));
    source.record(&PointerEvent::at(4.0, 9.0));

    assert_eq!(source.origin(), Some(Point::new(1.0, 1.0)));
    assert_eq!(source.resolve(Point::new(0.0, 0.0)), Point::new(4.0, 9.0));
    assert_eq!(source.origin(), None);
}

#[test]
fn absolute_without_input_keeps_current() {
    let mut source = AbsolutePositionSource::default();
    assert_eq!(source.resolve(Point::new(3.0, 3.0)), Point::new(3.0, 3.0));
}

#[test]
fn absolute_ignores_relative_motion() {
    let mut source = AbsolutePositionSource::default();
    source.record(&PointerEvent::at(2.0, 2.0).with_movement(50.0, 50.0));
    assert_eq!(source.resolve(Point::ZERO), Point::new(2.0, 2.0));
}

// --- Relative ---

#[test]
fn relative_integrates_motion_since_last_resolve() {
    let mut source = RelativePositionSource::default();
    source.record(&PointerEvent::at(100.0, 100.0).with_movement(1.0, 2.0));
    source.record(&PointerEvent::at(100.0, 100.0).with_movement(3.0, -1.0));

    let current = source.resolve(Point::new(10.0, 10.0));
    assert_eq!(current, Point::new(14.0, 11.0));

    // Accumulator is cleared after a resolve.
    assert_eq!(source.resolve(current), current);
}

#[test]
fn relative_ignores_absolute_position() {
    let mut source = RelativePositionSource::default();
    source.record(&PointerEvent::at(500.0, 500.0).with_movement(-2.0, 0.0));
    assert_eq!(source.origin(), Some(Point::new(500.0, 500.0)));
    assert_eq!(source.resolve(Point::new(0.0, 0.0)), Point::new(-2.0, 0.0));
}

#[test]
fn for_mode_selects_strategy() {
    let event = PointerEvent::at(7.0, 7.0).with_movement(1.0, 1.0);

    let mut absolute = for_mode(false);
    absolute.record(&event);
    assert_eq!(absolute.resolve(Point::ZERO), Point::new(7.0, 7.0));

    let mut relative = for_mode(true);
    relative.record(&event);
    assert_eq!(relative.resolve(Point::ZERO), Point::new(1.0, 1.0));
}
