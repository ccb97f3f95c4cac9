//! Position sources for drag sessions.
//!
//! Move events arriving between two emitted frames are folded into a
//! source; at emission time the source turns the previous `current` into
//! the new one. Absolute mode reads screen position directly. Infinite
//! (pointer-locked) mode only sees relative motion and integrates it.

#[cfg(test)]
#[path = "position_test.rs"]
mod position_test;

use crate::event::PointerEvent;
use crate::geometry::Point;

pub(crate) trait PositionSource {
    /// Fold one move event into the pending input.
    fn record(&mut self, event: &PointerEvent);

    /// Screen position of the first event recorded since the last resolve.
    fn origin(&self) -> Option<Point>;

    /// New `current` from the previous one; clears the pending input.
    fn resolve(&mut self, current: Point) -> Point;
}

/// Reads `current` straight from the latest event position.
#[derive(Debug, Default)]
pub(crate) struct AbsolutePositionSource {
    origin: Option<Point>,
    latest: Option<Point>,
}

impl PositionSource for AbsolutePositionSource {
    fn record(&mut self, event: &PointerEvent) {
        self.origin.get_or_insert(event.position);
        self.latest = Some(event.position);
    }

    fn origin(&self) -> Option<Point> {
        self.origin
    }

    fn resolve(&mut self, current: Point) -> Point {
        self.origin = None;
        self.latest.take().unwrap_or(current)
    }
}

/// Advances `current` by the relative motion accumulated since the last frame.
#[derive(Debug, Default)]
pub(crate) struct RelativePositionSource {
    origin: Option<Point>,
    accumulated: Point,
}

impl PositionSource for RelativePositionSource {
    fn record(&mut self, event: &PointerEvent) {
        self.origin.get_or_insert(event.position);
        self.accumulated += event.movement;
    }

    fn origin(&self) -> Option<Point> {
        self.origin
    }

    fn resolve(&mut self, current: Point) -> Point {
        self.origin = None;
        let next = current + self.accumulated;
        self.accumulated = Point::ZERO;
        next
    }
}

pub(crate) fn for_mode(infinite: bool) -> Box<dyn PositionSource> {
    if infinite {
        Box::new(RelativePositionSource::default())
    } else {
        Box::new(AbsolutePositionSource::default())
    }
}
