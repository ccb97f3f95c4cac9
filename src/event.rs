//! Input event model consumed by the gesture recognizers.
//!
//! These types mirror the subset of DOM mouse and wheel events the
//! recognizers need. Hosts translate their native events (DOM, winit,
//! recorded traces) into [`InputEvent`]s and deliver them through an
//! [`InputSource`](crate::env::InputSource).

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Named input channel a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
}

impl EventKind {
    /// The DOM event name for this channel.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PointerDown => "mousedown",
            Self::PointerMove => "mousemove",
            Self::PointerUp => "mouseup",
            Self::Wheel => "wheel",
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value. Unknown values (back/forward) yield `None`.
    #[must_use]
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A press, move or release of the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Absolute position in client space.
    pub position: Point,
    /// Motion since the previous pointer event. The only position signal
    /// that stays meaningful while the pointer is locked.
    pub movement: Point,
    pub button: Button,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// A primary-button event at `(x, y)` with no relative motion.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self { position: Point::new(x, y), ..Self::default() }
    }

    /// Set the relative motion carried by this event.
    #[must_use]
    pub fn with_movement(mut self, dx: f64, dy: f64) -> Self {
        self.movement = Point::new(dx, dy);
        self
    }

    #[must_use]
    pub fn with_button(mut self, button: Button) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub fn is_left_mouse(&self) -> bool {
        self.button == Button::Primary
    }

    #[must_use]
    pub fn is_right_mouse(&self) -> bool {
        self.button == Button::Secondary
    }
}

/// A single wheel / trackpad scroll tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelEvent {
    pub position: Point,
    /// Horizontal scroll amount in pixels.
    pub delta_x: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

impl WheelEvent {
    /// A tick with vertical delta only.
    #[must_use]
    pub fn vertical(delta_y: f64) -> Self {
        Self { delta_y, ..Self::default() }
    }
}

/// Anything an [`InputSource`](crate::env::InputSource) can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Pointer(PointerEvent),
    Wheel(WheelEvent),
}

impl InputEvent {
    #[must_use]
    pub fn as_pointer(&self) -> Option<&PointerEvent> {
        match self {
            Self::Pointer(event) => Some(event),
            Self::Wheel(_) => None,
        }
    }

    #[must_use]
    pub fn as_wheel(&self) -> Option<&WheelEvent> {
        match self {
            Self::Wheel(event) => Some(event),
            Self::Pointer(_) => None,
        }
    }
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

impl From<WheelEvent> for InputEvent {
    fn from(event: WheelEvent) -> Self {
        Self::Wheel(event)
    }
}

/// Registration flags forwarded to the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenOptions {
    /// Deliver during the capture phase (DOM hosts only).
    pub capture: bool,
    /// Remove the listener after its first delivery.
    pub once: bool,
}
