//! Pointer drag and wheel burst gesture recognizers.
//!
//! Two recognizers turn raw input into phase callbacks. [`drag::DragGesture`]
//! follows one press → move → release sequence, coalescing moves to one per
//! animation frame and reporting shift, per-frame delta and a normalized
//! marquee rectangle; in infinite mode it locks the pointer and integrates
//! relative motion. [`wheel::WheelGesture`] splits a stream of wheel ticks
//! into bursts with before / during / after phases.
//!
//! Neither recognizer touches a window system. They consume the capabilities
//! in [`env`], which a host provides: the browser adapter in `web`, or the
//! in-memory [`hub::InputHub`] with a [`manual::ManualScheduler`] or the tokio
//! driver.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`drag`] | Drag recognizer, handlers and payloads |
//! | [`wheel`] | Wheel burst recognizer |
//! | [`env`] | Capability traits and RAII registration guards |
//! | [`event`] | Input event model |
//! | [`geometry`] | Points and rectangles |
//! | [`hub`] | In-memory input source |
//! | [`manual`] | Virtual-clock frames and timers |
//! | `driver` | Tokio frames and timers (feature `tokio`) |
//! | `web` | Browser capabilities (feature `web`) |
//! | [`config`] | Environment-variable configuration |
//! | [`consts`] | Shared timing constants |

pub mod config;
pub mod consts;
pub mod drag;
#[cfg(feature = "tokio")]
pub mod driver;
pub mod env;
pub mod event;
pub mod geometry;
pub mod hub;
pub mod manual;
mod phase;
mod position;
#[cfg(feature = "web")]
pub mod web;
pub mod wheel;

pub use config::{ConfigError, GestureConfig};
pub use drag::{DragData, DragEnd, DragGesture, DragHandlers, DragOptions};
pub use env::Environment;
pub use event::{Button, EventKind, InputEvent, Modifiers, PointerEvent, WheelEvent};
pub use geometry::{Point, Rect};
pub use wheel::{WheelData, WheelDirection, WheelGesture, WheelHandlers};
