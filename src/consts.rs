//! Shared timing constants.

use std::time::Duration;

// ── Wheel ───────────────────────────────────────────────────────

/// Quiet period after the last wheel event before the burst is considered over.
pub const WHEEL_SETTLE: Duration = Duration::from_millis(250);

// ── Frames ──────────────────────────────────────────────────────

/// Frame interval used by schedulers that are not driven by a display (~60 Hz).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);
