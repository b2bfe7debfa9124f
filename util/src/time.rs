//! General time utility functions
//!
//! Also provides the [`Clock`] abstraction used by anything in the autonomy that reacts to the
//! passage of wall-clock time, so that it can be driven by a virtual clock under test.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{cell::Cell, rc::Rc};

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of monotonic-enough time in seconds.
pub trait Clock {
    /// Seconds elapsed since this clock's own epoch.
    fn now_s(&self) -> f64;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Wall clock time, measured from the instant the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    epoch: DateTime<Utc>,
}

/// A manually driven clock.
///
/// Clones share the same time, so a test can keep one handle and advance it while another is
/// owned by the module under test.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    time_s: Rc<Cell<f64>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WallClock {
    pub fn new() -> Self {
        Self { epoch: Utc::now() }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now_s(&self) -> f64 {
        duration_to_seconds(Utc::now() - self.epoch).unwrap_or(std::f64::NAN)
    }
}

impl VirtualClock {
    pub fn new(time_s: f64) -> Self {
        Self {
            time_s: Rc::new(Cell::new(time_s)),
        }
    }

    pub fn set(&self, time_s: f64) {
        self.time_s.set(time_s);
    }

    pub fn advance(&self, dt_s: f64) {
        self.time_s.set(self.time_s.get() + dt_s);
    }
}

impl Clock for VirtualClock {
    fn now_s(&self) -> f64 {
        self.time_s.get()
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
