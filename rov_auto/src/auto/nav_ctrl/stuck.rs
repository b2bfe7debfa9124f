//! Detection of a rover which isn't making progress
//!
//! Two mechanisms are used. [`PositionMemory`] spots a rover that hasn't moved over the last few
//! ticks, for example wedged against a rock. [`CirclingWatchdog`] breaks the rover out of the
//! loops the wall crawl steering can settle into, which position alone can't detect.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::{HashSet, VecDeque};

use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Positions are compared at millimetre precision, this many decimal places.
const POSITION_DECIMALS: usize = 3;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Sliding window of the rover's most recent positions.
#[derive(Debug, Clone)]
pub struct PositionMemory {
    capacity: usize,
    positions: VecDeque<(i64, i64)>,
}

/// Wall clock watchdog, fires when too long has passed since the last forced forward drive.
#[derive(Debug, Clone, Copy)]
pub struct CirclingWatchdog {
    period_s: f64,
    last_forward_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PositionMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            positions: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Add a position, evicting the oldest once the window is full.
    pub fn push(&mut self, position_m: &Vector2<f64>) {
        self.positions
            .push_back((to_millimetres(position_m.x), to_millimetres(position_m.y)));

        while self.positions.len() > self.capacity {
            self.positions.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.positions.len() >= self.capacity
    }

    /// Number of distinct positions in the window
    pub fn num_distinct(&self) -> usize {
        self.positions.iter().collect::<HashSet<_>>().len()
    }

    /// The rover is stuck if the window is full and it has visited at most `max_distinct`
    /// positions in it.
    pub fn is_stuck(&self, max_distinct: usize) -> bool {
        self.is_full() && self.num_distinct() <= max_distinct
    }
}

impl CirclingWatchdog {
    /// Create a new watchdog, with the last forward drive at `now_s`.
    pub fn new(period_s: f64, now_s: f64) -> Self {
        Self {
            period_s,
            last_forward_s: now_s,
        }
    }

    /// Returns true if the period has been exceeded, resetting the watchdog if it has.
    pub fn check(&mut self, now_s: f64) -> bool {
        if now_s - self.last_forward_s > self.period_s {
            self.last_forward_s = now_s;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Round a position to the nearest millimetre.
///
/// Rounding is done on the exact value stored, so `2.0005`, which is stored as slightly less
/// than that, rounds down to `2.000`. Scaling by 1000 first would round it up.
fn to_millimetres(v: f64) -> i64 {
    let scale = 10f64.powi(POSITION_DECIMALS as i32);

    match format!("{:.*}", POSITION_DECIMALS, v).parse::<f64>() {
        Ok(rounded) => (rounded * scale).round() as i64,
        Err(_) => (v * scale).round() as i64,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
