//! # Navigation control module
//!
//! [`NavCtrl`] is the rover's decision engine. Once per tick it takes the perception
//! observations and the vehicle telemetry and produces the actuation demands for the host.
//!
//! The controller is a state machine over three modes:
//!
//! - `Forward` - Exploring, following the left-most navigable terrain so the rover crawls along
//!   walls.
//! - `Stop` - Braking to a halt, then either setting off again or reversing out of a dead end.
//! - `ReturnHome` - Retracing the recorded path history back to the home position.
//!
//! Ahead of the modes sit a number of overrides which are checked every tick in a fixed
//! priority order: the terminal mission-done state, the anti-circling watchdog, stuck
//! detection, sample approach, the return home trigger and the near-sample stop.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod forward;
mod history;
mod params;
mod return_home;
mod state;
mod stop;
mod stuck;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use history::{BacktrackPath, GridCell, PathHistory};
pub use params::NavCtrlParams;
pub use state::{InputData, NavCtrl, StatusReport};
pub use stuck::{CirclingWatchdog, PositionMemory};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use util::{archive::ArchiveError, params::LoadError};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The navigation mode of the rover. Exactly one is active on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NavMode {
    Forward,
    Stop,
    ReturnHome,
}

/// Possible errors that can occur while setting up NavCtrl.
///
/// Cyclic processing never fails, every tick produces a valid set of demands.
#[derive(Debug, thiserror::Error)]
pub enum NavCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(LoadError),

    #[error("Could not initialise the archives: {0}")]
    ArchiveError(ArchiveError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for NavMode {
    fn default() -> Self {
        NavMode::Forward
    }
}

impl std::fmt::Display for NavMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavMode::Forward => write!(f, "Forward"),
            NavMode::Stop => write!(f, "Stop"),
            NavMode::ReturnHome => write!(f, "ReturnHome"),
        }
    }
}
