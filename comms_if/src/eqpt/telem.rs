//! # Vehicle telemetry
//!
//! Telemetry delivered by the host alongside every camera frame.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Vehicle state reported by the host for a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct VehicleTelem {
    /// Position of the vehicle in the world frame.
    ///
    /// Units: world length units (one world map cell per unit)
    pub position_m: [f64; 2],

    /// Heading of the vehicle, in the range [0, 360).
    ///
    /// Units: degrees
    pub yaw_deg: f64,

    /// Signed ground speed, negative when reversing.
    ///
    /// Units: length units/second
    pub speed_ms: f64,

    /// The host's proximity sensor reports a sample within pickup range.
    pub near_sample: bool,

    /// The host is currently executing a pickup.
    pub picking_up: bool,

    /// Number of samples collected so far
    pub samples_collected: u32,

    /// Number of samples placed in the environment
    pub samples_to_find: u32,

    /// Percentage of the ground truth map covered by the rover's world map.
    ///
    /// Units: percent, [0, 100]
    pub percentage_mapped: f64,

    /// Position the rover started from and must return to.
    pub home_position_m: [f64; 2],
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl VehicleTelem {
    /// True once every placed sample has been collected.
    pub fn all_samples_collected(&self) -> bool {
        self.samples_collected == self.samples_to_find
    }
}
