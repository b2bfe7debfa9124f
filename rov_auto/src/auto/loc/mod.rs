//! # Localisation module
//!
//! The rover doesn't localise itself, its pose is reported by the host every tick. This module
//! holds that pose in the form used by the autonomy.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::telem::VehicleTelem;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose of the rover in the world frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Pose {
    /// The position in the world frame
    pub position_m: Vector2<f64>,

    /// Heading of the rover in degrees, [0, 360)
    pub yaw_deg: f64,

    /// Signed ground speed, negative when reversing
    pub speed_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Return the heading of the rover in radians.
    pub fn get_heading(&self) -> f64 {
        self.yaw_deg.to_radians()
    }

    /// Straight line distance from the rover to the given world position.
    pub fn distance_to(&self, target_m: &Vector2<f64>) -> f64 {
        (target_m - self.position_m).norm()
    }

    /// Bearing from the rover to the given world position, measured the same way as the heading.
    pub fn bearing_to(&self, target_m: &Vector2<f64>) -> f64 {
        let delta = target_m - self.position_m;
        delta.y.atan2(delta.x)
    }
}

impl From<&VehicleTelem> for Pose {
    fn from(telem: &VehicleTelem) -> Self {
        Self {
            position_m: Vector2::new(telem.position_m[0], telem.position_m[1]),
            yaw_deg: telem.yaw_deg,
            speed_ms: telem.speed_ms,
        }
    }
}
