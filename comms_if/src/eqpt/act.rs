//! # Actuation demands
//!
//! Demands sent back to the host at the end of every tick.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A complete set of actuation demands.
///
/// Every field is written every tick, the host never has to merge a partial demand with a
/// previous one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ActDems {
    /// Throttle demand, negative to drive in reverse.
    pub throttle: f64,

    /// Steer demand, positive to the left.
    ///
    /// Units: degrees, in [-15, 15]
    pub steer_deg: f64,

    /// Brake demand, zero for released.
    pub brake: f64,

    /// Request that the host picks up the sample in range.
    pub pickup: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ActDems {
    /// Demands which command nothing: no throttle, no steer and brakes released.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Returns `(throttle, steer_deg, brake)`
    pub fn drive(&self) -> (f64, f64, f64) {
        (self.throttle, self.steer_deg, self.brake)
    }
}
