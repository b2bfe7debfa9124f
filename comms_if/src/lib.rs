//! # Communications interface crate.
//!
//! Provides the interface between the simulation/telemetry host and the rover autonomy: what the
//! host hands over every tick, and what the autonomy hands back.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data and demand definitions for equipment (camera, vehicle telemetry, actuators)
pub mod eqpt;
