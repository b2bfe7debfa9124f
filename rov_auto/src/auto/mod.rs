//! # Autonomy Module
//!
//! This module provides the closed loop autonomy of the rover: turning each camera frame into
//! observations of the terrain around the rover, and turning those observations into driving
//! demands which explore the area, collect samples and bring the rover home.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

pub use auto_mgr::{AutoMgr, AutoMgrError};

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Automation Manager module
pub mod auto_mgr;

/// Coordinate transforms between the ground view, the rover and the world
pub mod geom;

/// Localisation module - the rover's pose as reported by the host
pub mod loc;

/// Map module - the world map accumulated over the mission
pub mod map;

/// Navigation control module - the decision engine
pub mod nav_ctrl;

/// Perception module - converts camera frames into terrain and sample observations
pub mod per;
