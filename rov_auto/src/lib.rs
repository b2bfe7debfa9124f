//! # Rover autonomy library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to access items defined
//! inside the autonomy crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Autonomy module - perception, mapping and navigation control
pub mod auto;

/// Global data store for the executable
pub mod data_store;

/// Parameters for the replay executable
pub mod params;
