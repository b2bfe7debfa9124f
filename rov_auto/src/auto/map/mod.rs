//! # Map
//!
//! This module implements the [`WorldMap`], the rover's persistent record of everything it has
//! seen over the whole mission. Each layer of the map counts how many times a world cell has
//! been observed as containing a particular thing (navigable terrain, samples), so the counts
//! can be read as a confidence.

// ------------------------------------------------------------------------------------------------
// MODS
// ------------------------------------------------------------------------------------------------

/// Implements the [`WorldMap`] type
mod world_map;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use world_map::{WorldMap, WorldMapError, WorldMapLayer};
