//! # Equipment Interface
//!
//! This module defines the interface structures exchanged with the host each tick.

pub mod act;
pub mod cam;
pub mod telem;
