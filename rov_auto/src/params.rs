//! # Autonomy Executable Parameters
//!
//! This module provides parameters for the replay executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RovAutoParams {
    /// Target period of one cycle, zero to replay as fast as possible.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// The replay is aborted after more than this many consecutive cycle overruns
    pub max_consec_cycle_overruns: u64,

    /// Most verbose level written to the log, one of `info`, `debug` or `trace`
    pub log_level: String,

    /// Directory, relative to the software root, in which sessions are created
    pub sessions_dir: String,

    /// Perception parameter file
    pub per_mgr_params: String,

    /// Save the perception vision image every this many cycles, zero to never save it
    pub vision_save_period: u64,
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
