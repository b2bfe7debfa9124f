//! # Data Store
//!
//! The vehicle state record passed through the autonomy each cycle. The host fills in the
//! inputs, [`AutoMgr::step`](crate::auto::AutoMgr::step) fills in the perception and navigation
//! outputs, and the host reads the demands back out.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::{act::ActDems, cam::CamImage, telem::VehicleTelem};

use crate::auto::{nav_ctrl, per::PerOutput};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// Session elapsed time at the start of this cycle
    pub sim_time_s: f64,

    // Inputs from the host
    /// Camera frame for this cycle, `None` if the host didn't provide one
    pub frame: Option<CamImage>,

    /// Telemetry for this cycle, must be set before the autonomy is stepped
    pub telem: Option<VehicleTelem>,

    // Perception
    pub per_output: Option<PerOutput>,

    // NavCtrl
    pub nav_ctrl_output: ActDems,
    pub nav_ctrl_status_rpt: nav_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears the outputs of the previous cycle.
    pub fn cycle_start(&mut self) {
        self.per_output = None;
        self.nav_ctrl_output = ActDems::default();
        self.nav_ctrl_status_rpt = nav_ctrl::StatusReport::default();

        self.sim_time_s = util::session::get_elapsed_seconds();
    }

    /// Perform actions required at the end of a cycle.
    ///
    /// The inputs are consumed, so a host which doesn't provide new ones next cycle is caught
    /// rather than silently replaying old data.
    pub fn cycle_end(&mut self) {
        self.frame = None;
        self.telem = None;

        self.num_cycles += 1;
    }

    /// Record whether this cycle overran its period.
    ///
    /// Returns true once more than `max_consec` cycles in a row have overrun.
    pub fn record_overrun(&mut self, overran: bool, max_consec: u64) -> bool {
        if overran {
            self.num_consec_cycle_overruns += 1;
        } else {
            self.num_consec_cycle_overruns = 0;
        }

        self.num_consec_cycle_overruns > max_consec
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
