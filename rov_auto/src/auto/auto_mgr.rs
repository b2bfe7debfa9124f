//! # AutoMgr module
//!
//! This module implements the [`AutoMgr`], which runs one perception and navigation pass per
//! cycle over the [`DataStore`]. Perception for a cycle always completes, and its output is
//! accumulated into the world map, before NavCtrl decides that cycle's demands.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info};

use util::{
    module::State,
    raise_error,
    session::Session,
    time::{Clock, WallClock},
};

use super::{
    loc::Pose,
    map::WorldMap,
    nav_ctrl::{NavCtrl, NavCtrlError, NavMode},
    per::{PerError, PerMgr},
};
use crate::data_store::DataStore;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Autonomy Manager
///
/// Owns all state which persists across cycles: the perception manager, the world map and the
/// navigation controller.
pub struct AutoMgr<C = WallClock> {
    pub per_mgr: PerMgr,

    /// Everything the rover has seen over the whole mission, never reset
    pub world_map: WorldMap,

    pub nav_ctrl: NavCtrl<C>,

    /// Mode at the end of the last cycle, used to log transitions
    last_mode: NavMode,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AutoMgrError {
    #[error("Failed to initialise perception: {0}")]
    PerInitError(PerError),

    #[error("Failed to initialise NavCtrl: {0}")]
    NavCtrlInitError(NavCtrlError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AutoMgr<WallClock> {
    /// Initialise the autonomy from parameter files, archiving into the given session.
    pub fn init(
        per_params_path: &str,
        nav_ctrl_params_path: &'static str,
        session: &Session,
    ) -> Result<Self, AutoMgrError> {
        let per_mgr = PerMgr::init(per_params_path).map_err(AutoMgrError::PerInitError)?;

        let mut nav_ctrl = NavCtrl::<WallClock>::default();
        nav_ctrl
            .init(nav_ctrl_params_path, session)
            .map_err(AutoMgrError::NavCtrlInitError)?;

        Ok(Self::new(per_mgr, nav_ctrl))
    }
}

impl<C: Clock> AutoMgr<C> {
    pub fn new(per_mgr: PerMgr, nav_ctrl: NavCtrl<C>) -> Self {
        let world_map = per_mgr.new_world_map();
        let last_mode = nav_ctrl.mode();

        Self {
            per_mgr,
            world_map,
            nav_ctrl,
            last_mode,
        }
    }

    /// Run one cycle of the autonomy.
    ///
    /// Reads the frame and telemetry from the data store and writes back the perception output,
    /// the demands and NavCtrl's status report. A cycle without a frame skips perception and
    /// NavCtrl falls back to driving on.
    ///
    /// # Panics
    /// - If the data store holds no telemetry for this cycle.
    /// - If the frame isn't the shape the perception calibration expects.
    pub fn step(&mut self, ds: &mut DataStore) {
        let telem = match ds.telem {
            Some(t) => t,
            None => raise_error!("No telemetry provided for cycle {}", ds.num_cycles),
        };
        let pose = Pose::from(&telem);

        let per_output = match ds.frame {
            Some(ref frame) => Some(self.per_mgr.perceive(frame, &pose, &mut self.world_map)),
            None => {
                debug!("No frame for cycle {}, perception skipped", ds.num_cycles);
                None
            }
        };

        let (dems, report) = self.nav_ctrl.step(
            &telem,
            per_output.as_ref().map(|p| &p.nav_obs),
            per_output.as_ref().and_then(|p| p.sample_obs.as_ref()),
        );

        if report.mode != self.last_mode {
            info!(
                "Cycle {}: {} -> {}, {:.1}% of the world map observed",
                ds.num_cycles,
                self.last_mode,
                report.mode,
                self.world_map.navigable_fraction() * 100.0
            );
            self.last_mode = report.mode;
        }

        ds.per_output = per_output;
        ds.nav_ctrl_output = dems;
        ds.nav_ctrl_status_rpt = report;
    }

    pub fn is_mission_done(&self) -> bool {
        self.nav_ctrl.is_mission_done()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
