//! Implementations for the NavCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use super::{
    BacktrackPath, CirclingWatchdog, NavCtrlError, NavCtrlParams, NavMode, PathHistory,
    PositionMemory,
};
use crate::auto::{geom::PolarObs, loc::Pose};
use comms_if::eqpt::{act::ActDems, telem::VehicleTelem};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    maths::clamp,
    module::State,
    params,
    session::Session,
    time::{Clock, WallClock},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Navigation control module state
pub struct NavCtrl<C = WallClock> {
    pub(crate) params: NavCtrlParams,

    /// Time source for the anti-circling watchdog
    clock: C,

    /// Executing mode
    pub(crate) mode: NavMode,

    /// Set once the rover is home, never cleared
    mission_done: bool,

    /// Number of non-terminal ticks processed
    num_ticks: u64,

    pub(crate) path_history: PathHistory,

    /// Built from the path history on the first tick in `ReturnHome`
    pub(crate) backtrack: Option<BacktrackPath>,

    position_memory: PositionMemory,
    watchdog: CirclingWatchdog,

    /// Pickup requested, held until the host reports it is picking up
    pickup_latch: bool,

    /// The demands being built. Each tick starts from the previous tick's demands.
    pub(crate) dems: ActDems,
    arch_dems: Archiver,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
}

/// Input data to navigation control.
#[derive(Debug, Clone, Default)]
pub struct InputData {
    pub telem: VehicleTelem,

    /// Navigable terrain observation, `None` if there was no frame to perceive this tick
    pub nav_obs: Option<PolarObs>,

    /// Sample observation, `None` if no sample is visible
    pub sample_obs: Option<PolarObs>,
}

/// Status report for NavCtrl processing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    pub mode: NavMode,

    pub mission_done: bool,

    /// The anti-circling watchdog forced the rover forwards
    pub watchdog_override: bool,

    /// Stuck detection fired and the recovery manoeuvre was commanded
    pub stuck_recovery: bool,

    /// A sample was visible and is being approached
    pub approaching_sample: bool,

    pub pickup_requested: bool,

    pub num_ticks: u64,

    pub path_history_len: usize,

    /// Waypoints left on the way home, `None` before the return home began
    pub backtrack_remaining: Option<usize>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C: Clock + Default> Default for NavCtrl<C> {
    fn default() -> Self {
        Self::new(NavCtrlParams::default(), C::default())
    }
}

impl<C: Clock> NavCtrl<C> {
    /// Create a new controller in `Forward` mode with empty histories.
    ///
    /// The watchdog period starts from the clock's current time.
    pub fn new(params: NavCtrlParams, clock: C) -> Self {
        let position_memory = PositionMemory::new(params.position_memory_len);
        let watchdog = CirclingWatchdog::new(params.watchdog_period_s, clock.now_s());

        Self {
            params,
            clock,
            mode: NavMode::Forward,
            mission_done: false,
            num_ticks: 0,
            path_history: PathHistory::new(),
            backtrack: None,
            position_memory,
            watchdog,
            pickup_latch: false,
            dems: ActDems::neutral(),
            arch_dems: Archiver::default(),
            report: StatusReport::default(),
            arch_report: Archiver::default(),
        }
    }

    pub fn mode(&self) -> NavMode {
        self.mode
    }

    pub fn is_mission_done(&self) -> bool {
        self.mission_done
    }

    pub fn path_history(&self) -> &PathHistory {
        &self.path_history
    }

    pub fn backtrack(&self) -> Option<&BacktrackPath> {
        self.backtrack.as_ref()
    }

    /// Clear the pickup request, for a host which acknowledges pickups explicitly.
    pub fn ack_pickup(&mut self) {
        self.pickup_latch = false;
    }

    /// Run one tick of the decision engine.
    ///
    /// Overrides are checked in priority order, the first one to act ends the tick:
    ///  1. Mission done, all demands neutral
    ///  1. Record the path history
    ///  1. Anti-circling watchdog
    ///  1. Stuck detection
    ///  1. Pickup latch, then approach any visible sample
    ///  1. Return home trigger and near-sample stop
    ///  1. Mode specific policy
    pub fn step(
        &mut self,
        telem: &VehicleTelem,
        nav_obs: Option<&PolarObs>,
        sample_obs: Option<&PolarObs>,
    ) -> (ActDems, StatusReport) {
        self.report = StatusReport::default();

        if self.mission_done {
            self.dems = ActDems::neutral();
            self.pickup_latch = false;
            return self.output();
        }

        let pose = Pose::from(telem);

        self.num_ticks += 1;
        if self.num_ticks % self.params.path_sample_period.max(1) == 0
            && self.path_history.record(&pose.position_m)
        {
            trace!("Path history now {} cells", self.path_history.len());
        }

        let now_s = self.clock.now_s();
        if self.watchdog.check(now_s) {
            warn!(
                "No forced forward drive in {} s, driving straight ahead",
                self.params.watchdog_period_s
            );
            self.set_drive(1.0, 0.0, 0.0);
            self.report.watchdog_override = true;
            return self.output();
        }

        self.position_memory.push(&pose.position_m);
        if self.position_memory.is_stuck(self.params.max_stuck_distinct) {
            warn!(
                "Rover stuck, {} distinct positions in the last {} ticks, reversing",
                self.position_memory.num_distinct(),
                self.position_memory.len()
            );
            self.set_drive(
                self.params.stuck_throttle,
                self.params.stuck_steer_deg,
                0.0,
            );
            self.report.stuck_recovery = true;
            return self.output();
        }

        if telem.picking_up {
            self.pickup_latch = false;
        } else if telem.near_sample {
            self.pickup_latch = true;
        }

        if let Some(obs) = sample_obs.filter(|o| !o.is_empty()) {
            self.approach_sample(telem, &pose, obs);
            return self.output();
        }

        match nav_obs {
            Some(nav_obs) => {
                if telem.all_samples_collected()
                    || telem.percentage_mapped >= self.params.return_home_coverage_pct
                {
                    self.set_mode(NavMode::ReturnHome);
                }

                if telem.near_sample {
                    self.stop_dems();
                    self.set_mode(NavMode::Stop);
                }

                match self.mode {
                    NavMode::Forward => self.mode_forward(&pose, nav_obs),
                    NavMode::Stop => self.mode_stop(&pose, nav_obs),
                    NavMode::ReturnHome => self.mode_return_home(telem, &pose, nav_obs),
                }
            }
            None => {
                debug!("No terrain observation, continuing at cruise throttle");
                self.set_drive(self.params.throttle_set, 0.0, 0.0);
            }
        }

        self.output()
    }

    /// Steer towards a visible sample, stopping once the host reports it's in range.
    ///
    /// Creeping forward also releases the brake, which may still be on from `Stop` mode and
    /// would otherwise hold the rover short of the sample.
    fn approach_sample(&mut self, telem: &VehicleTelem, pose: &Pose, sample_obs: &PolarObs) {
        self.report.approaching_sample = true;

        if let Some(angle) = sample_obs.mean_angle() {
            self.dems.steer_deg = self.clamp_steer(angle.to_degrees());
        }

        if telem.near_sample {
            self.dems.throttle = 0.0;
            if !telem.picking_up {
                self.pickup_latch = true;
            }
        } else if pose.speed_ms < self.params.approach_speed_ms {
            self.dems.throttle = self.params.approach_throttle;
            self.dems.brake = 0.0;
        } else {
            self.dems.throttle = 0.0;
        }

        trace!(
            "Approaching sample at {:.2} deg, {} px",
            self.dems.steer_deg,
            sample_obs.len()
        );
    }

    /// Clamp a steer angle in degrees to the steer limit.
    pub(crate) fn clamp_steer(&self, steer_deg: f64) -> f64 {
        clamp(
            steer_deg,
            -self.params.steer_limit_deg,
            self.params.steer_limit_deg,
        )
    }

    /// Set all three drive demands at once.
    pub(crate) fn set_drive(&mut self, throttle: f64, steer_deg: f64, brake: f64) {
        self.dems.throttle = throttle;
        self.dems.steer_deg = self.clamp_steer(steer_deg);
        self.dems.brake = brake;
    }

    /// Zero throttle and steer with the brake on.
    pub(crate) fn stop_dems(&mut self) {
        self.set_drive(0.0, 0.0, self.params.brake_set);
    }

    pub(crate) fn set_mode(&mut self, mode: NavMode) {
        if self.mode != mode {
            info!("NavCtrl mode change: {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    pub(crate) fn set_mission_done(&mut self) {
        if !self.mission_done {
            info!(
                "Home reached after {} ticks, mission complete",
                self.num_ticks
            );
        }
        self.mission_done = true;
    }

    /// Finalise this tick's demands and report.
    fn output(&mut self) -> (ActDems, StatusReport) {
        self.dems.steer_deg = self.clamp_steer(self.dems.steer_deg);
        self.dems.pickup = self.pickup_latch;

        self.report.mode = self.mode;
        self.report.mission_done = self.mission_done;
        self.report.pickup_requested = self.pickup_latch;
        self.report.num_ticks = self.num_ticks;
        self.report.path_history_len = self.path_history.len();
        self.report.backtrack_remaining = self.backtrack.as_ref().map(|b| b.len());

        trace!(
            "NavCtrl {}: throttle {:.2}, steer {:.2} deg, brake {:.2}, pickup {}",
            self.mode,
            self.dems.throttle,
            self.dems.steer_deg,
            self.dems.brake,
            self.dems.pickup
        );

        (self.dems, self.report)
    }
}

impl<C: Clock> State for NavCtrl<C> {
    type InitData = &'static str;
    type InitError = NavCtrlError;

    type InputData = InputData;
    type OutputData = ActDems;
    type StatusReport = StatusReport;
    type ProcError = std::convert::Infallible;

    /// Initialise the NavCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        // Load the parameters, the memory and watchdog are sized by them
        self.params = params::load(init_data).map_err(NavCtrlError::ParamLoadError)?;
        self.position_memory = PositionMemory::new(self.params.position_memory_len);
        self.watchdog = CirclingWatchdog::new(self.params.watchdog_period_s, self.clock.now_s());

        // Initialise the archivers
        self.arch_report = Archiver::from_path(session, "nav_ctrl/status_report.csv")
            .map_err(NavCtrlError::ArchiveError)?;
        self.arch_dems = Archiver::from_path(session, "nav_ctrl/dems.csv")
            .map_err(NavCtrlError::ArchiveError)?;

        Ok(())
    }

    /// Perform cyclic processing of navigation control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        Ok(self.step(
            &input_data.telem,
            input_data.nav_obs.as_ref(),
            input_data.sample_obs.as_ref(),
        ))
    }
}

impl<C: Clock> Archived for NavCtrl<C> {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)?;
        self.arch_dems.serialise(self.dems)?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use nalgebra::Vector2;
    use ndarray::Array1;
    use util::time::VirtualClock;

    pub(crate) const EPS: f64 = 1e-9;

    pub(crate) fn nav_ctrl() -> (NavCtrl<VirtualClock>, VirtualClock) {
        let clock = VirtualClock::new(0.0);
        (NavCtrl::new(NavCtrlParams::default(), clock.clone()), clock)
    }

    /// Telemetry for a rover partway through its mission, away from home.
    pub(crate) fn telem(x: f64, y: f64, yaw_deg: f64, speed_ms: f64) -> VehicleTelem {
        VehicleTelem {
            position_m: [x, y],
            yaw_deg,
            speed_ms,
            samples_to_find: 6,
            percentage_mapped: 40.0,
            home_position_m: [99.0, 85.0],
            ..Default::default()
        }
    }

    /// Observation of `n` pixels, all at the given distance and angle.
    pub(crate) fn obs(n: usize, dist: f64, angle: f64) -> PolarObs {
        PolarObs {
            dists: Array1::from_elem(n, dist),
            angles: Array1::from_elem(n, angle),
        }
    }

    #[test]
    fn test_empty_terrain_stops() {
        let (mut nc, _) = nav_ctrl();

        let (dems, report) = nc.step(&telem(10.0, 10.0, 0.0, 1.0), Some(&obs(0, 0.0, 0.0)), None);

        assert_eq!(dems.throttle, 0.0);
        assert_eq!(dems.brake, 10.0);
        assert_eq!(dems.steer_deg, 0.0);
        assert_eq!(nc.mode(), NavMode::Stop);
        assert_eq!(report.mode, NavMode::Stop);
    }

    #[test]
    fn test_sample_approach() {
        let (mut nc, _) = nav_ctrl();

        let sample = obs(20, 15.0, 0.1);
        let (dems, report) = nc.step(
            &telem(10.0, 10.0, 0.0, 0.5),
            Some(&obs(1000, 40.0, -0.3)),
            Some(&sample),
        );

        assert!((dems.steer_deg - 0.1f64.to_degrees()).abs() < EPS);
        assert!((dems.steer_deg - 5.7296).abs() < 1e-3);
        assert_eq!(dems.throttle, 0.2);
        assert!(!dems.pickup);
        assert!(report.approaching_sample);

        // Mode is untouched by the approach
        assert_eq!(nc.mode(), NavMode::Forward);

        // Coast once above the approach speed, steer clamped
        let (dems, _) = nc.step(
            &telem(10.5, 10.0, 0.0, 1.5),
            Some(&obs(1000, 40.0, -0.3)),
            Some(&obs(20, 15.0, 1.2)),
        );
        assert_eq!(dems.throttle, 0.0);
        assert_eq!(dems.steer_deg, 15.0);
    }

    #[test]
    fn test_sample_approach_releases_brake() {
        let (mut nc, _) = nav_ctrl();

        // No terrain, so the rover brakes and stops
        let (dems, _) = nc.step(&telem(10.0, 10.0, 0.0, 1.0), Some(&obs(0, 0.0, 0.0)), None);
        assert_eq!(dems.brake, 10.0);
        assert_eq!(nc.mode(), NavMode::Stop);

        // A sample comes into view while the rover is slow
        let (dems, report) = nc.step(
            &telem(10.2, 10.0, 0.0, 0.3),
            Some(&obs(0, 0.0, 0.0)),
            Some(&obs(20, 15.0, 0.0)),
        );
        assert!(report.approaching_sample);
        assert_eq!((dems.throttle, dems.brake), (0.2, 0.0));
    }

    #[test]
    fn test_coverage_return_home_boundary() {
        let nav = obs(1000, 40.0, 0.0);

        let (mut nc, _) = nav_ctrl();
        let mut t = telem(10.0, 10.0, 0.0, 0.5);
        t.percentage_mapped = 98.0;
        let (_, report) = nc.step(&t, Some(&nav), None);
        assert_eq!(nc.mode(), NavMode::ReturnHome);
        assert_eq!(report.mode, NavMode::ReturnHome);
        assert_eq!(report.backtrack_remaining, Some(0));

        let (mut nc, _) = nav_ctrl();
        t.percentage_mapped = 97.999;
        let (_, report) = nc.step(&t, Some(&nav), None);
        assert_eq!(nc.mode(), NavMode::Forward);
        assert_eq!(report.backtrack_remaining, None);
    }

    #[test]
    fn test_coverage_return_home_retrigger() {
        let (mut nc, _) = nav_ctrl();
        let nav = obs(1000, 40.0, 0.0);
        let x = |tick: u32| 10.0 + tick as f64 * 0.1;

        // Explore eastwards, the history picks up cells 11, 12 and 13 on ticks 12, 24 and 36
        for tick in 1..36 {
            nc.step(&telem(x(tick), 10.0, 0.0, 0.5), Some(&nav), None);
            assert_eq!(nc.mode(), NavMode::Forward);
        }

        let mut t = telem(x(36), 10.0, 0.0, 0.5);
        t.percentage_mapped = 99.0;
        let (_, report) = nc.step(&t, Some(&nav), None);
        assert_eq!(nc.mode(), NavMode::ReturnHome);
        assert_eq!(nc.path_history().cells(), &[(11, 10), (12, 10), (13, 10)]);

        // Built from the recorded history, the first waypoint is already within reach
        assert_eq!(report.backtrack_remaining, Some(2));
        assert_eq!(nc.backtrack().and_then(|b| b.next()), Some(Vector2::new(12.0, 10.0)));

        // The host reports a sample in range, so the rover stops, and being stationary with
        // plenty of terrain ahead the stop policy sets straight off forward again
        let mut t = telem(x(37), 10.0, 0.0, 0.0);
        t.percentage_mapped = 99.0;
        t.near_sample = true;
        let (dems, _) = nc.step(&t, Some(&nav), None);
        assert_eq!(nc.mode(), NavMode::Forward);
        assert_eq!((dems.throttle, dems.brake), (0.2, 0.0));

        // Next tick the coverage check switches straight back, resuming the same backtrack
        let mut t = telem(x(38), 10.0, 0.0, 0.5);
        t.percentage_mapped = 99.0;
        let (_, report) = nc.step(&t, Some(&nav), None);
        assert_eq!(nc.mode(), NavMode::ReturnHome);
        assert_eq!(report.backtrack_remaining, Some(1));
        assert_eq!(nc.backtrack().and_then(|b| b.next()), Some(Vector2::new(11.0, 10.0)));
    }

    #[test]
    fn test_sample_pickup_latch() {
        let (mut nc, _) = nav_ctrl();

        let mut t = telem(10.0, 10.0, 0.0, 0.1);
        t.near_sample = true;

        let (dems, _) = nc.step(&t, Some(&obs(1000, 40.0, 0.0)), Some(&obs(20, 5.0, -0.05)));
        assert_eq!(dems.throttle, 0.0);
        assert!(dems.pickup);

        // Latch holds while the sample is out of view
        t.position_m = [10.1, 10.0];
        t.near_sample = false;
        let (dems, _) = nc.step(&t, Some(&obs(1000, 40.0, 0.0)), None);
        assert!(dems.pickup);

        // And clears when the host starts picking up
        t.position_m = [10.2, 10.0];
        t.picking_up = true;
        let (dems, _) = nc.step(&t, Some(&obs(1000, 40.0, 0.0)), None);
        assert!(!dems.pickup);

        // Or when acknowledged explicitly
        t.position_m = [10.3, 10.0];
        t.picking_up = false;
        t.near_sample = true;
        let (dems, _) = nc.step(&t, Some(&obs(1000, 40.0, 0.0)), None);
        assert!(dems.pickup);
        nc.ack_pickup();
        t.position_m = [10.4, 10.0];
        t.near_sample = false;
        let (dems, _) = nc.step(&t, Some(&obs(1000, 40.0, 0.0)), None);
        assert!(!dems.pickup);
    }

    #[test]
    fn test_near_sample_stop() {
        let (mut nc, _) = nav_ctrl();

        let mut t = telem(10.0, 10.0, 0.0, 1.0);
        t.near_sample = true;

        // No sample in view but the host says one is in range
        let (dems, _) = nc.step(&t, Some(&obs(1000, 40.0, 0.2)), None);

        assert_eq!(nc.mode(), NavMode::Stop);
        assert_eq!(dems.throttle, 0.0);
        assert_eq!(dems.brake, 10.0);
        assert_eq!(dems.steer_deg, 0.0);
        assert!(dems.pickup);
    }

    #[test]
    fn test_stuck_recovery() {
        let (mut nc, clock) = nav_ctrl();

        let mut last = (ActDems::default(), StatusReport::default());
        for i in 0..15 {
            clock.advance(0.1);
            // Two distinct positions, sub-millimetre jitter on top
            let x = 10.0 + (i % 2) as f64 * 0.004 + i as f64 * 1e-5;
            last = nc.step(&telem(x, 20.0, 45.0, 0.0), Some(&obs(1000, 40.0, 0.0)), None);

            if i < 14 {
                assert!(!last.1.stuck_recovery);
            }
        }

        let (dems, report) = last;
        assert!(report.stuck_recovery);
        assert_eq!(dems.throttle, -3.0);
        assert_eq!(dems.steer_deg, 15.0);
        assert_eq!(dems.brake, 0.0);

        // Recovery applies whatever the mode
        nc.mode = NavMode::ReturnHome;
        let (dems, report) = nc.step(&telem(10.0, 20.0, 45.0, 0.0), None, None);
        assert!(report.stuck_recovery);
        assert_eq!((dems.throttle, dems.steer_deg, dems.brake), (-3.0, 15.0, 0.0));
    }

    #[test]
    fn test_watchdog_override() {
        let (mut nc, clock) = nav_ctrl();

        let t = |x: f64| telem(x, 10.0, 0.0, 1.0);

        clock.set(15.0);
        let (_, report) = nc.step(&t(1.0), Some(&obs(1000, 40.0, 0.0)), None);
        assert!(!report.watchdog_override);

        clock.set(15.5);
        let (dems, report) = nc.step(&t(2.0), Some(&obs(0, 0.0, 0.0)), None);
        assert!(report.watchdog_override);
        assert_eq!((dems.throttle, dems.steer_deg, dems.brake), (1.0, 0.0, 0.0));

        // Mode isn't evaluated on the override tick
        assert_eq!(nc.mode(), NavMode::Forward);

        // Timer was reset
        clock.set(30.0);
        let (_, report) = nc.step(&t(3.0), Some(&obs(1000, 40.0, 0.0)), None);
        assert!(!report.watchdog_override);
    }

    #[test]
    fn test_fallback_without_frame() {
        let (mut nc, _) = nav_ctrl();

        let (dems, _) = nc.step(&telem(10.0, 10.0, 0.0, 0.0), None, None);

        assert_eq!((dems.throttle, dems.steer_deg, dems.brake), (0.2, 0.0, 0.0));
        assert_eq!(nc.mode(), NavMode::Forward);
    }

    #[test]
    fn test_path_history_sampling() {
        let (mut nc, _) = nav_ctrl();

        let mut prev_len = 0;
        for i in 1..=120u64 {
            // Moves one cell every 24 ticks, so every other sample is a duplicate
            let x = 10.0 + (i / 24) as f64 + 0.5;
            nc.step(&telem(x, 5.5, 0.0, 1.0), None, None);

            let len = nc.path_history().len();
            assert!(len >= prev_len);
            prev_len = len;

            if i == 11 {
                assert!(nc.path_history().is_empty());
            }
            if i == 12 {
                assert_eq!(nc.path_history().cells(), &[(10, 5)]);
            }
        }

        // Samples at ticks 12, 24, ... 120 over cells 10..=15
        assert_eq!(
            nc.path_history().cells(),
            &[(10, 5), (11, 5), (12, 5), (13, 5), (14, 5), (15, 5)]
        );
    }

    #[test]
    fn test_mission_done_absorbing() {
        let (mut nc, clock) = nav_ctrl();

        // All samples collected and within 1 unit of home, with no history to backtrack
        let mut t = telem(98.0, 85.0, 0.0, 0.3);
        t.samples_collected = 6;

        let (dems, report) = nc.step(&t, Some(&obs(1000, 40.0, 0.0)), None);
        assert_eq!((dems.throttle, dems.steer_deg, dems.brake), (0.0, 0.0, 10.0));
        assert!(report.mission_done);
        assert!(nc.is_mission_done());
        assert_eq!(nc.mode(), NavMode::Stop);
        assert_eq!(report.backtrack_remaining, Some(0));

        // Whatever happens next, the demands stay neutral
        clock.advance(100.0);
        let mut t = telem(50.0, 50.0, 90.0, 2.0);
        t.near_sample = true;
        for _ in 0..20 {
            let (dems, report) = nc.step(&t, Some(&obs(0, 0.0, 0.0)), Some(&obs(5, 3.0, 0.2)));
            assert_eq!(dems, ActDems::neutral());
            assert!(report.mission_done);
            assert!(!report.watchdog_override);
        }
    }

    #[test]
    fn test_steer_always_limited() {
        let (mut nc, clock) = nav_ctrl();

        let angles = [-3.0, -1.0, -0.2, 0.0, 0.3, 1.4, 3.1];
        let counts = [0, 20, 60, 499, 500, 5000];
        let speeds = [-1.0, 0.0, 0.1, 0.5, 1.5, 3.0];

        let mut x = 0.0;
        for &a in angles.iter() {
            for &n in counts.iter() {
                for &v in speeds.iter() {
                    x += 0.5;
                    clock.advance(0.7);
                    let mut t = telem(x, 40.0, 300.0, v);
                    t.percentage_mapped = if n == 20 { 99.0 } else { 40.0 };

                    let nav = obs(n, 30.0, a);
                    let sample = obs(n % 7, 5.0, a * 2.0);
                    let (dems, _) = nc.step(&t, Some(&nav), Some(&sample));

                    assert!(dems.steer_deg.abs() <= 15.0);
                }
            }
        }
    }

    #[test]
    fn test_proc() {
        let (mut nc, _) = nav_ctrl();

        let input = InputData {
            telem: telem(10.0, 10.0, 0.0, 0.0),
            nav_obs: Some(obs(1000, 40.0, 0.1)),
            sample_obs: None,
        };

        let (dems, report) = nc.proc(&input).unwrap();
        assert_eq!(dems.throttle, 0.2);
        assert_eq!(report.num_ticks, 1);
        assert_eq!(report.backtrack_remaining, None);
    }
}
