//! Parameters structure for NavCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for navigation control.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavCtrlParams {

    // ---- DRIVING ----

    /// Speed above which the throttle is released.
    ///
    /// Units: length units/second
    pub max_speed_ms: f64,

    /// Cruise throttle
    pub throttle_set: f64,

    /// Brake applied whenever the rover is commanded to stop
    pub brake_set: f64,

    /// Steer demands are clamped into `[-steer_limit_deg, steer_limit_deg]`.
    ///
    /// Units: degrees
    pub steer_limit_deg: f64,

    // ---- TERRAIN THRESHOLDS ----

    /// Fewer navigable pixels than this and the rover stops.
    pub stop_forward_px: usize,

    /// At least this many navigable pixels and a stopped rover sets off again.
    pub go_forward_px: usize,

    /// Mean distance to navigable terrain below which the way ahead is considered too short to
    /// keep driving.
    ///
    /// Units: warped pixels
    pub min_mean_nav_dist_px: f64,

    // ---- WALL CRAWL ----

    /// Percentile of the navigable angles used as the left-most navigable direction
    pub wall_percentile: f64,

    /// Weight on the left-most navigable angle
    pub wall_weight: f64,

    /// Weight on the mean navigable angle
    pub mean_weight: f64,

    // ---- SAMPLES ----

    /// Below this speed the rover creeps towards a visible sample, above it the rover coasts.
    ///
    /// Units: length units/second
    pub approach_speed_ms: f64,

    /// Throttle used to creep towards a visible sample
    pub approach_throttle: f64,

    // ---- STOP ----

    /// Speed below which the rover is considered stopped.
    ///
    /// Units: length units/second
    pub stop_speed_ms: f64,

    /// Reverse throttle used to escape when stopped without enough navigable terrain
    pub escape_throttle: f64,

    /// Steer used to escape when no terrain at all is visible.
    ///
    /// Units: degrees
    pub escape_steer_deg: f64,

    // ---- STUCK DETECTION ----

    /// Number of positions held in the stuck detection memory
    pub position_memory_len: usize,

    /// A full memory holding at most this many distinct positions means the rover is stuck
    pub max_stuck_distinct: usize,

    /// Throttle applied to recover from being stuck
    pub stuck_throttle: f64,

    /// Steer applied to recover from being stuck.
    ///
    /// Units: degrees
    pub stuck_steer_deg: f64,

    /// The rover is forced straight ahead after this long without a forced forward drive.
    ///
    /// Units: seconds
    pub watchdog_period_s: f64,

    // ---- RETURN HOME ----

    /// The current position is recorded in the path history once every this many ticks.
    pub path_sample_period: u64,

    /// A backtrack waypoint is reached when the rover is closer than this.
    ///
    /// Units: length units
    pub waypoint_reach_m: f64,

    /// The mission is complete when the rover is closer than this to home.
    ///
    /// Units: length units
    pub home_reach_m: f64,

    /// Mapped coverage which triggers the return home.
    ///
    /// Units: percent
    pub return_home_coverage_pct: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for NavCtrlParams {
    fn default() -> Self {
        Self {
            max_speed_ms: 2.0,
            throttle_set: 0.2,
            brake_set: 10.0,
            steer_limit_deg: 15.0,
            stop_forward_px: 50,
            go_forward_px: 500,
            min_mean_nav_dist_px: 10.0,
            wall_percentile: 85.0,
            wall_weight: 0.5,
            mean_weight: 0.4,
            approach_speed_ms: 1.0,
            approach_throttle: 0.2,
            stop_speed_ms: 0.2,
            escape_throttle: -2.0,
            escape_steer_deg: 15.0,
            position_memory_len: 15,
            max_stuck_distinct: 2,
            stuck_throttle: -3.0,
            stuck_steer_deg: 15.0,
            watchdog_period_s: 15.0,
            path_sample_period: 12,
            waypoint_reach_m: 2.0,
            home_reach_m: 2.0,
            return_home_coverage_pct: 98.0,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
