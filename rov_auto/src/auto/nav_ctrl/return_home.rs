//! # `ReturnHome` mode
//!
//! The rover retraces its path history in reverse, one waypoint at a time, until it is close
//! enough to the home position to finish the mission.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info};
use nalgebra::Vector2;

use super::{NavCtrl, NavMode};
use crate::auto::{geom::PolarObs, loc::Pose};
use comms_if::eqpt::telem::VehicleTelem;
use util::{maths::wrap_pi, time::Clock};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C: Clock> NavCtrl<C> {
    pub(super) fn mode_return_home(
        &mut self,
        telem: &VehicleTelem,
        pose: &Pose,
        nav_obs: &PolarObs,
    ) {
        // The path home is fixed the first time we get here
        if self.backtrack.is_none() {
            let backtrack = self.path_history.backtrack();
            info!("Returning home via {} waypoints", backtrack.len());
            self.backtrack = Some(backtrack);
        }

        let target = self.backtrack.as_ref().and_then(|b| b.next());

        if let Some(target_m) = target {
            let head_error_rad = wrap_pi(pose.bearing_to(&target_m) - pose.get_heading());
            let steer_deg = self.clamp_steer(head_error_rad.to_degrees());

            if pose.distance_to(&target_m) < self.params.waypoint_reach_m {
                if let Some(b) = self.backtrack.as_mut() {
                    b.pop();
                    debug!(
                        "Waypoint ({}, {}) reached, {} remaining",
                        target_m.x,
                        target_m.y,
                        b.len()
                    );
                }
            }
            else {
                self.dems.steer_deg = steer_deg;
                self.dems.throttle = if pose.speed_ms < self.params.max_speed_ms {
                    self.params.throttle_set
                } else {
                    0.0
                };
                self.dems.brake = 0.0;
            }

            // Nothing navigable ahead, back away while keeping the waypoint in front
            if nav_obs.len() < self.params.stop_forward_px {
                self.set_drive(self.params.escape_throttle, -steer_deg, 0.0);
                return;
            }
        }

        let home_m = Vector2::new(telem.home_position_m[0], telem.home_position_m[1]);
        if pose.distance_to(&home_m) < self.params.home_reach_m {
            self.stop_dems();
            self.set_mode(NavMode::Stop);
            self.set_mission_done();
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::super::state::test::{nav_ctrl, obs, telem, EPS};
    use super::*;

    #[test]
    fn test_backtrack_snapshot() {
        let (mut nc, _) = nav_ctrl();

        for p in [(10.0, 10.0), (20.0, 10.0), (30.0, 12.0)].iter() {
            nc.path_history.record(&Vector2::new(p.0, p.1));
        }
        nc.mode = NavMode::ReturnHome;

        // Facing +x at the last recorded cell, the waypoint is reached and popped
        let (_, report) = nc.step(&telem(30.5, 12.5, 0.0, 0.0), Some(&obs(1000, 30.0, 0.0)), None);
        assert_eq!(report.backtrack_remaining, Some(2));

        // Keeps recording history while heading home but the backtrack path isn't rebuilt
        nc.path_history.record(&Vector2::new(40.0, 40.0));
        let (dems, report) =
            nc.step(&telem(29.0, 12.0, 180.0, 0.5), Some(&obs(1000, 30.0, 0.0)), None);
        assert_eq!(report.backtrack_remaining, Some(2));
        assert_eq!(nc.backtrack().unwrap().next(), Some(Vector2::new(20.0, 10.0)));

        // Heading 180 with the next waypoint about 12.5 degrees to the left
        let bearing = (-2.0f64).atan2(-9.0);
        let expected = wrap_pi(bearing - std::f64::consts::PI).to_degrees();
        assert!((dems.steer_deg - expected).abs() < EPS);
        assert_eq!(dems.throttle, 0.2);
        assert_eq!(dems.brake, 0.0);
    }

    #[test]
    fn test_heading_error_wraps() {
        let (mut nc, _) = nav_ctrl();

        nc.path_history.record(&Vector2::new(20.0, 10.0));
        nc.mode = NavMode::ReturnHome;

        // Heading 350, target bearing 10 degrees, so turn 20 degrees left not 340 right
        let (tx, ty) = (20.0, 10.0);
        let bearing_rad = 10f64.to_radians();
        let (x, y) = (tx - 10.0 * bearing_rad.cos(), ty - 10.0 * bearing_rad.sin());

        let (dems, _) = nc.step(&telem(x, y, 350.0, 0.5), Some(&obs(1000, 30.0, 0.0)), None);
        assert_eq!(dems.steer_deg, 15.0);
        assert_eq!(dems.throttle, 0.2);

        // Above max speed coast
        let (dems, _) = nc.step(&telem(x, y + 0.1, 350.0, 2.5), Some(&obs(1000, 30.0, 0.0)), None);
        assert_eq!(dems.throttle, 0.0);
    }

    #[test]
    fn test_backtrack_blocked() {
        let (mut nc, _) = nav_ctrl();

        nc.path_history.record(&Vector2::new(20.0, 10.0));
        nc.mode = NavMode::ReturnHome;

        // Target 10 units ahead and slightly to the left, heading error 5 degrees
        let bearing_rad = 5f64.to_radians();
        let (x, y) = (20.0 - 10.0 * bearing_rad.cos(), 10.0 - 10.0 * bearing_rad.sin());

        // Home is right here, but being blocked takes priority over finishing
        let mut t = telem(x, y, 0.0, 0.0);
        t.home_position_m = [x + 0.5, y];

        let (dems, report) = nc.step(&t, Some(&obs(10, 30.0, 0.0)), None);

        assert_eq!(dems.throttle, -2.0);
        assert_eq!(dems.brake, 0.0);
        assert!((dems.steer_deg + 5.0).abs() < 1e-6);
        assert!(!report.mission_done);
        assert_eq!(nc.mode(), NavMode::ReturnHome);
    }

    #[test]
    fn test_home_reached_after_backtrack() {
        let (mut nc, _) = nav_ctrl();

        nc.path_history.record(&Vector2::new(99.0, 85.0));
        nc.mode = NavMode::ReturnHome;

        // Last waypoint and home in one
        let (dems, report) =
            nc.step(&telem(99.5, 85.5, 0.0, 0.1), Some(&obs(1000, 30.0, 0.0)), None);

        assert_eq!(report.backtrack_remaining, Some(0));
        assert!(report.mission_done);
        assert_eq!((dems.throttle, dems.steer_deg, dems.brake), (0.0, 0.0, 10.0));
        assert_eq!(nc.mode(), NavMode::Stop);
    }
}
