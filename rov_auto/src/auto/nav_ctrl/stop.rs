//! # `Stop` mode

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;

use super::{NavCtrl, NavMode};
use crate::auto::{geom::PolarObs, loc::Pose};
use util::time::Clock;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C: Clock> NavCtrl<C> {
    /// Brake until stopped, then either set off again or back out of a dead end.
    pub(super) fn mode_stop(&mut self, pose: &Pose, nav_obs: &PolarObs) {
        if pose.speed_ms > self.params.stop_speed_ms {
            self.stop_dems();
            return;
        }

        if nav_obs.len() < self.params.go_forward_px {
            // Blocked, reverse while turning towards the left-most terrain there is
            let steer_deg = nav_obs
                .max_angle()
                .map(|a| a.to_degrees())
                .unwrap_or(self.params.escape_steer_deg);

            debug!(
                "Blocked with {} navigable px, reversing at {:.2} deg",
                nav_obs.len(),
                steer_deg
            );
            self.set_drive(self.params.escape_throttle, steer_deg, 0.0);
        }
        else {
            let steer_deg = nav_obs.mean_angle().unwrap_or(0.0).to_degrees();

            self.set_drive(self.params.throttle_set, steer_deg, 0.0);
            self.set_mode(NavMode::Forward);
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
    use ndarray::arr1;

    #[test]
    fn test_stop_brakes_while_moving() {
        let (mut nc, _) = nav_ctrl();
        nc.mode = NavMode::Stop;

        let (dems, _) = nc.step(&telem(10.0, 10.0, 0.0, 0.8), Some(&obs(5000, 30.0, 0.1)), None);

        assert_eq!((dems.throttle, dems.steer_deg, dems.brake), (0.0, 0.0, 10.0));
        assert_eq!(nc.mode(), NavMode::Stop);
    }

    #[test]
    fn test_stop_escape() {
        let (mut nc, _) = nav_ctrl();
        nc.mode = NavMode::Stop;

        let nav = PolarObs {
            dists: arr1(&[10.0, 12.0, 14.0]),
            angles: arr1(&[-0.4, 0.1, 0.2]),
        };
        let (dems, _) = nc.step(&telem(10.0, 10.0, 0.0, 0.1), Some(&nav), None);

        assert_eq!(dems.throttle, -2.0);
        assert_eq!(dems.brake, 0.0);
        assert!((dems.steer_deg - 0.2f64.to_degrees()).abs() < EPS);
        assert_eq!(nc.mode(), NavMode::Stop);

        // Blind, fixed turn
        let (dems, _) = nc.step(&telem(10.5, 10.0, 0.0, -0.5), Some(&obs(0, 0.0, 0.0)), None);
        assert_eq!((dems.throttle, dems.steer_deg, dems.brake), (-2.0, 15.0, 0.0));
    }

    #[test]
    fn test_stop_resume_forward() {
        let (mut nc, _) = nav_ctrl();
        nc.mode = NavMode::Stop;

        let (dems, _) = nc.step(&telem(10.0, 10.0, 0.0, 0.0), Some(&obs(500, 30.0, -0.1)), None);

        assert_eq!(nc.mode(), NavMode::Forward);
        assert_eq!(dems.throttle, 0.2);
        assert_eq!(dems.brake, 0.0);
        assert!((dems.steer_deg + 0.1f64.to_degrees()).abs() < EPS);
    }
}
