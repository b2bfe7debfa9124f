//! # `Forward` mode
//!
//! Exploration by wall crawling. The rover steers towards a blend of the left-most navigable
//! direction and the average navigable direction, so it tends to follow the left hand wall of
//! whatever it's exploring.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{NavCtrl, NavMode};
use crate::auto::{geom::PolarObs, loc::Pose};
use util::time::Clock;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<C: Clock> NavCtrl<C> {
    pub(super) fn mode_forward(&mut self, pose: &Pose, nav_obs: &PolarObs) {
        let num_px = nav_obs.len();
        let mean_dist = nav_obs.mean_dist().unwrap_or(0.0);

        if num_px >= self.params.stop_forward_px && mean_dist >= self.params.min_mean_nav_dist_px {
            // Accelerate up to max speed, then hold whatever throttle we had
            if pose.speed_ms < self.params.max_speed_ms {
                self.dems.throttle = self.params.throttle_set;
            }
            self.dems.brake = 0.0;

            // Steering while reversing would swing the rover the wrong way
            if pose.speed_ms >= 0.0 {
                if let Some(target_rad) = self.wall_crawl_angle(nav_obs) {
                    self.dems.steer_deg = self.clamp_steer(target_rad.to_degrees());
                }
            }
        }
        else if num_px < self.params.stop_forward_px {
            self.stop_dems();
            self.set_mode(NavMode::Stop);
        }
        else {
            // Plenty of terrain but it's all close by, coast to a stop
            self.dems.throttle = 0.0;
            self.dems.brake = 0.0;
            self.set_mode(NavMode::Stop);
        }
    }

    /// Target heading relative to the rover, biased towards the left-most navigable terrain.
    ///
    /// Units: radians
    fn wall_crawl_angle(&self, nav_obs: &PolarObs) -> Option<f64> {
        let left_rad = nav_obs.angle_percentile(self.params.wall_percentile)?;
        let mean_rad = nav_obs.mean_angle()?;

        Some(self.params.wall_weight * left_rad + self.params.mean_weight * mean_rad)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
