//! # Geometry utilities
//!
//! Coordinate transforms between the warped top-down camera view, the rover-centric frame and the
//! world map frame.
//!
//! Frames used here:
//! - Image frame: rows increase downwards (towards the rover), columns increase to the right.
//! - Rover-centric frame: origin at the bottom-centre of the warped view, X forwards (away from
//!   the rover), Y to the left.
//! - World frame: fixed global grid, one cell per `scale` rover-centric pixels.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use ndarray::{Array1, Array2, Zip};
use ordered_float::OrderedFloat;

use super::loc::Pose;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// A binary mask over the warped ground view, indexed `[row, col]`.
pub type Mask = Array2<bool>;

/// Integer cell in the world map, `(x, y)`.
pub type WorldCell = (usize, usize);

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Rover-centric coordinates of a set of pixels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoverPixels {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
}

/// Polar description of a set of rover-centric pixels.
///
/// Angles are in radians, 0 is straight ahead and positive angles are to the left.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolarObs {
    pub dists: Array1<f64>,
    pub angles: Array1<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RoverPixels {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

impl PolarObs {
    /// Number of pixels in the observation
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// Mean angle in radians, `None` if nothing was observed.
    pub fn mean_angle(&self) -> Option<f64> {
        self.angles.mean()
    }

    /// Mean distance, `None` if nothing was observed.
    pub fn mean_dist(&self) -> Option<f64> {
        self.dists.mean()
    }

    /// Largest (left-most) angle in radians.
    pub fn max_angle(&self) -> Option<f64> {
        self.angles
            .iter()
            .copied()
            .map(OrderedFloat)
            .max()
            .map(|a| a.into_inner())
    }

    /// The `pct`th percentile of the angles, using linear interpolation between the closest
    /// ranks.
    pub fn angle_percentile(&self, pct: f64) -> Option<f64> {
        if self.angles.is_empty() {
            return None;
        }

        let mut sorted: Vec<OrderedFloat<f64>> =
            self.angles.iter().copied().map(OrderedFloat).collect();
        sorted.sort();

        let rank = (pct / 100.0).max(0.0).min(1.0) * (sorted.len() - 1) as f64;
        let lo = rank.floor() as usize;
        let hi = rank.ceil() as usize;
        let frac = rank - lo as f64;

        Some(sorted[lo].into_inner() + (sorted[hi].into_inner() - sorted[lo].into_inner()) * frac)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Get the rover-centric coordinates of every set pixel in the mask.
///
/// Pixels are visited in row-major order.
pub fn rover_coords(mask: &Mask) -> RoverPixels {
    let (num_rows, num_cols) = mask.dim();
    let half_width = num_cols as f64 / 2.0;

    let (x, y): (Vec<f64>, Vec<f64>) = mask
        .indexed_iter()
        .filter(|(_, &set)| set)
        .map(|((row, col), _)| {
            (
                num_rows as f64 - row as f64,
                half_width - col as f64,
            )
        })
        .unzip();

    RoverPixels {
        x: Array1::from(x),
        y: Array1::from(y),
    }
}

/// Rotate rover-centric pixels by the rover's yaw, aligning them with the world axes.
pub fn rotate_pix(pix: &RoverPixels, yaw_deg: f64) -> RoverPixels {
    let (sin_yaw, cos_yaw) = yaw_deg.to_radians().sin_cos();

    RoverPixels {
        x: &pix.x * cos_yaw - &pix.y * sin_yaw,
        y: &pix.x * sin_yaw + &pix.y * cos_yaw,
    }
}

/// Scale rotated pixels down into world cells and shift them to the rover's world position.
///
/// The result is in fractional world cells.
pub fn translate_pix(pix_rot: &RoverPixels, x_pos: f64, y_pos: f64, scale: f64) -> RoverPixels {
    RoverPixels {
        x: pix_rot.x.mapv(|x| x_pos + x / scale),
        y: pix_rot.y.mapv(|y| y_pos + y / scale),
    }
}

/// Project rover-centric pixels into integer world map cells.
///
/// Fractional cells are truncated towards zero, then clamped into `[0, world_size - 1]`, so
/// points outside the map pile up on its edge rather than being dropped.
pub fn pix_to_world(
    pix: &RoverPixels,
    pose: &Pose,
    world_size: usize,
    scale: f64,
) -> Vec<WorldCell> {
    let pix_rot = rotate_pix(pix, pose.yaw_deg);
    let pix_tran = translate_pix(&pix_rot, pose.position_m.x, pose.position_m.y, scale);

    let max_cell = world_size.saturating_sub(1) as i64;
    let to_cell = |v: f64| (v as i64).max(0).min(max_cell) as usize;

    pix_tran
        .x
        .iter()
        .zip(pix_tran.y.iter())
        .map(|(&x, &y)| (to_cell(x), to_cell(y)))
        .collect()
}

/// Convert rover-centric pixels into polar coordinates.
pub fn to_polar_coords(pix: &RoverPixels) -> PolarObs {
    let mut dists = Array1::zeros(pix.len());
    let mut angles = Array1::zeros(pix.len());

    Zip::from(&mut dists)
        .and(&mut angles)
        .and(&pix.x)
        .and(&pix.y)
        .for_each(|d, a, &x, &y| {
            *d = x.hypot(y);
            *a = y.atan2(x);
        });

    PolarObs { dists, angles }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
