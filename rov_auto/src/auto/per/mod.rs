//! # Perception module
//!
//! Converts the forward facing camera frame into a top-down view of the ground in front of the
//! rover and picks out the navigable terrain and any samples in it.
//!
//! General procedure, run once per frame:
//!  - Warp the frame onto the ground plane using the fixed calibration quad
//!  - Threshold the warped view for navigable terrain and for samples
//!  - Convert both masks into rover-centric coordinates and then into polar observations
//!  - Project both sets of pixels into world map cells and accumulate them into the map

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

mod thresh;
mod warp;

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::{Rgb, RgbImage};
use log::trace;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use comms_if::eqpt::cam::CamImage;
use util::{params, raise_error};

use super::{
    geom::{self, Mask, PolarObs, WorldCell},
    loc::Pose,
    map::{WorldMap, WorldMapLayer},
};

pub use thresh::{color_band, color_thresh};
pub use warp::{warp_perspective, Homography, Warped};

// -----------------------------------------------------------------------------------------------
// STRUCTS
// -----------------------------------------------------------------------------------------------

/// Manages the perception algorithm, converting camera frames into terrain and sample
/// observations.
#[derive(Debug, Clone)]
pub struct PerMgr {
    pub params: PerMgrParams,

    /// Maps warped (ground) pixels back into the camera frame
    ground_to_cam: Homography,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerMgrParams {
    /// Size of the camera frames, `[width, height]`. Frames of any other shape are rejected.
    pub frame_size_px: [u32; 2],

    /// Four points in the camera frame, `[col, row]`, outlining a one metre grid square on flat
    /// ground. Ordered bottom-left, bottom-right, top-right, top-left.
    pub calib_src_px: [[f64; 2]; 4],

    /// Half the side length of the calibration square once warped
    pub dst_size_px: f64,

    /// Distance from the bottom of the warped view to the bottom of the calibration square,
    /// since the camera can't see the ground right under the rover.
    pub bottom_offset_px: f64,

    /// A pixel is navigable if all three channels are strictly above these values
    pub nav_thresh_rgb: [u8; 3],

    /// A pixel is a sample if all three channels are within `[low, high]`
    pub sample_low_rgb: [u8; 3],
    pub sample_high_rgb: [u8; 3],

    /// Number of cells along each side of the world map
    pub world_size: usize,

    /// Number of warped pixels per world map cell
    pub world_scale: f64,
}

/// Everything perception found in a single frame.
#[derive(Debug, Clone)]
pub struct PerOutput {
    /// The frame warped onto the ground plane
    pub warped: RgbImage,

    /// Pixels of the warped view which the camera can actually see
    pub visibility: Mask,

    pub nav_mask: Mask,
    pub sample_mask: Mask,

    /// Navigable terrain in rover-centric polar coordinates, may be empty
    pub nav_obs: PolarObs,

    /// Samples in rover-centric polar coordinates, `None` if no sample is visible
    pub sample_obs: Option<PolarObs>,

    /// World cells observed as navigable this frame
    pub nav_cells: Vec<WorldCell>,

    /// World cells observed as containing a sample this frame
    pub sample_cells: Vec<WorldCell>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PerError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),

    #[error("The calibration points don't define a valid perspective transform")]
    DegenerateCalibration,
}

// -----------------------------------------------------------------------------------------------
// IMPLS
// -----------------------------------------------------------------------------------------------

impl Default for PerMgrParams {
    fn default() -> Self {
        Self {
            frame_size_px: [320, 160],
            calib_src_px: [[14.0, 140.0], [301.0, 140.0], [200.0, 96.0], [118.0, 96.0]],
            dst_size_px: 5.0,
            bottom_offset_px: 6.0,
            nav_thresh_rgb: [160, 160, 160],
            sample_low_rgb: [110, 110, 0],
            sample_high_rgb: [255, 255, 70],
            world_size: 200,
            world_scale: 10.0,
        }
    }
}

impl PerMgrParams {
    /// The calibration square as it should appear in the warped view, centred horizontally and
    /// `bottom_offset_px` up from the bottom edge. Same ordering as `calib_src_px`.
    pub fn calib_dst_px(&self) -> [[f64; 2]; 4] {
        let half_width = self.frame_size_px[0] as f64 / 2.0;
        let bottom = self.frame_size_px[1] as f64 - self.bottom_offset_px;
        let top = bottom - 2.0 * self.dst_size_px;

        [
            [half_width - self.dst_size_px, bottom],
            [half_width + self.dst_size_px, bottom],
            [half_width + self.dst_size_px, top],
            [half_width - self.dst_size_px, top],
        ]
    }
}

impl PerMgr {
    /// Create a new perception manager from a parameter file path.
    pub fn init(params_path: &str) -> Result<Self, PerError> {
        let params = params::load(params_path).map_err(PerError::ParamLoadError)?;

        Self::new(params)
    }

    pub fn new(params: PerMgrParams) -> Result<Self, PerError> {
        let to_points = |pts: [[f64; 2]; 4]| {
            [
                Point2::new(pts[0][0], pts[0][1]),
                Point2::new(pts[1][0], pts[1][1]),
                Point2::new(pts[2][0], pts[2][1]),
                Point2::new(pts[3][0], pts[3][1]),
            ]
        };

        // The warp samples the camera frame for each ground pixel, so keep the inverse
        let ground_to_cam = Homography::from_4pt(
            &to_points(params.calib_src_px),
            &to_points(params.calib_dst_px()),
        )
        .and_then(|cam_to_ground| cam_to_ground.inverse())
        .ok_or(PerError::DegenerateCalibration)?;

        Ok(Self {
            params,
            ground_to_cam,
        })
    }

    /// Create an empty world map sized for these parameters.
    pub fn new_world_map(&self) -> WorldMap {
        WorldMap::new(self.params.world_size)
    }

    /// Process a single frame taken at the given pose.
    ///
    /// The world map is not modified, see [`PerMgr::perceive`] or [`PerOutput::apply`].
    ///
    /// # Panics
    /// - If the frame isn't the size given by the `frame_size_px` parameter.
    pub fn calculate(&self, frame: &CamImage, pose: &Pose) -> PerOutput {
        let [width, height] = self.params.frame_size_px;
        if frame.width() != width || frame.height() != height {
            raise_error!(
                "Camera frame is {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                width,
                height
            );
        }

        let Warped { image, visibility } = warp_perspective(&frame.image, &self.ground_to_cam);

        let nav_mask = color_thresh(&image, self.params.nav_thresh_rgb);
        let sample_mask = color_band(
            &image,
            self.params.sample_low_rgb,
            self.params.sample_high_rgb,
        );

        let nav_pix = geom::rover_coords(&nav_mask);
        let sample_pix = geom::rover_coords(&sample_mask);

        let nav_obs = geom::to_polar_coords(&nav_pix);
        let sample_obs = if sample_pix.is_empty() {
            None
        } else {
            Some(geom::to_polar_coords(&sample_pix))
        };

        let nav_cells = geom::pix_to_world(
            &nav_pix,
            pose,
            self.params.world_size,
            self.params.world_scale,
        );
        let sample_cells = geom::pix_to_world(
            &sample_pix,
            pose,
            self.params.world_size,
            self.params.world_scale,
        );

        trace!(
            "Perception: {} navigable pixels, {} sample pixels",
            nav_obs.len(),
            sample_pix.len()
        );

        PerOutput {
            warped: image,
            visibility,
            nav_mask,
            sample_mask,
            nav_obs,
            sample_obs,
            nav_cells,
            sample_cells,
        }
    }

    /// Process a frame and accumulate what was seen into the world map.
    pub fn perceive(&self, frame: &CamImage, pose: &Pose, world_map: &mut WorldMap) -> PerOutput {
        let output = self.calculate(frame, pose);
        output.apply(world_map);
        output
    }
}

impl PerOutput {
    /// Accumulate this frame's observations into the world map.
    pub fn apply(&self, world_map: &mut WorldMap) {
        world_map.accumulate(WorldMapLayer::Navigable, &self.nav_cells);
        world_map.accumulate(WorldMapLayer::Sample, &self.sample_cells);
    }

    /// Diagnostic image of the warped view, navigable terrain in blue and samples in green.
    pub fn vision_image(&self) -> RgbImage {
        let (num_rows, num_cols) = self.nav_mask.dim();

        RgbImage::from_fn(num_cols as u32, num_rows as u32, |col, row| {
            let idx = [row as usize, col as usize];
            let green = if self.sample_mask[idx] { 255 } else { 0 };
            let blue = if self.nav_mask[idx] { 255 } else { 0 };

            Rgb([0, green, blue])
        })
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Frame with bright ground below the horizon and a yellow blob in the middle of the
    /// calibration square.
    fn test_frame(with_sample: bool) -> CamImage {
        let mut img = RgbImage::from_pixel(320, 160, Rgb([20, 20, 20]));

        for row in 90..160 {
            for col in 0..320 {
                img.put_pixel(col, row, Rgb([200, 190, 180]));
            }
        }

        if with_sample {
            for row in 110..125 {
                for col in 150..170 {
                    img.put_pixel(col, row, Rgb([200, 180, 20]));
                }
            }
        }

        CamImage::new(img)
    }

    fn test_pose() -> Pose {
        Pose {
            position_m: nalgebra::Vector2::new(100.0, 100.0),
            yaw_deg: 0.0,
            speed_ms: 0.0,
        }
    }

    #[test]
    fn test_calib_dst() {
        let params = PerMgrParams::default();

        assert_eq!(
            params.calib_dst_px(),
            [[155.0, 154.0], [165.0, 154.0], [165.0, 144.0], [155.0, 144.0]]
        );
    }

    #[test]
    fn test_params_file() {
        let params: PerMgrParams =
            util::params::parse(include_str!("../../../../params/per_mgr.toml")).unwrap();

        assert_eq!(params.calib_dst_px(), PerMgrParams::default().calib_dst_px());
        assert_eq!(params.nav_thresh_rgb, [160, 160, 160]);
        assert_eq!(params.world_size, 200);
    }

    #[test]
    fn test_degenerate_calibration() {
        let params = PerMgrParams {
            calib_src_px: [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]],
            ..Default::default()
        };

        assert!(matches!(
            PerMgr::new(params),
            Err(PerError::DegenerateCalibration)
        ));
    }

    #[test]
    fn test_blank_frame() {
        let per_mgr = PerMgr::new(PerMgrParams::default()).unwrap();
        let frame = CamImage::new(RgbImage::new(320, 160));

        let output = per_mgr.calculate(&frame, &test_pose());

        assert!(output.nav_obs.is_empty());
        assert!(output.sample_obs.is_none());
        assert!(output.nav_cells.is_empty());
        assert!(output.nav_mask.iter().all(|&n| !n));
        assert_eq!(output.nav_mask.dim(), (160, 320));
    }

    #[test]
    fn test_ground_frame() {
        let per_mgr = PerMgr::new(PerMgrParams::default()).unwrap();
        let mut world_map = per_mgr.new_world_map();

        let output = per_mgr.perceive(&test_frame(false), &test_pose(), &mut world_map);

        assert!(!output.nav_obs.is_empty());
        assert!(output.sample_obs.is_none());
        assert_eq!(output.nav_cells.len(), output.nav_obs.len());

        // Ground is in front of the rover, so everything is at a forward facing angle
        assert!(output
            .nav_obs
            .angles
            .iter()
            .all(|a| a.abs() <= std::f64::consts::FRAC_PI_2));

        // The bottom of the calibration square is directly ahead and visible
        assert!(output.visibility[[154, 160]]);
        assert!(output.nav_mask[[154, 160]]);

        // Every observed cell went into the navigable layer
        let total: u32 = world_map.layer(WorldMapLayer::Navigable).iter().sum();
        assert_eq!(total as usize, output.nav_cells.len());

        // And accumulating the same frame again doubles the counts
        output.apply(&mut world_map);
        let total: u32 = world_map.layer(WorldMapLayer::Navigable).iter().sum();
        assert_eq!(total as usize, 2 * output.nav_cells.len());
    }

    #[test]
    fn test_sample_frame() {
        let per_mgr = PerMgr::new(PerMgrParams::default()).unwrap();

        let output = per_mgr.calculate(&test_frame(true), &test_pose());

        let sample_obs = output.sample_obs.as_ref().unwrap();
        assert!(!sample_obs.is_empty());
        assert_eq!(output.sample_cells.len(), sample_obs.len());

        // The blob is centred so the mean angle is near straight ahead
        assert!(sample_obs.mean_angle().unwrap().abs() < 0.2);

        // Vision image shows samples on the green channel and terrain on the blue
        let vision = output.vision_image();
        assert_eq!(vision.dimensions(), (320, 160));
        for ((row, col), &is_sample) in output.sample_mask.indexed_iter() {
            let px = vision.get_pixel(col as u32, row as u32);
            assert_eq!(px[0], 0);
            assert_eq!(px[1] == 255, is_sample);
            assert_eq!(px[2] == 255, output.nav_mask[[row, col]]);
        }
    }

    #[test]
    #[should_panic]
    fn test_wrong_frame_shape() {
        let per_mgr = PerMgr::new(PerMgrParams::default()).unwrap();
        let frame = CamImage::new(RgbImage::new(160, 120));

        per_mgr.calculate(&frame, &test_pose());
    }
}
