//! Projective warp from the camera image plane onto the ground plane

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use image::{Rgb, RgbImage};
use nalgebra::{DMatrix, DVector, Matrix3, Point2, Vector3};

use crate::auto::geom::Mask;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Homogeneous scale below which a point is considered to be at infinity
const MIN_HOMOGENEOUS_SCALE: f64 = 1e-12;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A 3x3 projective transform between two planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography(Matrix3<f64>);

/// Output of a perspective warp.
#[derive(Debug, Clone)]
pub struct Warped {
    /// The warped image, black wherever the source didn't cover
    pub image: RgbImage,

    /// Pixels of the warped image which fall inside the source image's field of view
    pub visibility: Mask,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Homography {
    /// Solve for the homography mapping each `src` point onto the matching `dst` point.
    ///
    /// Returns `None` if the points are degenerate (three or more collinear).
    pub fn from_4pt(src: &[Point2<f64>; 4], dst: &[Point2<f64>; 4]) -> Option<Self> {
        // With h33 fixed to 1 each correspondence gives two rows of an 8x8 linear system:
        //  u = (h11 x + h12 y + h13) / (h31 x + h32 y + 1)
        //  v = (h21 x + h22 y + h23) / (h31 x + h32 y + 1)
        let mut a = DMatrix::<f64>::zeros(8, 8);
        let mut b = DVector::<f64>::zeros(8);

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            let (x, y, u, v) = (s.x, s.y, d.x, d.y);

            let r = 2 * i;
            a[(r, 0)] = x;
            a[(r, 1)] = y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -u * x;
            a[(r, 7)] = -u * y;
            b[r] = u;

            a[(r + 1, 3)] = x;
            a[(r + 1, 4)] = y;
            a[(r + 1, 5)] = 1.0;
            a[(r + 1, 6)] = -v * x;
            a[(r + 1, 7)] = -v * y;
            b[r + 1] = v;
        }

        let h = a.lu().solve(&b)?;

        if h.iter().any(|v| !v.is_finite()) {
            return None;
        }

        Some(Self(Matrix3::new(
            h[0], h[1], h[2],
            h[3], h[4], h[5],
            h[6], h[7], 1.0,
        )))
    }

    /// The transform in the opposite direction, `None` if singular.
    pub fn inverse(&self) -> Option<Self> {
        self.0.try_inverse().map(Self)
    }

    /// Transform a point, `None` if it maps to infinity.
    pub fn apply(&self, point: &Point2<f64>) -> Option<Point2<f64>> {
        let p = self.0 * Vector3::new(point.x, point.y, 1.0);

        if p.z.abs() < MIN_HOMOGENEOUS_SCALE {
            return None;
        }

        Some(Point2::new(p.x / p.z, p.y / p.z))
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Warp `img` into a new image of the same size.
///
/// `dst_to_src` maps output pixel coordinates back into the source image (the inverse of the
/// camera-to-ground transform). Source samples are bilinearly interpolated and anything outside
/// the source reads as zero.
///
/// The visibility mask is the same warp applied to an all-ones image, rounded: a pixel is
/// visible when at least half of its interpolation weight lands inside the source.
pub fn warp_perspective(img: &RgbImage, dst_to_src: &Homography) -> Warped {
    let (width, height) = img.dimensions();

    let mut image = RgbImage::new(width, height);
    let mut visibility = Mask::from_elem((height as usize, width as usize), false);

    for row in 0..height {
        for col in 0..width {
            let src = match dst_to_src.apply(&Point2::new(col as f64, row as f64)) {
                Some(p) => p,
                None => continue,
            };

            let (px, coverage) = sample_bilinear(img, src.x, src.y);

            image.put_pixel(col, row, px);
            visibility[[row as usize, col as usize]] = coverage >= 0.5;
        }
    }

    Warped { image, visibility }
}

/// Bilinear sample of the image at a fractional position.
///
/// Returns the sampled pixel and the total weight of the neighbours which were inside the
/// image.
fn sample_bilinear(img: &RgbImage, x: f64, y: f64) -> (Rgb<u8>, f64) {
    let (width, height) = img.dimensions();

    if !x.is_finite() || !y.is_finite() {
        return (Rgb([0, 0, 0]), 0.0);
    }

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let mut acc = [0f64; 3];
    let mut coverage = 0f64;

    for (dx, dy, w) in [
        (0.0, 0.0, (1.0 - fx) * (1.0 - fy)),
        (1.0, 0.0, fx * (1.0 - fy)),
        (0.0, 1.0, (1.0 - fx) * fy),
        (1.0, 1.0, fx * fy),
    ]
    .iter()
    {
        let sx = x0 + dx;
        let sy = y0 + dy;

        if sx < 0.0 || sy < 0.0 || sx >= width as f64 || sy >= height as f64 || *w == 0.0 {
            continue;
        }

        let p = img.get_pixel(sx as u32, sy as u32).0;
        for c in 0..3 {
            acc[c] += w * p[c] as f64;
        }
        coverage += w;
    }

    let to_u8 = |v: f64| v.round().max(0.0).min(255.0) as u8;

    (Rgb([to_u8(acc[0]), to_u8(acc[1]), to_u8(acc[2])]), coverage)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const EPS: f64 = 1e-6;

    fn square() -> [Point2<f64>; 4] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_from_4pt_maps_points() {
        let src = [
            Point2::new(14.0, 140.0),
            Point2::new(301.0, 140.0),
            Point2::new(200.0, 96.0),
            Point2::new(118.0, 96.0),
        ];
        let dst = [
            Point2::new(155.0, 154.0),
            Point2::new(165.0, 154.0),
            Point2::new(165.0, 144.0),
            Point2::new(155.0, 144.0),
        ];

        let h = Homography::from_4pt(&src, &dst).unwrap();

        for (s, d) in src.iter().zip(dst.iter()) {
            let p = h.apply(s).unwrap();
            assert!((p - d).norm() < EPS, "{} mapped to {}, expected {}", s, p, d);
        }

        // The inverse takes us back
        let inv = h.inverse().unwrap();
        for (s, d) in src.iter().zip(dst.iter()) {
            let p = inv.apply(d).unwrap();
            assert!((p - s).norm() < EPS);
        }
    }

    #[test]
    fn test_from_4pt_degenerate() {
        let collinear = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 0.0),
        ];

        assert!(Homography::from_4pt(&collinear, &square()).is_none());
    }

    #[test]
    fn test_warp_identity() {
        let mut img = RgbImage::new(4, 3);
        img.put_pixel(1, 2, Rgb([10, 20, 30]));
        img.put_pixel(3, 0, Rgb([200, 100, 50]));

        let h = Homography::from_4pt(&square(), &square()).unwrap();
        let warped = warp_perspective(&img, &h);

        assert_eq!(warped.image, img);
        assert!(warped.visibility.iter().all(|&v| v));
    }

    #[test]
    fn test_warp_shift_out_of_view() {
        let img = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));

        // Output pixel (x, y) samples source (x + 2, y), so the right half falls off the source
        let shifted = [
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 1.0),
            Point2::new(2.0, 1.0),
        ];
        let h = Homography::from_4pt(&square(), &shifted).unwrap();
        let warped = warp_perspective(&img, &h);

        assert!(warped.visibility[[0, 0]]);
        assert!(warped.visibility[[3, 1]]);
        assert!(!warped.visibility[[0, 2]]);
        assert!(!warped.visibility[[3, 3]]);
        assert_eq!(*warped.image.get_pixel(1, 1), Rgb([255, 255, 255]));
        assert_eq!(*warped.image.get_pixel(2, 1), Rgb([0, 0, 0]));
    }
}
