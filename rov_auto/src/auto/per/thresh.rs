//! Colour thresholding of the warped ground view

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use image::RgbImage;

use crate::auto::geom::Mask;

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Select pixels where every channel is strictly above the matching threshold.
///
/// Navigable terrain in the simulation is light sand, so this picks out the ground while
/// rejecting dark rock and sky.
pub fn color_thresh(img: &RgbImage, thresh_rgb: [u8; 3]) -> Mask {
    let (width, height) = img.dimensions();

    Mask::from_shape_fn((height as usize, width as usize), |(row, col)| {
        let px = img.get_pixel(col as u32, row as u32).0;

        px.iter().zip(thresh_rgb.iter()).all(|(&v, &t)| v > t)
    })
}

/// Select pixels where every channel lies inside the inclusive band `[low, high]`.
pub fn color_band(img: &RgbImage, low_rgb: [u8; 3], high_rgb: [u8; 3]) -> Mask {
    let (width, height) = img.dimensions();

    Mask::from_shape_fn((height as usize, width as usize), |(row, col)| {
        let px = img.get_pixel(col as u32, row as u32).0;

        (0..3).all(|i| px[i] >= low_rgb[i] && px[i] <= high_rgb[i])
    })
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_color_thresh_is_strict() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([161, 161, 161]));
        img.put_pixel(1, 0, Rgb([160, 200, 200]));
        img.put_pixel(2, 0, Rgb([255, 255, 10]));

        let mask = color_thresh(&img, [160, 160, 160]);

        assert_eq!(mask.dim(), (1, 3));
        assert!(mask[[0, 0]]);
        assert!(!mask[[0, 1]]);
        assert!(!mask[[0, 2]]);
    }

    #[test]
    fn test_color_band_is_inclusive() {
        let mut img = RgbImage::new(4, 1);
        img.put_pixel(0, 0, Rgb([110, 110, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 70]));
        img.put_pixel(2, 0, Rgb([200, 180, 71]));
        img.put_pixel(3, 0, Rgb([109, 200, 30]));

        let mask = color_band(&img, [110, 110, 0], [255, 255, 70]);

        assert!(mask[[0, 0]]);
        assert!(mask[[0, 1]]);
        assert!(!mask[[0, 2]]);
        assert!(!mask[[0, 3]]);
    }
}
