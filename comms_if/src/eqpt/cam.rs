//! # Camera Equipment Communications Module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use image::{DynamicImage, RgbImage};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A frame from the forward facing navigation camera.
///
/// Frames are immutable once captured, the autonomy only ever reads them.
#[derive(Debug, Clone)]
pub struct CamImage {
    /// UTC timestamp at which the frame was acquired
    pub timestamp: DateTime<Utc>,

    /// The image itself
    pub image: RgbImage
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CamImage {
    /// Wrap an RGB image acquired now.
    pub fn new(image: RgbImage) -> Self {
        Self {
            timestamp: Utc::now(),
            image
        }
    }

    /// Build a frame from any decoded image, converting it to 8-bit RGB.
    pub fn from_dynamic(image: DynamicImage, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            image: image.to_rgb8()
        }
    }

    /// Width of the frame in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the frame in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
