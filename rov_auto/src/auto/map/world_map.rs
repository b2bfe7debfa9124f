//! # World Map

// ------------------------------------------------------------------------------------------------
// INCLUDES
// ------------------------------------------------------------------------------------------------

use image::{Rgb, RgbImage};
use ndarray::{s, Array3, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::auto::geom::WorldCell;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// All layers in a [`WorldMap`], in storage order
const LAYERS: [WorldMapLayer; 2] = [WorldMapLayer::Navigable, WorldMapLayer::Sample];

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Square grid accumulating observations over the mission.
///
/// Cells are only ever incremented, never overwritten or reset.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldMap {
    /// Number of cells along each side of the map
    size: usize,

    /// Observation counts, dimension order layer, y cell, x cell
    data: Array3<u32>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Possible layers in a [`WorldMap`]
#[derive(PartialEq, Eq, Clone, Copy, Hash, Debug, Serialize, Deserialize)]
pub enum WorldMapLayer {
    /// Number of times the cell was seen as navigable terrain
    Navigable,

    /// Number of times a sample was seen in the cell
    Sample,
}

#[derive(Debug, thiserror::Error)]
pub enum WorldMapError {
    #[error("Requested cell ({0}, {1}) is outside the map")]
    OutsideMap(usize, usize),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl WorldMap {
    /// Create a new empty map of `size` by `size` cells.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: Array3::zeros((LAYERS.len(), size, size)),
        }
    }

    /// Increment the given layer once for every cell in `cells`.
    ///
    /// A cell appearing several times is incremented several times. Cells must already have been
    /// clamped onto the map (see [`crate::auto::geom::pix_to_world`]), any that aren't are
    /// ignored.
    pub fn accumulate(&mut self, layer: WorldMapLayer, cells: &[WorldCell]) {
        let mut view = self.data.slice_mut(s![layer.index(), .., ..]);

        for &(x, y) in cells {
            if let Some(count) = view.get_mut([y, x]) {
                *count = count.saturating_add(1);
            }
        }
    }

    /// Get the observation count of a cell.
    pub fn get(&self, layer: WorldMapLayer, cell: WorldCell) -> Result<u32, WorldMapError> {
        let (x, y) = cell;

        self.data
            .get([layer.index(), y, x])
            .copied()
            .ok_or(WorldMapError::OutsideMap(x, y))
    }

    /// View of a whole layer, indexed `[y, x]`.
    pub fn layer(&self, layer: WorldMapLayer) -> ArrayView2<'_, u32> {
        self.data.slice(s![layer.index(), .., ..])
    }

    /// Number of cells in the layer which have been observed at least `min_count` times.
    pub fn num_observed(&self, layer: WorldMapLayer, min_count: u32) -> usize {
        self.layer(layer).iter().filter(|&&c| c >= min_count.max(1)).count()
    }

    /// Fraction of the whole map which has been observed as navigable at least once.
    pub fn navigable_fraction(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }

        self.num_observed(WorldMapLayer::Navigable, 1) as f64 / (self.size * self.size) as f64
    }

    /// Render the map as an image for display.
    ///
    /// Navigable cells are drawn in the blue channel and sample cells in the green channel. The
    /// image is flipped vertically so that world Y increases upwards.
    pub fn snapshot(&self) -> RgbImage {
        let nav = self.layer(WorldMapLayer::Navigable);
        let sample = self.layer(WorldMapLayer::Sample);
        let size = self.size as u32;

        RgbImage::from_fn(size, size, |col, row| {
            let y = (size - 1 - row) as usize;
            let x = col as usize;

            let g = if sample[[y, x]] > 0 { 255 } else { 0 };
            let b = if nav[[y, x]] > 0 { 255 } else { 0 };

            Rgb([0, g, b])
        })
    }
}

impl WorldMapLayer {
    fn index(&self) -> usize {
        match self {
            WorldMapLayer::Navigable => 0,
            WorldMapLayer::Sample => 1,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
