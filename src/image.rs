//! Pixel buffers carrying image data and a physical pixel scale.
//!
//! Images are 2D `f64` arrays in matrix `[row, col]` = `[y, x]` indexing with
//! an attached pixel scale (physical units per pixel). A scale of zero (or
//! any non-positive value) means the scale is unset; operations that need one
//! fall back to a unit scale.

use ndarray::Array2;

/// A 2D pixel buffer with an associated pixel scale.
///
/// Owned by the caller; estimation borrows it immutably and noise synthesis
/// mutates it in place.
#[derive(Debug, Clone)]
pub struct Image {
    /// Pixel values, indexed `[y, x]`.
    pub data: Array2<f64>,
    /// Physical units per pixel; `<= 0` means unset.
    pub scale: f64,
}

impl Image {
    /// Wrap an existing pixel array with the given pixel scale.
    pub fn new(data: Array2<f64>, scale: f64) -> Self {
        Self { data, scale }
    }

    /// Create a zero-filled image of the given `(rows, cols)` shape.
    pub fn zeros(shape: (usize, usize), scale: f64) -> Self {
        Self {
            data: Array2::zeros(shape),
            scale,
        }
    }

    /// Image shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Whether the pixel scale has been set to a positive value.
    pub fn has_scale(&self) -> bool {
        self.scale > 0.0
    }

    /// Mean of all pixel values (0 for an empty image).
    pub fn mean(&self) -> f64 {
        self.data.mean().unwrap_or(0.0)
    }

    /// Population variance of all pixel values.
    pub fn variance(&self) -> f64 {
        let v = self.data.std(0.0);
        v * v
    }
}
