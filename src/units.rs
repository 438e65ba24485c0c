//! Typed arguments for profile transformations.
//!
//! Rotation angles and shears are small value types rather than bare floats,
//! so a caller cannot pass a degree value where radians are expected or a
//! distortion where a reduced shear is required.

use nalgebra::Matrix2;

use crate::error::Error;

/// A rotation angle, counter-clockwise positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle {
    radians: f64,
}

impl Angle {
    /// Create an angle from radians.
    pub fn from_radians(radians: f64) -> Self {
        Self { radians }
    }

    /// Create an angle from degrees.
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            radians: degrees.to_radians(),
        }
    }

    /// Angle in radians.
    pub fn radians(&self) -> f64 {
        self.radians
    }

    /// Rotation matrix for this angle.
    pub fn rotation_matrix(&self) -> Matrix2<f64> {
        let (s, c) = self.radians.sin_cos();
        Matrix2::new(c, -s, s, c)
    }
}

/// A reduced shear `(g1, g2)` with `g1^2 + g2^2 < 1`.
///
/// The associated coordinate transformation is area-preserving (unit
/// determinant), so shearing a correlation function leaves its zero-lag
/// variance unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shear {
    g1: f64,
    g2: f64,
}

impl Shear {
    /// Create a reduced shear. Fails if the magnitude is not below 1.
    pub fn new(g1: f64, g2: f64) -> Result<Self, Error> {
        let gsq = g1 * g1 + g2 * g2;
        if !gsq.is_finite() || gsq >= 1.0 {
            return Err(Error::InvalidInput(format!(
                "reduced shear magnitude must satisfy |g| < 1, got |g| = {}",
                gsq.sqrt()
            )));
        }
        Ok(Self { g1, g2 })
    }

    /// First shear component.
    pub fn g1(&self) -> f64 {
        self.g1
    }

    /// Second shear component.
    pub fn g2(&self) -> f64 {
        self.g2
    }

    /// The unit-determinant coordinate transformation matrix for this shear.
    pub fn transform_matrix(&self) -> Matrix2<f64> {
        let norm = 1.0 / (1.0 - self.g1 * self.g1 - self.g2 * self.g2).sqrt();
        Matrix2::new(
            norm * (1.0 + self.g1),
            norm * self.g2,
            norm * self.g2,
            norm * (1.0 - self.g1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_angle_degrees_to_radians() {
        assert_relative_eq!(Angle::from_degrees(180.0).radians(), std::f64::consts::PI);
    }

    #[test]
    fn test_rotation_matrix_quarter_turn() {
        let m = Angle::from_degrees(90.0).rotation_matrix();
        assert_relative_eq!(m[(0, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(m[(0, 1)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(m[(1, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(m[(1, 1)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shear_matrix_unit_determinant() {
        let s = Shear::new(0.3, -0.2).unwrap();
        let m = s.transform_matrix();
        assert_relative_eq!(m.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shear_magnitude_validated() {
        assert!(Shear::new(0.8, 0.7).is_err());
        assert!(Shear::new(1.0, 0.0).is_err());
        assert!(Shear::new(0.0, f64::NAN).is_err());
        assert!(Shear::new(0.99, 0.0).is_ok());
    }
}
