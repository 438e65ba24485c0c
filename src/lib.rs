//! Correlated pixel noise estimation and synthesis for astronomical images.
//!
//! This crate estimates 2D noise correlation functions empirically from pixel
//! buffers and synthesizes new Gaussian noise realizations with matching
//! correlation structure, using FFT-based power spectrum methods
//! (Wiener-Khinchin). Typical use is reproducing the correlated background
//! noise of real survey imaging in simulated frames.
//!
//! The central type is [`CorrelationFunction`]: estimate one from an image,
//! optionally transform it (shear, rotation, magnification, variance
//! scaling), then apply noise with that correlation structure to target
//! images. Square-root power spectra are cached per target shape and pixel
//! scale, so repeated applications to same-sized images cost a single FFT
//! pair each.

pub mod algo;
pub mod corrfunc;
pub mod error;
pub mod image;
pub mod profile;
pub mod units;

// Re-exports for easier access
pub use corrfunc::{estimate_correlation, CorrelationFunction, NoiseOptions};
pub use error::Error;
pub use image::Image;
pub use profile::InterpolatedProfile;
pub use units::{Angle, Shear};

pub use algo::interp::Interpolant;
