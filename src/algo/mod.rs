//! Numerical routines shared across the crate.

pub mod fft;
pub mod interp;
