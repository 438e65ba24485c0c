//! Estimation of 2D noise correlation functions and synthesis of correlated
//! Gaussian noise fields.
//!
//! A [`CorrelationFunction`] is estimated from an image by the
//! Wiener-Khinchin route: FFT, power spectrum, inverse FFT. The resulting
//! autocorrelation array is re-centered and mirror-padded onto an
//! odd-dimensioned canonical grid whose center pixel is the zero-lag
//! variance, then wrapped in an interpolated profile so it can be sheared,
//! rotated, magnified and rescaled like any other profile.
//!
//! Noise application runs the spectrum the other way: the correlation
//! function is drawn at the target shape and scale, transformed to a
//! square-root power spectrum, and used to color a unit-variance Gaussian
//! field. Root spectra are cached per `(shape, scale)` on the instance, so
//! repeated applications to same-sized targets skip the draw and forward
//! FFT entirely.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::f64::consts::SQRT_2;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign};

use crate::algo::fft::{fft2, ifft2, roll2d, to_complex};
use crate::algo::interp::Interpolant;
use crate::error::Error;
use crate::image::Image;
use crate::profile::InterpolatedProfile;
use crate::units::{Angle, Shear};

/// One cached square-root power spectrum, valid for targets whose shape
/// equals the stored array's shape at the stored pixel scale.
#[derive(Debug, Clone)]
struct RootPsEntry {
    rootps: Array2<f64>,
    scale: f64,
}

/// Options controlling a single noise application.
#[derive(Debug, Clone, Copy)]
pub struct NoiseOptions {
    /// Pixel scale override for the target; `<= 0` means use the target
    /// image's own scale (or the profile's stored scale if that is unset).
    pub dx: f64,
    /// Add the realization into the target instead of overwriting it.
    pub add_to_image: bool,
}

impl Default for NoiseOptions {
    fn default() -> Self {
        Self {
            dx: 0.0,
            add_to_image: true,
        }
    }
}

/// A 2D noise correlation function estimated from an image.
///
/// Wraps a transformable profile whose canonical array has odd dimensions
/// with the zero-lag variance at its center, together with a per-instance
/// cache of square-root power spectra for noise synthesis.
///
/// Shift, flux access and photon shooting are not meaningful for a
/// correlation function; those methods exist but always fail with
/// [`Error::UnsupportedOperation`]. Scalar `*` and `/` scale the variance.
#[derive(Debug, Clone)]
pub struct CorrelationFunction {
    profile: InterpolatedProfile,
    rootps_store: Vec<RootPsEntry>,
}

/// Estimate the correlation function of an image's pixel noise using the
/// image's own pixel scale and the default (linear) interpolant.
pub fn estimate_correlation(image: &Image) -> Result<CorrelationFunction, Error> {
    CorrelationFunction::from_image(image, 0.0, None)
}

impl CorrelationFunction {
    /// Estimate a correlation function from `image`.
    ///
    /// `dx` overrides the image's pixel scale when positive; otherwise the
    /// image scale is used, falling back to 1 (with a logged warning) when
    /// that is unset too. `interpolant` defaults to separable linear with
    /// tolerance 1e-4.
    pub fn from_image(
        image: &Image,
        dx: f64,
        interpolant: Option<Interpolant>,
    ) -> Result<Self, Error> {
        let (rows, cols) = image.shape();
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidInput(
                "cannot estimate a correlation function from an empty image".to_string(),
            ));
        }
        let n = (rows * cols) as f64;

        // Power spectrum, then a preliminary correlation function.
        let ft = fft2(&to_complex(&image.data));
        let ps = ft.mapv(|c| c.norm_sqr());
        let cf_prelim = ifft2(&to_complex(&ps)).mapv(|c| c.re / n);

        // Re-center so the zero-lag value sits at the geometric center.
        let cf_prelim = roll2d(&cf_prelim, ((rows / 2) as isize, (cols / 2) as isize));

        // Canonical grid: both dimensions forced odd, with the preliminary
        // data in the lower-left block.
        let (can_rows, can_cols) = (1 + 2 * (rows / 2), 1 + 2 * (cols / 2));
        let mut canonical = Array2::<f64>::zeros((can_rows, can_cols));
        canonical
            .slice_mut(ndarray::s![..rows, ..cols])
            .assign(&cf_prelim);

        // Mirror-fill the padded edge to restore point symmetry. The column
        // comes first, reading from the already padded array, so an even-by-
        // even input picks up the corner value correctly.
        if cols % 2 == 0 {
            let lhs: Vec<f64> = canonical.column(0).to_vec();
            for (i, v) in lhs.into_iter().rev().enumerate() {
                canonical[[i, cols]] = v;
            }
        }
        if rows % 2 == 0 {
            let bottom: Vec<f64> = canonical.row(0).to_vec();
            for (j, v) in bottom.into_iter().rev().enumerate() {
                canonical[[rows, j]] = v;
            }
        }

        let scale = if dx > 0.0 {
            dx
        } else if image.has_scale() {
            image.scale
        } else {
            log::warn!("image has no pixel scale set; assuming unit scale for correlation function");
            1.0
        };

        let profile = InterpolatedProfile::from_table(
            canonical,
            scale,
            interpolant.unwrap_or_default(),
        )?;

        // Seed the spectral cache with the un-padded power spectrum so the
        // first noise application on a matching image needs no extra FFT.
        let rootps_store = vec![RootPsEntry {
            rootps: ps.mapv(f64::sqrt),
            scale,
        }];

        Ok(Self {
            profile,
            rootps_store,
        })
    }

    /// The wrapped transformable profile.
    pub fn profile(&self) -> &InterpolatedProfile {
        &self.profile
    }

    /// Zero-lag correlation, i.e. the total variance.
    pub fn variance(&self) -> f64 {
        self.profile.value_at(0.0, 0.0)
    }

    /// Evaluate the correlation function at separation `(x, y)`.
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        self.profile.value_at(x, y)
    }

    /// Render the correlation function into a `(rows, cols)` array at pixel
    /// scale `scale`, always surface-brightness normalized.
    pub fn draw(&self, shape: (usize, usize), scale: f64) -> Array2<f64> {
        self.profile.draw(shape, scale)
    }

    /// Number of cached square-root power spectra.
    pub fn cache_len(&self) -> usize {
        self.rootps_store.len()
    }

    /// Apply a noise realization with this correlation structure to `image`.
    ///
    /// The Gaussian field is drawn from `rng`, so two applications from
    /// identically-seeded generators produce identical noise. The cached
    /// whitening filter is reused whenever the target shape and scale match
    /// a previous application; otherwise the correlation function is drawn
    /// at the target geometry, transformed, and the new filter appended to
    /// the cache.
    pub fn apply_noise_to<R: Rng + ?Sized>(
        &mut self,
        image: &mut Image,
        opts: NoiseOptions,
        rng: &mut R,
    ) -> Result<(), Error> {
        let (rows, cols) = image.shape();
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidInput(
                "cannot apply noise to an empty image".to_string(),
            ));
        }
        let n = (rows * cols) as f64;

        // Legacy cache keying preserved verbatim: exact float comparison,
        // with "dx unset" matching only unit-scale entries.
        #[allow(clippy::float_cmp)]
        let hit = self.rootps_store.iter().position(|e| {
            e.rootps.dim() == (rows, cols)
                && ((opts.dx <= 0.0 && e.scale == 1.0) || opts.dx == e.scale)
        });

        let idx = match hit {
            Some(i) => i,
            None => {
                let scale = if opts.dx > 0.0 {
                    opts.dx
                } else if image.has_scale() {
                    image.scale
                } else {
                    self.profile.scale()
                };

                // Draw the correlation function at the target geometry, put
                // the zero-lag pixel at index (0, 0), and transform. Append
                // only once the whole filter is computed.
                let cf = self.profile.draw((rows, cols), scale);
                let rolled = roll2d(&cf, (-((rows / 2) as isize), -((cols / 2) as isize)));
                let rootps = fft2(&to_complex(&rolled)).mapv(|c| (c.norm() * n).sqrt());
                self.rootps_store.push(RootPsEntry { rootps, scale });
                self.rootps_store.len() - 1
            }
        };
        let rootps = &self.rootps_store[idx].rootps;

        // Color a unit-variance Gaussian field with the root spectrum. The
        // sqrt(2) factor compensates for keeping only the real component of
        // the complex realization; the imaginary part carries the other half
        // of the variance.
        let normal = Normal::new(0.0, 1.0).expect("unit normal parameters are valid");
        let gauss = Array2::from_shape_fn((rows, cols), |_| normal.sample(&mut *rng));

        let colored = &gauss * rootps;
        let noise = ifft2(&to_complex(&colored)).mapv(|c| SQRT_2 * c.re);

        if opts.add_to_image {
            image.data += &noise;
        } else {
            image.data.assign(&noise);
        }
        Ok(())
    }

    /// Seeded convenience wrapper around [`Self::apply_noise_to`]; a `None`
    /// seed draws one from the thread RNG.
    pub fn apply_noise_seeded(
        &mut self,
        image: &mut Image,
        opts: NoiseOptions,
        seed: Option<u64>,
    ) -> Result<(), Error> {
        let seed = seed.unwrap_or_else(|| thread_rng().next_u64());
        let mut rng = StdRng::seed_from_u64(seed);
        self.apply_noise_to(image, opts, &mut rng)
    }

    /// Multiply the total variance by `ratio`. A ratio of zero collapses to
    /// the zero-variance (constant) correlation function.
    pub fn scale_variance(&mut self, ratio: f64) -> Result<(), Error> {
        if ratio < 0.0 || !ratio.is_finite() {
            return Err(Error::InvalidInput(format!(
                "variance ratio must be finite and non-negative, got {ratio}"
            )));
        }
        self.profile.scale_amplitude(ratio);
        self.rootps_store.clear();
        Ok(())
    }

    /// Apply a reduced shear in place. Keeps the wrapper type, so noise
    /// application stays available afterwards.
    pub fn shear(&mut self, shear: Shear) {
        self.profile.shear(shear);
        self.rootps_store.clear();
    }

    /// Rotate in place, counter-clockwise positive.
    pub fn rotate(&mut self, theta: Angle) {
        self.profile.rotate(theta);
        self.rootps_store.clear();
    }

    /// Magnify linear dimensions by `scale` in place, implemented as a
    /// dilation with log-scale factor `ln(scale)`.
    pub fn magnify(&mut self, scale: f64) -> Result<(), Error> {
        if scale <= 0.0 || !scale.is_finite() {
            return Err(Error::InvalidInput(format!(
                "magnification must be finite and positive, got {scale}"
            )));
        }
        self.profile.dilate(scale.ln());
        self.rootps_store.clear();
        Ok(())
    }

    /// A sheared copy of this correlation function.
    pub fn sheared(&self, shear: Shear) -> Self {
        let mut out = self.clone();
        out.shear(shear);
        out
    }

    /// A rotated copy of this correlation function.
    pub fn rotated(&self, theta: Angle) -> Self {
        let mut out = self.clone();
        out.rotate(theta);
        out
    }

    /// A magnified copy of this correlation function.
    pub fn magnified(&self, scale: f64) -> Result<Self, Error> {
        let mut out = self.clone();
        out.magnify(scale)?;
        Ok(out)
    }

    // Capabilities below are deliberately disabled: they are physically
    // meaningless for a correlation function. Each fails fast with no
    // partial mutation.

    /// Translation is not meaningful for a correlation function.
    pub fn shift(&mut self, _dx: f64, _dy: f64) -> Result<(), Error> {
        Err(Error::UnsupportedOperation { operation: "shift" })
    }

    /// A correlation function has no flux; only pointwise amplitude matters.
    pub fn flux(&self) -> Result<f64, Error> {
        Err(Error::UnsupportedOperation { operation: "flux" })
    }

    /// A correlation function has no flux to set; use
    /// [`Self::scale_variance`] instead.
    pub fn set_flux(&mut self, _flux: f64) -> Result<(), Error> {
        Err(Error::UnsupportedOperation {
            operation: "set_flux",
        })
    }

    /// Stochastic (photon) sampling is not meaningful for a correlation
    /// function.
    pub fn draw_shoot(&self, _n_photons: u64) -> Result<Array2<f64>, Error> {
        Err(Error::UnsupportedOperation {
            operation: "draw_shoot",
        })
    }
}

// Correlation functions of independent noise fields combine additively, in
// both variance and cross terms.
impl Add<&CorrelationFunction> for &CorrelationFunction {
    type Output = CorrelationFunction;

    fn add(self, other: &CorrelationFunction) -> CorrelationFunction {
        CorrelationFunction {
            profile: self.profile.sum(&other.profile),
            rootps_store: Vec::new(),
        }
    }
}

impl AddAssign<&CorrelationFunction> for CorrelationFunction {
    fn add_assign(&mut self, other: &CorrelationFunction) {
        self.profile = self.profile.sum(&other.profile);
        self.rootps_store.clear();
    }
}

// Scalar multiplication and division are variance scaling, mirroring the
// original unchecked flux-scaling semantics; the validated entry point is
// `scale_variance`. Multiplying two correlation functions does not compile.
impl MulAssign<f64> for CorrelationFunction {
    fn mul_assign(&mut self, ratio: f64) {
        self.profile.scale_amplitude(ratio);
        self.rootps_store.clear();
    }
}

impl Mul<f64> for &CorrelationFunction {
    type Output = CorrelationFunction;

    fn mul(self, ratio: f64) -> CorrelationFunction {
        let mut out = self.clone();
        out *= ratio;
        out
    }
}

impl DivAssign<f64> for CorrelationFunction {
    fn div_assign(&mut self, ratio: f64) {
        *self *= 1.0 / ratio;
    }
}

impl Div<f64> for &CorrelationFunction {
    type Output = CorrelationFunction;

    fn div(self, ratio: f64) -> CorrelationFunction {
        let mut out = self.clone();
        out /= ratio;
        out
    }
}
