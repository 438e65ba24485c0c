//! 2D FFT wrappers and cyclic array shifts.
//!
//! Forward transforms are unnormalized and the inverse carries the full
//! `1/(rows*cols)` factor, matching the NumPy `fft2`/`ifft2` convention that
//! the correlation-function normalization constants in this crate assume.

use ndarray::Array2;
use rustfft::{num_complex::Complex64, FftPlanner};

/// Apply a planned 1D FFT along every row, then every column.
fn transform_rows_then_cols(data: &mut Array2<Complex64>, forward: bool) {
    let (rows, cols) = data.dim();
    if rows == 0 || cols == 0 {
        return;
    }

    let mut planner = FftPlanner::new();

    let row_fft = if forward {
        planner.plan_fft_forward(cols)
    } else {
        planner.plan_fft_inverse(cols)
    };
    let mut scratch = vec![Complex64::new(0.0, 0.0); cols.max(rows)];
    for mut row in data.rows_mut() {
        scratch[..cols].copy_from_slice(row.as_slice().expect("row-major layout"));
        row_fft.process(&mut scratch[..cols]);
        row.as_slice_mut()
            .expect("row-major layout")
            .copy_from_slice(&scratch[..cols]);
    }

    let col_fft = if forward {
        planner.plan_fft_forward(rows)
    } else {
        planner.plan_fft_inverse(rows)
    };
    for j in 0..cols {
        for i in 0..rows {
            scratch[i] = data[[i, j]];
        }
        col_fft.process(&mut scratch[..rows]);
        for i in 0..rows {
            data[[i, j]] = scratch[i];
        }
    }
}

/// Forward 2D DFT of a complex array (unnormalized).
pub fn fft2(input: &Array2<Complex64>) -> Array2<Complex64> {
    let mut out = input.clone();
    transform_rows_then_cols(&mut out, true);
    out
}

/// Inverse 2D DFT, normalized by `1/(rows*cols)`.
pub fn ifft2(input: &Array2<Complex64>) -> Array2<Complex64> {
    let mut out = input.clone();
    transform_rows_then_cols(&mut out, false);
    let n = (out.nrows() * out.ncols()) as f64;
    if n > 0.0 {
        out.mapv_inplace(|c| c / n);
    }
    out
}

/// Promote a real array to complex for transforming.
pub fn to_complex(input: &Array2<f64>) -> Array2<Complex64> {
    input.mapv(|v| Complex64::new(v, 0.0))
}

/// Cyclically shift an array by `(dy, dx)`, NumPy `roll` semantics: the value
/// at `[i, j]` moves to `[(i + dy) mod rows, (j + dx) mod cols]`.
pub fn roll2d(input: &Array2<f64>, shift: (isize, isize)) -> Array2<f64> {
    let (rows, cols) = input.dim();
    if rows == 0 || cols == 0 {
        return input.clone();
    }
    let mut out = Array2::zeros((rows, cols));
    for i in 0..rows {
        let ti = (i as isize + shift.0).rem_euclid(rows as isize) as usize;
        for j in 0..cols {
            let tj = (j as isize + shift.1).rem_euclid(cols as isize) as usize;
            out[[ti, tj]] = input[[i, j]];
        }
    }
    out
}
