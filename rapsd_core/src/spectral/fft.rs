//! 2D Fourier transform and power spectrum of a single field slice.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rustfft::{num_complex::Complex, FftPlanner};

/// Compute the power spectrum of a 2D real field, flattened row-major.
///
/// Runs a full complex DFT along rows then columns and returns `|F|²` for
/// every frequency cell, in the same order as the input cells. Non-finite
/// values propagate through the transform.
///
/// # Example
/// ```
/// # use ndarray::Array2;
/// # use rapsd_core::spectral::calculate_2dft;
/// let mut field = Array2::<f64>::zeros((4, 4));
/// field[[0, 0]] = 1.0;
/// let power = calculate_2dft(field.view());
/// assert_eq!(power.len(), 16);
/// assert!(power.iter().all(|&p| (p - 1.0).abs() < 1e-12));
/// ```
pub fn calculate_2dft(field: ArrayView2<'_, f64>) -> Array1<f64> {
    let spectrum = compute_2d_fft(field);
    spectrum.iter().map(|c| c.norm_sqr()).collect()
}

/// Complex 2D DFT of a real-valued 2D array.
pub(crate) fn compute_2d_fft(data: ArrayView2<'_, f64>) -> Array2<Complex<f64>> {
    let (rows, cols) = data.dim();
    let mut spectrum: Array2<Complex<f64>> = data.mapv(|x| Complex::new(x, 0.0));
    if rows == 0 || cols == 0 {
        return spectrum;
    }

    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft_forward(cols);
    let fft_col = planner.plan_fft_forward(rows);

    let mut buffer = vec![Complex::new(0.0, 0.0); rows.max(cols)];

    // FFT along rows
    for mut row in spectrum.axis_iter_mut(Axis(0)) {
        let lane = &mut buffer[..cols];
        for (dst, src) in lane.iter_mut().zip(row.iter()) {
            *dst = *src;
        }
        fft_row.process(lane);
        row.iter_mut().zip(lane.iter()).for_each(|(dst, src)| *dst = *src);
    }

    // FFT along columns
    for mut col in spectrum.axis_iter_mut(Axis(1)) {
        let lane = &mut buffer[..rows];
        for (dst, src) in lane.iter_mut().zip(col.iter()) {
            *dst = *src;
        }
        fft_col.process(lane);
        col.iter_mut().zip(lane.iter()).for_each(|(dst, src)| *dst = *src);
    }

    spectrum
}
