//! Radial wavenumber grid matching the flattened power spectrum.

use ndarray::Array1;

/// Integer wavenumbers in FFT order for a transform of length `n`.
///
/// Equivalent to the sample frequencies scaled by `n`:
/// `0, 1, …, ⌈n/2⌉-1, -⌊n/2⌋, …, -1`.
pub fn fft_wavenumbers(n: usize) -> Vec<f64> {
    let positive = (n + 1) / 2;
    (0..n)
        .map(|i| {
            if i < positive {
                i as f64
            } else {
                i as f64 - n as f64
            }
        })
        .collect()
}

/// Radial wavenumber magnitude for every cell of an `hr_dim × hr_dim` grid.
///
/// Flattened row-major, so element `i * hr_dim + j` is `sqrt(k[j]² + k[i]²)`
/// and lines up with [`calculate_2dft`](super::calculate_2dft) output.
pub fn define_wavenumbers(hr_dim: usize) -> Array1<f64> {
    let kfreq = fft_wavenumbers(hr_dim);
    tracing::trace!(hr_dim, "building wavenumber grid");
    kfreq
        .iter()
        .flat_map(|&ky| kfreq.iter().map(move |&kx| (kx * kx + ky * ky).sqrt()))
        .collect()
}
