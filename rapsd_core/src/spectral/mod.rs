//! Spectral analysis of gridded fields.
//!
//! The pieces compose into the radially averaged power spectral density:
//! a 2D transform gives the power at every frequency cell, the wavenumber grid
//! gives each cell's radial frequency, and binning averages power over
//! concentric annuli.

pub mod accumulate;
pub mod binning;
pub mod fft;
pub mod wavenumber;

pub use accumulate::{compensated_mean, compensated_sum};
pub use binning::{bin_centers, binned_mean, get_mean_bins, radial_bin_edges, RadialSpectrum};
pub use fft::calculate_2dft;
pub use wavenumber::{define_wavenumbers, fft_wavenumbers};
