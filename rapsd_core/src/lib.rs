//! # RAPSD Core
//!
//! Radially averaged power spectral density (RAPSD) of gridded 2D fields,
//! used to compare the spectral energy of generated fields (for example
//! super-resolved 10 m winds) with reference data across spatial scales.
//!
//! ## Quick Start
//!
//! ```rust
//! use rapsd_core::{compute_rapsd, FieldSample, VariableMap};
//!
//! // Eight synthetic samples with u10 and v10 on a 32x32 grid
//! let samples: Vec<_> = (0..8).map(|seed| FieldSample::from_seed(seed, 2, 32)).collect();
//!
//! let rapsd = compute_rapsd(&samples, &VariableMap::default(), true).unwrap();
//! println!("k = {:?}", rapsd.k());
//! println!("u10 = {:?}", rapsd.reduced("u10"));
//! ```
//!
//! ## Core Modules
//!
//! - [`spectral`] - Transform, wavenumber grid and radial binning
//! - [`rapsd`] - Aggregation across a sequence of samples
//! - [`field`] - Field samples and the host-array conversion boundary
//! - [`config`] - Analysis settings via TOML

pub mod config;
pub mod error;
pub mod field;
pub mod rapsd;
pub mod spectral;
pub mod variables;

pub use config::{ConfigError, RapsdConfig};
pub use error::{RapsdError, RapsdResult};
pub use field::{FieldSample, FieldSource, FieldStatistics};
pub use rapsd::{compute_rapsd, compute_rapsd_par, RapsdOutput, VariableSpectrum};
pub use spectral::{calculate_2dft, define_wavenumbers, get_mean_bins, RadialSpectrum};
pub use variables::VariableMap;
