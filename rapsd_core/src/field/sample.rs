use std::fmt::{self, Display};

use ndarray::{Array3, ArrayView2, ArrayView3, Axis, CowArray, Ix3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RapsdError, RapsdResult};

/// Anything that can hand the pipeline a `(variables, H, W)` host array.
///
/// This is the conversion boundary for samples produced elsewhere (model
/// output, reference archives): implementors expose their shape and a
/// host-resident `f64` copy or borrow.
pub trait FieldSource {
    /// Shape as `(variables, rows, cols)`.
    fn shape(&self) -> (usize, usize, usize);

    /// Host-resident `f64` data, borrowed when no conversion is needed.
    fn to_host(&self) -> CowArray<'_, f64, Ix3>;
}

impl FieldSource for Array3<f64> {
    fn shape(&self) -> (usize, usize, usize) {
        self.dim()
    }

    fn to_host(&self) -> CowArray<'_, f64, Ix3> {
        CowArray::from(self.view())
    }
}

impl FieldSource for Array3<f32> {
    fn shape(&self) -> (usize, usize, usize) {
        self.dim()
    }

    fn to_host(&self) -> CowArray<'_, f64, Ix3> {
        CowArray::from(self.mapv(f64::from))
    }
}

impl<'a> FieldSource for ArrayView3<'a, f64> {
    fn shape(&self) -> (usize, usize, usize) {
        self.dim()
    }

    fn to_host(&self) -> CowArray<'_, f64, Ix3> {
        CowArray::from(self.view())
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn shape(&self) -> (usize, usize, usize) {
        (**self).shape()
    }

    fn to_host(&self) -> CowArray<'_, f64, Ix3> {
        (**self).to_host()
    }
}

/// A multi-variable gridded field, shape `(variables, N, N)`.
///
/// # Examples
///
/// ```
/// use rapsd_core::FieldSample;
///
/// let sample = FieldSample::from_seed(7, 2, 32);
/// assert_eq!(sample.shape(), (2, 32, 32));
/// assert_eq!(sample.spatial_dim(), 32);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSample {
    /// Values as a 3D array: [variables, rows, cols]
    pub data: Array3<f64>,
}

impl FieldSample {
    /// Creates a zero-valued sample.
    pub fn zeros(variables: usize, n: usize) -> Self {
        Self {
            data: Array3::zeros((variables, n, n)),
        }
    }

    /// Wraps an existing array, checking it has variables and square spatial axes.
    pub fn from_array(data: Array3<f64>) -> RapsdResult<Self> {
        let (variables, rows, cols) = data.dim();
        if variables == 0 {
            return Err(RapsdError::invalid_shape(
                "field sample",
                "variable axis is empty",
            ));
        }
        if rows != cols {
            return Err(RapsdError::invalid_shape(
                "field sample",
                format!("spatial dimensions must be square, got {rows}x{cols}"),
            ));
        }
        Ok(Self { data })
    }

    /// Creates a deterministic pseudo-random sample in `[-1, 1]`.
    ///
    /// Uses a linear congruential generator so the same seed always produces
    /// the same field.
    pub fn from_seed(seed: u64, variables: usize, n: usize) -> Self {
        let mut sample = Self::zeros(variables, n);
        let state = if seed == 0 { 1 } else { seed };

        if let Some(values) = sample.data.as_slice_mut() {
            values.par_iter_mut().enumerate().for_each(|(idx, value)| {
                let step = lcg(lcg(idx as u64 ^ state).wrapping_add(state));
                *value = normalized(step).mul_add(2.0, -1.0);
            });
        }

        sample
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Number of entries on the variable axis
    pub fn variables(&self) -> usize {
        self.data.dim().0
    }

    /// Size of the last spatial axis
    pub fn spatial_dim(&self) -> usize {
        self.data.dim().2
    }

    /// 2D slice for one variable, if the index exists.
    pub fn variable(&self, index: usize) -> Option<ArrayView2<'_, f64>> {
        (index < self.variables()).then(|| self.data.index_axis(Axis(0), index))
    }

    pub fn statistics(&self) -> FieldStatistics {
        let count = self.data.len();
        if count == 0 {
            return FieldStatistics::default();
        }

        let mean = match self.data.as_slice() {
            Some(slice) => slice.par_iter().sum::<f64>() / count as f64,
            None => self.data.iter().sum::<f64>() / count as f64,
        };
        let variance = self
            .data
            .iter()
            .map(|value| {
                let diff = value - mean;
                diff * diff
            })
            .sum::<f64>()
            / count as f64;

        FieldStatistics { mean, variance }
    }
}

impl FieldSource for FieldSample {
    fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    fn to_host(&self) -> CowArray<'_, f64, Ix3> {
        CowArray::from(self.data.view())
    }
}

impl Display for FieldSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.statistics();
        let (variables, rows, cols) = self.data.dim();
        write!(
            f,
            "FieldSample {}x{}x{} mean={:.4} variance={:.5}",
            variables, rows, cols, stats.mean, stats.variance,
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Default)]
pub struct FieldStatistics {
    pub mean: f64,
    pub variance: f64,
}

fn lcg(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

fn normalized(value: u64) -> f64 {
    let fraction = (value >> 32) as f64 / u32::MAX as f64;
    fraction.clamp(0.0, 1.0)
}
