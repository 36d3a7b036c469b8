//! Radial binning of a power spectrum into half-integer annuli.

use std::f64::consts::PI;

use ndarray::{Array1, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::accumulate::compensated_mean;
use super::fft::calculate_2dft;
use crate::error::{RapsdError, RapsdResult};
use crate::field::FieldSource;

/// Decimal places used to decide whether a value sits on the outermost edge.
const EDGE_DECIMALS: i32 = 6;

/// Area-normalised radial spectrum of one variable slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialSpectrum {
    /// Mean power per annulus multiplied by the annulus area.
    pub values: Array1<f64>,
    /// Bin centres (wavenumbers 1, 2, …).
    pub kvals: Array1<f64>,
}

/// Bin edges `0.5, 1.5, …` up to `width / 2 + 0.5`.
pub fn radial_bin_edges(width: usize) -> Array1<f64> {
    let count = width / 2 + 1;
    Array1::from_iter((0..count).map(|i| 0.5 + i as f64))
}

/// Midpoints between consecutive edges.
pub fn bin_centers(edges: &Array1<f64>) -> Array1<f64> {
    edges
        .windows(2)
        .into_iter()
        .map(|pair| 0.5 * (pair[0] + pair[1]))
        .collect()
}

/// Mean of `values` grouped by `keys` into the bins described by `edges`.
///
/// Bin `i` covers `edges[i] <= key < edges[i + 1]`; the last bin also takes
/// keys equal to the outermost edge. Keys outside the edges are dropped and
/// bins that receive nothing are NaN.
pub fn binned_mean(
    keys: ArrayView1<'_, f64>,
    values: ArrayView1<'_, f64>,
    edges: &[f64],
) -> RapsdResult<Vec<f64>> {
    if keys.len() != values.len() {
        return Err(RapsdError::dimension_mismatch(
            keys.len(),
            values.len(),
            "binned statistic values",
        ));
    }
    if edges.len() < 2 {
        return Err(RapsdError::invalid_shape(
            "radial bins",
            format!("need at least two bin edges, got {}", edges.len()),
        ));
    }

    let nbins = edges.len() - 1;
    let last_edge = edges[nbins];
    let mut members: Vec<Vec<f64>> = vec![Vec::new(); nbins];

    for (&key, &value) in keys.iter().zip(values.iter()) {
        if let Some(bin) = locate_bin(key, edges, last_edge) {
            members[bin].push(value);
        }
    }

    Ok(members.iter().map(|m| compensated_mean(m)).collect())
}

fn locate_bin(key: f64, edges: &[f64], last_edge: f64) -> Option<usize> {
    if key.is_nan() || key < edges[0] {
        return None;
    }
    let nbins = edges.len() - 1;
    if key >= last_edge {
        return (round_to(key, EDGE_DECIMALS) == round_to(last_edge, EDGE_DECIMALS))
            .then_some(nbins - 1);
    }
    // first edge strictly greater than key, minus one
    let upper = edges.partition_point(|&edge| edge <= key);
    Some(upper - 1)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Radially binned, area-normalised power spectrum of one variable.
///
/// `knrm` must be the wavenumber grid for the sample's spatial size (see
/// [`define_wavenumbers`](super::define_wavenumbers)). Bins are built from the
/// last spatial axis.
pub fn get_mean_bins<S>(
    sample: &S,
    var_idx: usize,
    knrm: &Array1<f64>,
) -> RapsdResult<RadialSpectrum>
where
    S: FieldSource + ?Sized,
{
    let (variables, rows, width) = sample.shape();
    if var_idx >= variables {
        return Err(RapsdError::variable_out_of_range(
            format!("#{var_idx}"),
            var_idx,
            variables,
        ));
    }

    if rows * width != knrm.len() {
        return Err(RapsdError::dimension_mismatch(
            knrm.len(),
            rows * width,
            "wavenumber grid vs power spectrum",
        ));
    }

    let kbins = radial_bin_edges(width);
    if kbins.len() < 2 {
        return Err(RapsdError::invalid_shape(
            "radial bins",
            format!("spatial size {width} is too small for any radial bin"),
        ));
    }
    let kvals = bin_centers(&kbins);

    let host = sample.to_host();
    let power = calculate_2dft(host.index_axis(Axis(0), var_idx));
    let edges = kbins.to_vec();
    let means = binned_mean(knrm.view(), power.view(), &edges)?;
    Ok(normalise(means, &kbins, kvals))
}

fn normalise(means: Vec<f64>, kbins: &Array1<f64>, kvals: Array1<f64>) -> RadialSpectrum {
    let empty = means.iter().filter(|m| m.is_nan()).count();
    if empty > 0 {
        tracing::warn!(empty, bins = means.len(), "radial spectrum has NaN bins");
    }

    let values = means
        .into_iter()
        .zip(kbins.windows(2))
        .map(|(mean, pair)| mean * PI * (pair[1] * pair[1] - pair[0] * pair[0]))
        .collect();

    RadialSpectrum { values, kvals }
}
