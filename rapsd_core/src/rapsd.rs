//! Aggregation of radial spectra across a sequence of field samples.

use indexmap::IndexMap;
use ndarray::Array1;
use rayon::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{RapsdError, RapsdResult};
use crate::field::FieldSource;
use crate::spectral::{compensated_mean, define_wavenumbers, get_mean_bins, RadialSpectrum};
use crate::variables::VariableMap;

/// Spectrum stored for one variable in a [`RapsdOutput`].
#[derive(Debug, Clone, PartialEq)]
pub enum VariableSpectrum {
    /// Element-wise mean over all samples
    Reduced(Array1<f64>),
    /// One spectrum per sample, in input order
    PerSample(Vec<Array1<f64>>),
}

impl VariableSpectrum {
    pub fn as_reduced(&self) -> Option<&Array1<f64>> {
        match self {
            VariableSpectrum::Reduced(values) => Some(values),
            VariableSpectrum::PerSample(_) => None,
        }
    }

    pub fn as_per_sample(&self) -> Option<&[Array1<f64>]> {
        match self {
            VariableSpectrum::Reduced(_) => None,
            VariableSpectrum::PerSample(values) => Some(values.as_slice()),
        }
    }
}

impl Serialize for VariableSpectrum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VariableSpectrum::Reduced(values) => serializer.collect_seq(values.iter()),
            VariableSpectrum::PerSample(values) => {
                serializer.collect_seq(values.iter().map(|v| v.to_vec()))
            }
        }
    }
}

/// Radially averaged power spectral density of a field sequence.
///
/// Holds the wavenumber axis `k` and one spectrum per variable, keyed in the
/// order of the [`VariableMap`] used to compute it. Serializes to a flat
/// object: `{"k": [...], "u10": [...], "v10": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct RapsdOutput {
    k: Array1<f64>,
    spectra: IndexMap<String, VariableSpectrum>,
}

impl RapsdOutput {
    /// Bin-centre wavenumbers of the last processed sample.
    pub fn k(&self) -> &Array1<f64> {
        &self.k
    }

    pub fn get(&self, name: &str) -> Option<&VariableSpectrum> {
        self.spectra.get(name)
    }

    pub fn reduced(&self, name: &str) -> Option<&Array1<f64>> {
        self.get(name).and_then(VariableSpectrum::as_reduced)
    }

    pub fn per_sample(&self, name: &str) -> Option<&[Array1<f64>]> {
        self.get(name).and_then(VariableSpectrum::as_per_sample)
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.spectra.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableSpectrum)> {
        self.spectra.iter().map(|(name, spectrum)| (name.as_str(), spectrum))
    }

    /// JSON rendering; NaN bins become `null`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for RapsdOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.spectra.len() + 1))?;
        map.serialize_entry("k", &self.k.to_vec())?;
        for (name, spectrum) in &self.spectra {
            map.serialize_entry(name, spectrum)?;
        }
        map.end()
    }
}

/// Compute the RAPSD of every variable over a sequence of samples.
///
/// The wavenumber grid is rebuilt from each sample's last axis, so samples of
/// different sizes are accepted; `k` then reflects only the last sample.
/// With `reduce` the per-sample spectra of each variable are averaged
/// element-wise, otherwise they are returned as-is.
///
/// # Errors
///
/// `EmptySequence` when no samples are supplied, plus any shape or variable
/// index error raised by [`get_mean_bins`].
///
/// # Example
/// ```
/// use rapsd_core::{compute_rapsd, FieldSample, VariableMap};
///
/// let samples = (0..3).map(|seed| FieldSample::from_seed(seed, 2, 16));
/// let rapsd = compute_rapsd(samples, &VariableMap::default(), true).unwrap();
/// assert_eq!(rapsd.k().len(), 8);
/// assert_eq!(rapsd.reduced("u10").unwrap().len(), 8);
/// ```
pub fn compute_rapsd<I>(hr_field: I, var_ref: &VariableMap, reduce: bool) -> RapsdResult<RapsdOutput>
where
    I: IntoIterator,
    I::Item: FieldSource,
{
    ensure_variables(var_ref)?;
    let mut collector = SpectraCollector::new(var_ref);
    for (index, sample) in hr_field.into_iter().enumerate() {
        let spectra = sample_spectra(&sample, var_ref, index)?;
        collector.push(spectra);
    }
    collector.finish(reduce)
}

/// Parallel [`compute_rapsd`] over a slice of samples.
///
/// Samples are processed on the rayon pool and collected in input order, so
/// the result matches the sequential computation.
pub fn compute_rapsd_par<S>(
    hr_field: &[S],
    var_ref: &VariableMap,
    reduce: bool,
) -> RapsdResult<RapsdOutput>
where
    S: FieldSource + Sync,
{
    ensure_variables(var_ref)?;
    let per_sample: Vec<SampleSpectra> = hr_field
        .par_iter()
        .enumerate()
        .map(|(index, sample)| sample_spectra(sample, var_ref, index))
        .collect::<RapsdResult<_>>()?;

    let mut collector = SpectraCollector::new(var_ref);
    for spectra in per_sample {
        collector.push(spectra);
    }
    collector.finish(reduce)
}

fn ensure_variables(var_ref: &VariableMap) -> RapsdResult<()> {
    if var_ref.is_empty() {
        return Err(RapsdError::invalid_shape(
            "variable map",
            "at least one variable is required",
        ));
    }
    Ok(())
}

struct SampleSpectra {
    width: usize,
    spectra: Vec<RadialSpectrum>,
}

fn sample_spectra<S>(sample: &S, var_ref: &VariableMap, index: usize) -> RapsdResult<SampleSpectra>
where
    S: FieldSource + ?Sized,
{
    let (variables, rows, width) = sample.shape();
    tracing::debug!(sample = index, variables, rows, width, "computing radial spectra");

    let host = sample.to_host();
    let view = host.view();

    let spectra = var_ref
        .iter()
        .map(|(name, var_idx)| {
            let knrm = define_wavenumbers(width);
            get_mean_bins(&view, var_idx, &knrm).map_err(|err| match err {
                RapsdError::VariableOutOfRange {
                    index, available, ..
                } => RapsdError::variable_out_of_range(name, index, available),
                other => other,
            })
        })
        .collect::<RapsdResult<Vec<_>>>()?;

    Ok(SampleSpectra { width, spectra })
}

struct SpectraCollector<'a> {
    var_ref: &'a VariableMap,
    per_variable: Vec<Vec<Array1<f64>>>,
    kvals: Option<Array1<f64>>,
    first_width: Option<usize>,
    mixed_widths: bool,
}

impl<'a> SpectraCollector<'a> {
    fn new(var_ref: &'a VariableMap) -> Self {
        Self {
            var_ref,
            per_variable: vec![Vec::new(); var_ref.len()],
            kvals: None,
            first_width: None,
            mixed_widths: false,
        }
    }

    fn push(&mut self, sample: SampleSpectra) {
        match self.first_width {
            None => self.first_width = Some(sample.width),
            Some(width) if width != sample.width => self.mixed_widths = true,
            Some(_) => {}
        }

        for (slot, spectrum) in self.per_variable.iter_mut().zip(sample.spectra) {
            slot.push(spectrum.values);
            self.kvals = Some(spectrum.kvals);
        }
    }

    fn finish(self, reduce: bool) -> RapsdResult<RapsdOutput> {
        let k = self.kvals.ok_or(RapsdError::EmptySequence)?;
        if self.mixed_widths {
            tracing::warn!(
                bins = k.len(),
                "samples have different spatial sizes; k reflects the last sample only"
            );
        }

        let mut spectra = IndexMap::with_capacity(self.var_ref.len());
        for (name, values) in self.var_ref.names().zip(self.per_variable) {
            let spectrum = if reduce {
                VariableSpectrum::Reduced(mean_across_samples(name, &values)?)
            } else {
                VariableSpectrum::PerSample(values)
            };
            spectra.insert(name.to_string(), spectrum);
        }

        Ok(RapsdOutput { k, spectra })
    }
}

/// Element-wise mean of equally sized spectra.
fn mean_across_samples(name: &str, values: &[Array1<f64>]) -> RapsdResult<Array1<f64>> {
    let Some(first) = values.first() else {
        return Err(RapsdError::EmptySequence);
    };
    let bins = first.len();
    if let Some(ragged) = values.iter().find(|v| v.len() != bins) {
        return Err(RapsdError::dimension_mismatch(
            bins,
            ragged.len(),
            format!("radial bin count of '{name}' across samples"),
        ));
    }

    let mut column = Vec::with_capacity(values.len());
    let mean = (0..bins)
        .map(|bin| {
            column.clear();
            column.extend(values.iter().map(|v| v[bin]));
            compensated_mean(&column)
        })
        .collect();
    Ok(mean)
}
