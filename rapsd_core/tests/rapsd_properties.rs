use std::f64::consts::PI;

use ndarray::{Array1, Array2, Array3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rapsd_core::{
    calculate_2dft, compute_rapsd, define_wavenumbers, get_mean_bins, FieldSample, RapsdError,
    VariableMap,
};

fn random_sample(seed: u64, variables: usize, n: usize) -> Array3<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array3::from_shape_fn((variables, n, n), |_| rng.gen_range(-1.0..1.0))
}

fn single_spectrum(sample: &Array3<f64>, var_idx: usize) -> Array1<f64> {
    let knrm = define_wavenumbers(sample.dim().2);
    get_mean_bins(sample, var_idx, &knrm).unwrap().values
}

fn assert_close(a: &Array1<f64>, b: &Array1<f64>, tol: f64) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!(
            (x - y).abs() <= tol * x.abs().max(1.0),
            "{x} vs {y} differ by more than {tol}"
        );
    }
}

#[test]
fn wavenumber_grid_matches_power_spectrum_length() {
    for n in [2usize, 3, 4, 7, 16, 33] {
        let field = Array2::<f64>::zeros((n, n));
        assert_eq!(define_wavenumbers(n).len(), n * n);
        assert_eq!(calculate_2dft(field.view()).len(), n * n);
    }
}

#[test]
fn bin_centers_count_is_half_the_width() {
    for n in 2usize..=12 {
        let sample = random_sample(n as u64, 1, n);
        let knrm = define_wavenumbers(n);
        let spectrum = get_mean_bins(&sample, 0, &knrm).unwrap();
        assert_eq!(spectrum.kvals.len(), n / 2);
        assert_eq!(spectrum.values.len(), n / 2);
        let expected: Vec<f64> = (1..=n / 2).map(|k| k as f64).collect();
        assert_eq!(spectrum.kvals.to_vec(), expected);
    }
}

#[test]
fn constant_field_has_no_power_outside_dc() {
    let sample = Array3::from_elem((1, 8, 8), 3.5);
    let spectrum = single_spectrum(&sample, 0);
    assert_eq!(spectrum.len(), 4);
    for &value in spectrum.iter() {
        assert!(!value.is_nan());
        assert!(value.abs() < 1e-18);
    }
}

#[test]
fn unit_impulse_gives_area_normalised_constant() {
    let mut sample = Array3::<f64>::zeros((2, 4, 4));
    sample[[0, 0, 0]] = 1.0;
    sample[[1, 0, 0]] = 1.0;

    let power = calculate_2dft(sample.index_axis(ndarray::Axis(0), 0));
    assert!(power.iter().all(|&p| (p - 1.0).abs() < 1e-12));

    let out = compute_rapsd(vec![sample], &VariableMap::default(), true).unwrap();
    assert_eq!(out.k().to_vec(), vec![1.0, 2.0]);
    let u10 = out.reduced("u10").unwrap();
    assert!((u10[0] - 2.0 * PI).abs() < 1e-12);
    assert!((u10[1] - 4.0 * PI).abs() < 1e-12);
}

#[test]
fn plane_wave_energy_lands_in_its_annulus() {
    let n = 16;
    let sample = Array3::from_shape_fn((1, n, n), |(_, _, j)| {
        (2.0 * PI * 3.0 * j as f64 / n as f64).cos()
    });
    let spectrum = single_spectrum(&sample, 0);
    let peak = spectrum[2];
    assert!(peak > 0.0);
    for (bin, &value) in spectrum.iter().enumerate() {
        if bin != 2 {
            assert!(value.abs() < 1e-12 * peak, "bin {bin} has {value}");
        }
    }
}

#[test]
fn reducing_identical_samples_equals_single_result() {
    let sample = random_sample(11, 2, 16);
    let samples = vec![sample.clone(); 5];
    let out = compute_rapsd(&samples, &VariableMap::default(), true).unwrap();
    assert_eq!(out.reduced("u10").unwrap(), &single_spectrum(&sample, 0));
    assert_eq!(out.reduced("v10").unwrap(), &single_spectrum(&sample, 1));
}

#[test]
fn unreduced_returns_one_spectrum_per_sample() {
    let samples: Vec<_> = (0..4).map(|seed| random_sample(seed, 2, 12)).collect();
    let out = compute_rapsd(&samples, &VariableMap::default(), false).unwrap();
    for (name, var_idx) in [("u10", 0), ("v10", 1)] {
        let spectra = out.per_sample(name).unwrap();
        assert_eq!(spectra.len(), samples.len());
        for (spectrum, sample) in spectra.iter().zip(&samples) {
            assert_eq!(spectrum, &single_spectrum(sample, var_idx));
        }
    }
}

#[test]
fn reduced_result_is_mean_of_sample_spectra() {
    let a = random_sample(1, 2, 16);
    let b = random_sample(2, 2, 16);
    let out = compute_rapsd([&a, &b], &VariableMap::default(), true).unwrap();
    let expected = (single_spectrum(&a, 1) + single_spectrum(&b, 1)) / 2.0;
    assert_close(out.reduced("v10").unwrap(), &expected, 1e-12);
}

#[test]
fn reduction_is_order_independent() {
    let samples: Vec<_> = (0..5).map(|seed| random_sample(seed, 2, 10)).collect();
    let mut reversed = samples.clone();
    reversed.reverse();
    let vars = VariableMap::default();
    let forward = compute_rapsd(&samples, &vars, true).unwrap();
    let backward = compute_rapsd(&reversed, &vars, true).unwrap();
    assert_close(
        forward.reduced("u10").unwrap(),
        backward.reduced("u10").unwrap(),
        1e-12,
    );
}

#[test]
fn lazy_sequences_are_consumed() {
    let samples = (0..3u64).map(|seed| FieldSample::from_seed(seed, 2, 8));
    let out = compute_rapsd(samples, &VariableMap::default(), false).unwrap();
    assert_eq!(out.per_sample("u10").unwrap().len(), 3);
}

#[test]
fn f32_samples_match_f64_samples() {
    let mut rng = StdRng::seed_from_u64(5);
    let single = Array3::<f32>::from_shape_fn((2, 8, 8), |_| rng.gen_range(-1.0f32..1.0));
    let double = single.mapv(f64::from);
    let vars = VariableMap::default();
    let from_f32 = compute_rapsd(vec![single], &vars, true).unwrap();
    let from_f64 = compute_rapsd(vec![double], &vars, true).unwrap();
    assert_eq!(from_f32, from_f64);
}

#[test]
fn odd_sizes_truncate_bins() {
    let sample = random_sample(3, 1, 5);
    let knrm = define_wavenumbers(5);
    let spectrum = get_mean_bins(&sample, 0, &knrm).unwrap();
    assert_eq!(spectrum.kvals.to_vec(), vec![1.0, 2.0]);
    assert!(spectrum.values.iter().all(|v| v.is_finite()));
}

#[test]
fn nan_values_propagate_into_bins() {
    let mut sample = random_sample(9, 1, 8);
    sample[[0, 3, 3]] = f64::NAN;
    let spectrum = single_spectrum(&sample, 0);
    assert!(spectrum.iter().all(|v| v.is_nan()));
}

#[test]
fn empty_sequence_is_invalid_input() {
    let err = compute_rapsd(Vec::<FieldSample>::new(), &VariableMap::default(), true)
        .unwrap_err();
    assert_eq!(err, RapsdError::EmptySequence);
    assert!(err.to_string().starts_with("Invalid input"));
}

#[test]
fn non_square_samples_are_invalid_input() {
    let sample = Array3::<f64>::zeros((2, 8, 4));
    let err = compute_rapsd(vec![sample], &VariableMap::default(), true).unwrap_err();
    assert!(matches!(err, RapsdError::DimensionMismatch { .. }));
}
