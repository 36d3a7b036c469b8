//! RAPSD Demo - compare a smoothed field against its noisy reference
//!
//! Loads `config/rapsd.toml` when present, otherwise uses the defaults.

use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rapsd_core::{ConfigError, RapsdConfig};

const GRID: usize = 64;
const SAMPLES: u64 = 8;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    println!(
        "Loaded config: variables={:?} reduce={} parallel={}",
        config.variables.names().collect::<Vec<_>>(),
        config.reduce,
        config.parallel
    );

    let variables = config
        .variables
        .iter()
        .map(|(_, idx)| idx + 1)
        .max()
        .unwrap_or(1);

    let reference: Vec<Array3<f64>> = (0..SAMPLES)
        .map(|seed| noisy_field(seed, variables))
        .collect();
    let generated: Vec<Array3<f64>> = reference.iter().map(box_smooth).collect();

    let reference_rapsd = config.compute(&reference)?;
    let generated_rapsd = config.compute(&generated)?;

    println!("{:>6} {:>10} {:>14} {:>14}", "k", "variable", "reference", "generated");
    for name in reference_rapsd.variables() {
        let (Some(reference_spectrum), Some(generated_spectrum)) = (
            reference_rapsd.reduced(name),
            generated_rapsd.reduced(name),
        ) else {
            println!("{name}: per-sample output, see JSON below");
            continue;
        };
        let rows = reference_rapsd
            .k()
            .iter()
            .zip(reference_spectrum)
            .zip(generated_spectrum)
            .step_by(4);
        for ((k, r), g) in rows {
            println!("{k:>6.1} {name:>10} {r:>14.4} {g:>14.4}");
        }
    }

    println!("{}", generated_rapsd.to_json()?);
    Ok(())
}

fn noisy_field(seed: u64, variables: usize) -> Array3<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array3::from_shape_fn((variables, GRID, GRID), |_| rng.gen_range(-1.0..1.0))
}

/// 3x3 periodic box filter: suppresses the high wavenumbers
fn box_smooth(field: &Array3<f64>) -> Array3<f64> {
    let (variables, rows, cols) = field.dim();
    Array3::from_shape_fn((variables, rows, cols), |(v, i, j)| {
        let mut acc = 0.0;
        for di in [rows - 1, 0, 1] {
            for dj in [cols - 1, 0, 1] {
                acc += field[[v, (i + di) % rows, (j + dj) % cols]];
            }
        }
        acc / 9.0
    })
}

fn load_config() -> Result<RapsdConfig, ConfigError> {
    RapsdConfig::load_from_file("config/rapsd.toml").or_else(|err| match err {
        ConfigError::Io(_) => {
            eprintln!("Falling back to default config: {err}");
            Ok(RapsdConfig::default())
        }
        parse => Err(parse),
    })
}
