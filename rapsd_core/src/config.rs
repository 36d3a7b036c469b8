//! RAPSD configuration via TOML files.
//!
//! Missing sections and keys fall back to defaults: the `u10`/`v10` wind
//! components, reduction on, sequential processing.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RapsdResult;
use crate::field::FieldSource;
use crate::rapsd::{compute_rapsd, compute_rapsd_par, RapsdOutput};
use crate::variables::VariableMap;

/// Analysis settings loaded from TOML.
///
/// # Examples
///
/// ```
/// use rapsd_core::RapsdConfig;
///
/// let config = RapsdConfig::from_str(
///     "[rapsd]\nreduce = false\n\n[rapsd.variables]\nt2m = 2\n",
/// )
/// .unwrap();
/// assert!(!config.reduce);
/// assert_eq!(config.variables.index_of("t2m"), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RapsdConfig {
    /// Variable name → index along the sample's variable axis
    pub variables: VariableMap,
    /// Average spectra across samples instead of returning each one
    pub reduce: bool,
    /// Process samples on the rayon pool
    pub parallel: bool,
}

impl RapsdConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;
        Self::try_from(raw.rapsd)
    }

    fn try_from(raw: RawRapsd) -> Result<Self, ConfigError> {
        let variables = match raw.variables {
            Some(variables) if variables.is_empty() => {
                return Err(ConfigError::Parse(
                    "rapsd.variables must name at least one variable".into(),
                ))
            }
            Some(variables) => variables,
            None => VariableMap::default(),
        };

        Ok(Self {
            variables,
            reduce: raw.reduce,
            parallel: raw.parallel,
        })
    }

    /// Run the aggregation with these settings.
    pub fn compute<S>(&self, samples: &[S]) -> RapsdResult<RapsdOutput>
    where
        S: FieldSource + Sync,
    {
        if self.parallel {
            compute_rapsd_par(samples, &self.variables, self.reduce)
        } else {
            compute_rapsd(samples, &self.variables, self.reduce)
        }
    }
}

impl Default for RapsdConfig {
    fn default() -> Self {
        Self {
            variables: VariableMap::default(),
            reduce: default_reduce(),
            parallel: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    rapsd: RawRapsd,
}

#[derive(Debug, Deserialize)]
struct RawRapsd {
    #[serde(default = "default_reduce")]
    reduce: bool,
    #[serde(default)]
    parallel: bool,
    #[serde(default)]
    variables: Option<VariableMap>,
}

impl Default for RawRapsd {
    fn default() -> Self {
        Self {
            reduce: default_reduce(),
            parallel: false,
            variables: None,
        }
    }
}

fn default_reduce() -> bool {
    true
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}
