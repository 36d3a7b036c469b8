//! Error types for spectral analysis operations
//!
//! Every variant describes input the pipeline cannot work with. Empty radial
//! bins are not errors: they surface as NaN in the binned spectrum.

use std::fmt;

/// Result type alias for RAPSD operations
pub type RapsdResult<T> = Result<T, RapsdError>;

/// Error type for RAPSD operations
#[derive(Debug, Clone, PartialEq)]
pub enum RapsdError {
    /// Two lengths that must agree do not
    DimensionMismatch {
        expected: usize,
        got: usize,
        context: String,
    },

    /// Array shape cannot be processed
    InvalidShape { context: String, details: String },

    /// Variable index points past the sample's variable axis
    VariableOutOfRange {
        name: String,
        index: usize,
        available: usize,
    },

    /// No samples were supplied to an aggregation
    EmptySequence,
}

impl fmt::Display for RapsdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RapsdError::DimensionMismatch {
                expected,
                got,
                context,
            } => {
                write!(
                    f,
                    "Invalid input: dimension mismatch in {}: expected {}, got {}",
                    context, expected, got
                )
            }
            RapsdError::InvalidShape { context, details } => {
                write!(f, "Invalid input: bad shape for {}: {}", context, details)
            }
            RapsdError::VariableOutOfRange {
                name,
                index,
                available,
            } => {
                write!(
                    f,
                    "Invalid input: variable '{}' maps to index {} but the sample has {} variables",
                    name, index, available
                )
            }
            RapsdError::EmptySequence => {
                write!(
                    f,
                    "Invalid input: field sequence is empty, no wavenumber axis can be produced"
                )
            }
        }
    }
}

impl std::error::Error for RapsdError {}

impl RapsdError {
    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, got: usize, context: impl Into<String>) -> Self {
        RapsdError::DimensionMismatch {
            expected,
            got,
            context: context.into(),
        }
    }

    /// Create an invalid shape error
    pub fn invalid_shape(context: impl Into<String>, details: impl Into<String>) -> Self {
        RapsdError::InvalidShape {
            context: context.into(),
            details: details.into(),
        }
    }

    /// Create a variable out of range error
    pub fn variable_out_of_range(name: impl Into<String>, index: usize, available: usize) -> Self {
        RapsdError::VariableOutOfRange {
            name: name.into(),
            index,
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = RapsdError::dimension_mismatch(64, 32, "wavenumber grid");
        let msg = err.to_string();
        assert!(msg.contains("64"));
        assert!(msg.contains("32"));
        assert!(msg.contains("wavenumber grid"));
        assert!(msg.starts_with("Invalid input"));
    }

    #[test]
    fn test_variable_out_of_range_display() {
        let err = RapsdError::variable_out_of_range("v10", 3, 2);
        let msg = err.to_string();
        assert!(msg.contains("v10"));
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_empty_sequence_display() {
        let msg = RapsdError::EmptySequence.to_string();
        assert!(msg.contains("empty"));
    }

    #[test]
    fn test_error_equality() {
        let err1 = RapsdError::invalid_shape("sample", "not square");
        let err2 = RapsdError::invalid_shape("sample", "not square");
        let err3 = RapsdError::invalid_shape("sample", "no variables");

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RapsdError>();
    }
}
