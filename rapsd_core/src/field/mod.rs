pub mod sample;

pub use sample::{FieldSample, FieldSource, FieldStatistics};
