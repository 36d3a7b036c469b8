//! Compensated summation used by bin means and cross-sample reduction.

const PAIRWISE_BLOCK: usize = 8;

#[derive(Clone, Copy, Debug, Default)]
struct AccumNode {
    sum: f64,
    compensation: f64,
}

impl AccumNode {
    fn from_value(value: f64) -> Self {
        Self {
            sum: value,
            compensation: 0.0,
        }
    }

    fn add(self, value: f64) -> Self {
        let t = self.sum + value;
        let compensation = if self.sum.abs() >= value.abs() {
            self.compensation + ((self.sum - t) + value)
        } else {
            self.compensation + ((value - t) + self.sum)
        };
        Self {
            sum: t,
            compensation,
        }
    }

    fn combine(self, other: Self) -> Self {
        let merged = self.add(other.sum);
        Self {
            sum: merged.sum,
            compensation: merged.compensation + other.compensation,
        }
    }

    fn finalize(self) -> f64 {
        self.sum + self.compensation
    }
}

fn reduce_pairwise(values: &[f64]) -> AccumNode {
    if values.len() <= PAIRWISE_BLOCK {
        let mut iter = values.iter();
        let first = match iter.next() {
            Some(&value) => AccumNode::from_value(value),
            None => return AccumNode::default(),
        };
        return iter.fold(first, |node, &value| node.add(value));
    }
    let (left, right) = values.split_at(values.len() / 2);
    reduce_pairwise(left).combine(reduce_pairwise(right))
}

/// Pairwise Neumaier-compensated sum.
///
/// Non-finite inputs are summed naively so NaN and infinities propagate the
/// way plain IEEE addition does.
pub fn compensated_sum(values: &[f64]) -> f64 {
    let naive: f64 = values.iter().sum();
    if !naive.is_finite() {
        return naive;
    }
    reduce_pairwise(values).finalize()
}

/// Arithmetic mean accumulated around the first value.
///
/// Shifting by the first element keeps the mean of identical values exact.
/// Returns NaN for an empty slice, matching an empty radial bin.
pub fn compensated_mean(values: &[f64]) -> f64 {
    let Some(&pivot) = values.first() else {
        return f64::NAN;
    };
    let count = values.len() as f64;
    if !pivot.is_finite() {
        return values.iter().sum::<f64>() / count;
    }

    let deviations: Vec<f64> = values.iter().map(|&v| v - pivot).collect();
    let offset = compensated_sum(&deviations);
    if !offset.is_finite() {
        return values.iter().sum::<f64>() / count;
    }
    pivot + offset / count
}
