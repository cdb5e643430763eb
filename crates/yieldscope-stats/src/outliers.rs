//! High-yield outlier detection.
//!
//! An observation is an outlier when its yield sits more than two sample
//! standard deviations *above* the mean. The test is one-sided; unusually
//! low yields are not flagged.

use yieldscope_types::Observation;

use crate::support::{mean, sample_std};

/// Z-score threshold above which a yield counts as an outlier.
const OUTLIER_Z: f64 = 2.0;

/// Counts the one-sided yield outliers in the rows.
///
/// Fewer than two rows, or a zero-variance yield column, produce zero.
#[must_use]
pub fn outlier_count(rows: &[&Observation]) -> u64 {
    let values: Vec<f64> = rows.iter().map(|obs| obs.yield_t_ha).collect();
    let Some(m) = mean(&values) else {
        return 0;
    };
    let Some(std) = sample_std(&values, m) else {
        return 0;
    };
    if std <= 0.0 {
        return 0;
    }
    let count = values.iter().filter(|v| (**v - m) / std > OUTLIER_Z).count();
    u64::try_from(count).unwrap_or(u64::MAX)
}
