//! Shared numeric helpers for the stats modules.

/// Arithmetic mean, `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(sum / count_f64(values.len()))
}

/// Sample standard deviation (one delta degree of freedom), `None` for
/// fewer than two values.
pub(crate) fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mut sum_sq = 0.0;
    for value in values {
        let delta = value - mean;
        sum_sq = delta.mul_add(delta, sum_sq);
    }
    let variance = sum_sq / count_f64(values.len().saturating_sub(1));
    Some(variance.sqrt())
}

/// Pearson correlation over paired values; `None` when fewer than two
/// pairs exist or either side has zero variance.
pub(crate) fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov = dx.mul_add(dy, cov);
        var_x = dx.mul_add(dx, var_x);
        var_y = dy.mul_add(dy, var_y);
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}

/// Rounds to `places` decimal digits.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10.0_f64.powi(places);
    (value * factor).round() / factor
}

/// Converts a collection length to `f64`.
///
/// Lengths beyond `u32::MAX` saturate, far past any plausible dataset.
pub(crate) fn count_f64(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}
