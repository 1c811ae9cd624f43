//! Shared statistics primitives.
//!
//! Every function here returns `None` on empty or degenerate input rather
//! than panicking or substituting a default; callers propagate the `None`
//! outward so the presentation layer can render "not available".

/// Arithmetic mean; `None` on empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().copied().sum::<f64>() / values.len() as f64)
}

/// Statistical median; `None` on empty input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Percentile by linear interpolation between closest ranks, `pct` in [0, 1].
///
/// Sort ascending, `rank = (n-1) * pct`; when the rank falls between two
/// elements, interpolate `lower * (upper - rank) + upper * (rank - lower)`.
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    let rank = (sorted.len() - 1) as f64 * pct;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    Some(sorted[lower] * (upper as f64 - rank) + sorted[upper] * (rank - lower as f64))
}

/// Population standard deviation; `None` with fewer than 2 values.
pub fn stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Smallest value; `None` on empty input.
pub fn min_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().min_by(f64::total_cmp)
}

/// Largest value; `None` on empty input.
pub fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().max_by(f64::total_cmp)
}

/// `count / total`, or `None` when `total` is 0.
pub fn ratio(count: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(count as f64 / total as f64)
}

/// Division that treats a missing or zero denominator as "undefined".
pub fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let a = numerator?;
    let b = denominator?;
    if b == 0.0 {
        return None;
    }
    Some(a / b)
}

/// Pearson correlation coefficient over `(x, y)` pairs.
///
/// Requires at least 2 pairs; `None` when either variance is zero.
pub fn pearson_correlation(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let xs: Vec<f64> = pairs.iter().map(|p| p.0).collect();
    let ys: Vec<f64> = pairs.iter().map(|p| p.1).collect();
    let mean_x = mean(&xs)?;
    let mean_y = mean(&ys)?;

    let numerator: f64 = pairs
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let var_x: f64 = xs.iter().map(|x| (x - mean_x) * (x - mean_x)).sum();
    let var_y: f64 = ys.iter().map(|y| (y - mean_y) * (y - mean_y)).sum();
    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}
