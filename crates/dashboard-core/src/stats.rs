//! Descriptive statistics over plain `f64` slices.
//!
//! Degenerate inputs (empty slices, zero variance) produce `None` rather
//! than `NaN` so callers have to decide how to present an undefined value.

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using linear
/// interpolation between closest ranks.
///
/// Returns `None` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> Option<f64> {
    let len = sorted_data.len();
    match len {
        0 => None,
        1 => Some(sorted_data[0]),
        _ => {
            let rank = (p.clamp(0.0, 100.0) / 100.0) * (len as f64 - 1.0);
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            if lo == hi {
                return Some(sorted_data[lo]);
            }
            let frac = rank - lo as f64;
            Some(sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo]))
        }
    }
}

/// Median of an unsorted slice. The midpoint of the two middle values for
/// even-length input.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile(&sorted, 50.0)
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Largest value, ignoring NaN.
pub fn max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .max_by(f64::total_cmp)
}

// ── Correlation ───────────────────────────────────────────────────────────────

/// Pearson product-moment correlation of two equally long series.
///
/// Returns `None` when the lengths differ, fewer than two observations are
/// available, or either series has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    // Rounding can push |r| a hair above 1 for perfectly linear data.
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ── percentile / median ──────────────────────────────────────────────────

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 90.0), None);
    }

    #[test]
    fn test_percentile_single() {
        assert_eq!(percentile(&[42.0], 90.0), Some(42.0));
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert!(approx(percentile(&data, 90.0).unwrap(), 46.0));
        assert!(approx(percentile(&data, 0.0).unwrap(), 10.0));
        assert!(approx(percentile(&data, 100.0).unwrap(), 50.0));
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    // ── mean / max ───────────────────────────────────────────────────────────

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_max_ignores_nan() {
        assert_eq!(max(&[1.0, f64::NAN, 7.5, 3.0]), Some(7.5));
        assert_eq!(max(&[]), None);
    }

    // ── pearson ──────────────────────────────────────────────────────────────

    #[test]
    fn test_pearson_perfect_positive() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!(approx(pearson(&x, &y).unwrap(), 1.0));
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [8.0, 6.0, 4.0, 2.0];
        assert!(approx(pearson(&x, &y).unwrap(), -1.0));
    }

    #[test]
    fn test_pearson_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        assert!(approx(pearson(&x, &y).unwrap(), 0.8));
    }

    #[test]
    fn test_pearson_zero_variance_is_undefined() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), None);
    }

    #[test]
    fn test_pearson_degenerate_lengths() {
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
    }
}
