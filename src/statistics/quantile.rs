//! Order statistics over timing samples.

/// Median of `data`.
///
/// Sorts a copy: odd counts return the middle element, even counts the mean
/// of the two middle elements.
///
/// # Panics
///
/// Panics if `data` is empty.
pub fn median(data: &[f64]) -> f64 {
    assert!(!data.is_empty(), "Cannot compute median of empty slice");

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    median_sorted(&sorted)
}

/// Median of data already sorted in ascending order.
pub(crate) fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Percentile `p` of `data`, interpolating linearly between neighbours.
///
/// Sorts a copy. The position is `(n - 1) * p` in the sorted order, so
/// `p = 0` is the minimum and `p = 1` the maximum.
///
/// # Panics
///
/// Panics if `data` is empty or `p` is outside `[0, 1]`.
pub fn percentile(data: &[f64], p: f64) -> f64 {
    assert!(!data.is_empty(), "Cannot compute percentile of empty slice");

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    percentile_sorted(&sorted, p)
}

/// Percentile of data already sorted in ascending order.
pub(crate) fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    assert!((0.0..=1.0).contains(&p), "Percentile must be in [0, 1]");

    let pos = (sorted.len() - 1) as f64 * p;
    let below = pos.floor() as usize;
    match sorted.get(below + 1) {
        Some(&above) => sorted[below] + (pos - below as f64) * (above - sorted[below]),
        None => sorted[below],
    }
}
