//! Numeric helpers shared by the solvers
//!
//! Small reductions over sample vectors: means, variances, first-index
//! argmax and frequency histograms.

/// Returns the index of the first maximum, or `None` for an empty input
///
/// Ties resolve to the lowest index. NaN entries never win.
pub fn argmax<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        match best {
            Some((_, b)) if !(v > b) => {}
            _ if v.is_nan() => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Arithmetic mean of a sample
///
/// Returns 0.0 for an empty sample.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased sample variance
///
/// Returns 0.0 when fewer than two values are given.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64
}

/// Relative frequencies of `indices` over `bins` buckets
///
/// Entries at or above `bins` are ignored. The result sums to 1 whenever every
/// index is in range and `indices` is non-empty.
pub fn normalized_histogram(indices: &[usize], bins: usize) -> Vec<f64> {
    let mut counts = vec![0usize; bins];
    for &i in indices {
        if let Some(c) = counts.get_mut(i) {
            *c += 1;
        }
    }
    if indices.is_empty() {
        return vec![0.0; bins];
    }
    let total = indices.len() as f64;
    counts.into_iter().map(|c| c as f64 / total).collect()
}
