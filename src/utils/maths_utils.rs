use argminmax::ArgMinMax;
use itertools::Itertools;
use statrs::statistics::Statistics;

pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

/// (min, max) of a slice, or None when it is empty.
pub fn get_min_max(vec: &[f64]) -> Option<(f64, f64)> {
    if vec.is_empty() {
        return None;
    }
    Some((get_min(vec), get_max(vec)))
}

/// Widens `(min, max)` by `fraction` of its span on each side.
/// A zero span (all values equal) is widened by `fraction` of the value instead,
/// so the result is never degenerate unless the value itself is 0.
pub fn pad_bounds(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    let span = max - min;
    let pad = if span > 0.0 {
        span * fraction
    } else {
        (min.abs() * fraction).max(f64::EPSILON)
    };
    (min - pad, max + pad)
}

/// `ln(p_t / p_{t-1})` for every consecutive pair. Output is one shorter than the input.
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .iter()
        .tuple_windows()
        .map(|(prev, next)| (next / prev).ln())
        .collect()
}

/// Sample standard deviation (n - 1 denominator) over each full trailing window.
/// Element `j` of the output covers `values[j..j + window]`.
pub fn rolling_sample_std_dev(values: &[f64], window: usize) -> Vec<f64> {
    if window < 2 || values.len() < window {
        return Vec::new();
    }
    values
        .windows(window)
        .map(|w| w.iter().std_dev())
        .collect()
}
