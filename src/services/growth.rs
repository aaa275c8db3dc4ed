//! Positive-growth reduction.
//!
//! Disk usage series are monotonic with resets: log rotation and cleanups drop the
//! size, then it climbs again. Growth here means cumulative production volume, so
//! only increases between consecutive samples are summed. A drop contributes
//! nothing and does not move the baseline; the next pair still compares raw
//! neighbours, which means data deleted and then regenerated counts again.

/// Round a megabyte figure to two decimal places.
pub fn round_mb(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sum of the positive deltas between consecutive values, rounded once at the end.
///
/// Empty and single-element inputs yield `0.0`. The result is never negative.
///
/// ```
/// use loghive::services::growth::positive_growth;
///
/// assert_eq!(positive_growth(&[100.0, 10.0, 100.0]), 90.0);
/// assert_eq!(positive_growth(&[50.0, 100.0, 30.0, 80.0, 20.0, 60.0]), 140.0);
/// ```
pub fn positive_growth(values: &[f64]) -> f64 {
    let total: f64 = values
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|delta| *delta > 0.0)
        .sum();
    round_mb(total)
}

/// Arithmetic mean rounded to two decimals; `0.0` for an empty input.
pub fn mean_mb(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        round_mb(sum / f64::from(count))
    }
}
