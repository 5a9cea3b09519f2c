//! Descriptive statistics over slices of floating point values
//!
//! Every function returns `None` when the statistic is undefined for the
//! given input rather than producing `NaN`.

use num_traits::Float;

/// Arithmetic mean of the values
pub fn mean<T: Float>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }

    let sum = values.iter().fold(T::zero(), |acc, &v| acc + v);
    T::from(values.len()).map(|n| sum / n)
}

/// Sample standard deviation (n - 1 denominator)
///
/// Undefined for fewer than two values.
pub fn sample_std_dev<T: Float>(values: &[T]) -> Option<T> {
    if values.len() < 2 {
        return None;
    }

    let mean = mean(values)?;
    let squared: T = values
        .iter()
        .map(|&v| (v - mean) * (v - mean))
        .fold(T::zero(), |acc, v| acc + v);

    T::from(values.len() - 1).map(|n| (squared / n).sqrt())
}

/// Largest value, ignoring NaN entries
pub fn max<T: Float>(values: &[T]) -> Option<T> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(T::max)
}

/// Smallest value, ignoring NaN entries
pub fn min<T: Float>(values: &[T]) -> Option<T> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(T::min)
}
