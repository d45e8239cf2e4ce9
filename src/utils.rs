/// Helper function for evaluating the straight line that passes through
/// `(x0, y0)` and `(x1, y1)` at `x`. The points are expected to have
/// different abscissas. Evaluating at `x0` returns exactly `y0`.
///
/// ## Example
///
/// ```
/// use reschain_rs::utils::linear_interpolation;
///
/// let y = linear_interpolation(500.0, 400.0, 800.0, 600.0, 650.0);
/// assert_eq!(y, 500.0);
/// ```
pub fn linear_interpolation(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    x: f64,
) -> f64 {
    y0 + (x - x0) / (x1 - x0) * (y1 - y0)
}

/// Helper function for evaluating the arithmetic mean of a slice.
/// Returns zero for an empty slice.
///
/// ## Example
///
/// ```
/// let m = reschain_rs::utils::mean(&[1.0, 2.0, 3.0]);
/// assert_eq!(m, 2.0);
/// ```
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
