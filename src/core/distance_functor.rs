//! Pluggable distance contract between equal-length sequences.

/// A distance between two equal-length sequences of values.
///
/// Implementations must be deterministic, stateless, and return a
/// non-negative value. The mining driver is generic over the functor, so a
/// concrete metric is monomorphized into the candidate-evaluation loop; the
/// functor itself may still carry runtime parameters (e.g. the Minkowski
/// exponent).
pub trait DistanceFunctor: Send + Sync {
    /// Identifier recorded in mining output, e.g. `"Minkowski:2"`.
    fn name(&self) -> String;

    /// Distance between two sequences of the same length.
    fn distance(&self, s: &[f64], t: &[f64]) -> f64;

    /// Minimum distance between `query` and any stride-1 window of `series`.
    ///
    /// Returns `None` when the series is shorter than the query; the driver
    /// silently skips such series. Metrics can override this with a
    /// batch-optimized scan (e.g. the sliding-dot-product path for the
    /// Euclidean case).
    fn min_window_distance(&self, query: &[f64], series: &[f64]) -> Option<f64> {
        let m = query.len();
        if m == 0 || series.len() < m {
            return None;
        }
        (0..=series.len() - m)
            .map(|o| self.distance(query, &series[o..o + m]))
            .min_by(f64::total_cmp)
    }
}
