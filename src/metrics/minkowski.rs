//! Minkowski p-norm distance, the default mining metric.

use crate::algorithms::common::window_dot_products;
use crate::core::distance_functor::DistanceFunctor;

/// Minkowski distance with exponent `p >= 1`:
/// `d(S, T) = (sum |S_i - T_i|^p)^(1/p)`.
///
/// `p = 1` (Manhattan) and `p = 2` (Euclidean) avoid `powf` in the inner
/// loop; the Euclidean case additionally gets a dot-product window scan.
#[derive(Debug, Clone)]
pub struct Minkowski {
    p: f64,
}

impl Minkowski {
    /// # Panics
    /// Panics if `p < 1`.
    pub fn new(p: f64) -> Self {
        assert!(p >= 1.0, "Minkowski exponent must be >= 1");
        Self { p }
    }

    /// The common `p = 2` case.
    pub fn euclidean() -> Self {
        Self::new(2.0)
    }

    pub fn exponent(&self) -> f64 {
        self.p
    }

    fn is_euclidean(&self) -> bool {
        (self.p - 2.0).abs() < f64::EPSILON
    }
}

impl Default for Minkowski {
    fn default() -> Self {
        Self::euclidean()
    }
}

impl DistanceFunctor for Minkowski {
    fn name(&self) -> String {
        // Default float formatting, so the exponent prints as `2`, not
        // `2.000000`.
        format!("Minkowski:{}", self.p)
    }

    fn distance(&self, s: &[f64], t: &[f64]) -> f64 {
        debug_assert_eq!(s.len(), t.len(), "Minkowski requires equal lengths");
        if self.p == 1.0 {
            s.iter().zip(t).map(|(a, b)| (a - b).abs()).sum()
        } else if self.is_euclidean() {
            s.iter()
                .zip(t)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt()
        } else {
            s.iter()
                .zip(t)
                .map(|(a, b)| (a - b).abs().powf(self.p))
                .sum::<f64>()
                .powf(1.0 / self.p)
        }
    }

    /// For `p = 2`, scans windows through
    /// `d^2 = |q|^2 + |w|^2 - 2 * dot(q, w)` with precomputed window sums of
    /// squares and a batch dot product; other exponents fall back to the
    /// per-window loop.
    fn min_window_distance(&self, query: &[f64], series: &[f64]) -> Option<f64> {
        let m = query.len();
        if m == 0 || series.len() < m {
            return None;
        }
        if !self.is_euclidean() {
            return (0..=series.len() - m)
                .map(|o| self.distance(query, &series[o..o + m]))
                .min_by(f64::total_cmp);
        }

        let qt = window_dot_products(query, series);
        let q_sq: f64 = query.iter().map(|x| x * x).sum();

        let mut cumsum_sq = vec![0.0; series.len() + 1];
        for (i, &x) in series.iter().enumerate() {
            cumsum_sq[i + 1] = cumsum_sq[i] + x * x;
        }

        let mut best = f64::INFINITY;
        for (i, &dot) in qt.iter().enumerate() {
            let w_sq = cumsum_sq[i + m] - cumsum_sq[i];
            // Clamp tiny negatives from rounding.
            let d_sq = (q_sq + w_sq - 2.0 * dot).max(0.0);
            if d_sq < best {
                best = d_sq;
            }
        }
        Some(best.sqrt())
    }
}
