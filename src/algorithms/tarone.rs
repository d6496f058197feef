//! Online maintenance of the Tarone testability threshold.
//!
//! Tarone's correction only counts hypotheses whose minimum attainable
//! p-value is at or below the current threshold δ; untestable hypotheses
//! cannot produce a false positive at level δ and are excluded from the
//! family. Keeping δ as large as the target FWER permits therefore yields a
//! tighter correction than Bonferroni over all candidates.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::core::contingency::ContingencyTable;

/// All distinct minimum attainable p-values for tables with margins
/// `(n, n1)`, sorted ascending. A trailing 1.0 is guaranteed so that the
/// initial threshold is 1.
pub fn min_attainable_p_values(n: usize, n1: usize, pseudocounts: bool) -> Vec<f64> {
    let proto = ContingencyTable::new(n, n1, 0.0, pseudocounts);
    let rs_max = n + 4 * usize::from(pseudocounts);
    let mut values: Vec<f64> = (0..=rs_max).map(|rs| proto.min_attainable_p_at(rs)).collect();
    values.sort_unstable_by(f64::total_cmp);
    values.dedup();
    if values.last() != Some(&1.0) {
        values.push(1.0);
    }
    values
}

struct TaroneState {
    /// Distinct achievable minimum attainable p-values, ascending.
    values: Vec<f64>,
    /// Offered hypotheses per value, for levels still within the threshold.
    counts: Vec<usize>,
    /// Index of the current threshold in `values`.
    level: usize,
    /// Number of currently testable hypotheses (k).
    testable: usize,
}

/// The one piece of shared mutable state during mining.
///
/// Updates serialize under a mutex; [`threshold`](TaroneThreshold::threshold)
/// is a lock-free atomic read. The threshold is non-increasing over the run,
/// so a stale read only makes pruning less aggressive, never incorrect.
pub struct TaroneThreshold {
    alpha: f64,
    delta_bits: AtomicU64,
    state: Mutex<TaroneState>,
}

impl TaroneThreshold {
    /// Build a controller for a dataset of `n` items with `n1` in class 1
    /// and target FWER `alpha`. The threshold starts at 1 with no testable
    /// hypotheses.
    pub fn new(n: usize, n1: usize, alpha: f64, pseudocounts: bool) -> Self {
        let values = min_attainable_p_values(n, n1, pseudocounts);
        let level = values.len() - 1;
        let delta_bits = AtomicU64::new(values[level].to_bits());
        Self {
            alpha,
            delta_bits,
            state: Mutex::new(TaroneState {
                counts: vec![0; values.len()],
                values,
                level,
                testable: 0,
            }),
        }
    }

    /// Current testability threshold δ.
    pub fn threshold(&self) -> f64 {
        f64::from_bits(self.delta_bits.load(Ordering::Acquire))
    }

    /// Number of currently testable hypotheses (k).
    pub fn testable(&self) -> usize {
        self.state.lock().expect("tarone state poisoned").testable
    }

    /// Target FWER.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The corrected significance threshold α/k. With no testable
    /// hypotheses the correction is undefined; α is returned, and the
    /// driver emits nothing in that case.
    pub fn corrected_threshold(&self) -> f64 {
        let k = self.testable();
        if k == 0 {
            self.alpha
        } else {
            self.alpha / k as f64
        }
    }

    /// Register one hypothesis with the given minimum attainable p-value.
    ///
    /// Hypotheses above the current threshold are untestable and ignored.
    /// Otherwise k grows, and while `k * δ > α` the threshold shrinks to the
    /// next smaller achievable value, dropping the hypotheses registered at
    /// the removed level.
    pub fn offer(&self, min_p: f64) {
        let mut guard = self.state.lock().expect("tarone state poisoned");
        let state = &mut *guard;
        if min_p > state.values[state.level] {
            return;
        }

        // Values offered for the run's own margins are bit-identical to a
        // precomputed entry; sub-margin tables (short-series skips) land in
        // the nearest level at or above their value.
        let bucket = state
            .values
            .partition_point(|&v| v < min_p - 1e-12)
            .min(state.level);
        state.counts[bucket] += 1;
        state.testable += 1;

        while state.testable as f64 * state.values[state.level] > self.alpha {
            if state.level == 0 {
                break;
            }
            let removed = state.counts[state.level];
            state.counts[state.level] = 0;
            state.testable -= removed;
            state.level -= 1;
        }
        self.delta_bits
            .store(state.values[state.level].to_bits(), Ordering::Release);
    }
}
