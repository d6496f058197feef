//! Process-wide cache of log-factorials.
//!
//! The exact (Fisher) p-value expresses hypergeometric tail terms through
//! `ln n!`; those values are shared by every table in a run, so they live in
//! a lazily grown, append-only table. After [`ensure`] has been called with
//! the dataset size at mining start, all lookups are read-only and may be
//! served concurrently to any number of workers.

use std::sync::{OnceLock, RwLock};

fn table() -> &'static RwLock<Vec<f64>> {
    static TABLE: OnceLock<RwLock<Vec<f64>>> = OnceLock::new();
    // ln 0! = 0
    TABLE.get_or_init(|| RwLock::new(vec![0.0]))
}

/// Grow the cache so that `log_factorial(k)` is available for all `k <= n`.
///
/// Idempotent; the table never shrinks.
pub fn ensure(n: usize) {
    {
        let guard = table().read().expect("log-factorial cache poisoned");
        if guard.len() > n {
            return;
        }
    }
    let mut guard = table().write().expect("log-factorial cache poisoned");
    while guard.len() <= n {
        let k = guard.len();
        let prev = guard[k - 1];
        guard.push(prev + (k as f64).ln());
    }
}

/// `ln n!`, growing the cache on a miss.
pub fn log_factorial(n: usize) -> f64 {
    {
        let guard = table().read().expect("log-factorial cache poisoned");
        if let Some(&value) = guard.get(n) {
            return value;
        }
    }
    ensure(n);
    table().read().expect("log-factorial cache poisoned")[n]
}
