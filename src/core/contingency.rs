//! 2x2 contingency table cross-classifying "distance below threshold"
//! against the binary class label.
//!
//! Cell naming follows the usual convention for this table shape:
//!
//! ```text
//! ----------------
//! | a  | b  | n1 |
//! |----|----|----|
//! | d  | c  | n0 |
//! |----|----|----|
//! | rs | qs | n  |
//! ----------------
//! ```
//!
//! Each table stores the distance threshold it was created for, so the
//! driver can feed raw distances and let the table route them to the right
//! cell. Equality and hashing consider only the four cells, never the
//! threshold; that is what allows merging identical tables found at
//! different thresholds.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::lookup;
use crate::core::stats::chi2_survival;

/// A (partially) filled 2x2 contingency table.
#[derive(Debug, Clone)]
pub struct ContingencyTable {
    /// Expected grand total, including the pseudocount offset.
    n: usize,
    /// Row total for class 1, including the pseudocount offset.
    n1: usize,
    /// Row total for class 0, including the pseudocount offset.
    n0: usize,
    a: usize,
    b: usize,
    c: usize,
    d: usize,
    threshold: f64,
    /// Per-cell floor: 1 when pseudocounts are enabled, else 0.
    base: usize,
}

impl ContingencyTable {
    /// Create an empty table for `n` items of which `n1` carry class 1.
    ///
    /// With `with_pseudocounts`, every cell starts at 1, so no cell can ever
    /// be zero and every p-value formula stays defined; the effective totals
    /// become `n + 4` and `n1 + 2` / `n0 + 2` accordingly.
    ///
    /// # Panics
    /// Panics if `n1 > n`.
    pub fn new(n: usize, n1: usize, threshold: f64, with_pseudocounts: bool) -> Self {
        assert!(n1 <= n, "class-1 count {n1} exceeds total {n}");
        let base = usize::from(with_pseudocounts);
        Self {
            n: n + 4 * base,
            n1: n1 + 2 * base,
            n0: n - n1 + 2 * base,
            a: base,
            b: base,
            c: base,
            d: base,
            threshold,
            base,
        }
    }

    /// Insert one item; exactly one cell is incremented.
    pub fn insert(&mut self, distance: f64, label: bool) {
        match (distance <= self.threshold, label) {
            (true, true) => self.a += 1,
            (false, true) => self.b += 1,
            (true, false) => self.d += 1,
            (false, false) => self.c += 1,
        }
    }

    pub fn a(&self) -> usize {
        self.a
    }

    pub fn b(&self) -> usize {
        self.b
    }

    pub fn c(&self) -> usize {
        self.c
    }

    pub fn d(&self) -> usize {
        self.d
    }

    /// Number of items inserted so far (plus the pseudocount offset).
    pub fn n(&self) -> usize {
        self.a + self.b + self.c + self.d
    }

    /// Row total for class 1.
    pub fn n1(&self) -> usize {
        self.n1
    }

    /// Row total for class 0.
    pub fn n0(&self) -> usize {
        self.n0
    }

    /// Column total of the "near" column.
    pub fn rs(&self) -> usize {
        self.a + self.d
    }

    /// Column total of the "far" column.
    pub fn qs(&self) -> usize {
        self.b + self.c
    }

    /// Distance threshold this table was created for.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether all expected items have been inserted.
    pub fn complete(&self) -> bool {
        self.n() == self.n
    }

    /// Pearson chi-squared statistic from a full set of cells. Degenerate
    /// marginals yield 0 so that the p-value convention `p = 1` holds.
    fn statistic(a: usize, b: usize, c: usize, d: usize) -> f64 {
        let n1 = a + b;
        let n0 = c + d;
        let rs = a + d;
        let qs = b + c;
        if n1 == 0 || n0 == 0 || rs == 0 || qs == 0 {
            return 0.0;
        }
        let num = a as f64 * c as f64 - b as f64 * d as f64;
        (n1 + n0) as f64 * num * num / (n1 as f64 * n0 as f64 * rs as f64 * qs as f64)
    }

    /// p-value of a complete table: the chi-squared (1 dof) upper tail of
    /// the Pearson statistic.
    pub fn p(&self) -> f64 {
        debug_assert!(self.complete(), "p-value requires a complete table");
        chi2_survival(Self::statistic(self.a, self.b, self.c, self.d))
    }

    /// Exact (two-sided Fisher) p-value of a complete table, computed from
    /// hypergeometric point probabilities via the log-factorial cache.
    ///
    /// The mining driver bases significance decisions on [`p`](Self::p)
    /// alone; this is available for small-sample diagnostics where the
    /// chi-squared approximation is coarse.
    pub fn fisher_p(&self) -> f64 {
        debug_assert!(self.complete(), "p-value requires a complete table");
        let row1 = self.a + self.b;
        let row0 = self.c + self.d;
        let rs = self.rs();
        let qs = self.qs();
        if row1 == 0 || row0 == 0 || rs == 0 || qs == 0 {
            return 1.0;
        }
        let n = row1 + row0;
        lookup::ensure(n);

        let log_margins = lookup::log_factorial(row1) + lookup::log_factorial(row0)
            + lookup::log_factorial(rs)
            + lookup::log_factorial(qs)
            - lookup::log_factorial(n);
        let log_point = |a: usize| {
            let d = rs - a;
            log_margins
                - lookup::log_factorial(a)
                - lookup::log_factorial(row1 - a)
                - lookup::log_factorial(row0 - d)
                - lookup::log_factorial(d)
        };

        let a_lo = rs.saturating_sub(row0);
        let a_hi = rs.min(row1);
        let observed = log_point(self.a);
        let mut total = 0.0;
        for a in a_lo..=a_hi {
            let lp = log_point(a);
            if lp <= observed + 1e-7 {
                total += lp.exp();
            }
        }
        total.min(1.0)
    }

    /// Minimum p-value attainable by any complete table with this table's
    /// row margins, over all column splits.
    pub fn min_attainable_p(&self) -> f64 {
        (0..=self.n)
            .map(|rs| self.min_attainable_p_at(rs))
            .fold(1.0, f64::min)
    }

    /// Minimum p-value attainable by any complete table with this table's
    /// row margins and the given "near" column total `rs`.
    ///
    /// The statistic is a convex quadratic in the split of `rs` between the
    /// two rows, so the extremum sits at whichever endpoint the margins
    /// permit; infeasible column totals yield 1.
    pub fn min_attainable_p_at(&self, rs: usize) -> f64 {
        if rs > self.n {
            return 1.0;
        }
        let a_lo = self.base.max((rs + self.base).saturating_sub(self.n0));
        let a_hi = (self.n1 - self.base).min(rs.saturating_sub(self.base));
        if a_lo > a_hi {
            return 1.0;
        }
        let t_of = |a: usize| {
            let d = rs - a;
            Self::statistic(a, self.n1 - a, self.n0 - d, d)
        };
        chi2_survival(t_of(a_lo).max(t_of(a_hi)))
    }

    /// Minimum p-value attainable from this partial table if every
    /// remaining item lands in whichever cell most reduces p.
    ///
    /// Over the box of feasible completions the statistic is jointly convex
    /// (a squared linear form divided by a concave positive denominator), so
    /// its maximum sits at one of the four corner completions. A table whose
    /// optimistic p already exceeds the testability threshold can be
    /// abandoned without inserting the remaining items.
    pub fn min_optimistic_p(&self) -> f64 {
        let r1 = self.n1 - (self.a + self.b);
        let r0 = self.n0 - (self.c + self.d);
        let corners = [(r1, 0, r0, 0), (r1, 0, 0, r0), (0, r1, r0, 0), (0, r1, 0, r0)];
        let t_max = corners
            .iter()
            .map(|&(da, db, dc, dd)| {
                Self::statistic(self.a + da, self.b + db, self.c + dc, self.d + dd)
            })
            .fold(0.0, f64::max);
        chi2_survival(t_max)
    }
}

impl PartialEq for ContingencyTable {
    /// Cell-wise equality; thresholds are deliberately ignored.
    fn eq(&self, other: &Self) -> bool {
        self.a == other.a && self.b == other.b && self.c == other.c && self.d == other.d
    }
}

impl Eq for ContingencyTable {}

impl Hash for ContingencyTable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.a.hash(state);
        self.b.hash(state);
        self.c.hash(state);
        self.d.hash(state);
    }
}

/// Reports the cells as `a, b, d, c`, the column order of the table.
impl fmt::Display for ContingencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}, {}", self.a, self.b, self.d, self.c)
    }
}

/// Serializes as the list `[a, b, d, c]`, matching [`fmt::Display`].
impl serde::Serialize for ContingencyTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(4))?;
        seq.serialize_element(&self.a)?;
        seq.serialize_element(&self.b)?;
        seq.serialize_element(&self.d)?;
        seq.serialize_element(&self.c)?;
        seq.end()
    }
}
