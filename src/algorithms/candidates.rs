//! Lazy enumeration of shapelet candidates.

use std::collections::HashSet;

/// A contiguous subsequence extracted from one input series.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ShapeletCandidate {
    /// Index of the origin series.
    pub series: usize,
    /// Offset of the subsequence within the origin series.
    pub offset: usize,
    /// The subsequence values (z-normalized when the generator is built
    /// with normalization enabled).
    pub values: Vec<f64>,
}

impl ShapeletCandidate {
    /// Length of the subsequence.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Z-score normalize in place. Constant windows collapse to all zeros.
pub(crate) fn znormalize(values: &mut [f64]) {
    let m = values.len() as f64;
    let mean = values.iter().sum::<f64>() / m;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / m;
    let sigma = var.sqrt();
    if sigma < 1e-15 {
        values.fill(0.0);
    } else {
        for v in values.iter_mut() {
            *v = (*v - mean) / sigma;
        }
    }
}

/// Enumerates shapelet candidates over a collection of series.
///
/// Ordering is outer-to-inner: for each series, for each length in
/// `[min_len, max_len]`, for each offset stepping by `stride`. Series
/// shorter than a given length simply contribute no candidates of that
/// length. The sequence is finite and can be recreated at will, so the
/// driver may materialize it for chunking across workers.
pub struct CandidateGenerator<'a> {
    series: &'a [Vec<f64>],
    min_len: usize,
    max_len: usize,
    stride: usize,
    normalize: bool,
    seen: Option<HashSet<Vec<u64>>>,
    series_idx: usize,
    len: usize,
    offset: usize,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(series: &'a [Vec<f64>], min_len: usize, max_len: usize, stride: usize) -> Self {
        debug_assert!(min_len >= 1 && min_len <= max_len && stride >= 1);
        Self {
            series,
            min_len,
            max_len,
            stride,
            normalize: false,
            seen: None,
            series_idx: 0,
            len: min_len,
            offset: 0,
        }
    }

    /// Z-score normalize every candidate before it is emitted (and before
    /// deduplication, so equal shapes compare equal regardless of scale).
    pub fn with_normalization(mut self, enabled: bool) -> Self {
        self.normalize = enabled;
        self
    }

    /// Drop candidates whose value vector was already emitted. Equality is
    /// bit-exact on the doubles.
    pub fn with_deduplication(mut self, enabled: bool) -> Self {
        self.seen = enabled.then(HashSet::new);
        self
    }
}

impl Iterator for CandidateGenerator<'_> {
    type Item = ShapeletCandidate;

    fn next(&mut self) -> Option<ShapeletCandidate> {
        loop {
            let current = self.series.get(self.series_idx)?;
            if self.len > self.max_len {
                self.series_idx += 1;
                self.len = self.min_len;
                self.offset = 0;
                continue;
            }
            if self.offset + self.len > current.len() {
                self.len += 1;
                self.offset = 0;
                continue;
            }

            let (series, offset) = (self.series_idx, self.offset);
            let mut values = current[offset..offset + self.len].to_vec();
            self.offset += self.stride;

            if self.normalize {
                znormalize(&mut values);
            }
            if let Some(seen) = &mut self.seen {
                let key: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
                if !seen.insert(key) {
                    continue;
                }
            }
            return Some(ShapeletCandidate {
                series,
                offset,
                values,
            });
        }
    }
}
