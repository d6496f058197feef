//! Labeled collection of univariate time series.

use crate::error::MiningError;

/// An ordered collection of univariate time series with binary class labels.
///
/// Validated at construction: the collection is non-empty, every series has
/// a label, and both classes are represented. Mining never mutates the
/// dataset, so it can be shared across workers without synchronization.
#[derive(Debug, Clone)]
pub struct Dataset {
    series: Vec<Vec<f64>>,
    labels: Vec<bool>,
    positives: usize,
}

impl Dataset {
    /// Build a dataset from raw `{0, 1}` labels.
    pub fn new(series: Vec<Vec<f64>>, labels: Vec<u8>) -> Result<Self, MiningError> {
        let labels = labels
            .iter()
            .enumerate()
            .map(|(index, &label)| match label {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(MiningError::InvalidLabel { index, label }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_labels(series, labels)
    }

    /// Build a dataset from boolean labels (`true` is class 1).
    pub fn from_labels(series: Vec<Vec<f64>>, labels: Vec<bool>) -> Result<Self, MiningError> {
        if series.is_empty() {
            return Err(MiningError::EmptyDataset);
        }
        if series.len() != labels.len() {
            return Err(MiningError::LengthMismatch {
                series: series.len(),
                labels: labels.len(),
            });
        }
        let positives = labels.iter().filter(|&&l| l).count();
        if positives == 0 || positives == labels.len() {
            return Err(MiningError::SingleClass {
                class: u8::from(positives > 0),
            });
        }
        Ok(Self {
            series,
            labels,
            positives,
        })
    }

    /// Number of time series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Always false: construction rejects empty collections.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// All series, in input order.
    pub fn series(&self) -> &[Vec<f64>] {
        &self.series
    }

    /// Values of series `i`.
    pub fn values(&self, i: usize) -> &[f64] {
        &self.series[i]
    }

    /// Label of series `i` (`true` is class 1).
    pub fn label(&self, i: usize) -> bool {
        self.labels[i]
    }

    /// All labels, in input order.
    pub fn labels(&self) -> &[bool] {
        &self.labels
    }

    /// Number of series with label 1.
    pub fn positives(&self) -> usize {
        self.positives
    }

    /// Number of series with label 0.
    pub fn negatives(&self) -> usize {
        self.series.len() - self.positives
    }

    /// Length of the longest series.
    pub fn max_series_len(&self) -> usize {
        self.series.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Series indices with all class-1 items first, then all class-0 items.
    ///
    /// Scanning a candidate in this order lets the optimistic p-value bound
    /// tighten fastest, which is what makes early pruning effective.
    pub(crate) fn label_grouped_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.series.len());
        order.extend((0..self.series.len()).filter(|&i| self.labels[i]));
        order.extend((0..self.series.len()).filter(|&i| !self.labels[i]));
        order
    }
}
