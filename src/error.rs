//! Error types for dataset validation and mining configuration.

use thiserror::Error;

/// Errors surfaced before any mining work begins.
///
/// Per-candidate degeneracies (zero marginals, series shorter than a
/// candidate) are handled in-band and never produce an error.
#[derive(Debug, Error)]
pub enum MiningError {
    /// Minimum window size must be at least 1.
    #[error("minimum window size must be positive")]
    ZeroWindow,

    /// Window range is inverted.
    #[error("invalid window range: minimum {min} exceeds maximum {max}")]
    WindowRange { min: usize, max: usize },

    /// Offset step within a series must be at least 1.
    #[error("window stride must be positive")]
    ZeroStride,

    /// Target FWER must be a probability strictly between 0 and 1.
    #[error("alpha must lie in (0, 1), got {0}")]
    InvalidAlpha(f64),

    /// The dataset contains no time series.
    #[error("dataset contains no time series")]
    EmptyDataset,

    /// Series and label counts disagree.
    #[error("dataset has {series} time series but {labels} labels")]
    LengthMismatch { series: usize, labels: usize },

    /// A label outside {0, 1} was supplied.
    #[error("label at index {index} is {label}, expected 0 or 1")]
    InvalidLabel { index: usize, label: u8 },

    /// Every series carries the same label, so no association can be tested.
    #[error("every label belongs to class {class}")]
    SingleClass { class: u8 },

    /// The cooperative cancellation flag was raised; partial results are
    /// discarded.
    #[error("mining was cancelled")]
    Cancelled,
}
