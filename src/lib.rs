pub mod algorithms;
pub mod core;
pub mod error;
pub mod metrics;

pub use crate::algorithms::candidates::{CandidateGenerator, ShapeletCandidate};
pub use crate::algorithms::miner::{
    mine, mine_with_cancellation, MinerConfig, MiningReport, SignificantShapelet,
};
pub use crate::algorithms::tarone::TaroneThreshold;
pub use crate::core::contingency::ContingencyTable;
pub use crate::core::dataset::Dataset;
pub use crate::core::distance_functor::DistanceFunctor;
pub use crate::error::MiningError;
pub use crate::metrics::minkowski::Minkowski;

use std::sync::atomic::AtomicBool;

/// High-level facade for shapelet mining, generic over the distance functor.
///
/// # Examples
///
/// ```
/// use shapelet_rs::{Dataset, Minkowski, MinerConfig, ShapeletEngine};
///
/// let dataset = Dataset::new(
///     vec![
///         vec![0.0, 0.0, 0.0, 0.0],
///         vec![0.0, 0.0, 0.0, 1.0],
///         vec![1.0, 1.0, 1.0, 1.0],
///         vec![1.0, 1.0, 1.0, 0.0],
///     ],
///     vec![1, 1, 0, 0],
/// )
/// .unwrap();
///
/// let mut config = MinerConfig::fixed(2, 1);
/// config.alpha = 0.05;
/// config.report_all_shapelets = true;
///
/// let engine = ShapeletEngine::new(config, Minkowski::euclidean());
/// let report = engine.mine(&dataset).unwrap();
/// assert_eq!(report.shapelets.len(), report.num_candidates);
/// ```
pub struct ShapeletEngine<F: DistanceFunctor> {
    config: MinerConfig,
    functor: F,
}

impl<F: DistanceFunctor> ShapeletEngine<F> {
    /// Create a new engine with the given configuration and metric.
    pub fn new(config: MinerConfig, functor: F) -> Self {
        Self { config, functor }
    }

    /// Run the full mining pipeline over a dataset.
    pub fn mine(&self, dataset: &Dataset) -> Result<MiningReport, MiningError> {
        crate::algorithms::miner::mine(dataset, &self.functor, &self.config)
    }

    /// Run the mining pipeline with a cooperative cancellation flag,
    /// checked between candidates. Cancellation discards partial results.
    pub fn mine_with_cancellation(
        &self,
        dataset: &Dataset,
        cancel: &AtomicBool,
    ) -> Result<MiningReport, MiningError> {
        crate::algorithms::miner::mine_with_cancellation(
            dataset,
            &self.functor,
            &self.config,
            cancel,
        )
    }
}

/// Convenience type alias for the most common use case.
pub type MinkowskiEngine = ShapeletEngine<Minkowski>;
