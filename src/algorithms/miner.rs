//! The mining driver: candidate evaluation, threshold selection, early
//! pruning, and significance filtering.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::ser::SerializeStruct;
use tracing::{debug, info};

use crate::algorithms::candidates::{CandidateGenerator, ShapeletCandidate};
use crate::algorithms::tarone::TaroneThreshold;
use crate::core::contingency::ContingencyTable;
use crate::core::dataset::Dataset;
use crate::core::distance_functor::DistanceFunctor;
use crate::core::lookup;
use crate::error::MiningError;

/// Minimum number of candidates before dispatching to the parallel path.
#[cfg(feature = "parallel")]
const MIN_PARALLEL_CANDIDATES: usize = 64;

/// Configuration of a mining run.
///
/// Fields are public; [`validate`](MinerConfig::validate) runs at mining
/// start and rejects inconsistent settings before any work begins.
#[derive(Debug, Clone)]
pub struct MinerConfig {
    /// Smallest shapelet length to enumerate.
    pub min_window_size: usize,
    /// Largest shapelet length to enumerate.
    pub max_window_size: usize,
    /// Offset step within each series.
    pub window_stride: usize,
    /// Target family-wise error rate.
    pub alpha: f64,
    /// When set, a single distance threshold per candidate: this factor
    /// times the median of the candidate's per-series distances. Otherwise
    /// every midpoint between consecutive distinct distances is tried.
    pub default_factor: Option<f64>,
    /// Skip the optimistic-p early termination.
    pub disable_pruning: bool,
    /// Z-score normalize candidates before comparison and mining.
    pub keep_normal_only: bool,
    /// Collapse tables with identical cells across thresholds.
    pub merge_tables: bool,
    /// Drop candidates whose value vector was already enumerated.
    pub remove_duplicates: bool,
    /// Emit every candidate's best table regardless of significance.
    /// Implies `disable_pruning`.
    pub report_all_shapelets: bool,
    /// Initialize every table cell to 1 so no p-value formula degenerates.
    pub pseudocounts: bool,
}

impl MinerConfig {
    /// Configuration with a window-size range and stride; every flag off,
    /// alpha at its 0.01 default.
    pub fn new(min_window_size: usize, max_window_size: usize, window_stride: usize) -> Self {
        Self {
            min_window_size,
            max_window_size,
            window_stride,
            alpha: 0.01,
            default_factor: None,
            disable_pruning: false,
            keep_normal_only: false,
            merge_tables: false,
            remove_duplicates: false,
            report_all_shapelets: false,
            pseudocounts: false,
        }
    }

    /// Configuration with a single fixed window size.
    pub fn fixed(window_size: usize, window_stride: usize) -> Self {
        Self::new(window_size, window_size, window_stride)
    }

    /// Reject inconsistent settings. Called at mining start; nothing is
    /// evaluated when this fails.
    pub fn validate(&self) -> Result<(), MiningError> {
        if self.min_window_size == 0 {
            return Err(MiningError::ZeroWindow);
        }
        if self.max_window_size < self.min_window_size {
            return Err(MiningError::WindowRange {
                min: self.min_window_size,
                max: self.max_window_size,
            });
        }
        if self.window_stride == 0 {
            return Err(MiningError::ZeroStride);
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(MiningError::InvalidAlpha(self.alpha));
        }
        Ok(())
    }

    /// Whether the optimistic-p early termination is in effect.
    /// Reporting all shapelets forces it off.
    fn pruning_enabled(&self) -> bool {
        !self.disable_pruning && !self.report_all_shapelets
    }
}

/// One mined shapelet: the subsequence, its best p-value, and the table
/// behind that p-value.
#[derive(Debug, Clone)]
pub struct SignificantShapelet {
    pub shapelet: ShapeletCandidate,
    pub p: f64,
    pub table: ContingencyTable,
}

impl serde::Serialize for SignificantShapelet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SignificantShapelet", 6)?;
        state.serialize_field("series", &self.shapelet.series)?;
        state.serialize_field("offset", &self.shapelet.offset)?;
        state.serialize_field("length", &self.shapelet.len())?;
        state.serialize_field("values", &self.shapelet.values)?;
        state.serialize_field("p", &self.p)?;
        state.serialize_field("table", &self.table)?;
        state.end()
    }
}

/// Result of a mining run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MiningReport {
    /// Retained shapelets, ordered by ascending p-value.
    pub shapelets: Vec<SignificantShapelet>,
    /// Final Tarone testability threshold δ.
    pub tarone_threshold: f64,
    /// Final number of testable hypotheses k.
    pub num_testable: usize,
    /// The corrected significance threshold α/k applied to the output.
    pub corrected_threshold: f64,
    /// Number of enumerated candidates.
    pub num_candidates: usize,
    /// Name of the distance functor, for output formatting.
    pub distance_name: String,
}

/// Mine statistically significant shapelets from `dataset`.
///
/// Equivalent to [`mine_with_cancellation`] with a flag that is never
/// raised.
pub fn mine<F: DistanceFunctor>(
    dataset: &Dataset,
    functor: &F,
    config: &MinerConfig,
) -> Result<MiningReport, MiningError> {
    mine_with_cancellation(dataset, functor, config, &AtomicBool::new(false))
}

/// Mine statistically significant shapelets, checking `cancel` between
/// candidates. Cancellation discards all partial results.
pub fn mine_with_cancellation<F: DistanceFunctor>(
    dataset: &Dataset,
    functor: &F,
    config: &MinerConfig,
    cancel: &AtomicBool,
) -> Result<MiningReport, MiningError> {
    config.validate()?;

    let n = dataset.len();
    let n1 = dataset.positives();
    lookup::ensure(n + 4);
    info!(n, n1, alpha = config.alpha, "starting shapelet mining");

    let candidates: Vec<ShapeletCandidate> = CandidateGenerator::new(
        dataset.series(),
        config.min_window_size,
        config.max_window_size,
        config.window_stride,
    )
    .with_normalization(config.keep_normal_only)
    .with_deduplication(config.remove_duplicates)
    .collect();
    debug!(candidates = candidates.len(), "enumerated candidates");

    let controller = TaroneThreshold::new(n, n1, config.alpha, config.pseudocounts);
    let order = dataset.label_grouped_order();

    let evaluate = |candidate: &ShapeletCandidate| -> Option<SignificantShapelet> {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        evaluate_candidate(candidate, dataset, functor, &order, &controller, config)
    };

    #[cfg(feature = "parallel")]
    let mut retained: Vec<SignificantShapelet> = if candidates.len() >= MIN_PARALLEL_CANDIDATES {
        use rayon::prelude::*;
        candidates.par_iter().filter_map(evaluate).collect()
    } else {
        candidates.iter().filter_map(evaluate).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let mut retained: Vec<SignificantShapelet> =
        candidates.iter().filter_map(evaluate).collect();

    if cancel.load(Ordering::Relaxed) {
        return Err(MiningError::Cancelled);
    }

    let num_testable = controller.testable();
    let corrected_threshold = controller.corrected_threshold();
    if !config.report_all_shapelets {
        if num_testable == 0 {
            retained.clear();
        } else {
            retained.retain(|s| s.p <= corrected_threshold);
        }
    }
    retained.sort_by(|x, y| {
        x.p.total_cmp(&y.p)
            .then(x.shapelet.series.cmp(&y.shapelet.series))
            .then(x.shapelet.offset.cmp(&y.shapelet.offset))
            .then(x.shapelet.len().cmp(&y.shapelet.len()))
    });
    if config.merge_tables {
        // Table equality ignores the threshold, so entries found at
        // different thresholds (or from duplicate candidates) collapse onto
        // the lowest-p representative.
        let mut seen: Vec<ContingencyTable> = Vec::new();
        retained.retain(|s| {
            if seen.contains(&s.table) {
                false
            } else {
                seen.push(s.table.clone());
                true
            }
        });
    }

    info!(
        significant = retained.len(),
        testable = num_testable,
        tarone = controller.threshold(),
        "mining finished"
    );
    Ok(MiningReport {
        shapelets: retained,
        tarone_threshold: controller.threshold(),
        num_testable,
        corrected_threshold,
        num_candidates: candidates.len(),
        distance_name: functor.name(),
    })
}

/// Evaluate one candidate against the dataset and return its best table,
/// if any survives.
fn evaluate_candidate<F: DistanceFunctor>(
    candidate: &ShapeletCandidate,
    dataset: &Dataset,
    functor: &F,
    order: &[usize],
    controller: &TaroneThreshold,
    config: &MinerConfig,
) -> Option<SignificantShapelet> {
    // Distances in label-grouped order; series shorter than the candidate
    // are skipped, and the tables below are sized to the evaluable subset.
    let mut items: Vec<(f64, bool)> = Vec::with_capacity(order.len());
    for &j in order {
        if let Some(d) = functor.min_window_distance(&candidate.values, dataset.values(j)) {
            items.push((d, dataset.label(j)));
        }
    }
    if items.is_empty() {
        return None;
    }
    let sub_n = items.len();
    let sub_n1 = items.iter().filter(|&&(_, label)| label).count();

    // The minimum attainable p depends only on the margins, so it is shared
    // by every threshold tried for this candidate.
    let min_p = ContingencyTable::new(sub_n, sub_n1, 0.0, config.pseudocounts).min_attainable_p();
    let pruning = config.pruning_enabled();
    if pruning && min_p > controller.threshold() {
        // Untestable: cannot reach significance under any threshold.
        return None;
    }

    let thresholds = select_thresholds(&items, config.default_factor);
    let mut best: Option<(f64, ContingencyTable)> = None;
    let mut seen_cells: Vec<(usize, usize, usize, usize)> = Vec::new();

    for theta in thresholds {
        // Each threshold is one hypothesis; testability is a property of
        // the margins, so the hypothesis counts whether or not the scan
        // below runs to completion. This keeps the correction identical
        // with and without pruning.
        controller.offer(min_p);

        let mut table = ContingencyTable::new(sub_n, sub_n1, theta, config.pseudocounts);
        let mut aborted = false;
        for &(distance, label) in &items {
            table.insert(distance, label);
            if pruning && table.min_optimistic_p() > controller.threshold() {
                aborted = true;
                break;
            }
        }
        if aborted {
            continue;
        }

        let p = table.p();
        // The final filter is p <= alpha/k, and alpha/k <= alpha always, so
        // tables above alpha can never be emitted.
        if !config.report_all_shapelets && p > config.alpha {
            continue;
        }
        if config.merge_tables {
            let cells = (table.a(), table.b(), table.c(), table.d());
            if seen_cells.contains(&cells) {
                continue;
            }
            seen_cells.push(cells);
        }
        match &best {
            Some((best_p, _)) if *best_p <= p => {}
            _ => best = Some((p, table)),
        }
    }

    best.map(|(p, table)| SignificantShapelet {
        shapelet: candidate.clone(),
        p,
        table,
    })
}

/// Distance thresholds to try for one candidate.
///
/// The canonical policy takes every midpoint between consecutive distinct
/// distances. With a default factor, a single threshold is derived from the
/// median distance instead. A candidate whose distances are all identical
/// admits no split; its single degenerate threshold yields p = 1.
fn select_thresholds(items: &[(f64, bool)], default_factor: Option<f64>) -> Vec<f64> {
    let mut distances: Vec<f64> = items.iter().map(|&(d, _)| d).collect();
    distances.sort_unstable_by(f64::total_cmp);

    if let Some(factor) = default_factor {
        let mid = distances.len() / 2;
        let median = if distances.len() % 2 == 0 {
            0.5 * (distances[mid - 1] + distances[mid])
        } else {
            distances[mid]
        };
        return vec![factor * median];
    }

    let mut thresholds = Vec::new();
    for pair in distances.windows(2) {
        if pair[1] > pair[0] {
            thresholds.push(0.5 * (pair[0] + pair[1]));
        }
    }
    if thresholds.is_empty() {
        thresholds.push(distances[0]);
    }
    thresholds
}
