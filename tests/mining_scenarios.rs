//! End-to-end mining scenarios over small hand-verifiable datasets.

use shapelet_rs::{mine, Dataset, MinerConfig, Minkowski, MiningReport, SignificantShapelet};

const CHI2_SF_4: f64 = 0.045_500_263_896_358_42;
const CHI2_SF_10: f64 = 1.565_402_258_002_549e-3;

fn run(dataset: &Dataset, config: &MinerConfig) -> MiningReport {
    mine(dataset, &Minkowski::euclidean(), config).unwrap()
}

/// Four series, two per class, where the all-zeros window separates the
/// classes perfectly at a threshold of 0.5.
fn four_series_dataset() -> Dataset {
    Dataset::new(
        vec![
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.0, 0.0],
        ],
        vec![1, 1, 0, 0],
    )
    .unwrap()
}

/// Five-versus-five toy where the [0, 0] shapelet is absent in class 1 and
/// present (verbatim) in class 0.
fn separable_dataset() -> Dataset {
    let mut series = vec![vec![5.0, 5.0]; 5];
    series.extend(vec![vec![0.0, 0.0]; 5]);
    let mut labels = vec![1; 5];
    labels.extend(vec![0; 5]);
    Dataset::new(series, labels).unwrap()
}

fn signature(s: &SignificantShapelet) -> (Vec<u64>, u64, [usize; 4]) {
    (
        s.shapelet.values.iter().map(|v| v.to_bits()).collect(),
        s.p.to_bits(),
        [s.table.a(), s.table.b(), s.table.c(), s.table.d()],
    )
}

fn significant_set(report: &MiningReport) -> Vec<(Vec<u64>, u64, [usize; 4])> {
    let mut set: Vec<_> = report.shapelets.iter().map(signature).collect();
    set.sort();
    set
}

#[test]
fn scenario_perfect_split_on_four_series() {
    let mut config = MinerConfig::fixed(2, 1);
    config.alpha = 0.05;
    config.report_all_shapelets = true;
    let report = run(&four_series_dataset(), &config);

    // At least one shapelet reaches the perfect table a=2, b=0, d=0, c=2.
    let hit = report
        .shapelets
        .iter()
        .find(|s| s.table.a() == 2 && s.table.b() == 0 && s.table.d() == 0 && s.table.c() == 2)
        .expect("no perfectly separating table found");
    assert!((hit.p - CHI2_SF_4).abs() < 1e-12);
}

#[test]
fn scenario_separable_classes_are_significant() {
    let mut config = MinerConfig::fixed(2, 1);
    config.alpha = 0.05;
    config.remove_duplicates = true;
    let report = run(&separable_dataset(), &config);

    // Two distinct candidates ([5,5] and [0,0]), each a single-threshold
    // hypothesis, so k = 2 and the corrected threshold is 0.025.
    assert_eq!(report.num_testable, 2);
    assert!((report.corrected_threshold - 0.025).abs() < 1e-15);
    assert_eq!(report.shapelets.len(), 2);
    for s in &report.shapelets {
        assert!((s.p - CHI2_SF_10).abs() < 1e-12);
    }
    // The [0,0] shapelet is near class 0 only: a=0, b=5, c=0, d=5.
    let zeros = report
        .shapelets
        .iter()
        .find(|s| s.shapelet.values == [0.0, 0.0])
        .expect("[0,0] shapelet missing");
    assert_eq!(
        [zeros.table.a(), zeros.table.b(), zeros.table.c(), zeros.table.d()],
        [0, 5, 0, 5]
    );
}

#[test]
fn scenario_candidate_longer_than_every_series() {
    let dataset = Dataset::new(
        vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        vec![1, 0],
    )
    .unwrap();
    let config = MinerConfig::fixed(5, 1);
    let report = run(&dataset, &config);
    assert_eq!(report.num_candidates, 0);
    assert!(report.shapelets.is_empty());
}

#[test]
fn scenario_remove_duplicates_keeps_first_occurrence() {
    let dataset = Dataset::new(
        vec![vec![1.0, 2.0, 9.0], vec![1.0, 2.0, 8.0]],
        vec![1, 0],
    )
    .unwrap();
    let mut config = MinerConfig::fixed(2, 1);
    config.report_all_shapelets = true;
    config.remove_duplicates = true;
    let report = run(&dataset, &config);

    // [1,2] appears in both series but is enumerated once.
    assert_eq!(report.num_candidates, 3);
    let ones: Vec<_> = report
        .shapelets
        .iter()
        .filter(|s| s.shapelet.values == [1.0, 2.0])
        .collect();
    assert_eq!(ones.len(), 1);
    assert_eq!(ones[0].shapelet.series, 0);
}

#[test]
fn scenario_report_all_covers_every_candidate() {
    let mut config = MinerConfig::new(2, 3, 1);
    config.report_all_shapelets = true;
    let dataset = four_series_dataset();
    let report = run(&dataset, &config);
    // 4 series of length 4: 3 windows of length 2 and 2 of length 3 each.
    assert_eq!(report.num_candidates, 20);
    assert_eq!(report.shapelets.len(), 20);
}

#[test]
fn scenario_identical_series_nothing_significant() {
    let dataset = Dataset::new(vec![vec![3.0, 1.0, 4.0, 1.0]; 6], vec![1, 1, 1, 0, 0, 0]).unwrap();
    let mut config = MinerConfig::fixed(2, 1);
    config.alpha = 0.05;
    let report = run(&dataset, &config);
    assert!(report.shapelets.is_empty());
}

#[test]
fn scenario_default_factor_single_threshold() {
    let mut config = MinerConfig::fixed(2, 1);
    config.alpha = 0.05;
    config.remove_duplicates = true;
    config.default_factor = Some(1.0);
    let report = run(&separable_dataset(), &config);

    // The factor-scaled median distance still separates the classes, and
    // with one threshold per candidate k stays at 2.
    assert_eq!(report.num_testable, 2);
    assert_eq!(report.shapelets.len(), 2);
    for s in &report.shapelets {
        assert!((s.p - CHI2_SF_10).abs() < 1e-12);
    }
}

#[test]
fn scenario_merge_tables_collapses_duplicate_candidates() {
    // Without duplicate removal the five [0,0] candidates all produce the
    // same table; merging keeps one entry per distinct table.
    let mut config = MinerConfig::fixed(2, 1);
    config.alpha = 0.05;
    config.report_all_shapelets = true;
    config.merge_tables = true;
    let report = run(&separable_dataset(), &config);
    assert_eq!(report.num_candidates, 10);
    assert_eq!(report.shapelets.len(), 2);
}

#[test]
fn scenario_pseudocounts_keep_cells_positive() {
    let mut config = MinerConfig::fixed(2, 1);
    config.alpha = 0.05;
    config.pseudocounts = true;
    config.report_all_shapelets = true;
    let report = run(&separable_dataset(), &config);
    for s in &report.shapelets {
        assert!(s.table.a() >= 1);
        assert!(s.table.b() >= 1);
        assert!(s.table.c() >= 1);
        assert!(s.table.d() >= 1);
        assert!(s.p > 0.0 && s.p <= 1.0);
    }
}

#[test]
fn scenario_mining_is_idempotent() {
    let mut config = MinerConfig::new(2, 3, 1);
    config.alpha = 0.05;
    let dataset = four_series_dataset();
    let first = run(&dataset, &config);
    let second = run(&dataset, &config);
    assert_eq!(significant_set(&first), significant_set(&second));
    assert_eq!(first.num_testable, second.num_testable);
    assert_eq!(
        first.tarone_threshold.to_bits(),
        second.tarone_threshold.to_bits()
    );
}

#[test]
fn scenario_row_permutation_preserves_result() {
    let mut config = MinerConfig::fixed(2, 1);
    config.alpha = 0.05;
    config.remove_duplicates = true;

    let baseline = run(&separable_dataset(), &config);

    // Interleave the classes instead of grouping them.
    let mut series = Vec::new();
    let mut labels = Vec::new();
    for _ in 0..5 {
        series.push(vec![0.0, 0.0]);
        labels.push(0);
        series.push(vec![5.0, 5.0]);
        labels.push(1);
    }
    let permuted = Dataset::new(series, labels).unwrap();
    let shuffled = run(&permuted, &config);

    assert_eq!(significant_set(&baseline), significant_set(&shuffled));
    assert_eq!(baseline.num_testable, shuffled.num_testable);
}

#[test]
fn scenario_pruning_does_not_change_significant_set() {
    for dataset in [four_series_dataset(), separable_dataset()] {
        let mut pruned = MinerConfig::fixed(2, 1);
        pruned.alpha = 0.05;
        let mut unpruned = pruned.clone();
        unpruned.disable_pruning = true;

        let with_pruning = run(&dataset, &pruned);
        let without_pruning = run(&dataset, &unpruned);
        assert_eq!(
            significant_set(&with_pruning),
            significant_set(&without_pruning)
        );
        assert_eq!(with_pruning.num_testable, without_pruning.num_testable);
    }
}

#[test]
fn scenario_report_carries_metric_name() {
    let config = MinerConfig::fixed(2, 1);
    let report = run(&four_series_dataset(), &config);
    assert_eq!(report.distance_name, "Minkowski:2");
}
