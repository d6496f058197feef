//! Dump every candidate's best contingency table, significant or not.

use shapelet_rs::{Dataset, MinerConfig, Minkowski, ShapeletEngine};

fn main() {
    let dataset = Dataset::new(
        vec![
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 1.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![1.0, 1.0, 1.0, 0.0],
        ],
        vec![1, 1, 0, 0],
    )
    .expect("valid dataset");

    let mut config = MinerConfig::fixed(2, 1);
    config.alpha = 0.05;
    config.report_all_shapelets = true;

    let engine = ShapeletEngine::new(config, Minkowski::euclidean());
    let report = engine.mine(&dataset).expect("mining failed");

    for s in &report.shapelets {
        println!(
            "series {} offset {} values {:?}: p = {:.4}, table = [{}]",
            s.shapelet.series, s.shapelet.offset, s.shapelet.values, s.p, s.table
        );
    }
}
