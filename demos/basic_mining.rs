//! Mine significant shapelets from a small synthetic dataset and print the
//! report as JSON.

use shapelet_rs::{Dataset, MinerConfig, Minkowski, ShapeletEngine};

fn main() {
    // Class 1 series carry a sharp spike pattern; class 0 series are smooth.
    let mut series = Vec::new();
    let mut labels = Vec::new();
    for i in 0..6 {
        let mut values: Vec<f64> = (0..30).map(|t| (t as f64 * 0.4 + i as f64).sin()).collect();
        let spiky = i % 2 == 0;
        if spiky {
            values[12] += 3.0;
            values[13] -= 3.0;
            values[14] += 3.0;
        }
        series.push(values);
        labels.push(u8::from(spiky));
    }
    let dataset = Dataset::new(series, labels).expect("valid dataset");

    let mut config = MinerConfig::new(3, 5, 1);
    config.alpha = 0.05;
    config.remove_duplicates = true;

    let engine = ShapeletEngine::new(config, Minkowski::euclidean());
    let report = engine.mine(&dataset).expect("mining failed");

    println!(
        "{} significant shapelets out of {} candidates (delta = {:.3e}, k = {})",
        report.shapelets.len(),
        report.num_candidates,
        report.tarone_threshold,
        report.num_testable
    );
    println!("{}", serde_json::to_string_pretty(&report).unwrap());
}
