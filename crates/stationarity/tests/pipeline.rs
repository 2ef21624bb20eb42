//! Integration tests for condor-stationarity.

use condor_stationarity::{
    StationarityConfig, Stabilizer, TransformPlan, make_stationary, test_stationarity,
    transform_target,
};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn random_walk(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let mut data = vec![100.0; n];
    for t in 1..n {
        data[t] = data[t - 1] + normal.sample(&mut rng);
    }
    data
}

#[test]
fn random_walk_needs_one_difference() {
    let data = random_walk(300, 42);
    let out = make_stationary(&data, &StationarityConfig::default()).unwrap();
    assert_eq!(out.order, 1);
    assert_eq!(out.series.values().len(), 299);
}

#[test]
fn make_stationary_output_passes_test() {
    let cfg = StationarityConfig::default();
    for seed in [1, 2, 3] {
        let data = random_walk(200, seed);
        let out = make_stationary(&data, &cfg).unwrap();
        let retest = test_stationarity(out.series.values(), &cfg).unwrap();
        assert!(retest.is_stationary, "seed {seed}: {retest:?}");
    }
}

#[test]
fn stationarized_series_inverts_to_input() {
    let data = random_walk(150, 9);
    let out = make_stationary(&data, &StationarityConfig::default()).unwrap();
    let back = out.series.inverse().unwrap();
    for (a, b) in back.iter().zip(&data) {
        assert!((a - b).abs() <= 1e-9 * b.abs().max(1.0));
    }
}

#[test]
fn log_difference_forecast_inversion_is_positive() {
    let data = random_walk(120, 4);
    let plan = TransformPlan::new()
        .with_stabilizer(Stabilizer::Log)
        .with_difference(1);
    let ts = transform_target(&data, &plan).unwrap();
    let ext = ts.invert_forecast(&[0.0; 15]).unwrap();
    assert_eq!(ext.len(), 15);
    let last = *data.last().unwrap();
    for v in ext {
        assert!((v - last).abs() < 1e-9 * last);
    }
}
