//! Integration tests for the candidate search and forecast path.

use condor_arimax::{
    ArimaxError, CandidateConfig, ModelData, SearchConfig, SeasonalSearch, arimax_forecast,
    auto_arimax_optimizer, calculate_forecast_prediction_interval,
};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn generate_ar1(phi: f64, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let burn_in = 100;
    let mut y = vec![0.0; n + burn_in];
    for t in 1..y.len() {
        y[t] = phi * y[t - 1] + normal.sample(&mut rng);
    }
    y.split_off(burn_in)
}

#[test]
fn bic_search_recovers_ar1() {
    let data = ModelData::univariate(generate_ar1(0.6, 200, 42)).unwrap();
    let config = SearchConfig::new(CandidateConfig::new().with_d(0));
    let fit = auto_arimax_optimizer(&data, &config).unwrap();
    assert!(!fit.ar().is_empty(), "selected {}", fit.spec());
    assert!(
        (fit.ar()[0] - 0.6).abs() < 0.15,
        "ar[0] = {} for {}",
        fit.ar()[0],
        fit.spec()
    );
}

#[test]
fn constant_series_has_no_viable_model() {
    let data = ModelData::univariate(vec![7.5; 120]).unwrap();
    let config = SearchConfig::new(CandidateConfig::new().with_max_p(2).with_max_q(2).with_d(0));
    let err = auto_arimax_optimizer(&data, &config).unwrap_err();
    assert!(matches!(err, ArimaxError::NoViableModel { n_candidates } if n_candidates > 0));
}

#[test]
fn too_short_series_has_no_candidates() {
    let data = ModelData::univariate(vec![1.0, 2.0, 1.0, 3.0]).unwrap();
    let err = auto_arimax_optimizer(&data, &SearchConfig::default()).unwrap_err();
    assert_eq!(err, ArimaxError::NoViableModel { n_candidates: 0 });
}

#[test]
fn search_is_deterministic() {
    let data = ModelData::univariate(generate_ar1(0.4, 150, 7)).unwrap();
    let config = SearchConfig::new(CandidateConfig::new().with_max_p(2).with_max_q(2).with_d(0));
    let a = auto_arimax_optimizer(&data, &config).unwrap();
    let b = auto_arimax_optimizer(&data, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn forecast_band_widens_with_horizon() {
    let y: Vec<f64> = generate_ar1(0.5, 200, 3)
        .iter()
        .scan(100.0, |level, e| {
            *level += e;
            Some(*level)
        })
        .collect();
    let data = ModelData::univariate(y).unwrap();
    let config = SearchConfig::new(CandidateConfig::new().with_max_p(2).with_max_q(2).with_d(1));
    let fit = auto_arimax_optimizer(&data, &config).unwrap();
    let points = arimax_forecast(&fit, 15, &[]).unwrap();
    let bands = calculate_forecast_prediction_interval(&fit, &points, 0.95, 0.0).unwrap();
    assert_eq!(bands.len(), 15);
    for (b, p) in bands.iter().zip(&points) {
        assert!(b.contains(*p));
    }
    for w in bands.windows(2) {
        assert!(w[1].width() >= w[0].width());
    }
    assert!(bands[14].width() > 2.0 * bands[0].width());
}

#[test]
fn seasonal_pattern_is_carried_forward() {
    let pattern = [0.0, 2.0, 5.0, 3.0, -1.0, -4.0, 1.0];
    let mut rng = rand::rngs::StdRng::seed_from_u64(17);
    let normal = Normal::new(0.0, 0.2).unwrap();
    let y: Vec<f64> = (0..210)
        .map(|t| 50.0 + pattern[t % 7] + normal.sample(&mut rng))
        .collect();
    let data = ModelData::univariate(y).unwrap();
    let candidates = CandidateConfig::new()
        .with_max_p(1)
        .with_max_q(1)
        .with_d(0)
        .with_seasonal(SeasonalSearch {
            period: 7,
            max_p: 1,
            d: 1,
            max_q: 1,
        });
    let fit = auto_arimax_optimizer(&data, &SearchConfig::new(candidates)).unwrap();
    let points = arimax_forecast(&fit, 7, &[]).unwrap();
    for (h, p) in points.iter().enumerate() {
        let expected = 50.0 + pattern[(210 + h) % 7];
        assert!((p - expected).abs() < 1.0, "h={h}: {p} vs {expected}");
    }
}
