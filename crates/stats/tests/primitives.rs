//! Integration tests for condor-stats.

use condor_stats::{
    InformationCriterion, LevelShiftConfig, NormalParams, StatsError, detect_level_shifts,
    estimate_normal_params, least_squares, negative_log_likelihood, polynomial_design,
};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

#[test]
fn estimated_params_recover_generating_distribution() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let normal = Normal::new(3.0, 2.0).unwrap();
    let sample: Vec<f64> = (0..5000).map(|_| normal.sample(&mut rng)).collect();

    let p = estimate_normal_params(&sample).unwrap();
    assert!((p.mean - 3.0).abs() < 0.1, "mean = {}", p.mean);
    assert!((p.sd() - 2.0).abs() < 0.1, "sd = {}", p.sd());
}

#[test]
fn short_samples_are_rejected() {
    for sample in [&[][..], &[1.0][..]] {
        assert!(matches!(
            estimate_normal_params(sample),
            Err(StatsError::InsufficientData { min: 2, .. })
        ));
    }
}

#[test]
fn quadratic_trend_beats_lower_degrees() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let noise = Normal::new(0.0, 0.05).unwrap();
    let n = 120;
    let y: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            1.0 + 2.0 * t - 3.0 * t * t + noise.sample(&mut rng)
        })
        .collect();

    let scores: Vec<f64> = (0..=3)
        .map(|deg| {
            let fit = least_squares(&polynomial_design(n, deg), &y).unwrap();
            InformationCriterion::Bic.score(fit.log_likelihood(), deg + 2, n)
        })
        .collect();
    assert!(scores[2] < scores[0] - 100.0, "scores = {scores:?}");
    assert!(scores[2] < scores[1] - 100.0, "scores = {scores:?}");
    // A spurious cubic term can win by chance, but only by less than the
    // penalty of one extra parameter.
    assert!(scores[2] < scores[3] + (n as f64).ln(), "scores = {scores:?}");
}

#[test]
fn ols_residual_likelihood_matches_nll_primitive() {
    let y = [1.0, 2.2, 2.8, 4.1, 5.3, 5.9, 7.2];
    let fit = least_squares(&polynomial_design(y.len(), 1), &y).unwrap();
    let sigma2 = fit.rss() / y.len() as f64;
    let nll = negative_log_likelihood(fit.residuals(), &NormalParams::new(0.0, sigma2));
    assert!((fit.log_likelihood() + nll).abs() < 1e-9);
}

#[test]
fn level_shift_in_autocorrelated_noise() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(99);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let n = 250;
    let mut data = vec![0.0; n];
    for t in 1..n {
        data[t] = 0.3 * data[t - 1] + normal.sample(&mut rng);
    }
    for v in data.iter_mut().skip(150) {
        *v += 8.0;
    }

    let shifts = detect_level_shifts(&data, &LevelShiftConfig::default()).unwrap();
    assert!(
        shifts.iter().any(|s| (s.index as i64 - 150).abs() <= 5),
        "shifts = {shifts:?}"
    );
}
