//! Conditional-sum-of-squares estimation of a single specification.
//!
//! The mean equation (intercept and regressors) is estimated by least
//! squares on the differenced data; the ARMA part is then fitted to the
//! regression residuals by minimizing the Gaussian negative log-likelihood
//! with the innovation variance concentrated out. The optimizer works on
//! unconstrained PACF parameters, so every candidate it visits is
//! stationary and invertible.
//!
//! **Not part of the public API.**

use argmin::core::{CostFunction, Executor};
use argmin::solver::neldermead::NelderMead;
use condor_stats::{InformationCriterion, NormalParams, least_squares, negative_log_likelihood};
use ndarray::Array2;
use tracing::debug;

use crate::data::ModelData;
use crate::differencing;
use crate::error::ArimaxError;
use crate::fit::ArimaxFit;
use crate::params::{ArmaCoefficients, ArmaOrders};
use crate::spec::ArimaxSpec;

/// Relative spread below which the differenced target counts as constant.
const CONSTANT_TOL: f64 = 1e-12;

/// Nelder-Mead iteration cap.
const MAX_ITERS: u64 = 1000;

/// Innovations `e_t = u_t - sum a_k u_{t-k} - sum b_k e_{t-k}`, zero for
/// the first `a.len()` observations.
pub(crate) fn css_innovations(noise: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let start = ar.len().min(noise.len());
    let mut e = vec![0.0; noise.len()];
    for t in start..noise.len() {
        let mut v = noise[t];
        for (k, a) in ar.iter().enumerate() {
            v -= a * noise[t - k - 1];
        }
        for (k, b) in ma.iter().enumerate().take(t) {
            v -= b * e[t - k - 1];
        }
        e[t] = v;
    }
    e
}

/// Concentrated NLL of the innovations after warm-up.
fn concentrated_nll(innovations: &[f64]) -> (f64, f64) {
    let n = innovations.len() as f64;
    let sigma2 = innovations.iter().map(|e| e * e).sum::<f64>() / n;
    let nll = negative_log_likelihood(innovations, &NormalParams::new(0.0, sigma2));
    (nll, sigma2)
}

/// Cost function for argmin: concentrated negative log-likelihood.
struct ArimaxCost<'a> {
    noise: &'a [f64],
    orders: ArmaOrders,
}

impl CostFunction for ArimaxCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let coeffs = self.orders.coefficients(params);
        let ar = coeffs.expanded_ar(self.orders.period);
        let ma = coeffs.expanded_ma(self.orders.period);
        let e = css_innovations(self.noise, &ar, &ma);
        let (nll, _) = concentrated_nll(&e[ar.len()..]);
        Ok(if nll.is_finite() { nll } else { f64::MAX })
    }
}

fn is_constant(values: &[f64]) -> bool {
    let (lo, hi, scale) = values.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0_f64),
        |(lo, hi, s), &v| (lo.min(v), hi.max(v), s.max(v.abs())),
    );
    hi - lo <= CONSTANT_TOL * scale
}

/// Least-squares mean equation on the differenced data.
///
/// Returns `(intercept, exog coefficients, residuals)`.
fn fit_mean_equation(
    spec: &ArimaxSpec,
    target: &[f64],
    regressors: &[Vec<f64>],
) -> Result<(f64, Vec<f64>, Vec<f64>), ArimaxError> {
    let with_intercept = spec.has_intercept();
    let n_cols = usize::from(with_intercept) + regressors.len();
    if n_cols == 0 {
        return Ok((0.0, Vec::new(), target.to_vec()));
    }
    let offset = usize::from(with_intercept);
    let design = Array2::from_shape_fn((target.len(), n_cols), |(i, j)| {
        if with_intercept && j == 0 {
            1.0
        } else {
            regressors[j - offset][i]
        }
    });
    let ls = least_squares(&design, target)?;
    let coeffs = ls.coefficients();
    let intercept = if with_intercept { coeffs[0] } else { 0.0 };
    Ok((intercept, coeffs[offset..].to_vec(), ls.residuals().to_vec()))
}

fn convergence(spec: &ArimaxSpec, reason: impl Into<String>) -> ArimaxError {
    ArimaxError::Convergence {
        spec: spec.to_string(),
        reason: reason.into(),
    }
}

/// Runs Nelder-Mead over the PACF parameters of `orders`.
fn optimize_arma(
    spec: &ArimaxSpec,
    noise: &[f64],
    orders: ArmaOrders,
) -> Result<ArmaCoefficients, ArimaxError> {
    let dim = orders.dim();
    if dim == 0 {
        return Ok(ArmaCoefficients::default());
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(vec![0.0; dim]);
    for i in 0..dim {
        let mut vertex = vec![0.0; dim];
        vertex[i] = 0.5;
        simplex.push(vertex);
    }

    let cost = ArimaxCost { noise, orders };
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(1e-8)
        .map_err(|e| convergence(spec, e.to_string()))?;
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(MAX_ITERS))
        .run()
        .map_err(|e| convergence(spec, e.to_string()))?;

    let state = result.state();
    if !state.best_cost.is_finite() || state.best_cost == f64::MAX {
        return Err(convergence(spec, "non-finite likelihood"));
    }
    let best = state
        .best_param
        .as_ref()
        .ok_or_else(|| convergence(spec, "optimizer returned no parameters"))?;
    debug!(%spec, iters = state.iter, nll = state.best_cost, "nelder-mead finished");
    Ok(orders.coefficients(best))
}

/// Full pipeline for one specification.
#[tracing::instrument(level = "debug", skip(data), fields(n = data.len()))]
pub(crate) fn fit_arimax(
    spec: ArimaxSpec,
    data: &ModelData,
    criterion: InformationCriterion,
) -> Result<ArimaxFit, ArimaxError> {
    if data.n_exog() != spec.n_exog() {
        return Err(ArimaxError::ExogMismatch {
            reason: format!(
                "{spec} expects {} regressors, got {}",
                spec.n_exog(),
                data.n_exog()
            ),
        });
    }

    let available = data.len().saturating_sub(spec.differencing_loss());
    let min = spec.max_lag() + spec.n_params() + 1;
    if available < min {
        return Err(ArimaxError::InsufficientData { n: available, min });
    }

    let w = differencing::apply(data.target(), &spec);
    if is_constant(&w) {
        return Err(ArimaxError::ConstantData);
    }
    let z: Vec<Vec<f64>> = data
        .exog()
        .iter()
        .map(|x| differencing::apply(x, &spec))
        .collect();

    let (intercept, exog_coefficients, noise) = fit_mean_equation(&spec, &w, &z)?;

    let (sp, _, sq, period) = spec.seasonal_parts();
    let orders = ArmaOrders {
        p: spec.p(),
        q: spec.q(),
        seasonal_p: sp,
        seasonal_q: sq,
        period,
    };
    let coefficients = optimize_arma(&spec, &noise, orders)?;

    let ar = coefficients.expanded_ar(period);
    let ma = coefficients.expanded_ma(period);
    let innovations = css_innovations(&noise, &ar, &ma);
    let warm_up = ar.len();
    let (nll, sigma2) = concentrated_nll(&innovations[warm_up..]);
    if !nll.is_finite() {
        return Err(convergence(&spec, "degenerate innovation variance"));
    }
    let log_likelihood = -nll;
    let n_obs = innovations.len() - warm_up;
    let score = criterion.score(log_likelihood, spec.n_params(), n_obs);
    debug!(%spec, log_likelihood, score, "candidate fitted");

    Ok(ArimaxFit {
        spec,
        criterion,
        score,
        log_likelihood,
        sigma2,
        coefficients,
        intercept,
        exog_coefficients,
        noise,
        innovations,
        warm_up,
        target: data.target().to_vec(),
        exog: data.exog().to_vec(),
    })
}
