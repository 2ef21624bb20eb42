//! Point forecasts and forecast-error variances.

use tracing::debug;

use crate::differencing;
use crate::error::ArimaxError;
use crate::fit::ArimaxFit;
use crate::params::{integration_polynomial, lag_product};

impl ArimaxFit {
    /// Psi-weights `psi_0..psi_{n-1}` of the integrated model
    /// `phi(B) Phi(B^s) (1 - B)^d (1 - B^s)^D y_t = theta(B) Theta(B^s) e_t`.
    pub fn psi_weights(&self, n: usize) -> Vec<f64> {
        let (_, sd, _, period) = self.spec.seasonal_parts();
        let ar_poly: Vec<f64> = std::iter::once(1.0)
            .chain(self.coefficients.expanded_ar(period).iter().map(|a| -a))
            .collect();
        let full = lag_product(&ar_poly, &integration_polynomial(self.spec.d(), sd, period));
        // y_t = sum_k a_k y_{t-k} + ...
        let a: Vec<f64> = full.iter().skip(1).map(|c| -c).collect();
        let b = self.coefficients.expanded_ma(period);

        let mut psi = Vec::with_capacity(n);
        for j in 0..n {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let mut v = b.get(j - 1).copied().unwrap_or(0.0);
            for (i, ai) in a.iter().enumerate().take(j) {
                v += ai * psi[j - i - 1];
            }
            psi.push(v);
        }
        psi
    }

    /// Forecast-error variance `sigma2 * sum_{j<h} psi_j^2` for
    /// `h = 1..=horizon`.
    pub fn forecast_variances(&self, horizon: usize) -> Vec<f64> {
        let mut acc = 0.0;
        self.psi_weights(horizon)
            .iter()
            .map(|p| {
                acc += p * p;
                self.sigma2 * acc
            })
            .collect()
    }
}

fn check_future_exog(
    fit: &ArimaxFit,
    horizon: usize,
    future: &[Vec<f64>],
) -> Result<(), ArimaxError> {
    if future.len() != fit.spec.n_exog() {
        return Err(ArimaxError::ExogMismatch {
            reason: format!(
                "model has {} regressors, got {} future series",
                fit.spec.n_exog(),
                future.len()
            ),
        });
    }
    if let Some((i, x)) = future.iter().enumerate().find(|(_, x)| x.len() < horizon) {
        return Err(ArimaxError::ExogMismatch {
            reason: format!(
                "future regressor {i} has {} values, horizon is {horizon}",
                x.len()
            ),
        });
    }
    if future.iter().flat_map(|x| &x[..horizon]).any(|v| !v.is_finite()) {
        return Err(ArimaxError::NonFiniteData);
    }
    Ok(())
}

/// Forecasts `horizon` steps past the end of the training sample.
///
/// The ARMA recursion runs on the differenced scale with future innovations
/// set to zero; the mean equation uses `future_exog` (one vector per
/// regressor, at least `horizon` values each) differenced together with the
/// training regressors. The result is integrated back to the scale of the
/// training target.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`ArimaxError::ExogMismatch`] | wrong regressor count or too few future values |
/// | [`ArimaxError::NonFiniteData`] | NaN or infinite future regressor |
pub fn arimax_forecast(
    fit: &ArimaxFit,
    horizon: usize,
    future_exog: &[Vec<f64>],
) -> Result<Vec<f64>, ArimaxError> {
    check_future_exog(fit, horizon, future_exog)?;
    if horizon == 0 {
        return Ok(Vec::new());
    }
    let spec = fit.spec;

    // Mean equation over the horizon.
    let mut mean = vec![fit.intercept; horizon];
    for ((hist, fut), beta) in fit.exog.iter().zip(future_exog).zip(&fit.exog_coefficients) {
        let mut full = hist.clone();
        full.extend_from_slice(&fut[..horizon]);
        let z = differencing::apply(&full, &spec);
        for (m, zi) in mean.iter_mut().zip(&z[z.len() - horizon..]) {
            *m += beta * zi;
        }
    }

    // ARMA recursion on the regression noise.
    let (_, _, _, period) = spec.seasonal_parts();
    let a = fit.coefficients.expanded_ar(period);
    let b = fit.coefficients.expanded_ma(period);
    let mut u = fit.noise.clone();
    let mut e = fit.innovations.clone();
    for _ in 0..horizon {
        let t = u.len();
        let mut v = 0.0;
        for (k, ak) in a.iter().enumerate().take(t) {
            v += ak * u[t - k - 1];
        }
        for (k, bk) in b.iter().enumerate().take(t) {
            v += bk * e[t - k - 1];
        }
        u.push(v);
        e.push(0.0);
    }
    let differenced: Vec<f64> = mean
        .iter()
        .zip(&u[fit.noise.len()..])
        .map(|(m, ui)| m + ui)
        .collect();

    let points = differencing::integrate_future(&fit.target, &spec, &differenced)?;
    debug!(%spec, horizon, "forecast computed");
    Ok(points)
}
