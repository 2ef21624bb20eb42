//! Model-internal differencing `(1 - B)^d (1 - B^s)^D` and its inverse
//! for forecasts.

use condor_stationarity::{
    difference, integrate_forecast, seasonal_difference, seasonal_integrate_forecast,
};

use crate::error::ArimaxError;
use crate::spec::ArimaxSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Regular,
    Seasonal(usize),
}

fn passes(spec: &ArimaxSpec) -> Vec<Pass> {
    let (_, sd, _, s) = spec.seasonal_parts();
    let mut out = vec![Pass::Regular; spec.d()];
    if s >= 2 {
        out.extend(std::iter::repeat_n(Pass::Seasonal(s), sd));
    }
    out
}

/// Every intermediate level, from the raw series to the fully differenced
/// one.
fn levels(values: &[f64], spec: &ArimaxSpec) -> Vec<Vec<f64>> {
    let mut out = vec![values.to_vec()];
    for pass in passes(spec) {
        let Some(cur) = out.last() else { break };
        let next = match pass {
            Pass::Regular => difference(cur, 1),
            Pass::Seasonal(s) => seasonal_difference(cur, s),
        };
        out.push(next);
    }
    out
}

/// Applies the differencing of `spec` to `values`.
pub(crate) fn apply(values: &[f64], spec: &ArimaxSpec) -> Vec<f64> {
    levels(values, spec).pop().unwrap_or_default()
}

/// Maps future values of the differenced series back to levels of the
/// raw series, continuing from the end of `history`.
pub(crate) fn integrate_future(
    history: &[f64],
    spec: &ArimaxSpec,
    future: &[f64],
) -> Result<Vec<f64>, ArimaxError> {
    let levels = levels(history, spec);
    let mut cur = future.to_vec();
    for (k, pass) in passes(spec).iter().enumerate().rev() {
        let lower = &levels[k];
        let need = match pass {
            Pass::Regular => 1,
            Pass::Seasonal(s) => *s,
        };
        if lower.len() < need {
            return Err(ArimaxError::InsufficientData {
                n: history.len(),
                min: spec.differencing_loss() + 1,
            });
        }
        let tail = &lower[lower.len() - need..];
        cur = match pass {
            Pass::Regular => integrate_forecast(&cur, tail),
            Pass::Seasonal(_) => seasonal_integrate_forecast(&cur, tail),
        };
    }
    Ok(cur)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn applies_regular_then_seasonal() {
        let spec = ArimaxSpec::new(0, 1, 0).with_seasonal(0, 1, 0, 2);
        let y = [1.0, 3.0, 6.0, 10.0, 15.0, 21.0];
        // diffs: 2 3 4 5 6 ; seasonal(2): 2 2 2
        assert_eq!(apply(&y, &spec), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn future_continues_history() {
        let spec = ArimaxSpec::new(0, 1, 0).with_seasonal(0, 1, 0, 2);
        let y = [1.0, 3.0, 6.0, 10.0, 15.0, 21.0];
        let out = integrate_future(&y, &spec, &[2.0, 2.0]).unwrap();
        // diffs continue 7, 8 -> levels 28, 36
        assert_abs_diff_eq!(out[0], 28.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[1], 36.0, epsilon = 1e-12);
    }

    #[test]
    fn no_differencing_is_identity() {
        let spec = ArimaxSpec::new(1, 0, 0);
        assert_eq!(apply(&[1.0, 2.0], &spec), vec![1.0, 2.0]);
        assert_eq!(integrate_future(&[1.0], &spec, &[5.0]).unwrap(), vec![5.0]);
    }
}
