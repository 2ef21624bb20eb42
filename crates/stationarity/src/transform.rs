//! Invertible target and predictor transforms.
//!
//! A [`TransformPlan`] is applied in a fixed order: variance stabilisation,
//! detrending, regular differencing, seasonal differencing. Every applied
//! step is recorded in the resulting [`TransformedSeries`] together with
//! what it needs to undo itself, and inversion walks the steps backwards.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::difference::{
    difference, difference_anchors, integrate, integrate_forecast, seasonal_difference,
    seasonal_integrate, seasonal_integrate_forecast,
};
use crate::error::StationarityError;
use crate::trend::{fit_trend, trend_value};

/// Variance-stabilising transform applied before anything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Stabilizer {
    /// Leave the scale alone.
    #[default]
    None,
    /// Natural logarithm.
    Log,
    /// Box-Cox power transform; `lambda = 0` is the logarithm.
    BoxCox {
        /// Power parameter.
        lambda: f64,
    },
}

/// What to do to a series, in application order.
///
/// # Example
///
/// ```
/// use condor_stationarity::{Stabilizer, TransformPlan};
///
/// let plan = TransformPlan::new()
///     .with_stabilizer(Stabilizer::Log)
///     .with_difference(1);
/// assert_eq!(plan.difference(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformPlan {
    stabilizer: Stabilizer,
    detrend_degree: Option<usize>,
    difference: usize,
    seasonal_period: Option<usize>,
}

impl TransformPlan {
    /// The identity plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the variance stabiliser.
    pub fn with_stabilizer(mut self, stabilizer: Stabilizer) -> Self {
        self.stabilizer = stabilizer;
        self
    }

    /// Removes a polynomial trend of the given degree.
    pub fn with_detrend(mut self, degree: usize) -> Self {
        self.detrend_degree = Some(degree);
        self
    }

    /// Applies `order` regular differences.
    pub fn with_difference(mut self, order: usize) -> Self {
        self.difference = order;
        self
    }

    /// Applies one seasonal difference at `period`.
    pub fn with_seasonal_difference(mut self, period: usize) -> Self {
        self.seasonal_period = Some(period);
        self
    }

    /// Variance stabiliser.
    pub fn stabilizer(&self) -> Stabilizer {
        self.stabilizer
    }

    /// Detrending degree, if any.
    pub fn detrend_degree(&self) -> Option<usize> {
        self.detrend_degree
    }

    /// Regular differencing order.
    pub fn difference(&self) -> usize {
        self.difference
    }

    /// Seasonal differencing period, if any.
    pub fn seasonal_period(&self) -> Option<usize> {
        self.seasonal_period
    }
}

/// One applied transform and the data needed to invert it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TransformStep {
    /// `ln(x)`.
    Log,
    /// `(x^lambda - 1) / lambda`, or `ln(x)` when `lambda = 0`.
    BoxCox {
        /// Power parameter.
        lambda: f64,
    },
    /// Subtracted polynomial trend fitted on `len` points.
    Detrend {
        /// Ascending coefficients in the scaled time index.
        coefficients: Vec<f64>,
        /// Length of the series the trend was fitted on.
        len: usize,
    },
    /// `order` regular differences.
    Difference {
        /// Differencing order.
        order: usize,
        /// First value of every intermediate level.
        heads: Vec<f64>,
        /// Last value of every intermediate level.
        tails: Vec<f64>,
    },
    /// One seasonal difference.
    SeasonalDifference {
        /// Season length.
        period: usize,
        /// First `period` values before differencing.
        heads: Vec<f64>,
        /// Last `period` values before differencing.
        tails: Vec<f64>,
    },
}

impl TransformStep {
    /// Short label used in provenance records, e.g. `"diff(1)"`.
    pub fn label(&self) -> String {
        match self {
            Self::Log => "log".to_string(),
            Self::BoxCox { lambda } => format!("boxcox({lambda})"),
            Self::Detrend { coefficients, .. } => {
                format!("detrend({})", coefficients.len().saturating_sub(1))
            }
            Self::Difference { order, .. } => format!("diff({order})"),
            Self::SeasonalDifference { period, .. } => format!("sdiff({period})"),
        }
    }

    /// Undoes this step on the in-sample values it produced.
    pub fn invert(&self, values: &[f64]) -> Result<Vec<f64>, StationarityError> {
        match self {
            Self::Log => exp_checked(values),
            Self::BoxCox { lambda } => box_cox_inverse(values, *lambda),
            Self::Detrend { coefficients, len } => {
                if values.len() != *len {
                    return Err(StationarityError::InvalidTransform {
                        reason: format!(
                            "detrend was applied to {len} values, got {}",
                            values.len()
                        ),
                    });
                }
                Ok(values
                    .iter()
                    .enumerate()
                    .map(|(t, v)| v + trend_value(coefficients, *len, t))
                    .collect())
            }
            Self::Difference { order, heads, .. } => {
                check_anchors("difference", *order, heads.len())?;
                Ok(integrate(values, heads))
            }
            Self::SeasonalDifference { period, heads, .. } => {
                check_anchors("seasonal difference", *period, heads.len())?;
                Ok(seasonal_integrate(values, heads))
            }
        }
    }

    /// Maps values that continue the transformed series past its end back
    /// through this step.
    fn invert_future(&self, future: &[f64]) -> Result<Vec<f64>, StationarityError> {
        match self {
            Self::Log => exp_checked(future),
            Self::BoxCox { lambda } => box_cox_inverse(future, *lambda),
            Self::Detrend { coefficients, len } => Ok(future
                .iter()
                .enumerate()
                .map(|(h, v)| v + trend_value(coefficients, *len, len + h))
                .collect()),
            Self::Difference { order, tails, .. } => {
                check_anchors("difference", *order, tails.len())?;
                Ok(integrate_forecast(future, tails))
            }
            Self::SeasonalDifference { period, tails, .. } => {
                check_anchors("seasonal difference", *period, tails.len())?;
                Ok(seasonal_integrate_forecast(future, tails))
            }
        }
    }
}

fn check_anchors(what: &str, expected: usize, got: usize) -> Result<(), StationarityError> {
    if expected != got {
        return Err(StationarityError::InvalidTransform {
            reason: format!("{what} expects {expected} stored values, found {got}"),
        });
    }
    Ok(())
}

/// A series after transformation, with the steps needed to undo it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedSeries {
    values: Vec<f64>,
    steps: Vec<TransformStep>,
}

impl TransformedSeries {
    /// An untransformed series.
    pub fn identity(values: Vec<f64>) -> Self {
        Self {
            values,
            steps: Vec::new(),
        }
    }

    /// Reassembles a transformed series from stored parts, e.g. a
    /// provenance record. The parts are checked on inversion.
    pub fn from_parts(values: Vec<f64>, steps: Vec<TransformStep>) -> Self {
        Self { values, steps }
    }

    /// Transformed values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Applied steps in application order.
    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    /// Consumes the series, returning the transformed values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Whether a regular or seasonal difference was applied.
    pub fn is_differenced(&self) -> bool {
        self.steps.iter().any(|s| {
            matches!(
                s,
                TransformStep::Difference { .. } | TransformStep::SeasonalDifference { .. }
            )
        })
    }

    /// Reconstructs the original series.
    ///
    /// # Errors
    ///
    /// [`StationarityError::InvalidTransform`] when a stored step does not
    /// match the values it is asked to invert.
    pub fn inverse(&self) -> Result<Vec<f64>, StationarityError> {
        let mut cur = self.values.clone();
        for step in self.steps.iter().rev() {
            cur = step.invert(&cur)?;
        }
        Ok(cur)
    }

    /// Maps values continuing the transformed series past its last
    /// observation back to original units.
    ///
    /// # Errors
    ///
    /// [`StationarityError::InvalidTransform`] when a stored step is
    /// inconsistent or a back-transform produces non-finite values.
    pub fn invert_forecast(&self, future: &[f64]) -> Result<Vec<f64>, StationarityError> {
        let mut cur = future.to_vec();
        for step in self.steps.iter().rev() {
            cur = step.invert_future(&cur)?;
        }
        Ok(cur)
    }

    fn push(&mut self, values: Vec<f64>, step: TransformStep) {
        debug!(step = %step.label(), n = values.len(), "applied transform");
        self.values = values;
        self.steps.push(step);
    }
}

/// Transforms the target series according to `plan`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StationarityError::InvalidTransform`] | log / Box-Cox of a non-positive value |
/// | [`StationarityError::InsufficientData`] | differencing or detrending would leave no values |
/// | [`StationarityError::Stats`] | non-finite values or a singular trend design |
pub fn transform_target(
    series: &[f64],
    plan: &TransformPlan,
) -> Result<TransformedSeries, StationarityError> {
    if series.iter().any(|v| !v.is_finite()) {
        return Err(condor_stats::StatsError::NonFiniteData.into());
    }
    let mut out = TransformedSeries::identity(series.to_vec());

    match plan.stabilizer() {
        Stabilizer::None => {}
        Stabilizer::Log => {
            let v = box_cox_forward(out.values(), 0.0)?;
            out.push(v, TransformStep::Log);
        }
        Stabilizer::BoxCox { lambda } => {
            let v = box_cox_forward(out.values(), lambda)?;
            out.push(v, TransformStep::BoxCox { lambda });
        }
    }

    if let Some(degree) = plan.detrend_degree() {
        let len = out.values().len();
        let coefficients = fit_trend(out.values(), degree)?;
        let v = out
            .values()
            .iter()
            .enumerate()
            .map(|(t, x)| x - trend_value(&coefficients, len, t))
            .collect();
        out.push(v, TransformStep::Detrend { coefficients, len });
    }

    let order = plan.difference();
    if order > 0 {
        let n = out.values().len();
        if n <= order {
            return Err(StationarityError::InsufficientData { n, min: order + 1 });
        }
        let (heads, tails) = difference_anchors(out.values(), order);
        let v = difference(out.values(), order);
        out.push(v, TransformStep::Difference {
            order,
            heads,
            tails,
        });
    }

    if let Some(period) = plan.seasonal_period() {
        let n = out.values().len();
        if period == 0 {
            return Err(StationarityError::InvalidTransform {
                reason: "seasonal period must be positive".into(),
            });
        }
        if n <= period {
            return Err(StationarityError::InsufficientData { n, min: period + 1 });
        }
        let heads = out.values()[..period].to_vec();
        let tails = out.values()[n - period..].to_vec();
        let v = seasonal_difference(out.values(), period);
        out.push(v, TransformStep::SeasonalDifference {
            period,
            heads,
            tails,
        });
    }

    Ok(out)
}

/// Transforms each predictor series with the same `plan`.
///
/// # Errors
///
/// The first error from [`transform_target`] on any predictor.
pub fn transform_predictors(
    predictors: &[Vec<f64>],
    plan: &TransformPlan,
) -> Result<Vec<TransformedSeries>, StationarityError> {
    predictors
        .iter()
        .map(|p| transform_target(p, plan))
        .collect()
}

fn box_cox_forward(values: &[f64], lambda: f64) -> Result<Vec<f64>, StationarityError> {
    if let Some(bad) = values.iter().find(|v| **v <= 0.0) {
        return Err(StationarityError::InvalidTransform {
            reason: format!("power transform requires positive values, found {bad}"),
        });
    }
    Ok(values
        .iter()
        .map(|x| {
            if lambda == 0.0 {
                x.ln()
            } else {
                (x.powf(lambda) - 1.0) / lambda
            }
        })
        .collect())
}

fn box_cox_inverse(values: &[f64], lambda: f64) -> Result<Vec<f64>, StationarityError> {
    if lambda == 0.0 {
        return exp_checked(values);
    }
    values
        .iter()
        .map(|y| {
            let base = lambda * y + 1.0;
            let x = base.powf(1.0 / lambda);
            if base <= 0.0 || !x.is_finite() {
                Err(StationarityError::InvalidTransform {
                    reason: format!("Box-Cox inverse undefined at {y} (lambda = {lambda})"),
                })
            } else {
                Ok(x)
            }
        })
        .collect()
}

fn exp_checked(values: &[f64]) -> Result<Vec<f64>, StationarityError> {
    values
        .iter()
        .map(|y| {
            let x = y.exp();
            if x.is_finite() {
                Ok(x)
            } else {
                Err(StationarityError::InvalidTransform {
                    reason: format!("exponential overflows at {y}"),
                })
            }
        })
        .collect()
}
