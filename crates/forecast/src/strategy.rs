//! Mapping from a classification label to the transforms and differencing
//! orders the model is fitted with.

use condor_arimax::SeasonalSearch;
use condor_stationarity::{Stabilizer, TransformPlan, make_stationary, transform_target};
use tracing::debug;

use crate::classify::{Classification, ClassificationReport};
use crate::config::EngineConfig;
use crate::error::ForecastError;

/// How a classified series is prepared for the optimizer.
///
/// `plan` holds the pointwise transforms applied outside the model
/// (stabiliser, detrending); differencing stays inside the model through
/// `d` and the seasonal search so forecasts are integrated by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformStrategy {
    /// Transforms applied to the target before fitting.
    pub plan: TransformPlan,
    /// Regular differencing order of every candidate.
    pub d: usize,
    /// Seasonal search ranges, if the series is seasonal.
    pub seasonal: Option<SeasonalSearch>,
}

impl TransformStrategy {
    /// Chooses the strategy for `report.label`.
    ///
    /// | Label | Transforms | Differencing |
    /// |-------|------------|--------------|
    /// | stationary | none | `d = 0` |
    /// | difference-stationary | log when strictly positive and enabled | `d` from [`make_stationary`] |
    /// | trend-stationary | detrend with the report's degree | `d = 0` |
    /// | level-shifted | none | `d = 1` |
    /// | seasonal | none | `D = 1`, `P, Q <= 1` |
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ForecastError::Stationarity`] | differencing up to `max_diff` does not pass the unit-root test |
    /// | [`ForecastError::InvalidConfig`] | a seasonal label without a configured period, or a trend label without a degree |
    pub fn for_label(
        report: &ClassificationReport,
        values: &[f64],
        config: &EngineConfig,
    ) -> Result<Self, ForecastError> {
        let strategy = match report.label {
            Classification::Stationary => Self::plain(0),
            Classification::LevelShifted => Self::plain(1),
            Classification::DifferenceStationary => {
                let use_log = config.log_transform() && values.iter().all(|v| *v > 0.0);
                let plan = if use_log {
                    TransformPlan::new().with_stabilizer(Stabilizer::Log)
                } else {
                    TransformPlan::new()
                };
                let stabilized = transform_target(values, &plan)?;
                // The raw series already failed the unit-root test.
                let d = make_stationary(stabilized.values(), config.stationarity())?
                    .order
                    .max(1);
                Self {
                    plan,
                    d,
                    seasonal: None,
                }
            }
            Classification::TrendStationary => {
                let degree = report.trend_degree.ok_or_else(|| ForecastError::InvalidConfig {
                    reason: "trend-stationary series without a trend degree".into(),
                })?;
                Self {
                    plan: TransformPlan::new().with_detrend(degree),
                    d: 0,
                    seasonal: None,
                }
            }
            Classification::Seasonal => {
                let period =
                    config
                        .seasonal_period()
                        .ok_or_else(|| ForecastError::InvalidConfig {
                            reason: "seasonal series without a seasonal period".into(),
                        })?;
                Self {
                    plan: TransformPlan::new(),
                    d: 0,
                    seasonal: Some(SeasonalSearch {
                        period,
                        max_p: 1,
                        d: 1,
                        max_q: 1,
                    }),
                }
            }
        };
        debug!(label = %report.label, d = strategy.d, "transform strategy");
        Ok(strategy)
    }

    fn plain(d: usize) -> Self {
        Self {
            plan: TransformPlan::new(),
            d,
            seasonal: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condor_stationarity::StationarityTest;

    fn report(label: Classification, trend_degree: Option<usize>) -> ClassificationReport {
        ClassificationReport {
            label,
            adf: StationarityTest {
                statistic: -1.0,
                p_value: 0.5,
                lags: 0,
                n_obs: 10,
                is_stationary: false,
            },
            trend_adf: None,
            level_shifts: Vec::new(),
            trend_degree,
            seasonal_autocorrelation: None,
        }
    }

    fn random_walk(n: usize) -> Vec<f64> {
        use rand::SeedableRng;
        use rand_distr::{Distribution, Normal};
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let mut level = 200.0;
        (0..n)
            .map(|_| {
                level += normal.sample(&mut rng);
                level
            })
            .collect()
    }

    #[test]
    fn stationary_and_level_shifted() {
        let cfg = EngineConfig::new();
        let values = [1.0; 20];
        let s = TransformStrategy::for_label(&report(Classification::Stationary, None), &values, &cfg)
            .unwrap();
        assert_eq!((s.d, s.plan.clone()), (0, TransformPlan::new()));
        let s =
            TransformStrategy::for_label(&report(Classification::LevelShifted, None), &values, &cfg)
                .unwrap();
        assert_eq!(s.d, 1);
        assert!(s.seasonal.is_none());
    }

    #[test]
    fn random_walk_gets_log_and_one_difference() {
        let values = random_walk(300);
        let s = TransformStrategy::for_label(
            &report(Classification::DifferenceStationary, None),
            &values,
            &EngineConfig::new(),
        )
        .unwrap();
        assert_eq!(s.plan.stabilizer(), Stabilizer::Log);
        assert_eq!(s.d, 1);
    }

    #[test]
    fn difference_label_always_differences() {
        let values: Vec<f64> = (0..200).map(|t| 50.0 + ((t * 37) % 11) as f64 - 5.0).collect();
        let s = TransformStrategy::for_label(
            &report(Classification::DifferenceStationary, None),
            &values,
            &EngineConfig::new(),
        )
        .unwrap();
        assert!(s.d >= 1);
    }

    #[test]
    fn log_skipped_when_disabled_or_non_positive() {
        let mut values = random_walk(300);
        let cfg = EngineConfig::new().with_log_transform(false);
        let label = report(Classification::DifferenceStationary, None);
        let s = TransformStrategy::for_label(&label, &values, &cfg).unwrap();
        assert_eq!(s.plan.stabilizer(), Stabilizer::None);

        values[0] = -1.0;
        let s = TransformStrategy::for_label(&label, &values, &EngineConfig::new()).unwrap();
        assert_eq!(s.plan.stabilizer(), Stabilizer::None);
    }

    #[test]
    fn trend_uses_report_degree() {
        let s = TransformStrategy::for_label(
            &report(Classification::TrendStationary, Some(2)),
            &[1.0; 20],
            &EngineConfig::new(),
        )
        .unwrap();
        assert_eq!(s.plan.detrend_degree(), Some(2));
        assert_eq!(s.d, 0);
    }

    #[test]
    fn seasonal_needs_period() {
        let label = report(Classification::Seasonal, None);
        assert!(matches!(
            TransformStrategy::for_label(&label, &[1.0; 20], &EngineConfig::new()),
            Err(ForecastError::InvalidConfig { .. })
        ));
        let cfg = EngineConfig::new().with_seasonal_period(Some(7));
        let s = TransformStrategy::for_label(&label, &[1.0; 20], &cfg).unwrap();
        assert_eq!(
            s.seasonal,
            Some(SeasonalSearch {
                period: 7,
                max_p: 1,
                d: 1,
                max_q: 1
            })
        );
    }
}
