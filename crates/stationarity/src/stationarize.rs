//! Iterative differencing until the unit-root test passes.

use tracing::{debug, info};

use crate::adf::{StationarityTest, test_stationarity};
use crate::config::StationarityConfig;
use crate::error::StationarityError;
use crate::transform::{TransformPlan, TransformedSeries, transform_target};

/// Output of [`make_stationary`].
#[derive(Debug, Clone, PartialEq)]
pub struct Stationarized {
    /// Number of regular differences applied.
    pub order: usize,
    /// The differenced series and its inverse bookkeeping.
    pub series: TransformedSeries,
    /// Unit-root test on the returned series.
    pub test: StationarityTest,
}

/// Differences `series` until [`test_stationarity`] passes, up to
/// `config.max_diff()` times.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StationarityError::NonStationarizable`] | still non-stationary at the cap |
/// | [`StationarityError::InsufficientData`] | the series becomes too short to test |
#[tracing::instrument(skip(series, config), fields(n = series.len()))]
pub fn make_stationary(
    series: &[f64],
    config: &StationarityConfig,
) -> Result<Stationarized, StationarityError> {
    let mut order = 0;
    loop {
        let transformed = transform_target(series, &TransformPlan::new().with_difference(order))?;
        let test = test_stationarity(transformed.values(), config)?;
        debug!(order, p_value = test.p_value, "differencing step");
        if test.is_stationary {
            info!(order, "series made stationary");
            return Ok(Stationarized {
                order,
                series: transformed,
                test,
            });
        }
        if order >= config.max_diff() {
            return Err(StationarityError::NonStationarizable {
                max_diff: config.max_diff(),
            });
        }
        order += 1;
    }
}
