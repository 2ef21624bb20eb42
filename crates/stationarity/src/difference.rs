//! Regular and seasonal differencing and their inverses.
//!
//! Each differencing pass shortens the series. To undo it exactly we keep
//! the first values of every intermediate level ("heads") for in-sample
//! reconstruction and the last values ("tails") for extending a forecast
//! past the end of the sample.

/// Applies `order` first differences, `x_t - x_{t-1}`.
///
/// Returns an empty vector when the series has `order` or fewer values.
pub fn difference(values: &[f64], order: usize) -> Vec<f64> {
    let mut cur = values.to_vec();
    for _ in 0..order {
        if cur.len() < 2 {
            return Vec::new();
        }
        cur = cur.windows(2).map(|w| w[1] - w[0]).collect();
    }
    cur
}

/// Applies one seasonal difference, `x_t - x_{t-period}`.
///
/// Returns an empty vector when the series has `period` or fewer values.
pub fn seasonal_difference(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() <= period {
        return Vec::new();
    }
    values[period..]
        .iter()
        .zip(values.iter())
        .map(|(a, b)| a - b)
        .collect()
}

/// First and last value of each intermediate level `0..order` of repeated
/// differencing.
///
/// `heads[i]` / `tails[i]` belong to the series differenced `i` times.
pub fn difference_anchors(values: &[f64], order: usize) -> (Vec<f64>, Vec<f64>) {
    let mut heads = Vec::with_capacity(order);
    let mut tails = Vec::with_capacity(order);
    let mut cur = values.to_vec();
    for _ in 0..order {
        let (Some(&first), Some(&last)) = (cur.first(), cur.last()) else {
            break;
        };
        heads.push(first);
        tails.push(last);
        cur = cur.windows(2).map(|w| w[1] - w[0]).collect();
    }
    (heads, tails)
}

/// Inverts [`difference`] given the first value of every intermediate level.
///
/// The differencing order is `heads.len()`; the output has
/// `diffs.len() + heads.len()` values.
pub fn integrate(diffs: &[f64], heads: &[f64]) -> Vec<f64> {
    let mut cur = diffs.to_vec();
    for &head in heads.iter().rev() {
        let mut out = Vec::with_capacity(cur.len() + 1);
        let mut level = head;
        out.push(level);
        for d in &cur {
            level += d;
            out.push(level);
        }
        cur = out;
    }
    cur
}

/// Extends a differenced series past the end of the sample.
///
/// `tails[i]` is the last observed value of the series differenced `i`
/// times; `future` holds values of the fully differenced series.
pub fn integrate_forecast(future: &[f64], tails: &[f64]) -> Vec<f64> {
    let mut cur = future.to_vec();
    for &tail in tails.iter().rev() {
        let mut level = tail;
        for v in cur.iter_mut() {
            level += *v;
            *v = level;
        }
    }
    cur
}

/// Inverts [`seasonal_difference`] given the first `period` original values.
pub fn seasonal_integrate(diffs: &[f64], heads: &[f64]) -> Vec<f64> {
    if heads.is_empty() {
        return diffs.to_vec();
    }
    let mut out = heads.to_vec();
    out.reserve(diffs.len());
    for (t, d) in diffs.iter().enumerate() {
        let v = out[t] + d;
        out.push(v);
    }
    out
}

/// Extends a seasonally differenced series past the end of the sample
/// using the last `period` original values.
pub fn seasonal_integrate_forecast(future: &[f64], tails: &[f64]) -> Vec<f64> {
    let period = tails.len();
    if period == 0 {
        return future.to_vec();
    }
    let mut ext = tails.to_vec();
    for f in future {
        let v = ext[ext.len() - period] + f;
        ext.push(v);
    }
    ext.split_off(period)
}
