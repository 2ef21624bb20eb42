//! Ordinary least squares via Householder QR.
//!
//! Used by the unit-root test regression, polynomial trend fits, transfer
//! function estimation and the ARIMAX regression component.

use ndarray::{Array1, Array2};

use crate::error::StatsError;

/// Relative tolerance for declaring a column linearly dependent.
const RANK_TOL: f64 = 1e-10;

/// Result of an ordinary least-squares fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquares {
    coefficients: Vec<f64>,
    residuals: Vec<f64>,
    rss: f64,
    /// Diagonal of `(X'X)^-1`, needed for coefficient standard errors.
    xtx_inv_diag: Vec<f64>,
}

impl LeastSquares {
    /// Estimated coefficients, one per design column.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Residuals `y - X beta`.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Residual sum of squares.
    pub fn rss(&self) -> f64 {
        self.rss
    }

    /// Number of observations.
    pub fn n_obs(&self) -> usize {
        self.residuals.len()
    }

    /// Standard error of coefficient `j`, using the unbiased residual
    /// variance `rss / (n - k)`.
    ///
    /// Returns `None` when `j` is out of range or there are no residual
    /// degrees of freedom.
    pub fn std_error(&self, j: usize) -> Option<f64> {
        let k = self.coefficients.len();
        let n = self.residuals.len();
        if j >= k || n <= k {
            return None;
        }
        let s2 = self.rss / (n - k) as f64;
        Some((s2 * self.xtx_inv_diag[j]).sqrt())
    }

    /// Gaussian log-likelihood of the residuals at the MLE variance
    /// `rss / n`.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.residuals.len() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let sigma2 = self.rss / n;
        if sigma2 <= 0.0 {
            return f64::INFINITY;
        }
        -0.5 * n * ((2.0 * std::f64::consts::PI * sigma2).ln() + 1.0)
    }
}

/// Solves `min ||y - X beta||^2` for a full-rank design `X` (n x k).
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StatsError::LengthMismatch`] | `y.len() != X.nrows()` |
/// | [`StatsError::InsufficientData`] | fewer rows than columns |
/// | [`StatsError::NonFiniteData`] | NaN or infinite entries |
/// | [`StatsError::Singular`] | a column is (numerically) a combination of earlier ones |
pub fn least_squares(design: &Array2<f64>, y: &[f64]) -> Result<LeastSquares, StatsError> {
    let (n, k) = design.dim();
    if y.len() != n {
        return Err(StatsError::LengthMismatch {
            expected: n,
            got: y.len(),
        });
    }
    if n < k || n == 0 {
        return Err(StatsError::InsufficientData { n, min: k.max(1) });
    }
    if design.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteData);
    }

    let mut a = design.clone();
    let mut b = Array1::from(y.to_vec());
    let col_norms: Vec<f64> = (0..k)
        .map(|j| a.column(j).iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect();

    for j in 0..k {
        let norm = (j..n).map(|i| a[[i, j]] * a[[i, j]]).sum::<f64>().sqrt();
        if norm <= RANK_TOL * col_norms[j].max(f64::MIN_POSITIVE) {
            return Err(StatsError::Singular { column: j });
        }
        let alpha = if a[[j, j]] > 0.0 { -norm } else { norm };

        // Householder vector v = x - alpha e1, stored in a scratch buffer.
        let mut v: Vec<f64> = (j..n).map(|i| a[[i, j]]).collect();
        v[0] -= alpha;
        let v_norm2: f64 = v.iter().map(|x| x * x).sum();
        if v_norm2 == 0.0 {
            continue;
        }

        for c in j..k {
            let dot: f64 = v.iter().enumerate().map(|(i, vi)| vi * a[[j + i, c]]).sum();
            let scale = 2.0 * dot / v_norm2;
            for (i, vi) in v.iter().enumerate() {
                a[[j + i, c]] -= scale * vi;
            }
        }
        let dot: f64 = v.iter().enumerate().map(|(i, vi)| vi * b[j + i]).sum();
        let scale = 2.0 * dot / v_norm2;
        for (i, vi) in v.iter().enumerate() {
            b[j + i] -= scale * vi;
        }
    }

    // Back substitution on the upper-triangular R.
    let mut beta = vec![0.0; k];
    for j in (0..k).rev() {
        let mut s = b[j];
        for c in (j + 1)..k {
            s -= a[[j, c]] * beta[c];
        }
        beta[j] = s / a[[j, j]];
    }

    // diag((R'R)^-1) = row norms of R^-1.
    let mut r_inv = Array2::<f64>::zeros((k, k));
    for col in 0..k {
        for row in (0..=col).rev() {
            let mut s = if row == col { 1.0 } else { 0.0 };
            for m in (row + 1)..=col {
                s -= a[[row, m]] * r_inv[[m, col]];
            }
            r_inv[[row, col]] = s / a[[row, row]];
        }
    }
    let xtx_inv_diag: Vec<f64> = (0..k)
        .map(|j| r_inv.row(j).iter().map(|v| v * v).sum())
        .collect();

    let fitted = design.dot(&Array1::from(beta.clone()));
    let residuals: Vec<f64> = y.iter().zip(fitted.iter()).map(|(yi, fi)| yi - fi).collect();
    let rss = residuals.iter().map(|e| e * e).sum();

    Ok(LeastSquares {
        coefficients: beta,
        residuals,
        rss,
        xtx_inv_diag,
    })
}

/// Builds a design matrix with columns `t^0, t^1, ..., t^degree` for
/// `t = 0..n`, with `t` scaled to `[0, 1]` for conditioning.
pub fn polynomial_design(n: usize, degree: usize) -> Array2<f64> {
    let scale = if n > 1 { (n - 1) as f64 } else { 1.0 };
    Array2::from_shape_fn((n, degree + 1), |(i, j)| (i as f64 / scale).powi(j as i32))
}
