//! Coefficient parametrization and lag-polynomial algebra.
//!
//! Polynomials are stored in lag form `[1, c1, c2, ...]` meaning
//! `1 + c1 B + c2 B^2 + ...`.

/// Maps unconstrained reals to the coefficients of a stable polynomial
/// `1 - phi_1 B - ... - phi_k B^k` through partial autocorrelations
/// (Jones 1980, Monahan 1984).
///
/// Each `alpha_j` is squashed by `tanh` to a partial autocorrelation in
/// `(-1, 1)`; the Levinson-Durbin recursion then builds the coefficients.
pub(crate) fn unconstrained_to_coeffs(alpha: &[f64]) -> Vec<f64> {
    let k = alpha.len();
    let mut phi = Vec::with_capacity(k);
    for (order, r) in alpha.iter().map(|a| a.tanh()).enumerate() {
        let prev = phi.clone();
        for j in 0..order {
            phi[j] = prev[j] - r * prev[order - 1 - j];
        }
        phi.push(r);
    }
    phi
}

/// AR and MA coefficients of one candidate, split by part.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct ArmaCoefficients {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
}

/// Orders `(p, q, P, Q)` and period used to split an optimizer vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArmaOrders {
    pub p: usize,
    pub q: usize,
    pub seasonal_p: usize,
    pub seasonal_q: usize,
    pub period: usize,
}

impl ArmaOrders {
    pub fn dim(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    /// Splits `params` into its four groups and maps each group to
    /// coefficients. MA groups are negated so that `1 + theta(B)` is
    /// invertible whenever `1 - phi(B)` is stable.
    pub fn coefficients(&self, params: &[f64]) -> ArmaCoefficients {
        let (ar, rest) = params.split_at(self.p);
        let (ma, rest) = rest.split_at(self.q);
        let (sar, sma) = rest.split_at(self.seasonal_p);
        let negate = |v: Vec<f64>| v.into_iter().map(|c| -c).collect();
        ArmaCoefficients {
            ar: unconstrained_to_coeffs(ar),
            ma: negate(unconstrained_to_coeffs(ma)),
            seasonal_ar: unconstrained_to_coeffs(sar),
            seasonal_ma: negate(unconstrained_to_coeffs(sma)),
        }
    }
}

impl ArmaCoefficients {
    /// Expanded AR weights `a_k` with `u_t = sum_k a_k u_{t-k} + ...`.
    pub fn expanded_ar(&self, period: usize) -> Vec<f64> {
        let poly = lag_product(
            &ar_polynomial(&self.ar),
            &seasonal_polynomial(&ar_polynomial(&self.seasonal_ar), period),
        );
        poly.iter().skip(1).map(|c| -c).collect()
    }

    /// Expanded MA weights `b_k` with `u_t = ... + e_t + sum_k b_k e_{t-k}`.
    pub fn expanded_ma(&self, period: usize) -> Vec<f64> {
        let poly = lag_product(
            &ma_polynomial(&self.ma),
            &seasonal_polynomial(&ma_polynomial(&self.seasonal_ma), period),
        );
        poly[1..].to_vec()
    }
}

/// `1 - phi_1 B - ... - phi_k B^k`.
pub(crate) fn ar_polynomial(phi: &[f64]) -> Vec<f64> {
    std::iter::once(1.0).chain(phi.iter().map(|c| -c)).collect()
}

/// `1 + theta_1 B + ... + theta_k B^k`.
pub(crate) fn ma_polynomial(theta: &[f64]) -> Vec<f64> {
    std::iter::once(1.0).chain(theta.iter().copied()).collect()
}

/// Substitutes `B -> B^period`.
pub(crate) fn seasonal_polynomial(poly: &[f64], period: usize) -> Vec<f64> {
    if poly.len() <= 1 || period <= 1 {
        return poly.to_vec();
    }
    let mut out = vec![0.0; (poly.len() - 1) * period + 1];
    for (j, c) in poly.iter().enumerate() {
        out[j * period] = *c;
    }
    out
}

/// Product of two lag polynomials.
pub(crate) fn lag_product(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// `(1 - B)^d (1 - B^s)^D`.
pub(crate) fn integration_polynomial(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = lag_product(&poly, &[1.0, -1.0]);
    }
    if period >= 2 {
        let seasonal = seasonal_polynomial(&[1.0, -1.0], period);
        for _ in 0..seasonal_d {
            poly = lag_product(&poly, &seasonal);
        }
    }
    poly
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn empty_and_zero_inputs() {
        assert!(unconstrained_to_coeffs(&[]).is_empty());
        assert!(unconstrained_to_coeffs(&[0.0, 0.0, 0.0]).iter().all(|c| *c == 0.0));
    }

    #[test]
    fn saturates_towards_unit() {
        assert_abs_diff_eq!(unconstrained_to_coeffs(&[10.0])[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(unconstrained_to_coeffs(&[-10.0])[0], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn levinson_second_order() {
        let phi = unconstrained_to_coeffs(&[0.5, 0.3]);
        let (r0, r1) = (0.5_f64.tanh(), 0.3_f64.tanh());
        assert_abs_diff_eq!(phi[0], r0 - r1 * r0, epsilon = 1e-12);
        assert_abs_diff_eq!(phi[1], r1, epsilon = 1e-12);
    }

    #[test]
    fn second_order_region() {
        for alpha in [[1.0, -2.0], [-3.0, 2.0], [0.1, 0.2], [2.5, 2.5]] {
            let phi = unconstrained_to_coeffs(&alpha);
            assert!(phi[1].abs() < 1.0);
            assert!(phi[1] + phi[0] < 1.0);
            assert!(phi[1] - phi[0] < 1.0);
        }
    }

    #[test]
    fn ma_groups_are_negated() {
        let orders = ArmaOrders {
            p: 1,
            q: 1,
            seasonal_p: 0,
            seasonal_q: 0,
            period: 0,
        };
        let c = orders.coefficients(&[0.4, 0.4]);
        assert_abs_diff_eq!(c.ar[0], 0.4_f64.tanh(), epsilon = 1e-12);
        assert_abs_diff_eq!(c.ma[0], -0.4_f64.tanh(), epsilon = 1e-12);
    }

    #[test]
    fn seasonal_expansion_multiplies() {
        let c = ArmaCoefficients {
            ar: vec![0.5],
            seasonal_ar: vec![0.3],
            ..Default::default()
        };
        // (1 - 0.5B)(1 - 0.3B^4) = 1 - 0.5B - 0.3B^4 + 0.15B^5
        let a = c.expanded_ar(4);
        assert_eq!(a.len(), 5);
        assert_abs_diff_eq!(a[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(a[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a[3], 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(a[4], -0.15, epsilon = 1e-12);
    }

    #[test]
    fn integration_polynomials() {
        assert_eq!(integration_polynomial(2, 0, 0), vec![1.0, -2.0, 1.0]);
        assert_eq!(
            integration_polynomial(1, 1, 3),
            vec![1.0, -1.0, 0.0, -1.0, 1.0]
        );
        assert_eq!(integration_polynomial(0, 0, 0), vec![1.0]);
    }
}
