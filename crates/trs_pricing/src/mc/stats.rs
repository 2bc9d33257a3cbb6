//! Statistical helpers for the simulation engine.

/// Running sums for a Monte Carlo reduction.
///
/// Only per-path scalars are merged; each worker owns a private
/// accumulator and the merge is associative, so the reduction needs no
/// locking beyond the final combine.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Accumulator {
    /// Number of samples.
    pub n: usize,
    /// Sum of per-path present values at the contract spread.
    pub sum_pv: f64,
    /// Sum of squared per-path present values.
    pub sum_pv_sq: f64,
    /// Sum of per-path zero-spread present values.
    pub sum_zero_spread: f64,
    /// Sum of per-path spread annuities.
    pub sum_annuity: f64,
}

impl Accumulator {
    pub(crate) fn push(&mut self, pv: f64, zero_spread: f64, annuity: f64) {
        self.n += 1;
        self.sum_pv += pv;
        self.sum_pv_sq += pv * pv;
        self.sum_zero_spread += zero_spread;
        self.sum_annuity += annuity;
    }

    pub(crate) fn merge(mut self, other: Accumulator) -> Accumulator {
        self.n += other.n;
        self.sum_pv += other.sum_pv;
        self.sum_pv_sq += other.sum_pv_sq;
        self.sum_zero_spread += other.sum_zero_spread;
        self.sum_annuity += other.sum_annuity;
        self
    }

    pub(crate) fn mean(&self) -> f64 {
        self.sum_pv / self.n as f64
    }

    /// Standard error of the mean.
    pub(crate) fn std_error(&self) -> f64 {
        if self.n < 2 {
            return 0.0;
        }
        let n = self.n as f64;
        let mean = self.mean();
        let variance = ((self.sum_pv_sq / n) - mean * mean).max(0.0) * n / (n - 1.0);
        (variance / n).sqrt()
    }
}

/// Inverse of the standard normal CDF (Acklam's rational approximation).
///
/// Accurate to roughly 1e-9 over (0, 1); used to turn a confidence level
/// into its two-sided quantile.
///
/// # Panics
///
/// Panics when `p` is outside (0, 1).
pub fn inverse_normal_cdf(p: f64) -> f64 {
    assert!(p > 0.0 && p < 1.0, "probability must be in (0, 1)");

    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];

    const P_LOW: f64 = 0.02425;
    const P_HIGH: f64 = 1.0 - P_LOW;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

/// Two-sided quantile for a confidence level, e.g. 0.95 -> 1.96.
pub(crate) fn two_sided_quantile(confidence_level: f64) -> f64 {
    inverse_normal_cdf(0.5 + confidence_level / 2.0)
}
