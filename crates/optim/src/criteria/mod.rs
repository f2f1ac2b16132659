//! Acquisition criteria used to select the next most promising point
//! from the surrogate prediction (mean `mu`, standard deviation `sigma`).
//! Criteria values are to be maximized.
mod logei;

use libm::erfc;
use logei::log_ei_helper;
use serde::{Deserialize, Serialize};

const SQRT_2PI: f64 = 2.5066282746310007;

/// Acquisition function
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcqFunc {
    /// Expected Improvement over `fmin - xi`, scored as its logarithm
    #[default]
    Ei,
    /// Lower confidence bound `mu - kappa * sigma` (negated)
    Lcb,
}

impl AcqFunc {
    /// Name of the acquisition function
    pub fn name(&self) -> &'static str {
        match self {
            AcqFunc::Ei => "EI",
            AcqFunc::Lcb => "LCB",
        }
    }

    /// Default exploration/exploitation trade-off: `xi` for EI, `kappa` for LCB
    pub fn default_trade_off(&self) -> f64 {
        match self {
            AcqFunc::Ei => 0.01,
            AcqFunc::Lcb => 1.96,
        }
    }

    /// Criterion value for a prediction `mu`, `sigma` given the current minimum `fmin`.
    ///
    /// EI is returned as `log(EI)` so that candidates far in the tail of the
    /// predictive distribution remain ordered, `-inf` meaning no improvement at all.
    pub fn score(&self, mu: f64, sigma: f64, fmin: f64, trade_off: f64) -> f64 {
        match self {
            AcqFunc::Ei => log_expected_improvement(mu, sigma, fmin - trade_off),
            AcqFunc::Lcb => trade_off * sigma - mu,
        }
    }
}

impl std::fmt::Display for AcqFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn log_expected_improvement(mu: f64, sigma: f64, threshold: f64) -> f64 {
    let improvement = threshold - mu;
    if sigma > 0. {
        sigma.ln() + log_ei_helper(improvement / sigma)
    } else if improvement > 0. {
        improvement.ln()
    } else {
        f64::NEG_INFINITY
    }
}

/// Cumulative distribution function of Standard Normal at x
pub(crate) fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Probability density function of Standard Normal at x
pub(crate) fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / SQRT_2PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm() {
        assert_abs_diff_eq!(norm_cdf(0.), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_cdf(1.96), 0.9750021, epsilon = 1e-6);
        assert_abs_diff_eq!(norm_pdf(0.), 1. / SQRT_2PI, epsilon = 1e-12);
    }

    fn ei(mu: f64, sigma: f64, fmin: f64, xi: f64) -> f64 {
        AcqFunc::Ei.score(mu, sigma, fmin, xi).exp()
    }

    #[test]
    fn test_ei_values() {
        // no mean improvement: only the uncertainty term remains
        assert_abs_diff_eq!(ei(0., 1., 0., 0.), norm_pdf(0.), epsilon = 1e-12);
        let (mu, sigma, threshold) = (0.2, 0.5, 0.6);
        let z = (threshold - mu) / sigma;
        let expected = (threshold - mu) * norm_cdf(z) + sigma * norm_pdf(z);
        assert_abs_diff_eq!(ei(mu, sigma, 0.7, 0.1), expected, epsilon = 1e-12);
        // vanishing sigma degrades to the plain improvement
        assert_abs_diff_eq!(ei(0.5, 0., 1., 0.1), 0.4, epsilon = 1e-12);
        assert_eq!(AcqFunc::Ei.score(2., 0., 1., 0.1), f64::NEG_INFINITY);
        assert!(ei(5., 1., 0., 0.01) >= 0.);
    }

    #[test]
    fn test_ei_is_monotonic() {
        let fmin = 1.;
        let mut prev = f64::NEG_INFINITY;
        for sigma in [0.01, 0.1, 0.5, 1., 2.] {
            let v = AcqFunc::Ei.score(1.2, sigma, fmin, 0.01);
            assert!(v > prev);
            prev = v;
        }
        let mut prev = f64::NEG_INFINITY;
        for mu in [2., 1.5, 1., 0.5, 0.] {
            let v = AcqFunc::Ei.score(mu, 0.3, fmin, 0.01);
            assert!(v > prev);
            prev = v;
        }
    }

    #[test]
    fn test_ei_ordering_with_confident_model() {
        // threshold about 30 to 100 standard deviations below the predictions,
        // where the plain formula underflows to 0
        let (fmin, xi) = (2e-4, 0.01);
        let far = AcqFunc::Ei.score(0.5, 1e-3, fmin, xi);
        let near = AcqFunc::Ei.score(1e-4, 1e-4, fmin, xi);
        let nearer = AcqFunc::Ei.score(0., 1e-4, fmin, xi);
        let uncertain = AcqFunc::Ei.score(0., 3e-4, fmin, xi);
        for v in [far, near, nearer, uncertain] {
            assert!(v.is_finite());
        }
        assert!(far < near);
        assert!(near < nearer);
        assert!(nearer < uncertain);
    }

    #[test]
    fn test_lcb() {
        assert_abs_diff_eq!(AcqFunc::Lcb.score(1., 0.5, 0., 2.), 0., epsilon = 1e-12);
        assert!(AcqFunc::Lcb.score(1., 0.6, 0., 2.) > AcqFunc::Lcb.score(1., 0.5, 0., 2.));
        assert_eq!(AcqFunc::Lcb.default_trade_off(), 1.96);
        assert_eq!(AcqFunc::default(), AcqFunc::Ei);
    }
}
