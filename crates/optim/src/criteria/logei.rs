//! Numerically stable logarithm of the expected improvement
use libm::{erfc, exp, expm1, log, log1p};

use super::{norm_cdf, norm_pdf};

const INV_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
const LOG_2PI_OVER_2: f64 = 0.9189385332046727; // log(2π)/2
const LOG_PI_OVER_2_ALL_OVER_2: f64 = 0.2257913526447274; // log(π/2)/2
// below this threshold -2*log(|u|) is accurate
const ASYMPTOTIC_U: f64 = -1e3;
// beyond this value exp(x^2) overflows
const ERFCX_SERIES_X: f64 = 26.;

/// Scaled complementary error function `exp(x^2) * erfc(x)`
fn erfcx(x: f64) -> f64 {
    if x < ERFCX_SERIES_X {
        exp(x * x) * erfc(x)
    } else {
        let x2 = x * x;
        let series = 1. - 1. / (2. * x2) + 3. / (4. * x2 * x2) - 15. / (8. * x2 * x2 * x2);
        series / (x * std::f64::consts::PI.sqrt())
    }
}

/// `log(1 - exp(x))` for `x < 0`
fn log1mexp(x: f64) -> f64 {
    if x > -std::f64::consts::LN_2 {
        log(-expm1(x))
    } else {
        log1p(-exp(x))
    }
}

/// `log(phi(u) + u * Phi(u))`, the log of the expected improvement of a
/// standard normal variable over `-u`.
pub(crate) fn log_ei_helper(u: f64) -> f64 {
    if u > -1. {
        log(norm_pdf(u) + u * norm_cdf(u))
    } else {
        let log_phi_u = -0.5 * u * u - LOG_2PI_OVER_2;
        let log_term = if u > ASYMPTOTIC_U {
            let w = log(erfcx(-INV_SQRT_2 * u) * u.abs()) + LOG_PI_OVER_2_ALL_OVER_2;
            log1mexp(w)
        } else {
            -2. * log(u.abs())
        };
        log_phi_u + log_term
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_log_ei_helper() {
        let vals = [-2.0, -1.0, 0.0, 1.0, 2.0];
        let expected = [-4.7687836, -2.4851208, -0.9189385, 0.08002624, 0.69738346];
        for (expect, val) in expected.iter().zip(vals) {
            assert_abs_diff_eq!(*expect, log_ei_helper(val), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_log_ei_helper_far_tail() {
        // matches the direct formula where it is still representable
        for u in [-3., -8., -20.] {
            let direct = log(norm_pdf(u) + u * norm_cdf(u));
            assert_abs_diff_eq!(log_ei_helper(u), direct, epsilon = 1e-4 * direct.abs());
        }
        // strictly increasing and finite far beyond underflow of pdf and cdf
        let mut prev = f64::NEG_INFINITY;
        for u in [-5e3, -1e3, -500., -100., -40., -38., -30., -1.5, -1.] {
            let v = log_ei_helper(u);
            assert!(v.is_finite(), "log_ei_helper({u}) = {v}");
            assert!(v > prev, "log_ei_helper({u}) = {v} <= {prev}");
            prev = v;
        }
    }

    #[test]
    fn test_erfcx_branches_agree() {
        let x = ERFCX_SERIES_X - 1e-9;
        assert_abs_diff_eq!(erfcx(x), erfcx(ERFCX_SERIES_X), epsilon = 1e-9);
    }
}
