//! A module for correlation models to model the error term of the GP model.
//!
//! The following kernels are implemented:
//! * squared exponential,
//! * matern 5/2.
//!
//! Both are anisotropic: one length scale parameter `theta_l` per input component.

use linfa::Float;
use ndarray::{Array2, ArrayBase, Axis, Data, Ix1, Ix2, Zip};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

/// A trait for using a correlation model in GP regression
pub trait CorrelationModel<F: Float>: Clone + Copy + Default + fmt::Display + Sync {
    /// Compute correlation function matrix r(x, x') given distances `d` between x and x',
    /// `theta` parameters.
    ///
    /// `d` is a (n, nx) matrix of componentwise absolute differences and the result
    /// is a (n, 1) column of correlation values.
    fn value(
        &self,
        d: &ArrayBase<impl Data<Elem = F>, Ix2>,
        theta: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Array2<F>;
}

/// Squared exponential correlation models
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(into = "String"),
    serde(try_from = "String")
)]
pub struct SquaredExponentialCorr();

impl From<SquaredExponentialCorr> for String {
    fn from(_item: SquaredExponentialCorr) -> String {
        "SquaredExponential".to_string()
    }
}

impl TryFrom<String> for SquaredExponentialCorr {
    type Error = &'static str;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "SquaredExponential" {
            Ok(Self::default())
        } else {
            Err("Bad string value for SquaredExponentialCorr, should be \'SquaredExponential\'")
        }
    }
}

impl<F: Float> CorrelationModel<F> for SquaredExponentialCorr {
    ///   d    h
    /// prod prod exp( - theta_l * d_j^2 )
    ///  j=1  l=1
    fn value(
        &self,
        d: &ArrayBase<impl Data<Elem = F>, Ix2>,
        theta: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Array2<F> {
        let wd = d.mapv(|v| v * v) * theta;
        wd.sum_axis(Axis(1))
            .mapv(|v| F::exp(-v))
            .insert_axis(Axis(1))
    }
}

impl fmt::Display for SquaredExponentialCorr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SquaredExponential")
    }
}

/// Matern 5/2 correlation model
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(into = "String"),
    serde(try_from = "String")
)]
pub struct Matern52Corr();

impl From<Matern52Corr> for String {
    fn from(_item: Matern52Corr) -> String {
        "Matern52".to_string()
    }
}

impl TryFrom<String> for Matern52Corr {
    type Error = &'static str;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "Matern52" {
            Ok(Self::default())
        } else {
            Err("Bad string value for Matern52Corr, should be \'Matern52\'")
        }
    }
}

impl<F: Float> CorrelationModel<F> for Matern52Corr {
    ///   d    h
    /// prod prod (1 + sqrt(5) * theta_l * |d_j| + (5./3.) * theta_l^2 * d_j^2) exp( - sqrt(5) * theta_l * |d_j| )
    ///  j=1  l=1
    fn value(
        &self,
        d: &ArrayBase<impl Data<Elem = F>, Ix2>,
        theta: &ArrayBase<impl Data<Elem = F>, Ix1>,
    ) -> Array2<F> {
        let sqrt5 = F::cast(5.).sqrt();
        let five_thirds = F::cast(5. / 3.);
        let mut r = Array2::ones((d.nrows(), 1));
        Zip::from(r.rows_mut())
            .and(d.rows())
            .for_each(|mut r_i, d_i| {
                let mut a = F::one();
                let mut b = F::zero();
                Zip::from(&d_i).and(theta).for_each(|d_ij, theta_j| {
                    let td = *theta_j * num_traits::Float::abs(*d_ij);
                    a *= F::one() + sqrt5 * td + five_thirds * td * td;
                    b += sqrt5 * td;
                });
                r_i[0] = a * F::exp(-b);
            });
        r
    }
}

impl fmt::Display for Matern52Corr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Matern52")
    }
}
