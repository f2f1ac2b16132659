//! Surrogate models of the objective function fitted on the encoded observations
mod forest;

pub use forest::{Forest, ForestParams, TreeKind};

use crate::errors::{Result, SmboError};
use crate::types::{GpKernel, Observation};
use linfa::prelude::{Dataset, Fit};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
use smbox_gp::{ConstantMean, GaussianProcess, GpParams, Matern52Corr, SquaredExponentialCorr};

/// A fitted Gaussian process for one of the available kernels
#[derive(Clone, Debug)]
pub enum GpModel {
    /// Squared exponential kernel
    SquaredExponential(GaussianProcess<f64, ConstantMean, SquaredExponentialCorr>),
    /// Matern 5/2 kernel
    Matern52(GaussianProcess<f64, ConstantMean, Matern52Corr>),
}

/// A fitted surrogate model
#[derive(Clone, Debug)]
pub enum Surrogate {
    /// Gaussian process
    Gp(GpModel),
    /// Randomized trees ensemble
    Forest(Forest),
}

impl Surrogate {
    /// Fit a Gaussian process with a constant mean and the given correlation `kernel`
    pub fn fit_gp(
        kernel: GpKernel,
        n_start: usize,
        nugget: f64,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<Self> {
        let dataset = Dataset::new(x.to_owned(), y.to_owned());
        let model = match kernel {
            GpKernel::SquaredExponential => GpModel::SquaredExponential(
                GpParams::new(ConstantMean::default(), SquaredExponentialCorr::default())
                    .n_start(n_start)
                    .nugget(nugget)
                    .fit(&dataset)
                    .map_err(|err| SmboError::SurrogateFitError(err.to_string()))?,
            ),
            GpKernel::Matern52 => GpModel::Matern52(
                GpParams::new(ConstantMean::default(), Matern52Corr::default())
                    .n_start(n_start)
                    .nugget(nugget)
                    .fit(&dataset)
                    .map_err(|err| SmboError::SurrogateFitError(err.to_string()))?,
            ),
        };
        Ok(Surrogate::Gp(model))
    }

    /// Fit a randomized trees ensemble
    pub fn fit_forest(
        params: &ForestParams,
        x: &Array2<f64>,
        y: &Array1<f64>,
        seed: u64,
    ) -> Result<Self> {
        Ok(Surrogate::Forest(params.fit(x, y, seed)?))
    }

    /// Predict mean and standard deviation at `x` points given as (n, nx) matrix
    pub fn predict_valstd(
        &self,
        x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    ) -> Result<(Array1<f64>, Array1<f64>)> {
        match self {
            Surrogate::Gp(GpModel::SquaredExponential(gp)) => {
                let (mu, var) = gp.predict_valvar(x)?;
                Ok((mu, var.mapv(f64::sqrt)))
            }
            Surrogate::Gp(GpModel::Matern52(gp)) => {
                let (mu, var) = gp.predict_valvar(x)?;
                Ok((mu, var.mapv(f64::sqrt)))
            }
            Surrogate::Forest(forest) => Ok(forest.predict_valstd(x)),
        }
    }
}

impl std::fmt::Display for Surrogate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Surrogate::Gp(GpModel::SquaredExponential(gp)) => write!(f, "{gp}"),
            Surrogate::Gp(GpModel::Matern52(gp)) => write!(f, "{gp}"),
            Surrogate::Forest(forest) => write!(f, "Forest(n_trees={})", forest.n_trees()),
        }
    }
}

/// Training targets of the observation log: failed evaluations get the
/// worst successful value. `None` when no evaluation succeeded.
pub(crate) fn training_targets(observations: &[Observation]) -> Option<Array1<f64>> {
    let worst = observations
        .iter()
        .filter_map(|o| o.value)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |w| w.max(v))))?;
    Some(
        observations
            .iter()
            .map(|o| o.value.unwrap_or(worst))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array, Axis};
    use smbox_doe::Value;

    #[test]
    fn test_training_targets() {
        let p = vec![Value::Int(1)];
        let log = vec![
            Observation::new(p.clone(), Some(1.)),
            Observation::new(p.clone(), None),
            Observation::new(p.clone(), Some(4.)),
        ];
        assert_eq!(training_targets(&log), Some(array![1., 4., 4.]));
        assert_eq!(training_targets(&[Observation::new(p, None)]), None);
    }

    #[test]
    fn test_surrogates_interpolate_data() {
        let x = Array::linspace(0., 1., 8).insert_axis(Axis(1));
        let y = x.column(0).mapv(|v| (v - 0.3) * (v - 0.3));
        let models = vec![
            Surrogate::fit_gp(GpKernel::SquaredExponential, 4, 1e-6, &x, &y).unwrap(),
            Surrogate::fit_gp(GpKernel::Matern52, 4, 1e-6, &x, &y).unwrap(),
            Surrogate::fit_forest(
                &ForestParams::default().min_samples_leaf(1).bootstrap(false),
                &x,
                &y,
                0,
            )
            .unwrap(),
        ];
        for model in models {
            let (mu, sigma) = model.predict_valstd(&x).unwrap();
            assert_abs_diff_eq!(mu, y, epsilon = 1e-2);
            assert!(sigma.iter().all(|s| s.is_finite() && *s >= 0.));
        }
    }

    #[test]
    fn test_gp_fit_error_is_a_surrogate_error() {
        let x = array![[0.], [1.]];
        let y = array![0., f64::NAN];
        assert!(matches!(
            Surrogate::fit_gp(GpKernel::Matern52, 1, 1e-6, &x, &y),
            Err(SmboError::SurrogateFitError(_))
        ));
    }
}
