use crate::correlation_models::*;
use crate::errors::{GpError, Result};
use crate::mean_models::*;
use crate::optimization::{optimize_params, prepare_multistart, CobylaParams};
use crate::parameters::{GpParams, GpValidParams, ThetaTuning};
use crate::utils::{pairwise_differences, DiffMatrix, NormalizedData};

use linfa::prelude::{DatasetBase, Fit, Float};
use linfa_linalg::{cholesky::*, qr::*, svd::*, triangular::*};
use ndarray::{Array, Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};

use log::{debug, warn};
use rayon::prelude::*;
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Default number of multistart for hyperparameters optimization
pub const GP_OPTIM_N_START: usize = 10;
/// Minimum of function evaluations for COBYLA optimizer
pub const GP_COBYLA_MIN_EVAL: usize = 25;
/// Maximum of function evaluations for COBYLA optimizer
pub const GP_COBYLA_MAX_EVAL: usize = 1000;

/// Internal parameters computed Gp during training
/// used later on in prediction computations
#[derive(Clone, Default, Debug)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(deserialize = "F: Deserialize<'de>"))
)]
pub(crate) struct GpInnerParams<F: Float> {
    /// Gaussian process variance
    sigma2: F,
    /// Generalized least-squares regression weights
    beta: Array2<F>,
    /// Gaussian Process weights
    gamma: Array2<F>,
    /// Cholesky decomposition of the correlation matrix \[R\]
    r_chol: Array2<F>,
    /// Solution of the linear equation system : \[R\] x Ft = y
    ft: Array2<F>,
    /// R upper triangle matrix of QR decomposition of the matrix Ft
    ft_qr_r: Array2<F>,
}

/// A GP regression is an interpolation method where the
/// interpolated values are modeled by a Gaussian process with a mean and
/// governed by a prior covariance kernel, which depends on some
/// parameters to be determined.
///
/// The interpolated output is modeled as stochastic process as follows:
///
/// `Y(x) = mu(x) + Z(x)`
///
/// where:
/// * `mu(x)` is the trend i.e. the mean of the gaussian process
/// * `Z(x)` the realization of stochastic gaussian process ~ `Normal(0, sigma^2)`
///
/// The correlation length scales `theta` are fitted by maximizing the reduced
/// likelihood with a multistarted COBYLA optimizer working on log10(theta).
///
/// # Example
///
/// ```no_run
/// use smbox_gp::{ConstantMean, GaussianProcess, SquaredExponentialCorr};
/// use linfa::prelude::*;
/// use ndarray::{arr2, concatenate, Array, Array1, Array2, Axis};
///
/// // one-dimensional test function to approximate
/// fn xsinx(x: &Array2<f64>) -> Array1<f64> {
///     ((x - 3.5) * ((x - 3.5) / std::f64::consts::PI).mapv(|v| v.sin())).remove_axis(Axis(1))
/// }
///
/// let xt = arr2(&[[0.0], [5.0], [10.0], [15.0], [18.0], [20.0], [25.0]]);
/// let yt = xsinx(&xt);
///
/// let gp = GaussianProcess::<f64, ConstantMean, SquaredExponentialCorr>::params(
///     ConstantMean::default(),
///     SquaredExponentialCorr::default(),
/// )
/// .fit(&Dataset::new(xt, yt))
/// .expect("GP fit error");
///
/// let xtest = Array::linspace(0., 25., 26).insert_axis(Axis(1));
/// let (ytest, vtest) = gp.predict_valvar(&xtest).expect("GP prediction");
/// println!("{ytest} +/- {}", vtest.mapv(f64::sqrt));
/// ```
#[derive(Debug)]
#[cfg_attr(
    feature = "serializable",
    derive(Serialize, Deserialize),
    serde(bound(
        serialize = "F: Serialize, Mean: Serialize, Corr: Serialize",
        deserialize = "F: Deserialize<'de>, Mean: Deserialize<'de>, Corr: Deserialize<'de>"
    ))
)]
pub struct GaussianProcess<F: Float, Mean: RegressionModel<F>, Corr: CorrelationModel<F>> {
    /// Parameter of the autocorrelation model
    theta: Array1<F>,
    /// Reduced likelihood value (result from internal optimization)
    likelihood: F,
    /// Gaussian process internal fitted params
    inner_params: GpInnerParams<F>,
    /// Training inputs
    xt_norm: NormalizedData<F>,
    /// Training outputs
    yt_norm: NormalizedData<F>,
    /// Parameters used to fit this model
    params: GpValidParams<F, Mean, Corr>,
}

/// Kriging as GP special case when using constant mean and squared exponential correlation
pub type Kriging<F> = GpParams<F, ConstantMean, SquaredExponentialCorr>;

impl<F: Float> Kriging<F> {
    /// Kriging parameters constructor
    pub fn params() -> GpParams<F, ConstantMean, SquaredExponentialCorr> {
        GpParams::new(ConstantMean(), SquaredExponentialCorr())
    }
}

impl<F: Float, Mean: RegressionModel<F>, Corr: CorrelationModel<F>> Clone
    for GaussianProcess<F, Mean, Corr>
{
    fn clone(&self) -> Self {
        Self {
            theta: self.theta.to_owned(),
            likelihood: self.likelihood,
            inner_params: self.inner_params.clone(),
            xt_norm: self.xt_norm.clone(),
            yt_norm: self.yt_norm.clone(),
            params: self.params.clone(),
        }
    }
}

impl<F: Float, Mean: RegressionModel<F>, Corr: CorrelationModel<F>> fmt::Display
    for GaussianProcess<F, Mean, Corr>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "GP(mean={}, corr={}, theta={}, variance={}, likelihood={})",
            self.params.mean,
            self.params.corr,
            self.theta,
            self.inner_params.sigma2,
            self.likelihood,
        )
    }
}

impl<F: Float, Mean: RegressionModel<F>, Corr: CorrelationModel<F>> GaussianProcess<F, Mean, Corr> {
    /// Gp parameters contructor
    pub fn params<NewMean: RegressionModel<F>, NewCorr: CorrelationModel<F>>(
        mean: NewMean,
        corr: NewCorr,
    ) -> GpParams<F, NewMean, NewCorr> {
        GpParams::new(mean, corr)
    }

    /// Predict output values at n given `x` points of nx components specified as a (n, nx) matrix.
    /// Returns n scalar output values as a vector (n,).
    pub fn predict(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array1<F>> {
        self.check_input_dim(x)?;
        let xnorm = (x - &self.xt_norm.mean) / &self.xt_norm.std;
        let corr = self.compute_correlation(&xnorm)?;
        Ok(self.scaled_predictor(&xnorm, &corr))
    }

    /// Predict variance values at n given `x` points of nx components specified as a (n, nx) matrix.
    /// Returns n variance values as (n,) column vector.
    pub fn predict_var(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array1<F>> {
        self.check_input_dim(x)?;
        let xnorm = (x - &self.xt_norm.mean) / &self.xt_norm.std;
        let corr = self.compute_correlation(&xnorm)?;
        self.mse(&xnorm, &corr)
    }

    /// Predict both output values and variance at n given `x` points of nx components
    pub fn predict_valvar(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<(Array1<F>, Array1<F>)> {
        self.check_input_dim(x)?;
        let xnorm = (x - &self.xt_norm.mean) / &self.xt_norm.std;
        let corr = self.compute_correlation(&xnorm)?;
        let yp = self.scaled_predictor(&xnorm, &corr);
        let vmse = self.mse(&xnorm, &corr)?;
        Ok((yp, vmse))
    }

    fn check_input_dim(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<()> {
        if x.ncols() != self.xt_norm.ncols() {
            return Err(GpError::InvalidValueError(format!(
                "Input dimension {} does not match training dimension {}",
                x.ncols(),
                self.xt_norm.ncols()
            )));
        }
        Ok(())
    }

    /// Mean prediction given normalized x and its correlation with the training points
    fn scaled_predictor(
        &self,
        xnorm: &ArrayBase<impl Data<Elem = F>, Ix2>,
        corr: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Array1<F> {
        let f = self.params.mean.value(xnorm);
        let y_ = &f.dot(&self.inner_params.beta) + &corr.dot(&self.inner_params.gamma);
        (&y_ * &self.yt_norm.std + &self.yt_norm.mean).remove_axis(Axis(1))
    }

    fn mse(
        &self,
        xnorm: &ArrayBase<impl Data<Elem = F>, Ix2>,
        corr: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<Array1<F>> {
        let (rt, u) = self.compute_rt_u(xnorm, corr)?;

        let mut mse = Array::ones(rt.ncols()) - rt.mapv(|v| v * v).sum_axis(Axis(0))
            + u.mapv(|v: F| v * v).sum_axis(Axis(0));
        mse.mapv_inplace(|v| self.inner_params.sigma2 * v);

        // Mean Squared Error might be slightly negative depending on
        // machine precision: set to zero in that case
        Ok(mse.mapv(|v| if v < F::zero() { F::zero() } else { v }))
    }

    /// Compute `rt` and `u` matrices used to get variances
    fn compute_rt_u(
        &self,
        xnorm: &ArrayBase<impl Data<Elem = F>, Ix2>,
        corr: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<(Array2<F>, Array2<F>)> {
        let inners = &self.inner_params;

        let corr_t = corr.t().to_owned();
        let rt = inners.r_chol.solve_triangular(&corr_t, UPLO::Lower)?;

        let rhs = inners.ft.t().dot(&rt) - self.params.mean.value(xnorm).t();
        let u = inners.ft_qr_r.t().solve_triangular(&rhs, UPLO::Lower)?;
        Ok((rt, u))
    }

    /// Compute correlation matrix between x points, specified as a (n, nx) matrix,
    /// and training points
    fn compute_correlation(&self, xnorm: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Array2<F>> {
        // Get pairwise componentwise L1-distances to the input training set
        let dx = pairwise_differences(xnorm, &self.xt_norm.data).mapv(|v| num_traits::Float::abs(v));
        let r = self.params.corr.value(&dx, &self.theta);
        let n_obs = xnorm.nrows();
        let nt = self.xt_norm.data.nrows();
        r.into_shape((n_obs, nt)).map_err(|e| {
            GpError::InvalidValueError(format!("Bad correlation matrix shape: {e}"))
        })
    }

    /// Retrieve optimized hyperparameters theta
    pub fn theta(&self) -> &Array1<F> {
        &self.theta
    }

    /// Estimated variance
    pub fn variance(&self) -> F {
        self.inner_params.sigma2
    }

    /// Retrieve reduced likelihood value
    pub fn likelihood(&self) -> F {
        self.likelihood
    }

    /// Retrieve input and output dimensions
    pub fn dims(&self) -> (usize, usize) {
        (self.xt_norm.ncols(), self.yt_norm.ncols())
    }

    /// Parameters used to fit this model
    pub fn fitted_params(&self) -> &GpValidParams<F, Mean, Corr> {
        &self.params
    }
}

impl<F: Float, Mean: RegressionModel<F>, Corr: CorrelationModel<F>, D: Data<Elem = F>>
    Fit<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>, GpError> for GpValidParams<F, Mean, Corr>
{
    type Object = GaussianProcess<F, Mean, Corr>;

    /// Fit GP parameters using maximum likelihood
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D, Ix1>>,
    ) -> Result<Self::Object> {
        let x = dataset.records();
        let y = dataset.targets().to_owned().insert_axis(Axis(1));

        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(GpError::InvalidValueError(format!(
                "Training data should not be empty, got x of shape {:?}",
                x.dim()
            )));
        }
        if x.nrows() != y.nrows() {
            return Err(GpError::InvalidValueError(format!(
                "Training inputs ({}) and outputs ({}) sizes do not match",
                x.nrows(),
                y.nrows()
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(GpError::InvalidValueError(
                "Training data should only contain finite values".to_string(),
            ));
        }

        let dim = x.ncols();
        let init = self.theta_tuning().init();
        let theta0 = if init.len() == 1 {
            Array1::from_elem(dim, init[0])
        } else if init.len() == dim {
            init.to_owned()
        } else {
            return Err(GpError::InvalidValueError(format!(
                "Initial guess for theta should be either 1-dim or dim of xtrain ({dim}), got {}",
                init.len()
            )));
        };

        let xtrain = NormalizedData::new(x);
        let ytrain = NormalizedData::new(&y);

        let x_distances = DiffMatrix::new(&xtrain.data);
        if x_distances
            .d
            .rows()
            .into_iter()
            .any(|row| row.iter().all(|v| *v == F::zero()))
        {
            warn!("Multiple training points share the same location");
        }
        let fx = self.mean().value(&xtrain.data);

        let opt_params = match self.theta_tuning() {
            ThetaTuning::Fixed(_) => theta0,
            ThetaTuning::Optimized { init: _, bounds } => {
                let base: f64 = 10.;
                let objfn = |x: &[f64], _gradient: Option<&mut [f64]>, _params: &mut ()| -> f64 {
                    let theta = x.iter().map(|v| F::cast(base.powf(*v))).collect::<Array1<F>>();
                    // optimizer may return nan values
                    if theta.iter().any(|v| !v.is_finite()) {
                        return f64::INFINITY;
                    }
                    let rxx = self.corr().value(&x_distances.d, &theta);
                    match reduced_likelihood(&fx, rxx, &x_distances, &ytrain, self.nugget()) {
                        Ok(r) => {
                            let lkh = r.0.to_f64().unwrap_or(f64::NAN);
                            if lkh.is_finite() {
                                -lkh
                            } else {
                                f64::INFINITY
                            }
                        }
                        Err(_) => f64::INFINITY,
                    }
                };

                let bounds = if bounds.len() == 1 {
                    vec![bounds[0]; dim]
                } else if bounds.len() == dim {
                    bounds.to_vec()
                } else {
                    return Err(GpError::InvalidValueError(format!(
                        "Bounds for theta should be either 1-dim or dim of xtrain ({dim}), got {}",
                        bounds.len()
                    )));
                };
                // start from within bounds
                let theta0 = Array1::from_iter(
                    theta0
                        .iter()
                        .zip(bounds.iter())
                        .map(|(t, (lo, up))| t.max(*lo).min(*up)),
                );

                let (theta_inits, bounds) =
                    prepare_multistart(self.n_start(), &theta0, &bounds, self.seed());
                debug!("Optimize with multistart theta = {theta_inits:?} and bounds = {bounds:?}");
                let now = Instant::now();
                let opt_params = (0..theta_inits.nrows())
                    .into_par_iter()
                    .map(|i| {
                        optimize_params(
                            objfn,
                            &theta_inits.row(i).to_owned(),
                            &bounds,
                            CobylaParams {
                                maxeval: (10 * theta_inits.ncols())
                                    .clamp(GP_COBYLA_MIN_EVAL, self.max_eval()),
                                ..CobylaParams::default()
                            },
                        )
                    })
                    .reduce(
                        || (f64::INFINITY, theta_inits.row(0).mapv(|v| v.to_f64().unwrap_or(0.))),
                        |a, b| if b.0 < a.0 { b } else { a },
                    );
                debug!("elapsed optim = {:?}", now.elapsed().as_millis());
                opt_params.1.mapv(|v| F::cast(base.powf(v)))
            }
        };

        let rxx = self.corr().value(&x_distances.d, &opt_params);
        let (lkh, inner_params) =
            reduced_likelihood(&fx, rxx, &x_distances, &ytrain, self.nugget())?;
        Ok(GaussianProcess {
            theta: opt_params,
            likelihood: lkh,
            inner_params,
            xt_norm: xtrain,
            yt_norm: ytrain,
            params: self.clone(),
        })
    }
}

/// Compute reduced likelihood function
/// fx: mean factors term at x samples,
/// rxx: correlation factors at x samples,
/// x_distances: pairwise distances between x samples
/// ytrain: normalized output training values
/// nugget: factor to improve numerical stability
fn reduced_likelihood<F: Float>(
    fx: &ArrayBase<impl Data<Elem = F>, Ix2>,
    rxx: ArrayBase<impl Data<Elem = F>, Ix2>,
    x_distances: &DiffMatrix<F>,
    ytrain: &NormalizedData<F>,
    nugget: F,
) -> Result<(F, GpInnerParams<F>)> {
    // Set up R
    let mut r_mx: Array2<F> = Array2::<F>::eye(x_distances.n_obs).mapv(|v| v + v * nugget);
    for (i, ij) in x_distances.d_indices.outer_iter().enumerate() {
        r_mx[[ij[0], ij[1]]] = rxx[[i, 0]];
        r_mx[[ij[1], ij[0]]] = rxx[[i, 0]];
    }
    // R cholesky decomposition
    let r_chol = r_mx.cholesky()?;
    // Solve generalized least squared problem
    let ft = r_chol.solve_triangular(fx, UPLO::Lower)?;
    let (ft_qr_q, ft_qr_r) = ft.qr()?.into_decomp();

    // Check whether we have an ill-conditionned problem
    let (_, sv_qr_r, _) = ft_qr_r.svd(false, false)?;
    if condition_inverse(&sv_qr_r) < F::cast(1e-10) {
        let (_, sv_f, _) = fx.svd(false, false)?;
        if condition_inverse(&sv_f) < F::cast(1e-15) {
            return Err(GpError::LikelihoodComputationError(
                "F is too ill conditioned. Poor combination \
                of regression model and observations."
                    .to_string(),
            ));
        } else {
            return Err(GpError::LikelihoodComputationError(
                "ft is too ill conditioned, try another theta again".to_string(),
            ));
        }
    }
    let yt = r_chol.solve_triangular(&ytrain.data, UPLO::Lower)?;

    let beta = ft_qr_r.solve_triangular_into(ft_qr_q.t().dot(&yt), UPLO::Upper)?;
    let rho = yt - ft.dot(&beta);
    let rho_sqr = rho.mapv(|v| v * v).sum_axis(Axis(0));

    let gamma = r_chol.t().solve_triangular_into(rho, UPLO::Upper)?;
    // The determinant of R is equal to the squared product of
    // the diagonal elements of its Cholesky decomposition r_chol
    let n_obs: F = F::cast(x_distances.n_obs);

    let logdet = r_chol.diag().mapv(|v: F| v.log10()).sum() * F::cast(2.) / n_obs;

    // Reduced likelihood
    let sigma2 = rho_sqr / n_obs;
    let reduced_likelihood = -n_obs * (sigma2.sum().log10() + logdet);

    Ok((
        reduced_likelihood,
        GpInnerParams {
            sigma2: sigma2[0] * ytrain.std[0] * ytrain.std[0],
            beta,
            gamma,
            r_chol,
            ft,
            ft_qr_r,
        },
    ))
}

/// Ratio of the smallest over the largest singular values
fn condition_inverse<F: Float>(sv: &Array1<F>) -> F {
    let (min, max) = sv.iter().fold((F::infinity(), F::zero()), |(lo, hi), v| {
        (lo.min(*v), hi.max(*v))
    });
    if max > F::zero() {
        min / max
    } else {
        F::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use argmin_testfunctions::rosenbrock;
    use linfa::prelude::Dataset;
    use ndarray::{arr1, arr2, array, Zip};
    use ndarray_rand::rand::SeedableRng;
    use paste::paste;
    use rand_xoshiro::Xoshiro256Plus;
    use smbox_doe::{Lhs, LhsKind, SamplingMethod};

    #[test]
    fn test_constant_function() {
        let dim = 3;
        let lim = array![[0., 1.]];
        let xlimits = lim.broadcast((dim, 2)).unwrap();
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let nt = 5;
        let xt = Lhs::new(&xlimits).sample(nt, &mut rng);
        let yt = Array::from_vec(vec![3.1; nt]);
        let gp = GaussianProcess::<f64, ConstantMean, SquaredExponentialCorr>::params(
            ConstantMean::default(),
            SquaredExponentialCorr::default(),
        )
        .theta_init(array![0.1])
        .fit(&Dataset::new(xt, yt))
        .expect("GP fit error");
        let xtest = Lhs::new(&xlimits).sample(nt, &mut rng);
        let ytest = gp.predict(&xtest).expect("prediction error");
        assert_abs_diff_eq!(Array::from_elem((nt,), 3.1), ytest, epsilon = 1e-6);
    }

    macro_rules! test_gp {
        ($regr:ident, $corr:ident) => {
            paste! {

                #[test]
                fn [<test_gp_ $regr:snake _ $corr:snake >]() {
                    let xt = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
                    let yt = array![0.0, 1.0, 1.5, 0.9, 1.0];
                    let gp = GaussianProcess::<f64, [<$regr Mean>], [<$corr Corr>] >::params(
                        [<$regr Mean>]::default(),
                        [<$corr Corr>]::default(),
                    )
                    .theta_init(array![0.1])
                    .fit(&Dataset::new(xt.clone(), yt.clone()))
                    .expect("GP fit error");
                    let yvals = gp
                        .predict(&arr2(&[[1.0], [3.5]]))
                        .expect("prediction error");
                    let expected_y = arr1(&[1.0, 0.9]);
                    assert_abs_diff_eq!(expected_y, yvals, epsilon = 0.5);

                    let yvars = gp
                        .predict_var(&arr2(&[[1.0], [3.5]]))
                        .expect("prediction error");
                    let expected_vars = arr1(&[0., 0.1]);
                    assert_abs_diff_eq!(expected_vars, yvars, epsilon = 0.5);

                    // interpolation at training points
                    let (ytrain, vtrain) = gp.predict_valvar(&xt).expect("prediction error");
                    assert_abs_diff_eq!(ytrain, yt, epsilon = 1e-3);
                    assert!(vtrain.iter().all(|v| *v >= 0. && *v < 1e-3));
                }
            }
        };
    }

    test_gp!(Constant, SquaredExponential);
    test_gp!(Constant, Matern52);
    test_gp!(Linear, SquaredExponential);
    test_gp!(Linear, Matern52);

    fn rosenb(x: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Array1<f64> {
        let mut y: Array1<f64> = Array1::zeros((x.nrows(),));
        Zip::from(&mut y).and(x.rows()).par_for_each(|yi, xi| {
            *yi = rosenbrock(&xi.to_vec());
        });
        y
    }

    #[test]
    fn test_rosenbrock_surrogate() {
        let xlimits = array![[-2., 2.], [-2., 2.]];
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let xt = Lhs::new(&xlimits)
            .kind(LhsKind::Maximin)
            .sample(40, &mut rng);
        let yt = rosenb(&xt);
        let gp = Kriging::params()
            .fit(&Dataset::new(xt.clone(), yt.clone()))
            .expect("GP fit error");
        let ypred = gp.predict(&xt).expect("prediction error");
        let rel_err = (&ypred - &yt).mapv(|v| v.abs()).sum() / yt.mapv(|v| v.abs()).sum();
        assert!(rel_err < 1e-2, "relative error {rel_err}");
        assert!(gp.theta().iter().all(|t| *t >= 1e-2 - 1e-8 && *t <= 1e1 + 1e-8));
    }

    #[test]
    fn test_variance_grows_away_from_data() {
        let xt = array![[0.0], [0.25], [0.5]];
        let yt = array![0.0, 0.5, 0.2];
        let gp = Kriging::params()
            .fit(&Dataset::new(xt, yt))
            .expect("GP fit error");
        let vars = gp
            .predict_var(&array![[0.25], [0.75], [1.5]])
            .expect("prediction error");
        assert!(vars[0] < vars[1]);
        assert!(vars[1] <= vars[2] + 1e-12);
    }

    #[test]
    fn test_fixed_theta() {
        let xt: Array2<f64> = array![[0.0], [1.0], [2.0], [3.0], [4.0]];
        let yt: Array1<f64> = array![0.0, 1.0, 1.5, 0.9, 1.0];
        let gp = Kriging::params()
            .theta_tuning(ThetaTuning::Fixed(array![0.1]))
            .fit(&Dataset::new(xt, yt))
            .expect("GP fit error");
        assert_abs_diff_eq!(*gp.theta(), array![0.1]);
        assert!(gp.likelihood().is_finite());
        assert!(gp.variance() > 0.);
    }

    #[test]
    fn test_invalid_inputs() {
        let gp = Kriging::params()
            .fit(&Dataset::new(array![[0.0], [1.0]], array![0.0, 1.0]))
            .expect("GP fit error");
        assert!(matches!(
            gp.predict(&array![[0.0, 1.0]]),
            Err(GpError::InvalidValueError(_))
        ));

        let empty = Dataset::new(Array2::<f64>::zeros((0, 1)), Array1::zeros(0));
        assert!(Kriging::params().fit(&empty).is_err());

        let with_nan = Dataset::new(array![[0.0], [1.0]], array![f64::NAN, 1.0]);
        assert!(Kriging::params().fit(&with_nan).is_err());

        let bad_theta = Kriging::params()
            .theta_init(array![0.1, 0.1, 0.1])
            .fit(&Dataset::new(array![[0.0], [1.0]], array![0.0, 1.0]));
        assert!(bad_theta.is_err());
    }

    #[test]
    fn test_fit_is_deterministic() {
        let xt: Array2<f64> = array![[0.1, 0.9], [0.4, 0.2], [0.7, 0.5], [0.9, 0.1], [0.3, 0.6]];
        let yt = xt.map_axis(Axis(1), |r| (r[0] - 0.3).powi(2) + r[1]);
        let gp1 = Kriging::params()
            .fit(&Dataset::new(xt.clone(), yt.clone()))
            .unwrap();
        let gp2 = Kriging::params().fit(&Dataset::new(xt, yt)).unwrap();
        assert_abs_diff_eq!(gp1.theta(), gp2.theta());
    }
}
