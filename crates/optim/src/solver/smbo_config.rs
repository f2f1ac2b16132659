//! Smbo optimizer configuration.
use crate::criteria::AcqFunc;
use crate::errors::{Result, SmboError};
use crate::surrogates::ForestParams;
use crate::types::*;
use smbox_doe::{display_point, InitialDesign, Point, Space};

use serde::{Deserialize, Serialize};

/// Smbo optimizer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SmboConfig {
    /// Total number of objective evaluations (initial design included)
    pub(crate) n_calls: usize,
    /// Number of evaluations before the first surrogate fit (user points `x0` included)
    pub(crate) n_initial_points: usize,
    /// A random generator seed used to get reproducible results,
    /// drawn from entropy when not specified.
    pub(crate) seed: Option<u64>,
    /// Surrogate model family
    pub(crate) surrogate: SurrogateKind,
    /// Acquisition function maximized to propose the next point
    pub(crate) acq_func: AcqFunc,
    /// Exploration/exploitation trade-off (`xi` for EI, `kappa` for LCB),
    /// the acquisition default when not specified
    pub(crate) trade_off: Option<f64>,
    /// Sampling of the initial points
    pub(crate) initial_design: InitialDesign,
    /// Points evaluated first, before the initial design
    pub(crate) x0: Vec<Point>,
    /// Number of random candidates scored by the acquisition function
    pub(crate) n_points: usize,
    /// Number of best candidates locally refined
    pub(crate) n_restarts: usize,
    /// Number of concurrent evaluations of the initial design:
    /// 1 for sequential, -1 for all available cores
    pub(crate) n_jobs: i32,
    /// Known target minimum used to stop the optimization once reached
    pub(crate) target: Option<f64>,
    /// Maximum wall-clock duration of the optimization in seconds,
    /// checked between iterations
    pub(crate) max_time: Option<u64>,
    /// Directory to save the configuration and the optimization history
    pub(crate) outdir: Option<String>,
    /// Correlation kernel of the Gaussian process surrogate
    pub(crate) gp_kernel: GpKernel,
    /// Number of restarts of the GP hyperparameters optimization
    pub(crate) gp_n_start: usize,
    /// Jitter added to the GP correlation matrix diagonal
    pub(crate) gp_nugget: f64,
    /// Randomized trees ensemble parameters
    pub(crate) forest: ForestParams,
}

impl Default for SmboConfig {
    fn default() -> Self {
        SmboConfig {
            n_calls: 100,
            n_initial_points: 10,
            seed: None,
            surrogate: SurrogateKind::Gp,
            acq_func: AcqFunc::Ei,
            trade_off: None,
            initial_design: InitialDesign::Random,
            x0: vec![],
            n_points: 1000,
            n_restarts: 5,
            n_jobs: 1,
            target: None,
            max_time: None,
            outdir: None,
            gp_kernel: GpKernel::Matern52,
            gp_n_start: 5,
            gp_nugget: 1e-6,
            forest: ForestParams::default(),
        }
    }
}

impl SmboConfig {
    /// Sets the total number of objective evaluations, which should not be less
    /// than `n_initial_points` (default 10)
    pub fn n_calls(mut self, n_calls: usize) -> Self {
        self.n_calls = n_calls;
        self
    }

    /// Sets the number of evaluations done before fitting a first surrogate
    pub fn n_initial_points(mut self, n_initial_points: usize) -> Self {
        self.n_initial_points = n_initial_points;
        self
    }

    /// Allow to specify a seed for random number generator to allow
    /// reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the surrogate model family
    pub fn surrogate(mut self, surrogate: SurrogateKind) -> Self {
        self.surrogate = surrogate;
        self
    }

    /// Sets the acquisition function
    pub fn acq_func(mut self, acq_func: AcqFunc) -> Self {
        self.acq_func = acq_func;
        self
    }

    /// Sets the acquisition trade-off parameter (`xi` for EI, `kappa` for LCB)
    pub fn trade_off(mut self, trade_off: f64) -> Self {
        self.trade_off = Some(trade_off);
        self
    }

    /// Sets the initial design sampling method
    pub fn initial_design(mut self, initial_design: InitialDesign) -> Self {
        self.initial_design = initial_design;
        self
    }

    /// Sets points to be evaluated first
    pub fn x0(mut self, x0: Vec<Point>) -> Self {
        self.x0 = x0;
        self
    }

    /// Sets the number of candidates scored by the acquisition function at each iteration
    pub fn n_points(mut self, n_points: usize) -> Self {
        self.n_points = n_points;
        self
    }

    /// Sets the number of best candidates locally refined at each iteration
    pub fn n_restarts(mut self, n_restarts: usize) -> Self {
        self.n_restarts = n_restarts;
        self
    }

    /// Sets the number of concurrent initial evaluations (-1 uses all cores)
    pub fn n_jobs(mut self, n_jobs: i32) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    /// Sets a known target minimum to be used as a stopping criterion.
    pub fn target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets a time limit in seconds
    pub fn max_time(mut self, seconds: u64) -> Self {
        self.max_time = Some(seconds);
        self
    }

    /// Sets a directory to write the configuration and optimization history
    pub fn outdir(mut self, outdir: impl Into<String>) -> Self {
        self.outdir = Some(outdir.into());
        self
    }

    /// Do not write optimization history
    pub fn no_outdir(mut self) -> Self {
        self.outdir = None;
        self
    }

    /// Sets the correlation kernel of the GP surrogate
    pub fn gp_kernel(mut self, gp_kernel: GpKernel) -> Self {
        self.gp_kernel = gp_kernel;
        self
    }

    /// Sets the number of restarts of the GP hyperparameters optimization
    pub fn gp_n_start(mut self, gp_n_start: usize) -> Self {
        self.gp_n_start = gp_n_start;
        self
    }

    /// Sets the GP nugget
    pub fn gp_nugget(mut self, gp_nugget: f64) -> Self {
        self.gp_nugget = gp_nugget;
        self
    }

    /// Sets the randomized trees ensemble parameters
    pub fn forest(mut self, forest: ForestParams) -> Self {
        self.forest = forest;
        self
    }

    /// Trade-off actually used by the acquisition function
    pub fn effective_trade_off(&self) -> f64 {
        self.trade_off
            .unwrap_or_else(|| self.acq_func.default_trade_off())
    }

    /// Check the configuration against the search space
    pub fn check(self, space: &Space) -> Result<ValidSmboConfig> {
        space.check()?;
        let invalid = |msg: String| Err(SmboError::InvalidConfigurationError(msg));
        if self.n_calls == 0 {
            return invalid("n_calls should be >= 1".to_string());
        }
        if self.n_initial_points == 0 || self.n_initial_points > self.n_calls {
            return invalid(format!(
                "n_initial_points should be in [1, n_calls={}], got {}",
                self.n_calls, self.n_initial_points
            ));
        }
        if self.x0.len() > self.n_initial_points {
            return invalid(format!(
                "{} x0 points given, more than n_initial_points={}",
                self.x0.len(),
                self.n_initial_points
            ));
        }
        if let Some(p) = self.x0.iter().find(|p| !space.contains(p)) {
            return invalid(format!(
                "x0 point {} does not belong to the search space",
                display_point(p)
            ));
        }
        let trade_off = self.effective_trade_off();
        if !(trade_off.is_finite() && trade_off >= 0.) {
            return invalid(format!(
                "trade_off should be finite and non negative, got {trade_off}"
            ));
        }
        if self.n_points == 0 {
            return invalid("n_points should be >= 1".to_string());
        }
        if self.n_restarts == 0 {
            return invalid("n_restarts should be >= 1".to_string());
        }
        if self.n_jobs == 0 || self.n_jobs < -1 {
            return invalid(format!(
                "n_jobs should be -1 or a positive number, got {}",
                self.n_jobs
            ));
        }
        if self.target.is_some_and(f64::is_nan) {
            return invalid("target should not be NaN".to_string());
        }
        if !(self.gp_nugget.is_finite() && self.gp_nugget >= 0.) {
            return invalid(format!(
                "gp_nugget should be finite and non negative, got {}",
                self.gp_nugget
            ));
        }
        self.forest.check()?;
        Ok(ValidSmboConfig(self))
    }
}

/// A configuration checked against its search space
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidSmboConfig(SmboConfig);

impl std::ops::Deref for ValidSmboConfig {
    type Target = SmboConfig;

    fn deref(&self) -> &SmboConfig {
        &self.0
    }
}

impl ValidSmboConfig {
    /// Number of model-based iterations following the initial design
    pub fn max_iters(&self) -> u64 {
        (self.n_calls - self.n_initial_points) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smbox_doe::{Dimension, Value};

    fn space() -> Space {
        Space::new(vec![
            Dimension::real(0., 1.).unwrap(),
            Dimension::categorical(["a", "b"]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = SmboConfig::default().check(&space()).unwrap();
        assert_eq!(config.max_iters(), 90);
        assert_eq!(config.effective_trade_off(), 0.01);
        let config = SmboConfig::default()
            .acq_func(AcqFunc::Lcb)
            .check(&space())
            .unwrap();
        assert_eq!(config.effective_trade_off(), 1.96);
    }

    #[test]
    fn test_invalid_configs() {
        let space = space();
        let x0 = vec![vec![Value::Real(0.5), Value::Cat("a".to_string())]];
        let outside = vec![vec![Value::Real(2.), Value::Cat("a".to_string())]];
        for config in [
            SmboConfig::default().n_calls(0).n_initial_points(0),
            SmboConfig::default().n_initial_points(0),
            SmboConfig::default().n_calls(5).n_initial_points(6),
            SmboConfig::default().n_initial_points(1).x0(vec![x0[0].clone(), x0[0].clone()]),
            SmboConfig::default().x0(outside),
            SmboConfig::default().trade_off(-1.),
            SmboConfig::default().trade_off(f64::NAN),
            SmboConfig::default().n_points(0),
            SmboConfig::default().n_restarts(0),
            SmboConfig::default().n_jobs(0),
            SmboConfig::default().n_jobs(-3),
            SmboConfig::default().gp_nugget(-1.),
            SmboConfig::default().forest(ForestParams::default().n_estimators(0)),
        ] {
            assert!(
                matches!(
                    config.clone().check(&space),
                    Err(SmboError::InvalidConfigurationError(_))
                ),
                "{config:?}"
            );
        }
        assert!(SmboConfig::default().x0(x0).check(&space).is_ok());
    }

    #[test]
    fn test_config_serde() {
        let config = SmboConfig::default().seed(42).surrogate(SurrogateKind::Forest);
        let json = serde_json::to_string(&config).unwrap();
        let back: SmboConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, Some(42));
        assert_eq!(back.surrogate, SurrogateKind::Forest);
    }
}
