use crate::errors::SmboError;
use argmin::core::{CostFunction, TerminationStatus};
use log::warn;
use serde::{Deserialize, Serialize};
use smbox_doe::{display_point, Point, Value};

/// An interface for the objective function to be minimized.
///
/// The function takes a point of the search space as a list of native values
/// and returns the objective value, lower is better. An `Err` signals a failed
/// evaluation which is recorded and does not stop the optimization.
pub trait ObjFn: Clone + Sync + Fn(&[Value]) -> anyhow::Result<f64> {}
impl<T> ObjFn for T where T: Clone + Sync + Fn(&[Value]) -> anyhow::Result<f64> {}

/// A structure wrapping the objective function for implementing
/// `argmin::CostFunction` to be used with argmin framework.
///
/// Failures (errors or non finite values) are logged and mapped to `None`.
#[derive(Clone)]
pub struct ObjFunc<O: ObjFn> {
    fobj: O,
}

impl<O: ObjFn> ObjFunc<O> {
    /// Constructor given the objective function
    pub fn new(fobj: O) -> Self {
        ObjFunc { fobj }
    }

    fn evaluate(&self, point: &[Value]) -> Option<f64> {
        let failure = match (self.fobj)(point) {
            Ok(v) if v.is_finite() => return Some(v),
            Ok(v) => SmboError::ObjectiveEvaluationFailure {
                point: display_point(point),
                reason: format!("non finite value {v}"),
            },
            Err(err) => SmboError::ObjectiveEvaluationFailure {
                point: display_point(point),
                reason: format!("{err:#}"),
            },
        };
        warn!("{failure}");
        None
    }
}

impl<O: ObjFn> CostFunction for ObjFunc<O> {
    /// Type of the parameter vector
    type Param = Point;
    /// Objective value, `None` when the evaluation failed
    type Output = Option<f64>;

    /// Apply the cost function to a parameter `p`
    fn cost(&self, p: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
        Ok(self.evaluate(p))
    }
}

/// An evaluated point of the search space
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Evaluated point
    pub point: Point,
    /// Objective value, `None` marks a failed evaluation
    pub value: Option<f64>,
}

impl Observation {
    /// Constructor
    pub fn new(point: Point, value: Option<f64>) -> Self {
        Observation { point, value }
    }

    /// Whether the evaluation failed
    pub fn is_failure(&self) -> bool {
        self.value.is_none()
    }

    /// Objective value where a failure counts as `+inf`
    pub fn cost(&self) -> f64 {
        self.value.unwrap_or(f64::INFINITY)
    }
}

/// Index of the best observation: the first one reaching the minimum value,
/// failures being the worst. `None` for an empty log.
pub fn best_index(observations: &[Observation]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, obs) in observations.iter().enumerate() {
        let cost = obs.cost();
        match best {
            Some((_, b)) if cost >= b => (),
            _ => best = Some((i, cost)),
        }
    }
    best.map(|(i, _)| i)
}

/// Surrogate model family used to propose new points
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurrogateKind {
    /// Gaussian process regression
    #[default]
    Gp,
    /// Ensemble of randomized regression trees
    Forest,
    /// No model, points are drawn uniformly
    Random,
}

/// Correlation kernel of the Gaussian process surrogate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GpKernel {
    /// Squared exponential
    SquaredExponential,
    /// Matern 5/2
    #[default]
    Matern52,
}

/// Optimization result
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimResult {
    /// Best point found
    pub x_opt: Point,
    /// Best value found, `+inf` when every evaluation failed
    pub y_opt: f64,
    /// Chronological log of evaluations
    pub observations: Vec<Observation>,
    /// Number of model-based iterations run after the initial design
    pub n_iters: u64,
    /// Seed of the random generator actually used
    pub seed: u64,
    /// Number of iterations where the surrogate could not be fitted
    /// and a random point was used instead
    pub n_fallbacks: usize,
    /// Why the optimization stopped
    pub termination: TerminationStatus,
}

impl OptimResult {
    /// Index of the best observation in the log
    pub fn best_index(&self) -> Option<usize> {
        best_index(&self.observations)
    }

    /// Number of failed evaluations
    pub fn n_failed(&self) -> usize {
        self.observations.iter().filter(|o| o.is_failure()).count()
    }

    /// Objective values in evaluation order
    pub fn values(&self) -> Vec<Option<f64>> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Running minimum after each evaluation, `+inf` until a first success.
    pub fn convergence(&self) -> Vec<f64> {
        self.observations
            .iter()
            .scan(f64::INFINITY, |best, o| {
                *best = best.min(o.cost());
                Some(*best)
            })
            .collect()
    }
}

impl std::fmt::Display for OptimResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "f(x)={} at x={} after {} evaluations ({} failed)",
            self.y_opt,
            display_point(&self.x_opt),
            self.observations.len(),
            self.n_failed()
        )
    }
}
