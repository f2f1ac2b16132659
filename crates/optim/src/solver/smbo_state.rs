/// Implementation of `argmin::IterState` for Smbo optimizer
use crate::types::{best_index, Observation};

use argmin::core::{Problem, State, TerminationReason, TerminationStatus};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::{Deserialize, Serialize};
use smbox_doe::Point;
use std::collections::HashMap;

/// Maintains the state from iteration to iteration of the [crate::SmboSolver].
///
/// This struct is passed from one iteration of an algorithm to the next.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SmboState {
    /// Current parameter vector
    pub param: Option<Point>,
    /// Previous parameter vector
    pub prev_param: Option<Point>,
    /// Current best parameter vector
    pub best_param: Option<Point>,
    /// Previous best parameter vector
    pub prev_best_param: Option<Point>,

    /// Current cost function value, `+inf` for a failed evaluation
    pub cost: Option<f64>,
    /// Previous cost function value
    pub prev_cost: Option<f64>,
    /// Current best cost function value
    pub best_cost: Option<f64>,
    /// Previous best cost function value
    pub prev_best_cost: Option<f64>,
    /// Target cost function value
    pub target_cost: f64,

    /// Current iteration
    pub iter: u64,
    /// Iteration number of last best cost
    pub last_best_iter: u64,
    /// Maximum number of iterations
    pub max_iters: u64,
    /// Evaluation counts
    pub counts: HashMap<String, u64>,
    /// Time required so far
    pub time: Option<web_time::Duration>,
    /// Optimization status
    pub termination_status: TerminationStatus,

    /// Chronological log of evaluations
    pub observations: Vec<Observation>,
    /// Number of evaluations of the initial design
    pub n_initial: usize,
    /// Previous index of best result in observations
    pub prev_best_index: Option<usize>,
    /// Index of best result in observations
    pub best_index: Option<usize>,
    /// Number of iterations degraded to a random proposal after a surrogate fit failure
    pub n_fallbacks: usize,
    /// Seed of the random number generator
    pub seed: u64,
    /// Random number generator for reproducibility
    pub rng: Option<Xoshiro256Plus>,
}

impl SmboState {
    /// Set parameter vector. This shifts the stored parameter vector to the previous parameter
    /// vector.
    #[must_use]
    pub fn param(mut self, param: Point) -> Self {
        std::mem::swap(&mut self.prev_param, &mut self.param);
        self.param = Some(param);
        self
    }

    /// Set target cost.
    ///
    /// When this cost is reached, the algorithm will stop. The default is
    /// `f64::NEG_INFINITY`.
    ///
    /// # Example
    ///
    /// ```
    /// # use smbox_optim::SmboState;
    /// # use argmin::core::State;
    /// # let state = SmboState::new();
    /// # assert_eq!(state.target_cost.to_ne_bytes(), f64::NEG_INFINITY.to_ne_bytes());
    /// let state = state.target_cost(0.0);
    /// # assert_eq!(state.target_cost.to_ne_bytes(), 0.0f64.to_ne_bytes());
    /// ```
    #[must_use]
    pub fn target_cost(mut self, target_cost: f64) -> Self {
        self.target_cost = target_cost;
        self
    }

    /// Set maximum number of iterations
    #[must_use]
    pub fn max_iters(mut self, iters: u64) -> Self {
        self.max_iters = iters;
        self
    }

    /// Set the current cost function value. This shifts the stored cost function value to the
    /// previous cost function value.
    #[must_use]
    pub fn cost(mut self, cost: f64) -> Self {
        std::mem::swap(&mut self.prev_cost, &mut self.cost);
        self.cost = Some(cost);
        self
    }

    /// Set the observation log
    pub fn observations(mut self, observations: Vec<Observation>) -> Self {
        self.observations = observations;
        self
    }

    /// Set the random number generator used to draw random points
    pub fn rng(mut self, rng: Xoshiro256Plus) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Moves the current random number generator out and replaces it internally with `None`.
    pub fn take_rng(&mut self) -> Option<Xoshiro256Plus> {
        self.rng.take()
    }
}

impl State for SmboState {
    /// Type of parameter vector
    type Param = Point;
    /// Floating point precision
    type Float = f64;

    /// Create new `SmboState` instance
    ///
    /// # Example
    ///
    /// ```
    /// # use std::collections::HashMap;
    /// # use argmin::core::{State, TerminationStatus};
    /// use smbox_optim::SmboState;
    /// let state = SmboState::new();
    ///
    /// # assert!(state.param.is_none());
    /// # assert!(state.best_param.is_none());
    /// # assert!(state.observations.is_empty());
    /// # assert_eq!(state.iter, 0);
    /// # assert_eq!(state.max_iters, u64::MAX);
    /// # assert_eq!(state.counts, HashMap::new());
    /// # assert_eq!(state.termination_status, TerminationStatus::NotTerminated);
    /// ```
    fn new() -> Self {
        SmboState {
            param: None,
            prev_param: None,
            best_param: None,
            prev_best_param: None,

            cost: None,
            prev_cost: None,
            best_cost: None,
            prev_best_cost: None,
            target_cost: f64::NEG_INFINITY,

            iter: 0,
            last_best_iter: 0,
            max_iters: u64::MAX,
            counts: HashMap::new(),
            time: Some(web_time::Duration::new(0, 0)),
            termination_status: TerminationStatus::NotTerminated,

            observations: vec![],
            n_initial: 0,
            prev_best_index: None,
            best_index: None,
            n_fallbacks: 0,
            seed: 0,
            rng: Some(Xoshiro256Plus::seed_from_u64(0)),
        }
    }

    /// Checks if the last observation improves the best one. If a new best
    /// observation was found, the state is updated accordingly.
    ///
    /// # Example
    ///
    /// ```
    /// # use argmin::core::State;
    /// # use smbox_optim::{Observation, SmboState, Value};
    /// let mut state = SmboState::new().observations(vec![
    ///     Observation::new(vec![Value::Real(1.)], Some(10.)),
    ///     Observation::new(vec![Value::Real(2.)], None),
    ///     Observation::new(vec![Value::Real(3.)], Some(0.5)),
    /// ]);
    /// state.n_initial = 1;
    /// state.best_index = Some(0);
    /// state.iter = 1;
    ///
    /// state.update();
    ///
    /// assert_eq!(state.best_param.as_ref().unwrap()[0], Value::Real(3.));
    /// assert_eq!(state.best_cost, Some(0.5));
    /// assert!(state.is_best());
    /// ```
    fn update(&mut self) {
        if let Some(best) = best_index(&self.observations) {
            std::mem::swap(&mut self.prev_best_index, &mut self.best_index);
            self.best_index = Some(best);

            let obs = &self.observations[best];
            std::mem::swap(&mut self.prev_best_param, &mut self.best_param);
            self.best_param = Some(obs.point.clone());
            std::mem::swap(&mut self.prev_best_cost, &mut self.best_cost);
            self.best_cost = Some(obs.cost());

            // best point in initial design => last_best_iter remains 0
            if best >= self.n_initial && self.prev_best_index != Some(best) {
                self.last_best_iter = self.iter + 1;
            }
        }
    }

    fn get_param(&self) -> Option<&Point> {
        self.param.as_ref()
    }

    fn get_best_param(&self) -> Option<&Point> {
        self.best_param.as_ref()
    }

    fn terminate_with(mut self, reason: TerminationReason) -> Self {
        self.termination_status = TerminationStatus::Terminated(reason);
        self
    }

    fn time(&mut self, time: Option<web_time::Duration>) -> &mut Self {
        self.time = time;
        self
    }

    fn get_cost(&self) -> f64 {
        self.cost.unwrap_or(f64::INFINITY)
    }

    fn get_best_cost(&self) -> f64 {
        self.best_cost.unwrap_or(f64::INFINITY)
    }

    fn get_target_cost(&self) -> f64 {
        self.target_cost
    }

    fn get_iter(&self) -> u64 {
        self.iter
    }

    fn get_last_best_iter(&self) -> u64 {
        self.last_best_iter
    }

    fn get_max_iters(&self) -> u64 {
        self.max_iters
    }

    fn get_termination_status(&self) -> &TerminationStatus {
        &self.termination_status
    }

    fn get_termination_reason(&self) -> Option<&TerminationReason> {
        match &self.termination_status {
            TerminationStatus::Terminated(reason) => Some(reason),
            TerminationStatus::NotTerminated => None,
        }
    }

    fn get_time(&self) -> Option<web_time::Duration> {
        self.time
    }

    fn increment_iter(&mut self) {
        self.iter += 1;
    }

    fn func_counts<O>(&mut self, problem: &Problem<O>) {
        for (k, &v) in problem.counts.iter() {
            let count = self.counts.entry(k.to_string()).or_insert(0);
            *count = v
        }
    }

    fn get_func_counts(&self) -> &HashMap<String, u64> {
        &self.counts
    }

    /// Returns whether the last evaluated point is also the best one found so far.
    fn is_best(&self) -> bool {
        // last_best_iter is 1-based while iter is 0-based
        self.last_best_iter == self.iter + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smbox_doe::Value;

    fn obs(x: f64, v: Option<f64>) -> Observation {
        Observation::new(vec![Value::Real(x)], v)
    }

    #[test]
    fn test_update_keeps_best_of_initial_design() {
        let mut state = SmboState::new().observations(vec![obs(0., Some(1.)), obs(1., Some(2.))]);
        state.n_initial = 2;
        state.update();
        assert_eq!(state.best_index, Some(0));
        assert_eq!(state.get_best_cost(), 1.);
        assert_eq!(state.get_last_best_iter(), 0);

        state.observations.push(obs(0.5, Some(1.)));
        state.update();
        // ties keep the earliest observation
        assert_eq!(state.best_index, Some(0));
        assert_eq!(state.get_last_best_iter(), 0);
    }

    #[test]
    fn test_update_with_failures_only() {
        let mut state = SmboState::new().observations(vec![obs(0., None), obs(1., None)]);
        state.update();
        assert_eq!(state.best_index, Some(0));
        assert_eq!(state.get_best_cost(), f64::INFINITY);
    }

    #[test]
    fn test_state_serde() {
        let mut state = SmboState::new().observations(vec![obs(0., Some(1.)), obs(1., None)]);
        state.update();
        let json = serde_json::to_value(&state).unwrap();
        let back: Vec<Observation> = serde_json::from_value(json["observations"].clone()).unwrap();
        assert_eq!(back, state.observations);
        assert_eq!(json["best_index"], 0);
    }
}
