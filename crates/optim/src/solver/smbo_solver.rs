//! Smbo implementation as a [argmin::core::Solver] to be used to benefit from
//! features coming with the argmin framework such as observers or timeout.
//!
//! Note: Depending on your need you can either use the `SmboSolver` or the provided
//! `SmboBuilder` which allows to build an `Smbo` struct which wraps the `argmin::Executor`
//! running an `SmboSolver` on `ObjFunc`. See [`crate::SmboBuilder`]
//!
//! ```no_run
//! use smbox_optim::{Dimension, ObjFunc, SmboConfig, SmboSolver, Space, Value};
//! use argmin::core::Executor;
//!
//! let space = Space::new(vec![
//!     Dimension::real(-2., 2.).unwrap(),
//!     Dimension::categorical(["left", "right"]).unwrap(),
//! ]).unwrap();
//! let fobj = ObjFunc::new(|x: &[Value]| {
//!     let shift = if x[1].as_str() == Some("left") { -1. } else { 1. };
//!     Ok((x[0].as_f64().unwrap_or(0.) - shift).powi(2))
//! });
//! let config = SmboConfig::default()
//!     .n_calls(30)
//!     .seed(42)
//!     .check(&space)
//!     .expect("optimizer configuration validated");
//! let solver = SmboSolver::new(config, space);
//! let res = Executor::new(fobj, solver)
//!     .run()
//!     .unwrap();
//! println!("Result = {:?}", res.state.best_param);
//! ```
use crate::solver::infill::{propose, resample_unseen, InfillParams};
use crate::surrogates::{training_targets, Surrogate};
use crate::types::*;
use crate::{SmboState, ValidSmboConfig};

use argmin::core::{CostFunction, Problem, Solver, State, TerminationStatus, KV};
use env_logger::{Builder, Env};
use log::{debug, info, warn};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smbox_doe::{display_point, initial_design, Point, Space};
use std::time::Instant;

/// Environment variable controlling the log level
pub const SMBOX_LOG: &str = "SMBOX_LOG";

/// Implementation of `argmin::core::Solver` for Smbo optimizer.
/// Therefore this structure can be used with `argmin::core::Executor` and benefit
/// from observers and timeout features.
#[derive(Clone, Serialize, Deserialize)]
pub struct SmboSolver {
    pub(crate) config: ValidSmboConfig,
    /// Search space of the objective function
    pub(crate) space: Space,
}

impl SmboSolver {
    /// Constructor of the optimization of the function within the given `space`
    pub fn new(config: ValidSmboConfig, space: Space) -> Self {
        let env = Env::new().filter_or(SMBOX_LOG, "info");
        let mut builder = Builder::from_env(env);
        let builder = builder.target(env_logger::Target::Stdout);
        builder.try_init().ok();
        SmboSolver { config, space }
    }

    /// Search space
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Evaluate the objective at the given points, concurrently when `n_jobs != 1`.
    /// Values are returned in points order.
    fn eval_points<O>(
        &self,
        problem: &mut Problem<O>,
        points: &[Point],
    ) -> std::result::Result<Vec<Option<f64>>, argmin::core::Error>
    where
        O: CostFunction<Param = Point, Output = Option<f64>> + Sync,
    {
        if self.config.n_jobs == 1 {
            points.iter().map(|x| problem.cost(x)).collect()
        } else {
            // 0 lets rayon use every available core
            let n_threads = self.config.n_jobs.max(0) as usize;
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n_threads)
                .build()?;
            problem.problem("cost_count", |pb| {
                pool.install(|| points.par_iter().map(|x| pb.cost(x)).collect())
            })
        }
    }

    /// Next point to evaluate. The surrogate model is refitted on the whole observation log,
    /// a random point being used when the log is degenerate or the fit fails.
    /// The returned flag tells whether the surrogate fit failed.
    fn next_point(
        &self,
        observations: &[Observation],
        rng: &mut Xoshiro256Plus,
    ) -> crate::Result<(Point, bool)> {
        if self.config.surrogate == SurrogateKind::Random {
            return Ok((self.random_point(observations, rng), false));
        }
        let mut finite: Vec<f64> = observations.iter().filter_map(|o| o.value).collect();
        finite.sort_by(f64::total_cmp);
        finite.dedup();
        let Some(y) = training_targets(observations).filter(|_| finite.len() >= 2) else {
            debug!("Less than 2 distinct values observed, using a random point");
            return Ok((self.random_point(observations, rng), false));
        };

        let points: Vec<Point> = observations.iter().map(|o| o.point.clone()).collect();
        let x = self.space.encode_all(&points)?;
        let fitted = match self.config.surrogate {
            SurrogateKind::Forest => {
                let seed = rng.gen::<u64>();
                Surrogate::fit_forest(&self.config.forest, &x, &y, seed)
            }
            _ => Surrogate::fit_gp(
                self.config.gp_kernel,
                self.config.gp_n_start,
                self.config.gp_nugget,
                &x,
                &y,
            ),
        };
        let model = match fitted {
            Ok(model) => model,
            Err(err) => {
                warn!("{err}: using a random point");
                return Ok((self.random_point(observations, rng), true));
            }
        };
        debug!("Surrogate: {model}");

        let fmin = y.iter().copied().fold(f64::INFINITY, f64::min);
        let params = InfillParams {
            acq_func: self.config.acq_func,
            trade_off: self.config.effective_trade_off(),
            n_points: self.config.n_points,
            n_restarts: self.config.n_restarts,
        };
        let x = propose(&self.space, &model, observations, fmin, params, rng)?;
        Ok((x, false))
    }

    fn random_point(&self, observations: &[Observation], rng: &mut Xoshiro256Plus) -> Point {
        let p = self.space.sample_point(rng);
        resample_unseen(&self.space, observations, p, rng)
    }
}

impl<O> Solver<O, SmboState> for SmboSolver
where
    O: CostFunction<Param = Point, Output = Option<f64>> + Sync,
{
    const NAME: &'static str = "Smbo";

    fn init(
        &mut self,
        problem: &mut Problem<O>,
        state: SmboState,
    ) -> std::result::Result<(SmboState, Option<KV>), argmin::core::Error> {
        let seed = match self.config.seed {
            Some(seed) => seed,
            None => Xoshiro256Plus::from_entropy().gen(),
        };
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);

        let n_design = self.config.n_initial_points - self.config.x0.len();
        let mut points = self.config.x0.clone();
        if n_design > 0 {
            points.extend(initial_design(
                &self.space,
                n_design,
                self.config.initial_design,
                &mut rng,
            )?);
        }
        info!(
            "Compute initial design on {} points ({} given)",
            points.len(),
            self.config.x0.len()
        );
        let values = self.eval_points(problem, &points)?;
        let observations: Vec<Observation> = points
            .into_iter()
            .zip(values)
            .map(|(p, v)| Observation::new(p, v))
            .collect();

        let mut initial_state = state
            .observations(observations)
            .max_iters(self.config.max_iters())
            .target_cost(self.config.target.unwrap_or(f64::NEG_INFINITY))
            .rng(rng);
        initial_state.n_initial = initial_state.observations.len();
        initial_state.seed = seed;
        let best = best_index(&initial_state.observations).unwrap_or(0);
        initial_state.best_index = Some(best);
        initial_state.prev_best_index = Some(best);
        initial_state.last_best_iter = 0;

        let best_obs = &initial_state.observations[best];
        info!(
            "********* Initialization (seed={}): Best fun(x[{}])={} at x={}",
            seed,
            best,
            best_obs.cost(),
            display_point(&best_obs.point)
        );
        Ok((initial_state, None))
    }

    fn next_iter(
        &mut self,
        problem: &mut Problem<O>,
        mut state: SmboState,
    ) -> std::result::Result<(SmboState, Option<KV>), argmin::core::Error> {
        debug!(
            "********* Start iteration {}/{}",
            state.get_iter() + 1,
            state.get_max_iters()
        );
        let now = Instant::now();

        let mut rng = state
            .take_rng()
            .unwrap_or_else(|| Xoshiro256Plus::seed_from_u64(state.seed));
        let (x, fallback) = self.next_point(&state.observations, &mut rng)?;
        if fallback {
            state.n_fallbacks += 1;
        }
        let value = problem.cost(&x)?;
        state.observations.push(Observation::new(x.clone(), value));
        let state = state
            .param(x)
            .cost(value.unwrap_or(f64::INFINITY))
            .rng(rng);

        let best = best_index(&state.observations).unwrap_or(0);
        let best_obs = &state.observations[best];
        info!(
            "********* End iteration {}/{} in {:.3}s: Best fun(x[{}])={} at x={}",
            state.get_iter() + 1,
            state.get_max_iters(),
            now.elapsed().as_secs_f64(),
            best,
            best_obs.cost(),
            display_point(&best_obs.point)
        );
        Ok((state, None))
    }

    fn terminate(&mut self, state: &SmboState) -> TerminationStatus {
        debug!("Current cost {:?}", state.get_cost());
        debug!("Best cost {:?}", state.get_best_cost());
        debug!("Best index {:?}", state.best_index);
        TerminationStatus::NotTerminated
    }
}
