//! Sequential model-based optimizer front-end.
//!
//! The [`SmboBuilder`] takes the objective function, lets configure the optimizer
//! and builds an [`Smbo`] optimizer given the search space of the function.
//! Running it drives an [`SmboSolver`] with the `argmin::Executor` until the
//! evaluation budget is exhausted, the target is reached, the time limit is
//! exceeded or Ctrl-C is hit.
//!
//! ```no_run
//! use smbox_optim::{Dimension, SmboBuilder, Space, SurrogateKind, Value};
//!
//! let space = Space::new(vec![
//!     Dimension::log_real(1e-4, 1e-1).unwrap(),
//!     Dimension::integer(1, 10).unwrap(),
//!     Dimension::categorical(["linear", "rbf"]).unwrap(),
//! ]).unwrap();
//!
//! let res = SmboBuilder::optimize(|x: &[Value]| {
//!         let lr = x[0].as_f64().unwrap_or(1.);
//!         let depth = x[1].as_i64().unwrap_or(0) as f64;
//!         let penalty = if x[2].as_str() == Some("rbf") { 0. } else { 0.5 };
//!         Ok((lr.log10() + 2.).powi(2) + (depth - 4.).abs() + penalty)
//!     })
//!     .configure(|config| config.n_calls(40).surrogate(SurrogateKind::Forest).seed(0))
//!     .min_within(&space)
//!     .expect("optimizer configured")
//!     .run()
//!     .expect("minimization done");
//! println!("{res}");
//! ```
use crate::errors::Result;
use crate::types::*;
use crate::{SmboConfig, SmboSolver, SmboState};

use argmin::core::observers::{Observe, ObserverMode};
use argmin::core::{Error, Executor, State, KV};
use log::info;
use serde::Serialize;
use smbox_doe::{display_point, Point, Space};

/// Json filename for configuration
pub const CONFIG_FILE: &str = "smbo_config.json";
/// Json filename for optimization history
pub const HISTORY_FILE: &str = "smbo_history.json";

/// SMBO optimizer builder allowing to specify the function to be minimized
/// and the optimizer configuration.
pub struct SmboBuilder<O: ObjFn> {
    fobj: O,
    config: SmboConfig,
}

impl<O: ObjFn> SmboBuilder<O> {
    /// Function to be minimized, taking a point of the search space
    /// as a list of values and returning a scalar
    pub fn optimize(fobj: O) -> Self {
        SmboBuilder {
            fobj,
            config: SmboConfig::default(),
        }
    }

    /// Set configuration of the optimizer
    pub fn configure<F: FnOnce(SmboConfig) -> SmboConfig>(mut self, init: F) -> Self {
        self.config = init(self.config);
        self
    }

    /// Build an optimizer minimizing the function within the given search `space`.
    /// Fails when the space or the configuration is invalid.
    pub fn min_within(self, space: &Space) -> Result<Smbo<O>> {
        let config = self.config.check(space)?;
        Ok(Smbo {
            fobj: ObjFunc::new(self.fobj),
            solver: SmboSolver::new(config, space.clone()),
        })
    }
}

/// Smbo optimizer structure used to parameterize the underlying `argmin::Solver`
/// and trigger the optimization using `argmin::Executor`.
#[derive(Clone)]
pub struct Smbo<O: ObjFn> {
    fobj: ObjFunc<O>,
    solver: SmboSolver,
}

impl<O: ObjFn> Smbo<O> {
    /// Runs the optimization of the objective function.
    pub fn run(&self) -> Result<OptimResult> {
        let config = &self.solver.config;
        info!("{:?}", **config);
        if let Some(outdir) = config.outdir.as_ref() {
            std::fs::create_dir_all(outdir)?;
            let filepath = std::path::Path::new(outdir).join(CONFIG_FILE);
            let json = serde_json::to_string_pretty(&**config)?;
            std::fs::write(filepath, json)?;
        }

        let exec = Executor::new(self.fobj.clone(), self.solver.clone());
        let exec = match config.max_time {
            Some(secs) => exec.timeout(web_time::Duration::from_secs(secs)),
            None => exec,
        };
        let result = if let Some(outdir) = config.outdir.as_ref() {
            let hist = OptimizationObserver::new(outdir.clone());
            exec.add_observer(hist, ObserverMode::Always).run()?
        } else {
            exec.run()?
        };

        let state = result.state;
        let best = best_index(&state.observations).unwrap_or(0);
        let (x_opt, y_opt) = state
            .observations
            .get(best)
            .map(|o| (o.point.clone(), o.cost()))
            .unwrap_or((vec![], f64::INFINITY));
        let res = OptimResult {
            x_opt,
            y_opt,
            n_iters: state.get_iter(),
            seed: state.seed,
            n_fallbacks: state.n_fallbacks,
            termination: state.termination_status.clone(),
            observations: state.observations,
        };
        info!(
            "Optim Result: min f(x)={} at x={} ({:?})",
            res.y_opt,
            display_point(&res.x_opt),
            res.termination
        );
        Ok(res)
    }
}

#[derive(Serialize)]
struct History<'a> {
    observations: &'a [Observation],
    best_costs: &'a [f64],
    best_params: &'a [Point],
}

// The optimization observer collects best costs and params
// during the optimization execution allowing to get optimization history
// saved as json for further analysis
// Note: the observer is activated only when outdir is specified
#[derive(Default)]
struct OptimizationObserver {
    pub dir: String,
    pub best_params: Vec<Point>,
    pub best_costs: Vec<f64>,
}

impl OptimizationObserver {
    fn new(dir: String) -> Self {
        Self {
            dir,
            ..Default::default()
        }
    }

    fn record(&mut self, state: &SmboState) {
        if let Some(bp) = state.get_best_param() {
            self.best_params.push(bp.clone());
            self.best_costs.push(state.get_best_cost());
        }
    }
}

impl Observe<SmboState> for OptimizationObserver {
    fn observe_init(
        &mut self,
        _name: &str,
        state: &SmboState,
        _kv: &KV,
    ) -> std::result::Result<(), Error> {
        self.record(state);
        Ok(())
    }

    fn observe_iter(&mut self, state: &SmboState, _kv: &KV) -> std::result::Result<(), Error> {
        self.record(state);
        Ok(())
    }

    fn observe_final(&mut self, state: &SmboState) -> std::result::Result<(), Error> {
        let hist = History {
            observations: &state.observations,
            best_costs: &self.best_costs,
            best_params: &self.best_params,
        };
        std::fs::create_dir_all(&self.dir)?;
        let filepath = std::path::Path::new(&self.dir).join(HISTORY_FILE);
        info!(
            "Save history of {} evaluations in {:?}",
            state.observations.len(),
            filepath
        );
        std::fs::write(filepath, serde_json::to_string_pretty(&hist)?)?;
        Ok(())
    }
}
