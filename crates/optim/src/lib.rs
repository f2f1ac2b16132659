//! This library implements Sequential Model-Based Optimization (SMBO) of expensive
//! black-box functions over mixed search spaces.
//!
//! Each step fits a surrogate model on every evaluation recorded so far, then picks
//! the point maximizing an acquisition function computed from the surrogate
//! prediction, evaluates it and appends the result to the observation log.
//!
//! Three surrogate families are available:
//! * Gaussian process regression ([SurrogateKind::Gp]),
//! * ensemble of randomized regression trees ([SurrogateKind::Forest]),
//! * no model at all, points being drawn uniformly ([SurrogateKind::Random]).
//!
//! Objective failures (an `Err` or a non finite value) are recorded in the log
//! and do not stop the optimization.
//!
//! # Example
//!
//! ```
//! use smbox_optim::{Dimension, SmboBuilder, Space, Value};
//!
//! // A one-dimensional function with a minimum at x = 0.3
//! let space = Space::new(vec![Dimension::real(0., 1.).unwrap()]).unwrap();
//! let res = SmboBuilder::optimize(|x: &[Value]| {
//!         let x = x[0].as_f64().unwrap_or(0.);
//!         Ok((x - 0.3) * (x - 0.3))
//!     })
//!     .configure(|config| config.n_calls(15).n_initial_points(5).seed(42))
//!     .min_within(&space)
//!     .expect("optimizer configured")
//!     .run()
//!     .expect("function minimized");
//! println!("Minimum found f(x) = {} at x = {:?}", res.y_opt, res.x_opt);
//! assert_eq!(res.observations.len(), 15);
//! ```
//!
//! # Usage
//!
//! The [`SmboBuilder`] is used to set the objective function and the [`SmboConfig`].
//! The `min_within()` method checks the configuration against the search space and
//! returns an [`Smbo`] optimizer whose `run()` method returns an [`OptimResult`].
//!
//! Some of the most useful options are:
//!
//! * the evaluation budget `n_calls` and the size of the initial design `n_initial_points`,
//! * user points `x0` evaluated first,
//! * the acquisition function ([`AcqFunc`]) and its trade-off,
//! * a `seed` to get reproducible runs,
//! * an `outdir` where the configuration and the optimization history are saved as json.
//!
//! Log verbosity is controlled by the `SMBOX_LOG` environment variable (default `info`).
//!
//! # Implementation notes
//!
//! The optimizer is an [argmin](https://www.argmin-rs.org/) solver ([`SmboSolver`]) run
//! by the `argmin::Executor` which provides the iteration loop, the time limit,
//! the target stopping criterion and Ctrl-C handling.
//!
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
pub mod criteria;
pub mod surrogates;

mod errors;
mod smbo;
mod solver;
mod types;

pub use crate::criteria::AcqFunc;
pub use crate::errors::*;
pub use crate::smbo::*;
pub use crate::solver::*;
pub use crate::surrogates::{ForestParams, TreeKind};
pub use crate::types::*;

pub use smbox_doe::{Dimension, InitialDesign, LhsKind, Point, Space, Value};
