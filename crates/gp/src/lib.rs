//! This library implements [Gaussian Process](https://en.wikipedia.org/wiki/Gaussian_process) regression
//! also known as [Kriging](https://en.wikipedia.org/wiki/Kriging) models, used as surrogate models
//! of expensive black-box functions in sequential model-based optimization.
//!
//! GP methods are implemented by [GaussianProcess] parameterized by [GpParams].
//!
//! * mean models: [ConstantMean], [LinearMean]
//! * correlation models: [SquaredExponentialCorr], [Matern52Corr]
//!
//! Hyperparameters (correlation length scales `theta`) are fitted by maximizing the reduced
//! likelihood using COBYLA restarted from a seeded latin hypercube of starting points,
//! so that fitting twice on the same data gives the same model.
//!
//! ```no_run
//! use smbox_gp::Kriging;
//! use linfa::prelude::*;
//! use ndarray::{arr1, arr2};
//!
//! let xt = arr2(&[[0.0], [1.0], [2.0], [3.0], [4.0]]);
//! let yt = arr1(&[0.0, 1.0, 1.5, 0.9, 1.0]);
//! let gp = Kriging::params()
//!     .fit(&Dataset::new(xt, yt))
//!     .expect("GP fitted");
//! let (mean, var) = gp.predict_valvar(&arr2(&[[2.5]])).expect("GP prediction");
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod algorithm;
pub mod correlation_models;
mod errors;
pub mod mean_models;

mod parameters;
mod utils;

mod optimization;

pub use algorithm::*;
pub use correlation_models::{CorrelationModel, Matern52Corr, SquaredExponentialCorr};
pub use errors::*;
pub use mean_models::{ConstantMean, LinearMean, RegressionModel};
pub use parameters::*;
pub use utils::{DiffMatrix, NormalizedData};
