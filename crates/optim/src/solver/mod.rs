mod infill;
mod smbo_config;
mod smbo_solver;
mod smbo_state;

pub use smbo_config::*;
pub use smbo_solver::*;
pub use smbo_state::*;
