/*!
`smbox` is a toolbox for Sequential Model-Based Optimization (SMBO) of expensive,
noisy black-box functions defined over mixed search spaces.

The toolbox is made of the following crates, re-exported here:

* [doe]: search spaces ([Space], [Dimension]) and designs of experiments,
* [gp]: Gaussian process regression,
* [optim]: the SMBO optimizer.

Three front-ends cover the common use cases:

* [gp_minimize]: SMBO with a Gaussian process surrogate,
* [forest_minimize]: SMBO with a randomized-trees ensemble surrogate,
* [dummy_minimize]: pure random search.

Each one takes the objective function, the search space and a closure tuning the
default [SmboConfig].

The default initial design has 10 points, so a budget `n_calls` below 10 has to
lower `n_initial_points` too, otherwise the configuration is rejected with
[SmboError::InvalidConfigurationError].

```
use smbox::{gp_minimize, Dimension, Space, Value};

let space = Space::new(vec![
    Dimension::real(-2., 2.).unwrap(),
    Dimension::categorical(["left", "right"]).unwrap(),
]).unwrap();

let res = gp_minimize(
    |x: &[Value]| {
        let shift = if x[1].as_str() == Some("left") { -1. } else { 1. };
        Ok((x[0].as_f64().unwrap_or(0.) - shift).powi(2))
    },
    &space,
    |config| config.n_calls(15).n_initial_points(5).seed(42),
)
.expect("minimization done");
println!("min f(x)={} at x={:?}", res.y_opt, res.x_opt);
```
*/
#![warn(missing_docs)]

pub use smbox_doe as doe;
pub use smbox_gp as gp;
pub use smbox_optim as optim;

pub use smbox_optim::{
    AcqFunc, Dimension, ForestParams, GpKernel, InitialDesign, LhsKind, ObjFn, Observation,
    OptimResult, Point, Result, SmboBuilder, SmboConfig, SmboError, Space, SurrogateKind,
    TreeKind, Value,
};

use log::info;

fn minimize<O: ObjFn>(
    surrogate: SurrogateKind,
    func: O,
    space: &Space,
    configure: impl FnOnce(SmboConfig) -> SmboConfig,
) -> Result<OptimResult> {
    let res = SmboBuilder::optimize(func)
        .configure(|config| configure(config).surrogate(surrogate))
        .min_within(space)?
        .run()?;
    info!("{surrogate:?} minimization: {res}");
    Ok(res)
}

/// Minimizes `func` over `space` using a Gaussian process surrogate.
///
/// `configure` tunes the default [SmboConfig], its surrogate kind being overridden.
/// Budgets below the default 10 initial points require lowering `n_initial_points`.
pub fn gp_minimize<O: ObjFn>(
    func: O,
    space: &Space,
    configure: impl FnOnce(SmboConfig) -> SmboConfig,
) -> Result<OptimResult> {
    minimize(SurrogateKind::Gp, func, space, configure)
}

/// Minimizes `func` over `space` using an ensemble of randomized regression trees
/// as surrogate (see [ForestParams]).
pub fn forest_minimize<O: ObjFn>(
    func: O,
    space: &Space,
    configure: impl FnOnce(SmboConfig) -> SmboConfig,
) -> Result<OptimResult> {
    minimize(SurrogateKind::Forest, func, space, configure)
}

/// Random search: every point after the user `x0` ones is drawn uniformly from `space`.
pub fn dummy_minimize<O: ObjFn>(
    func: O,
    space: &Space,
    configure: impl FnOnce(SmboConfig) -> SmboConfig,
) -> Result<OptimResult> {
    minimize(SurrogateKind::Random, func, space, configure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use argmin_testfunctions::rosenbrock;

    fn rosenb(x: &[Value]) -> anyhow::Result<f64> {
        let x: Vec<f64> = x.iter().filter_map(Value::as_f64).collect();
        Ok(rosenbrock(&x))
    }

    fn space() -> Space {
        Space::new(vec![
            Dimension::real(-2., 2.).unwrap(),
            Dimension::real(-1., 3.).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_front_ends_on_rosenbrock() {
        let space = space();
        let configure = |config: SmboConfig| config.n_calls(25).n_initial_points(10).seed(42);
        let gp = gp_minimize(rosenb, &space, configure).unwrap();
        let forest = forest_minimize(rosenb, &space, configure).unwrap();
        let dummy = dummy_minimize(rosenb, &space, configure).unwrap();

        for res in [&gp, &forest, &dummy] {
            assert_eq!(res.observations.len(), 25);
            assert_eq!(res.seed, 42);
            let min = res.values().into_iter().flatten().fold(f64::INFINITY, f64::min);
            assert_abs_diff_eq!(res.y_opt, min);
        }
        // same seed, same initial design whatever the surrogate
        assert_eq!(gp.observations[..10], forest.observations[..10]);
        assert_eq!(gp.observations[..10], dummy.observations[..10]);
        assert!(gp.y_opt <= gp.convergence()[9]);
    }

    #[test]
    fn test_surrogate_is_overridden() {
        let space = space();
        let res = dummy_minimize(rosenb, &space, |config| {
            config.surrogate(SurrogateKind::Gp).n_calls(6).n_initial_points(2).seed(0)
        })
        .unwrap();
        let random = SmboBuilder::optimize(rosenb)
            .configure(|config| {
                config
                    .surrogate(SurrogateKind::Random)
                    .n_calls(6)
                    .n_initial_points(2)
                    .seed(0)
            })
            .min_within(&space)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(res.observations, random.observations);
    }

    #[test]
    fn test_small_budget_needs_fewer_initial_points() {
        let space = Space::new(vec![Dimension::categorical(["a", "b", "c"]).unwrap()]).unwrap();
        let categorical = |x: &[Value]| -> anyhow::Result<f64> {
            match x[0].as_str() {
                Some("b") => Ok(1.),
                _ => Ok(2.),
            }
        };
        assert!(matches!(
            gp_minimize(categorical, &space, |config| config.n_calls(6)),
            Err(SmboError::InvalidConfigurationError(_))
        ));
        let res = gp_minimize(categorical, &space, |config| {
            config.n_calls(6).n_initial_points(2).seed(0)
        })
        .unwrap();
        assert_eq!(res.observations.len(), 6);
        assert_eq!(res.x_opt, vec![Value::from("b")]);
        assert_eq!(res.y_opt, 1.);
    }

    #[test]
    fn test_invalid_space_is_rejected() {
        assert!(matches!(
            Dimension::real(1., 0.),
            Err(smbox_doe::DoeError::InvalidSpaceError(_))
        ));
        assert!(matches!(
            gp_minimize(rosenb, &space(), |config| config.n_calls(0)),
            Err(SmboError::InvalidConfigurationError(_))
        ));
    }
}
