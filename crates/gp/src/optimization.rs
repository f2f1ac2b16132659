use linfa::prelude::Float;
use ndarray::{arr1, s, Array1, Array2, Zip};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use smbox_doe::{Lhs, LhsKind, SamplingMethod};

pub(crate) struct CobylaParams {
    pub rhobeg: f64,
    pub ftol_rel: f64,
    pub maxeval: usize,
}

impl Default for CobylaParams {
    fn default() -> Self {
        CobylaParams {
            rhobeg: 0.5,
            ftol_rel: 1e-4,
            maxeval: 200,
        }
    }
}

/// Builds the starting points of the likelihood optimization in log10 space:
/// the initial guess `theta0` followed by `n_start` points spread within bounds.
pub(crate) fn prepare_multistart<F: Float>(
    n_start: usize,
    theta0: &Array1<F>,
    bounds: &[(F, F)],
    seed: u64,
) -> (Array2<F>, Vec<(F, F)>) {
    let bounds: Vec<(F, F)> = bounds
        .iter()
        .map(|(lo, up)| (lo.log10(), up.log10()))
        .collect();

    let mut theta0s = Array2::zeros((n_start + 1, theta0.len()));
    theta0s.row_mut(0).assign(&theta0.mapv(|v| F::log10(v)));

    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    match n_start.cmp(&1) {
        std::cmp::Ordering::Equal => {
            let vals: Vec<F> = bounds
                .iter()
                .map(|(a, b)| {
                    if a < b {
                        rng.gen_range(*a..*b)
                    } else {
                        *a
                    }
                })
                .collect();
            theta0s.row_mut(1).assign(&Array1::from(vals))
        }
        std::cmp::Ordering::Greater => {
            let mut xlimits: Array2<F> = Array2::zeros((bounds.len(), 2));
            Zip::from(xlimits.rows_mut())
                .and(&bounds)
                .for_each(|mut row, limits| row.assign(&arr1(&[limits.0, limits.1])));
            let seeds = Lhs::new(&xlimits)
                .kind(LhsKind::Maximin)
                .sample(n_start, &mut rng);
            theta0s.slice_mut(s![1.., ..]).assign(&seeds);
        }
        std::cmp::Ordering::Less => (),
    };
    (theta0s, bounds)
}

/// Optimize gp hyper parameters given an initial guess and bounds with cobyla
pub(crate) fn optimize_params<ObjF, F>(
    objfn: ObjF,
    param0: &Array1<F>,
    bounds: &[(F, F)],
    cobyla: CobylaParams,
) -> (f64, Array1<f64>)
where
    ObjF: Fn(&[f64], Option<&mut [f64]>, &mut ()) -> f64,
    F: Float,
{
    use cobyla::{minimize, Func, RhoBeg, StopTols};

    let cons: Vec<&dyn Func<()>> = vec![];
    let param0: Vec<f64> = param0.iter().map(into_f64).collect();
    let bounds: Vec<_> = bounds
        .iter()
        .map(|(lo, up)| (into_f64(lo), into_f64(up)))
        .collect();

    match minimize(
        |x, u| objfn(x, None, u),
        &param0,
        &bounds,
        &cons,
        (),
        cobyla.maxeval,
        RhoBeg::All(cobyla.rhobeg),
        Some(StopTols {
            ftol_rel: cobyla.ftol_rel,
            ..StopTols::default()
        }),
    ) {
        Ok((_, x_opt, fval)) => {
            let fval = if f64::is_nan(fval) {
                f64::INFINITY
            } else {
                fval
            };
            (fval, arr1(&x_opt))
        }
        Err((status, x_opt, _)) => {
            log::warn!("Cobyla optimizer failed in GP fitting, status={status:?}");
            (f64::INFINITY, arr1(&x_opt))
        }
    }
}

#[inline(always)]
fn into_f64<F: Float>(v: &F) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_prepare_multistart() {
        let theta0 = array![0.1, 1.];
        let (theta0s, bounds) = prepare_multistart(4, &theta0, &[(1e-2, 1e1), (1e-2, 1e1)], 42);
        assert_eq!(theta0s.dim(), (5, 2));
        assert_abs_diff_eq!(theta0s.row(0), array![-1., 0.], epsilon = 1e-12);
        assert_abs_diff_eq!(bounds[0].0, -2., epsilon = 1e-12);
        assert_abs_diff_eq!(bounds[0].1, 1., epsilon = 1e-12);
        assert!(theta0s
            .slice(s![1.., ..])
            .iter()
            .all(|v| (-2. ..=1.).contains(v)));

        let (again, _) = prepare_multistart(4, &theta0, &[(1e-2, 1e1), (1e-2, 1e1)], 42);
        assert_abs_diff_eq!(theta0s, again);
    }

    #[test]
    fn test_optimize_params_on_quadratic() {
        let objfn = |x: &[f64], _gradient: Option<&mut [f64]>, _params: &mut ()| -> f64 {
            (x[0] - 0.3) * (x[0] - 0.3) + (x[1] + 0.5) * (x[1] + 0.5)
        };
        let (fmin, xopt) = optimize_params(
            objfn,
            &array![0., 0.],
            &[(-1., 1.), (-1., 1.)],
            CobylaParams::default(),
        );
        assert_abs_diff_eq!(fmin, 0., epsilon = 1e-4);
        assert_abs_diff_eq!(xopt, array![0.3, -0.5], epsilon = 1e-2);
    }
}
