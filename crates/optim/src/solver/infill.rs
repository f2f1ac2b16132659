//! Acquisition function maximization over the search space
use crate::criteria::AcqFunc;
use crate::errors::Result;
use crate::surrogates::Surrogate;
use crate::types::Observation;

use cobyla::{minimize, Func, RhoBeg, StopTols};
use log::debug;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1};
use ndarray_rand::rand::Rng;
use rayon::prelude::*;
use smbox_doe::{Point, Space, MAX_RESAMPLE_RETRIES};

/// Max number of acquisition evaluations of one local refinement
const REFINE_MAX_EVAL: usize = 200;

/// Acquisition maximization settings
#[derive(Clone, Copy, Debug)]
pub(crate) struct InfillParams {
    pub acq_func: AcqFunc,
    pub trade_off: f64,
    pub n_points: usize,
    pub n_restarts: usize,
}

struct Acquisition<'a> {
    model: &'a Surrogate,
    params: InfillParams,
    fmin: f64,
}

impl Acquisition<'_> {
    /// Acquisition values at encoded points given as (n, encoded_dim) matrix,
    /// NaN being mapped to -inf
    fn scores(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let (mu, sigma) = self.model.predict_valstd(x)?;
        Ok(mu
            .iter()
            .zip(sigma.iter())
            .map(|(m, s)| {
                let v = self
                    .params
                    .acq_func
                    .score(*m, *s, self.fmin, self.params.trade_off);
                if v.is_nan() {
                    f64::NEG_INFINITY
                } else {
                    v
                }
            })
            .collect())
    }

    fn score(&self, x: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> f64 {
        let x = x.to_owned().insert_axis(Axis(0));
        match self.scores(&x) {
            Ok(s) => s[0],
            Err(err) => {
                debug!("Acquisition evaluation failed: {err}");
                f64::NEG_INFINITY
            }
        }
    }

    /// Local maximization with cobyla over the `numeric` encoded columns
    /// starting from `start`, other columns being kept fixed.
    fn refine(&self, space: &Space, start: &Array1<f64>, numeric: &[usize]) -> Array1<f64> {
        let assemble = |xn: &[f64]| {
            let mut x = start.clone();
            numeric.iter().zip(xn).for_each(|(&j, &v)| x[j] = v);
            x
        };
        let objfn = |xn: &[f64], _u: &mut ()| -> f64 {
            let s = self.score(&assemble(xn));
            if s.is_finite() {
                -s
            } else {
                f64::MAX
            }
        };
        let cons: Vec<&dyn Func<()>> = vec![];
        let x0: Vec<f64> = numeric.iter().map(|&j| start[j]).collect();
        let bounds = vec![(0., 1.); numeric.len()];

        let xn = match minimize(
            objfn,
            &x0,
            &bounds,
            &cons,
            (),
            REFINE_MAX_EVAL,
            RhoBeg::All(0.1),
            Some(StopTols {
                ftol_rel: 1e-6,
                ..StopTols::default()
            }),
        ) {
            Ok((_, x, _)) => x,
            Err((status, x, _)) => {
                debug!("Acquisition refinement stopped: {status:?}");
                x
            }
        };
        space.clip(&assemble(&xn))
    }
}

/// Index of the first maximum value
fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => (),
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Indices sorted by decreasing value, ties kept in index order
fn ranking(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    order
}

fn is_seen(observations: &[Observation], point: &Point) -> bool {
    observations.iter().any(|o| &o.point == point)
}

/// Propose the next point to evaluate by maximizing the acquisition function of
/// the fitted `model` given the observation log. `fmin` is the current best training value.
///
/// Fully discrete spaces small enough are enumerated, otherwise `n_points` random
/// candidates are screened and the best `n_restarts` ones are refined locally.
/// A point already evaluated is only returned when no unseen alternative is found.
pub(crate) fn propose<R: Rng>(
    space: &Space,
    model: &Surrogate,
    observations: &[Observation],
    fmin: f64,
    params: InfillParams,
    rng: &mut R,
) -> Result<Point> {
    let acq = Acquisition { model, params, fmin };

    if let Some(all) = space
        .cardinality()
        .filter(|&c| c <= params.n_points)
        .and_then(|_| space.enumerate())
    {
        let unseen: Vec<Point> = all
            .iter()
            .filter(|p| !is_seen(observations, p))
            .cloned()
            .collect();
        let candidates = if unseen.is_empty() { all } else { unseen };
        let scores = acq.scores(&space.encode_all(&candidates)?)?;
        let best = argmax(&scores).unwrap_or(0);
        debug!(
            "Best of {} enumerated points: {} (acq={})",
            candidates.len(),
            smbox_doe::display_point(&candidates[best]),
            scores[best]
        );
        return Ok(candidates[best].clone());
    }

    let candidates = space.sample(params.n_points, rng)?;
    let xcands = space.encode_all(&candidates)?;
    let scores = acq.scores(&xcands)?;
    let order = ranking(&scores);

    let numeric = space.numeric_columns();
    let starts: Vec<usize> = order.iter().take(params.n_restarts).copied().collect();
    let refined: Vec<(Point, f64)> = starts
        .par_iter()
        .map(|&i| {
            let start = xcands.row(i).to_owned();
            if numeric.is_empty() {
                return (candidates[i].clone(), scores[i]);
            }
            let x = acq.refine(space, &start, &numeric);
            let point = space.decode(&x);
            let score = match space.encode(&point) {
                Ok(xp) => acq.score(&xp),
                Err(_) => f64::NEG_INFINITY,
            };
            if score > scores[i] {
                (point, score)
            } else {
                (candidates[i].clone(), scores[i])
            }
        })
        .collect();
    let values: Vec<f64> = refined.iter().map(|(_, s)| *s).collect();
    let best = argmax(&values).unwrap_or(0);
    let (point, score) = refined[best].clone();
    debug!(
        "Acquisition maximum {} at {}",
        score,
        smbox_doe::display_point(&point)
    );

    if !is_seen(observations, &point) {
        return Ok(point);
    }
    if let Some(&i) = order
        .iter()
        .find(|&&i| !is_seen(observations, &candidates[i]))
    {
        debug!("Proposal already evaluated, using best unseen candidate");
        return Ok(candidates[i].clone());
    }
    Ok(resample_unseen(space, observations, point, rng))
}

/// Draw uniform points until one has not been evaluated yet, giving up after
/// `MAX_RESAMPLE_RETRIES` draws with the `fallback` point.
pub(crate) fn resample_unseen<R: Rng>(
    space: &Space,
    observations: &[Observation],
    fallback: Point,
    rng: &mut R,
) -> Point {
    for _ in 0..MAX_RESAMPLE_RETRIES {
        let p = space.sample_point(rng);
        if !is_seen(observations, &p) {
            return p;
        }
    }
    debug!("No unseen point found, accepting a duplicate");
    fallback
}
