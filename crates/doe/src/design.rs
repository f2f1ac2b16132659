use crate::errors::Result;
use crate::space::{Point, Space};
use crate::{Lhs, LhsKind, Random, SamplingMethod};
use log::debug;
use ndarray_rand::rand::Rng;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Maximum number of resampling attempts when a design point collides
/// with a previous one
pub const MAX_RESAMPLE_RETRIES: usize = 100;

/// Strategy used to draw the points evaluated before any surrogate exists
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum InitialDesign {
    /// Independent uniform points
    #[default]
    Random,
    /// Latin hypercube stratified over every dimension
    Lhs(LhsKind),
}

/// Generates the `n` first evaluation points of a run.
///
/// The design is drawn in the folded unit hypercube (one coordinate per dimension)
/// then mapped to the space. A point equal to a previous one is resampled
/// uniformly up to [MAX_RESAMPLE_RETRIES] times, then accepted as is, so that no
/// duplicate is produced unless the space is exhausted or the retries run out.
///
/// ```
/// use smbox_doe::{initial_design, Dimension, InitialDesign, Space};
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let space = Space::new(vec![Dimension::categorical(["a", "b", "c"]).unwrap()]).unwrap();
/// let mut rng = Xoshiro256Plus::seed_from_u64(0);
/// let doe = initial_design(&space, 3, InitialDesign::Random, &mut rng).unwrap();
/// assert!(doe.contains(&vec!["a".into()]));
/// assert!(doe.contains(&vec!["b".into()]));
/// assert!(doe.contains(&vec!["c".into()]));
/// ```
pub fn initial_design<R: Rng>(
    space: &Space,
    n: usize,
    kind: InitialDesign,
    rng: &mut R,
) -> Result<Vec<Point>> {
    space.check()?;
    let xlimits = space.unit_limits();
    let doe = match kind {
        InitialDesign::Random => Random::new(&xlimits).normalized_sample(n, rng),
        InitialDesign::Lhs(lhs_kind) => Lhs::new(&xlimits).kind(lhs_kind).normalized_sample(n, rng),
    };
    let cardinality = space.cardinality();

    let mut points: Vec<Point> = Vec::with_capacity(n);
    for u in doe.rows() {
        let mut point = space.from_unit(&u);
        let exhausted = cardinality.map_or(false, |c| points.len() >= c);
        if !exhausted {
            let mut retries = 0;
            while points.contains(&point) && retries < MAX_RESAMPLE_RETRIES {
                point = space.sample_point(rng);
                retries += 1;
            }
        }
        if points.contains(&point) {
            debug!("Duplicate point accepted in initial design");
        }
        points.push(point);
    }
    Ok(points)
}
