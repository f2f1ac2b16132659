use crate::utils::pdist;
use crate::SamplingMethod;
use linfa::Float;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
use ndarray_rand::rand::{seq::SliceRandom, Rng};
use ndarray_stats::QuantileExt;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Kinds of Latin Hypercube Design
#[derive(Clone, Debug, Default, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum LhsKind {
    /// sample is choosen randomly within its latin hypercube intervals
    Classic,
    /// sample is the middle of its latin hypercube intervals
    Centered,
    /// samples locations is optimized by maximizing the minimum distance between sample points
    #[default]
    Maximin,
    /// sample locations are centered and the minimum distance between sample points is maximized
    CenteredMaximin,
}

/// Number of candidate designs drawn by maximin variants
const MAXIMIN_ITERATIONS: usize = 5;

/// The LHS design is built as follows: each dimension space is divided into ns sections
/// where ns is the number of sampling points, and one point in selected in each section.
/// The selection method gives different kind of LHS (see [LhsKind])
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Lhs<F: Float> {
    /// Sampling space definition as a (nx, 2) matrix
    /// The ith row is the [lower_bound, upper_bound] of xi, the ith component of x
    xlimits: Array2<F>,
    /// The requested kind of LHS
    kind: LhsKind,
}

impl<F: Float> SamplingMethod<F> for Lhs<F> {
    fn sampling_space(&self) -> &Array2<F> {
        &self.xlimits
    }

    fn normalized_sample<R: Rng>(&self, ns: usize, rng: &mut R) -> Array2<F> {
        let nx = self.xlimits.nrows();
        if ns == 0 {
            return Array2::zeros((0, nx));
        }
        match &self.kind {
            LhsKind::Classic => self.classic_lhs(ns, rng),
            LhsKind::Centered => self.centered_lhs(ns, rng),
            LhsKind::Maximin => self.maximin_lhs(ns, false, rng),
            LhsKind::CenteredMaximin => self.maximin_lhs(ns, true, rng),
        }
    }
}

impl<F: Float> Lhs<F> {
    /// Constructor given a design space given a (nx, 2) matrix \[\[lower bound, upper bound\], ...\]
    ///
    /// ```
    /// use smbox_doe::{Lhs, LhsKind, SamplingMethod};
    /// use ndarray::arr2;
    /// use ndarray_rand::rand::SeedableRng;
    /// use rand_xoshiro::Xoshiro256Plus;
    ///
    /// let mut rng = Xoshiro256Plus::seed_from_u64(42);
    /// let doe = Lhs::new(&arr2(&[[0.0, 1.0], [5.0, 10.0]]))
    ///     .kind(LhsKind::Classic)
    ///     .sample(10, &mut rng);
    /// assert_eq!(doe.dim(), (10, 2));
    /// ```
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Self {
        if xlimits.ncols() != 2 {
            panic!("xlimits must have 2 columns (lower, upper)");
        }
        Lhs {
            xlimits: xlimits.to_owned(),
            kind: LhsKind::default(),
        }
    }

    /// Sets the kind of LHS
    pub fn kind(mut self, kind: LhsKind) -> Self {
        self.kind = kind;
        self
    }

    fn classic_lhs<R: Rng>(&self, ns: usize, rng: &mut R) -> Array2<F> {
        let nx = self.xlimits.nrows();
        let width = 1. / ns as f64;
        let mut lhs = Array2::zeros((ns, nx));
        for j in 0..nx {
            let mut cut: Vec<f64> = (0..ns)
                .map(|i| (i as f64 + rng.gen::<f64>()) * width)
                .collect();
            cut.shuffle(rng);
            lhs.column_mut(j)
                .assign(&Array1::from_vec(cut).mapv(|v| F::cast(v)));
        }
        lhs
    }

    fn centered_lhs<R: Rng>(&self, ns: usize, rng: &mut R) -> Array2<F> {
        let nx = self.xlimits.nrows();
        let width = 1. / ns as f64;
        let mut lhs = Array2::zeros((ns, nx));
        let mut centers: Vec<f64> = (0..ns).map(|i| (i as f64 + 0.5) * width).collect();
        for j in 0..nx {
            centers.shuffle(rng);
            lhs.column_mut(j)
                .assign(&Array1::from_iter(centers.iter().map(|v| F::cast(*v))));
        }
        lhs
    }

    fn maximin_lhs<R: Rng>(&self, ns: usize, centered: bool, rng: &mut R) -> Array2<F> {
        let draw = |rng: &mut R| {
            if centered {
                self.centered_lhs(ns, rng)
            } else {
                self.classic_lhs(ns, rng)
            }
        };
        // min distance is undefined with a single point: any design is maximin
        let min_dist = |lhs: &Array2<F>| pdist(lhs).min().ok().copied();

        let mut lhs_maximin = draw(&mut *rng);
        let mut max_dist = match min_dist(&lhs_maximin) {
            Some(d) => d,
            None => return lhs_maximin,
        };
        for _ in 1..MAXIMIN_ITERATIONS {
            let lhs = draw(&mut *rng);
            if let Some(d_min) = min_dist(&lhs) {
                if max_dist < d_min {
                    max_dist = d_min;
                    lhs_maximin = lhs;
                }
            }
        }
        lhs_maximin
    }
}
