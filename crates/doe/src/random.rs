use crate::SamplingMethod;
use linfa::Float;
use ndarray::{Array, Array2, ArrayBase, Data, Ix2};
use ndarray_rand::{rand::Rng, rand_distr::Uniform, RandomExt};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// The Random design consists in drawing samples uniformly within the sample space
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Random<F: Float> {
    /// Sampling space definition as a (nx, 2) matrix
    /// The ith row is the [lower_bound, upper_bound] of xi, the ith component of x
    xlimits: Array2<F>,
}

impl<F: Float> Random<F> {
    /// Constructor given a design space given a (nx, 2) matrix \[\[lower bound, upper bound\], ...\]
    ///
    /// ```
    /// use smbox_doe::{Random, SamplingMethod};
    /// use ndarray::arr2;
    /// use ndarray_rand::rand::SeedableRng;
    /// use rand_xoshiro::Xoshiro256Plus;
    ///
    /// let mut rng = Xoshiro256Plus::seed_from_u64(42);
    /// let doe = Random::new(&arr2(&[[0.0, 1.0], [5.0, 10.0]])).sample(10, &mut rng);
    /// assert_eq!(doe.dim(), (10, 2));
    /// ```
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Self {
        if xlimits.ncols() != 2 {
            panic!("xlimits must have 2 columns (lower, upper)");
        }
        Random {
            xlimits: xlimits.to_owned(),
        }
    }
}

impl<F: Float> SamplingMethod<F> for Random<F> {
    fn sampling_space(&self) -> &Array2<F> {
        &self.xlimits
    }

    fn normalized_sample<R: Rng>(&self, ns: usize, rng: &mut R) -> Array2<F> {
        let nx = self.xlimits.nrows();
        Array::random_using((ns, nx), Uniform::new(0., 1.), rng).mapv(|v| F::cast(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn test_random_within_bounds() {
        let xlimits = arr2(&[[5., 10.], [0., 1.]]);
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let actual = Random::new(&xlimits).sample(50, &mut rng);
        assert_eq!(actual.dim(), (50, 2));
        for row in actual.rows() {
            assert!((5. ..10.).contains(&row[0]));
            assert!((0. ..1.).contains(&row[1]));
        }
    }

    #[test]
    fn test_random_reproducible() {
        let xlimits = arr2(&[[-1., 1.], [0., 3.]]);
        let doe1 = Random::new(&xlimits).sample(9, &mut Xoshiro256Plus::seed_from_u64(0));
        let doe2 = Random::new(&xlimits).sample(9, &mut Xoshiro256Plus::seed_from_u64(0));
        assert_eq!(doe1, doe2);
    }

    #[test]
    fn test_random_advances_rng() {
        let xlimits = arr2(&[[0., 1.]]);
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let doe1 = Random::new(&xlimits).sample(4, &mut rng);
        let doe2 = Random::new(&xlimits).sample(4, &mut rng);
        assert_ne!(doe1, doe2);
    }
}
