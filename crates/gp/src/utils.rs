use linfa::Float;
use ndarray::{s, Array1, Array2, ArrayBase, Axis, Data, Ix2};
#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// A structure to store (n, xdim) matrix data and its mean and standard deviation vectors.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct NormalizedData<F: Float> {
    /// normalized data
    pub data: Array2<F>,
    /// mean vector computed from data
    pub mean: Array1<F>,
    /// standard deviation vector computed from data
    pub std: Array1<F>,
}

impl<F: Float> NormalizedData<F> {
    /// Constructor
    pub fn new(x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> NormalizedData<F> {
        let (data, mean, std) = normalize(x);
        NormalizedData { data, mean, std }
    }

    /// Dimension of data points
    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }
}

/// Centers and scales the columns of x, a zero standard deviation being replaced by 1
pub fn normalize<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> (Array2<F>, Array1<F>, Array1<F>) {
    let x_mean = x
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(x.ncols()));
    let ddof = if x.nrows() > 1 { F::one() } else { F::zero() };
    let mut x_std = x.std_axis(Axis(0), ddof);
    x_std.mapv_inplace(|v| if v == F::zero() { F::one() } else { v });
    let xnorm = (x - &x_mean) / &x_std;

    (xnorm, x_mean, x_std)
}

/// A structure to retain absolute differences computation used to compute covariance matrix
#[derive(Debug)]
pub struct DiffMatrix<F: Float> {
    /// Differences as (n_obs * (n_obs-1))/2, nx) array
    pub d: Array2<F>,
    /// Indices of the differences in the original data array
    pub d_indices: Array2<usize>,
    /// Number of observations
    pub n_obs: usize,
}

impl<F: Float> DiffMatrix<F> {
    /// Compute differences given points given as an array (n_obs, nx)
    pub fn new(x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> DiffMatrix<F> {
        let n_obs = x.nrows();
        let nx = x.ncols();
        let n_pairs = n_obs * n_obs.saturating_sub(1) / 2;
        let mut d_indices = Array2::<usize>::zeros((n_pairs, 2));
        let mut d = Array2::zeros((n_pairs, nx));

        let mut r = 0;
        for k in 0..n_obs {
            for i in (k + 1)..n_obs {
                d_indices[[r, 0]] = k;
                d_indices[[r, 1]] = i;
                d.row_mut(r).assign(&(&x.row(k) - &x.row(i)));
                r += 1;
            }
        }
        d.mapv_inplace(|v| num_traits::Float::abs(v));

        DiffMatrix {
            d,
            d_indices,
            n_obs,
        }
    }
}

/// Computes differences between each element of x and each element of y
/// resulting in a 2d array of shape (nrows(x) * nrows(y), ncols(x));
/// *Panics* if x and y have not the same column numbers
pub fn pairwise_differences<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    y: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Array2<F> {
    assert!(x.ncols() == y.ncols());

    let nx = x.nrows();
    let ny = y.nrows();
    let mut result = Array2::zeros((nx * ny, x.ncols()));
    for (i, xi) in x.rows().into_iter().enumerate() {
        result
            .slice_mut(s![i * ny..(i + 1) * ny, ..])
            .assign(&(&xi - y));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_normalized_data() {
        let x = array![[1., 10.], [3., 10.], [5., 10.]];
        let norm = NormalizedData::new(&x);
        assert_abs_diff_eq!(norm.mean, array![3., 10.]);
        assert_abs_diff_eq!(norm.std, array![2., 1.]);
        assert_abs_diff_eq!(norm.data, array![[-1., 0.], [0., 0.], [1., 0.]]);
        assert_eq!(norm.ncols(), 2);
    }

    #[test]
    fn test_normalized_single_row() {
        let x = array![[2., -1.]];
        let norm = NormalizedData::new(&x);
        assert_abs_diff_eq!(norm.std, array![1., 1.]);
        assert_abs_diff_eq!(norm.data, array![[0., 0.]]);
    }

    #[test]
    fn test_diff_matrix() {
        let xt = array![[0.5], [1.2], [2.0], [3.0], [4.0]];
        let expected = (
            array![
                [0.7],
                [1.5],
                [2.5],
                [3.5],
                [0.8],
                [1.8],
                [2.8],
                [1.],
                [2.],
                [1.]
            ],
            array![
                [0, 1],
                [0, 2],
                [0, 3],
                [0, 4],
                [1, 2],
                [1, 3],
                [1, 4],
                [2, 3],
                [2, 4],
                [3, 4]
            ],
        );
        let dm = DiffMatrix::new(&xt);
        assert_abs_diff_eq!(expected.0, dm.d, epsilon = 1e-6);
        assert_eq!(expected.1, dm.d_indices);
        assert_eq!(dm.n_obs, 5);
    }

    #[test]
    fn test_diff_matrix_single_obs() {
        let dm = DiffMatrix::new(&array![[1., 2.]]);
        assert_eq!(dm.d.dim(), (0, 2));
    }

    #[test]
    fn test_pairwise_differences() {
        let x = array![[-0.9486833], [-0.82219219]];
        let y = array![
            [-1.26491106],
            [-0.63245553],
            [0.],
            [0.63245553],
            [1.26491106]
        ];
        let expected = array![
            [0.31622776],
            [-0.31622777],
            [-0.9486833],
            [-1.58113883],
            [-2.21359436],
            [0.44271887],
            [-0.18973666],
            [-0.82219219],
            [-1.45464772],
            [-2.08710325]
        ];
        assert_abs_diff_eq!(expected, pairwise_differences(&x, &y), epsilon = 1e-6);
    }
}
