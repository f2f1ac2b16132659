use linfa::Float;
use ndarray::{Array, Array1, ArrayBase, Data, Ix2};
use ndarray_stats::DeviationExt;
use rayon::prelude::*;

/// Pairwise euclidean distances between the rows of x, given as a condensed
/// vector of size n * (n - 1) / 2 (row i compared to rows i+1..n)
pub fn pdist<F: Float>(x: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>) -> Array1<F> {
    let nrows = x.nrows();
    let pairs: Vec<_> = (0..nrows)
        .flat_map(|i| ((i + 1)..nrows).map(move |j| (i, j)))
        .collect();

    let distances: Vec<_> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let d = x.row(i).l2_dist(&x.row(j)).unwrap_or(f64::INFINITY);
            F::cast(d)
        })
        .collect();

    Array::from_vec(distances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_pdist() {
        let x = array![[1., 0., 0.], [0., 1., 0.], [0., 2., 0.], [3., 4., 5.]];
        #[allow(clippy::approx_constant)]
        let expected = array![1.41421356, 2.23606798, 6.70820393, 1., 6.55743852, 6.164414];
        let actual = pdist(&x);
        assert_abs_diff_eq!(actual, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_pdist_single_row() {
        let x = array![[1., 2.]];
        assert_eq!(pdist(&x).len(), 0);
    }
}
