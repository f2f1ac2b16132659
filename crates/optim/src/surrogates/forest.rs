//! Ensemble of randomized regression trees used as surrogate model.
//!
//! Every tree is grown on a bootstrap resample of the training data with its own
//! random generator seeded from the forest seed and the tree index, hence the
//! fitted ensemble does not depend on the thread scheduling.
//! The prediction is the mean of the trees and the uncertainty is their spread.
use crate::errors::{Result, SmboError};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::rand::{seq::index, Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How split thresholds are searched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeKind {
    /// One uniform random threshold per candidate feature (extremely randomized trees)
    #[default]
    ExtraTrees,
    /// Every midpoint between consecutive sorted values
    BestSplit,
}

/// Forest hyperparameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees
    pub n_estimators: usize,
    /// Minimum number of samples in a leaf
    pub min_samples_leaf: usize,
    /// Number of features considered at each split, all when `None`
    pub max_features: Option<usize>,
    /// Whether trees are grown on bootstrap resamples
    pub bootstrap: bool,
    /// Split strategy
    pub kind: TreeKind,
}

impl Default for ForestParams {
    fn default() -> Self {
        ForestParams {
            n_estimators: 100,
            min_samples_leaf: 3,
            max_features: None,
            bootstrap: true,
            kind: TreeKind::default(),
        }
    }
}

impl ForestParams {
    /// Sets the number of trees
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the minimum number of samples in a leaf
    pub fn min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    /// Sets the number of features drawn at each split
    pub fn max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Whether trees are grown on bootstrap resamples
    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Sets the split strategy
    pub fn kind(mut self, kind: TreeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check parameters consistency
    pub fn check(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(SmboError::InvalidConfigurationError(
                "forest n_estimators should be >= 1".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(SmboError::InvalidConfigurationError(
                "forest min_samples_leaf should be >= 1".to_string(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(SmboError::InvalidConfigurationError(
                "forest max_features should be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Fit a forest on `(x, y)`, the tree `i` using the random generator seeded with `seed + i`
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>, seed: u64) -> Result<Forest> {
        self.check()?;
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(SmboError::SurrogateFitError(format!(
                "forest training data should not be empty, got x of shape {:?}",
                x.dim()
            )));
        }
        if x.nrows() != y.len() {
            return Err(SmboError::SurrogateFitError(format!(
                "forest training inputs ({}) and outputs ({}) sizes do not match",
                x.nrows(),
                y.len()
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(SmboError::SurrogateFitError(
                "forest training data should only contain finite values".to_string(),
            ));
        }

        let n = x.nrows();
        let trees = (0..self.n_estimators)
            .into_par_iter()
            .map(|i| {
                let mut rng = Xoshiro256Plus::seed_from_u64(seed.wrapping_add(i as u64));
                let samples: Vec<usize> = if self.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                RegressionTree::grow(x, y, samples, self, &mut rng)
            })
            .collect();

        Ok(Forest {
            trees,
            params: self.clone(),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A binary regression tree stored as a flat list of nodes, the root being the first one
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    fn grow(
        x: &Array2<f64>,
        y: &Array1<f64>,
        samples: Vec<usize>,
        params: &ForestParams,
        rng: &mut Xoshiro256Plus,
    ) -> Self {
        let mut tree = RegressionTree { nodes: vec![] };
        tree.build(x, y, samples, params, rng);
        tree
    }

    fn build(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        samples: Vec<usize>,
        params: &ForestParams,
        rng: &mut Xoshiro256Plus,
    ) -> usize {
        let id = self.nodes.len();
        let mean = samples.iter().map(|&i| y[i]).sum::<f64>() / samples.len() as f64;
        self.nodes.push(Node::Leaf { value: mean });

        let min_leaf = params.min_samples_leaf;
        let homogeneous = samples.iter().all(|&i| y[i] == y[samples[0]]);
        if samples.len() < 2 * min_leaf || homogeneous {
            return id;
        }

        let nx = x.ncols();
        let features: Vec<usize> = match params.max_features {
            Some(k) if k < nx => {
                let mut drawn = index::sample(rng, nx, k).into_vec();
                // keep split search order independent from draw order
                drawn.sort_unstable();
                drawn
            }
            _ => (0..nx).collect(),
        };

        let split = match params.kind {
            TreeKind::ExtraTrees => random_split(x, y, &samples, &features, min_leaf, rng),
            TreeKind::BestSplit => best_split(x, y, &samples, &features, min_leaf),
        };
        if let Some((feature, threshold)) = split {
            let (lsamples, rsamples): (Vec<usize>, Vec<usize>) = samples
                .into_iter()
                .partition(|&i| x[[i, feature]] <= threshold);
            let left = self.build(x, y, lsamples, params, rng);
            let right = self.build(x, y, rsamples, params, rng);
            self.nodes[id] = Node::Split {
                feature,
                threshold,
                left,
                right,
            };
        }
        id
    }

    fn predict(&self, x: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => id = if x[feature] <= threshold { left } else { right },
            }
        }
    }
}

/// Score of a split as the part of the sum of squares it explains:
/// `sl^2/nl + sr^2/nr - s^2/n`, equivalent to the variance reduction
fn split_gain(sum_left: f64, n_left: usize, sum: f64, n: usize) -> f64 {
    let sum_right = sum - sum_left;
    let n_right = n - n_left;
    sum_left * sum_left / n_left as f64 + sum_right * sum_right / n_right as f64
        - sum * sum / n as f64
}

fn random_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    samples: &[usize],
    features: &[usize],
    min_leaf: usize,
    rng: &mut Xoshiro256Plus,
) -> Option<(usize, f64)> {
    let n = samples.len();
    let sum: f64 = samples.iter().map(|&i| y[i]).sum();
    let mut best: Option<(usize, f64, f64)> = None;
    for &f in features {
        let (lo, up) = samples
            .iter()
            .map(|&i| x[[i, f]])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, up), v| {
                (lo.min(v), up.max(v))
            });
        if lo >= up {
            continue;
        }
        let threshold = rng.gen_range(lo..up);
        let (n_left, sum_left) = samples
            .iter()
            .filter(|&&i| x[[i, f]] <= threshold)
            .fold((0, 0.), |(c, s), &i| (c + 1, s + y[i]));
        if n_left < min_leaf || n - n_left < min_leaf {
            continue;
        }
        let gain = split_gain(sum_left, n_left, sum, n);
        if best.map_or(gain > 0., |(_, _, g)| gain > g) {
            best = Some((f, threshold, gain));
        }
    }
    best.map(|(f, t, _)| (f, t))
}

fn best_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    samples: &[usize],
    features: &[usize],
    min_leaf: usize,
) -> Option<(usize, f64)> {
    let n = samples.len();
    let sum: f64 = samples.iter().map(|&i| y[i]).sum();
    let mut best: Option<(usize, f64, f64)> = None;
    for &f in features {
        let mut sorted = samples.to_vec();
        sorted.sort_by(|&a, &b| x[[a, f]].total_cmp(&x[[b, f]]));
        let mut sum_left = 0.;
        for k in 1..n {
            sum_left += y[sorted[k - 1]];
            let (prev, next) = (x[[sorted[k - 1], f]], x[[sorted[k], f]]);
            if k < min_leaf || n - k < min_leaf || prev >= next {
                continue;
            }
            let gain = split_gain(sum_left, k, sum, n);
            if best.map_or(gain > 0., |(_, _, g)| gain > g) {
                best = Some((f, 0.5 * (prev + next), gain));
            }
        }
    }
    best.map(|(f, t, _)| (f, t))
}

/// A fitted ensemble of regression trees
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Forest {
    trees: Vec<RegressionTree>,
    params: ForestParams,
}

impl Forest {
    /// Parameters used to fit the forest
    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Predict mean and standard deviation across trees at `x` points given as (n, nx) matrix
    pub fn predict_valstd(
        &self,
        x: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    ) -> (Array1<f64>, Array1<f64>) {
        let n_trees = self.trees.len() as f64;
        let mut mean = Array1::zeros(x.nrows());
        let mut std = Array1::zeros(x.nrows());
        for (i, row) in x.rows().into_iter().enumerate() {
            let preds: Vec<f64> = self.trees.iter().map(|t| t.predict(&row)).collect();
            let m = preds.iter().sum::<f64>() / n_trees;
            let var = preds.iter().map(|p| (p - m) * (p - m)).sum::<f64>() / n_trees;
            mean[i] = m;
            std[i] = var.max(0.).sqrt();
        }
        (mean, std)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array};

    fn step_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array::linspace(0., 1., 20).insert_axis(ndarray::Axis(1));
        let y = x.column(0).mapv(|v| if v < 0.5 { 0. } else { 10. });
        (x, y)
    }

    #[test]
    fn test_forest_learns_a_step() {
        let (x, y) = step_data();
        for kind in [TreeKind::ExtraTrees, TreeKind::BestSplit] {
            let forest = ForestParams::default()
                .kind(kind)
                .n_estimators(50)
                .fit(&x, &y, 42)
                .unwrap();
            assert_eq!(forest.n_trees(), 50);
            let (mean, std) = forest.predict_valstd(&array![[0.05], [0.95]]);
            assert!(mean[0] < 2., "{kind:?}: {mean}");
            assert!(mean[1] > 8., "{kind:?}: {mean}");
            assert!(std.iter().all(|s| *s >= 0.));
        }
    }

    #[test]
    fn test_best_split_single_tree_is_exact() {
        let (x, y) = step_data();
        let forest = ForestParams::default()
            .kind(TreeKind::BestSplit)
            .bootstrap(false)
            .n_estimators(1)
            .min_samples_leaf(1)
            .fit(&x, &y, 0)
            .unwrap();
        let (mean, std) = forest.predict_valstd(&x);
        assert_abs_diff_eq!(mean, y, epsilon = 1e-12);
        assert_abs_diff_eq!(std, Array1::zeros(20), epsilon = 1e-12);
    }

    #[test]
    fn test_forest_is_deterministic() {
        let x = array![[0.1, 0.3], [0.5, 0.9], [0.2, 0.4], [0.8, 0.1], [0.6, 0.6], [0.3, 0.7]];
        let y = array![1., 3., 1.5, 0.2, 2., 2.5];
        let params = ForestParams::default().min_samples_leaf(1).max_features(Some(1));
        let f1 = params.fit(&x, &y, 7).unwrap();
        let f2 = params.fit(&x, &y, 7).unwrap();
        let xtest = array![[0.4, 0.4], [0.9, 0.9]];
        assert_eq!(f1.predict_valstd(&xtest), f2.predict_valstd(&xtest));
    }

    #[test]
    fn test_constant_targets_give_zero_std() {
        let x = array![[0.1], [0.5], [0.9], [0.3]];
        let y = array![2., 2., 2., 2.];
        let forest = ForestParams::default().fit(&x, &y, 1).unwrap();
        let (mean, std) = forest.predict_valstd(&array![[0.7]]);
        assert_abs_diff_eq!(mean[0], 2., epsilon = 1e-12);
        assert_abs_diff_eq!(std[0], 0., epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_forest() {
        let x = array![[0.1], [0.5]];
        assert!(ForestParams::default().fit(&x, &array![1.], 0).is_err());
        assert!(ForestParams::default()
            .n_estimators(0)
            .fit(&x, &array![1., 2.], 0)
            .is_err());
        assert!(ForestParams::default()
            .fit(&x, &array![1., f64::NAN], 0)
            .is_err());
    }
}
