//! Mixed-type search spaces and their continuous encoding.
//!
//! Every dimension is encoded into `[0, 1]`: real and integer dimensions as a
//! single normalized column (log10 scaled for log-uniform reals), categorical
//! dimensions as a one-hot block with one column per category.
use crate::errors::{DoeError, Result};
use crate::random::Random;
use crate::SamplingMethod;
use ndarray::{s, Array1, Array2, ArrayBase, ArrayView1, Data, Ix1, Ix2};
use ndarray_rand::rand::Rng;
use std::fmt;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// A native-typed coordinate of a point
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum Value {
    /// Value of a real dimension
    Real(f64),
    /// Value of an integer dimension
    Int(i64),
    /// Label of a categorical dimension
    Cat(String),
}

impl Value {
    /// Numeric value if any (integers are converted)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            Value::Cat(_) => None,
        }
    }

    /// Integer value if any
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Category label if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Cat(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Cat(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Cat(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Cat(v)
    }
}

/// A point of the search space: one value per dimension, in space order
pub type Point = Vec<Value>;

/// Formats a point as `[v1, v2, ...]`
pub fn display_point(point: &[Value]) -> String {
    let coords: Vec<String> = point.iter().map(|v| v.to_string()).collect();
    format!("[{}]", coords.join(", "))
}

/// Domain of one coordinate of the search space
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum Dimension {
    /// Real values in `[low, high]`, sampled uniformly in log10 space when `log_scale`
    Real {
        /// lower bound
        low: f64,
        /// upper bound
        high: f64,
        /// log-uniform prior
        log_scale: bool,
    },
    /// Integer values in `low..=high`
    Integer {
        /// lower bound
        low: i64,
        /// upper bound (included)
        high: i64,
    },
    /// Unordered labels
    Categorical {
        /// distinct labels
        categories: Vec<String>,
    },
}

/// `high - low` computed without overflow
fn int_span(low: i64, high: i64) -> f64 {
    (high as i128 - low as i128) as f64
}

impl Dimension {
    /// Real dimension with a uniform prior
    pub fn real(low: f64, high: f64) -> Result<Self> {
        let dim = Dimension::Real {
            low,
            high,
            log_scale: false,
        };
        dim.check().map(|_| dim)
    }

    /// Real dimension with a log-uniform prior, `low` has to be positive
    pub fn log_real(low: f64, high: f64) -> Result<Self> {
        let dim = Dimension::Real {
            low,
            high,
            log_scale: true,
        };
        dim.check().map(|_| dim)
    }

    /// Integer dimension, bounds included
    pub fn integer(low: i64, high: i64) -> Result<Self> {
        let dim = Dimension::Integer { low, high };
        dim.check().map(|_| dim)
    }

    /// Categorical dimension from a list of distinct labels
    pub fn categorical<S: Into<String>>(categories: impl IntoIterator<Item = S>) -> Result<Self> {
        let dim = Dimension::Categorical {
            categories: categories.into_iter().map(|c| c.into()).collect(),
        };
        dim.check().map(|_| dim)
    }

    /// Checks the dimension invariants
    pub fn check(&self) -> Result<()> {
        match self {
            Dimension::Real {
                low,
                high,
                log_scale,
            } => {
                if !low.is_finite() || !high.is_finite() {
                    return Err(DoeError::InvalidSpaceError(format!(
                        "real bounds should be finite, got [{low}, {high}]"
                    )));
                }
                if low >= high {
                    return Err(DoeError::InvalidSpaceError(format!(
                        "lower bound should be less than upper bound, got [{low}, {high}]"
                    )));
                }
                if *log_scale && *low <= 0. {
                    return Err(DoeError::InvalidSpaceError(format!(
                        "log scaled bounds should be positive, got [{low}, {high}]"
                    )));
                }
            }
            Dimension::Integer { low, high } => {
                if low >= high {
                    return Err(DoeError::InvalidSpaceError(format!(
                        "lower bound should be less than upper bound, got [{low}, {high}]"
                    )));
                }
            }
            Dimension::Categorical { categories } => {
                if categories.is_empty() {
                    return Err(DoeError::InvalidSpaceError(
                        "categorical dimension without category".to_string(),
                    ));
                }
                for (i, c) in categories.iter().enumerate() {
                    if categories[..i].contains(c) {
                        return Err(DoeError::InvalidSpaceError(format!(
                            "duplicated category {c:?}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Number of encoded columns
    pub fn encoded_dim(&self) -> usize {
        match self {
            Dimension::Categorical { categories } => categories.len(),
            _ => 1,
        }
    }

    /// Number of distinct values, `None` for real dimensions
    pub fn cardinality(&self) -> Option<usize> {
        match self {
            Dimension::Real { .. } => None,
            Dimension::Integer { low, high } => high
                .checked_sub(*low)
                .and_then(|d| usize::try_from(d).ok())
                .and_then(|d| d.checked_add(1)),
            Dimension::Categorical { categories } => Some(categories.len()),
        }
    }

    /// Whether the value belongs to the dimension domain
    pub fn contains(&self, value: &Value) -> bool {
        match (self, value) {
            (Dimension::Real { low, high, .. }, Value::Real(v)) => *low <= *v && *v <= *high,
            (Dimension::Integer { low, high }, Value::Int(v)) => *low <= *v && *v <= *high,
            (Dimension::Categorical { categories }, Value::Cat(v)) => categories.contains(v),
            _ => false,
        }
    }

    /// Maps `u` in `[0, 1]` to a value, splitting discrete domains in equal-width bins
    pub fn from_unit(&self, u: f64) -> Value {
        let u = if u.is_nan() { 0. } else { u.clamp(0., 1.) };
        match self {
            Dimension::Real { .. } => self.decode_value(&[u]),
            Dimension::Integer { low, high } => {
                let n = int_span(*low, *high) + 1.;
                let offset = (u * n).floor().min(n - 1.) as i128;
                let v = (*low as i128 + offset).clamp(*low as i128, *high as i128);
                Value::Int(v as i64)
            }
            Dimension::Categorical { categories } => {
                let n = categories.len();
                let index = ((u * n as f64).floor() as usize).min(n - 1);
                Value::Cat(categories[index].clone())
            }
        }
    }

    /// Draws a value uniformly (log-uniformly for log scaled reals)
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Value {
        self.from_unit(rng.gen::<f64>())
    }

    fn encode_value(&self, value: &Value, out: &mut [f64]) -> Result<()> {
        if !self.contains(value) {
            return Err(DoeError::InvalidPointError(format!(
                "value {value} does not belong to {self:?}"
            )));
        }
        match (self, value) {
            (
                Dimension::Real {
                    low,
                    high,
                    log_scale,
                },
                Value::Real(v),
            ) => {
                out[0] = if *log_scale {
                    (v.log10() - low.log10()) / (high.log10() - low.log10())
                } else {
                    (v - low) / (high - low)
                };
            }
            (Dimension::Integer { low, high }, Value::Int(v)) => {
                out[0] = int_span(*low, *v) / int_span(*low, *high);
            }
            (Dimension::Categorical { categories }, Value::Cat(v)) => {
                out.iter_mut().for_each(|o| *o = 0.);
                if let Some(index) = categories.iter().position(|c| c == v) {
                    out[index] = 1.;
                }
            }
            _ => unreachable!("value kind checked by contains"),
        }
        Ok(())
    }

    fn decode_value(&self, enc: &[f64]) -> Value {
        match self {
            Dimension::Real {
                low,
                high,
                log_scale,
            } => {
                let v = if *log_scale {
                    let (llow, lhigh) = (low.log10(), high.log10());
                    10f64.powf(llow + enc[0] * (lhigh - llow))
                } else {
                    low + enc[0] * (high - low)
                };
                Value::Real(v.clamp(*low, *high))
            }
            Dimension::Integer { low, high } => {
                let v = (*low as f64 + enc[0] * int_span(*low, *high)).round() as i64;
                Value::Int(v.clamp(*low, *high))
            }
            Dimension::Categorical { categories } => {
                // argmax, first index wins ties
                let mut index = 0;
                for (i, v) in enc.iter().enumerate() {
                    if *v > enc[index] {
                        index = i;
                    }
                }
                Value::Cat(categories[index].clone())
            }
        }
    }
}

/// An ordered list of dimensions defining the coordinates of every point
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Space {
    dims: Vec<Dimension>,
}

impl Space {
    /// Builds a space from its dimensions, fails if the list is empty
    /// or if any dimension is malformed
    ///
    /// ```
    /// use smbox_doe::{Dimension, Space, Value};
    ///
    /// let space = Space::new(vec![
    ///     Dimension::log_real(1e-3, 1.).unwrap(),
    ///     Dimension::integer(1, 5).unwrap(),
    ///     Dimension::categorical(["relu", "tanh"]).unwrap(),
    /// ])
    /// .unwrap();
    /// let x = space.encode(&[Value::Real(0.01), Value::Int(3), "tanh".into()]).unwrap();
    /// assert_eq!(x.len(), 4);
    /// ```
    pub fn new(dims: Vec<Dimension>) -> Result<Self> {
        let space = Space { dims };
        space.check()?;
        Ok(space)
    }

    /// Checks the space invariants
    pub fn check(&self) -> Result<()> {
        if self.dims.is_empty() {
            return Err(DoeError::InvalidSpaceError(
                "space should have at least one dimension".to_string(),
            ));
        }
        for (i, dim) in self.dims.iter().enumerate() {
            dim.check().map_err(|err| match err {
                DoeError::InvalidSpaceError(msg) => {
                    DoeError::InvalidSpaceError(format!("dimension {i}: {msg}"))
                }
                err => err,
            })?;
        }
        Ok(())
    }

    /// Dimensions of the space
    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    /// Number of dimensions
    pub fn n_dims(&self) -> usize {
        self.dims.len()
    }

    /// Size of encoded vectors
    pub fn encoded_dim(&self) -> usize {
        self.dims.iter().map(|d| d.encoded_dim()).sum()
    }

    /// Whether every dimension is integer or categorical
    pub fn is_discrete(&self) -> bool {
        self.dims
            .iter()
            .all(|d| !matches!(d, Dimension::Real { .. }))
    }

    /// Number of distinct points of a discrete space, `None` when a dimension
    /// is real or when the count overflows
    pub fn cardinality(&self) -> Option<usize> {
        self.dims
            .iter()
            .try_fold(1usize, |acc, d| d.cardinality().and_then(|c| acc.checked_mul(c)))
    }

    /// Encoded column ranges of each dimension
    pub fn encoded_ranges(&self) -> Vec<std::ops::Range<usize>> {
        let mut start = 0;
        self.dims
            .iter()
            .map(|d| {
                let range = start..start + d.encoded_dim();
                start = range.end;
                range
            })
            .collect()
    }

    /// Encoded columns of real and integer dimensions
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.dims
            .iter()
            .zip(self.encoded_ranges())
            .filter(|(d, _)| !matches!(d, Dimension::Categorical { .. }))
            .map(|(_, r)| r.start)
            .collect()
    }

    /// Whether the point belongs to the space
    pub fn contains(&self, point: &[Value]) -> bool {
        point.len() == self.dims.len() && self.dims.iter().zip(point).all(|(d, v)| d.contains(v))
    }

    /// Bounds of the folded unit hypercube, one `[0, 1]` row per dimension
    pub(crate) fn unit_limits(&self) -> Array2<f64> {
        let mut xlimits = Array2::zeros((self.n_dims(), 2));
        xlimits.column_mut(1).fill(1.);
        xlimits
    }

    /// Maps a point of the folded unit hypercube (one coordinate per dimension) to a point
    pub fn from_unit(&self, u: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Point {
        assert_eq!(u.len(), self.n_dims(), "unit point size mismatch");
        self.dims
            .iter()
            .zip(u.iter())
            .map(|(d, ui)| d.from_unit(*ui))
            .collect()
    }

    /// Draws a single point uniformly over the joint domain
    pub fn sample_point<R: Rng>(&self, rng: &mut R) -> Point {
        self.dims.iter().map(|d| d.sample(rng)).collect()
    }

    /// Draws `n` independent points uniformly over the joint domain.
    /// Log scaled real dimensions are sampled uniformly in log space.
    ///
    /// Fails if any dimension is malformed
    pub fn sample<R: Rng>(&self, n: usize, rng: &mut R) -> Result<Vec<Point>> {
        self.check()?;
        let doe = Random::new(&self.unit_limits()).normalized_sample(n, rng);
        Ok(doe.rows().into_iter().map(|u| self.from_unit(&u)).collect())
    }

    /// Encodes a point as a vector of `[0, 1]` values
    pub fn encode(&self, point: &[Value]) -> Result<Array1<f64>> {
        if point.len() != self.dims.len() {
            return Err(DoeError::InvalidPointError(format!(
                "point has {} values, space has {} dimensions",
                point.len(),
                self.dims.len()
            )));
        }
        let mut x = Array1::zeros(self.encoded_dim());
        for ((dim, value), range) in self.dims.iter().zip(point).zip(self.encoded_ranges()) {
            let mut enc = vec![0.; range.len()];
            dim.encode_value(value, &mut enc)?;
            x.slice_mut(s![range]).assign(&ArrayView1::from(&enc[..]));
        }
        Ok(x)
    }

    /// Encodes points as the rows of a (n, encoded_dim) matrix
    pub fn encode_all(&self, points: &[Point]) -> Result<Array2<f64>> {
        let mut x = Array2::zeros((points.len(), self.encoded_dim()));
        for (mut row, p) in x.rows_mut().into_iter().zip(points) {
            row.assign(&self.encode(p)?);
        }
        Ok(x)
    }

    /// Projects an encoded vector into the encoded domain `[0, 1]^n`, NaN going to 0
    pub fn clip(&self, x: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Array1<f64> {
        x.mapv(|v| if v.is_nan() { 0. } else { v.clamp(0., 1.) })
    }

    /// Decodes an encoded vector (clipped first) into a point:
    /// integers are rounded and categories decoded as the argmax of their block.
    ///
    /// *Panics* if the vector size differs from `encoded_dim()`
    pub fn decode(&self, x: &ArrayBase<impl Data<Elem = f64>, Ix1>) -> Point {
        assert_eq!(x.len(), self.encoded_dim(), "encoded vector size mismatch");
        let x = self.clip(x);
        self.dims
            .iter()
            .zip(self.encoded_ranges())
            .map(|(dim, range)| dim.decode_value(&x.slice(s![range]).to_vec()))
            .collect()
    }

    /// Decodes every row of a (n, encoded_dim) matrix
    pub fn decode_all(&self, x: &ArrayBase<impl Data<Elem = f64>, Ix2>) -> Vec<Point> {
        x.rows().into_iter().map(|row| self.decode(&row)).collect()
    }

    /// All points of a discrete space, last dimension varying fastest,
    /// `None` when the space has a real dimension
    pub fn enumerate(&self) -> Option<Vec<Point>> {
        let card = self.cardinality()?;
        let values: Vec<Vec<Value>> = self
            .dims
            .iter()
            .map(|d| match d {
                Dimension::Integer { low, high } => (*low..=*high).map(Value::Int).collect(),
                Dimension::Categorical { categories } => {
                    categories.iter().cloned().map(Value::Cat).collect()
                }
                Dimension::Real { .. } => vec![],
            })
            .collect();

        let mut points = Vec::with_capacity(card);
        let mut index = vec![0usize; values.len()];
        for _ in 0..card {
            points.push(index.iter().zip(&values).map(|(i, v)| v[*i].clone()).collect());
            for k in (0..index.len()).rev() {
                index[k] += 1;
                if index[k] < values[k].len() {
                    break;
                }
                index[k] = 0;
            }
        }
        Some(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn mixed_space() -> Space {
        Space::new(vec![
            Dimension::real(-2., 3.).unwrap(),
            Dimension::log_real(1e-4, 1e-1).unwrap(),
            Dimension::integer(2, 6).unwrap(),
            Dimension::categorical(["a", "b", "c"]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Dimension::real(1., 1.).is_err());
        assert!(Dimension::real(2., 1.).is_err());
        assert!(Dimension::real(0., f64::INFINITY).is_err());
        assert!(Dimension::log_real(0., 1.).is_err());
        assert!(Dimension::integer(3, 3).is_err());
        assert!(Dimension::categorical(Vec::<String>::new()).is_err());
        assert!(Dimension::categorical(["a", "b", "a"]).is_err());
        assert!(matches!(
            Space::new(vec![]),
            Err(DoeError::InvalidSpaceError(_))
        ));
    }

    #[test]
    fn test_malformed_space_cannot_sample() {
        let space = Space {
            dims: vec![Dimension::Integer { low: 4, high: 1 }],
        };
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        assert!(matches!(
            space.sample(3, &mut rng),
            Err(DoeError::InvalidSpaceError(_))
        ));
    }

    #[test]
    fn test_encode() {
        let space = mixed_space();
        assert_eq!(space.encoded_dim(), 6);
        let x = space
            .encode(&[
                Value::Real(0.5),
                Value::Real(1e-2),
                Value::Int(3),
                "b".into(),
            ])
            .unwrap();
        assert_abs_diff_eq!(x, array![0.5, 2. / 3., 0.25, 0., 1., 0.], epsilon = 1e-12);
    }

    #[test]
    fn test_encode_invalid_point() {
        let space = mixed_space();
        assert!(space.encode(&[Value::Real(0.5)]).is_err());
        assert!(space
            .encode(&[Value::Real(4.), Value::Real(1e-2), Value::Int(3), "b".into()])
            .is_err());
        assert!(space
            .encode(&[Value::Real(0.), Value::Real(1e-2), Value::Int(3), "z".into()])
            .is_err());
        assert!(space
            .encode(&[Value::Real(0.), Value::Real(1e-2), Value::Real(3.), "a".into()])
            .is_err());
    }

    #[test]
    fn test_decode_encode_roundtrip() {
        let space = mixed_space();
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        for p in space.sample(100, &mut rng).unwrap() {
            let back = space.decode(&space.encode(&p).unwrap());
            assert_abs_diff_eq!(back[0].as_f64().unwrap(), p[0].as_f64().unwrap(), epsilon = 1e-12);
            assert_abs_diff_eq!(back[1].as_f64().unwrap(), p[1].as_f64().unwrap(), epsilon = 1e-12);
            assert_eq!(back[2], p[2]);
            assert_eq!(back[3], p[3]);
        }
    }

    #[test]
    fn test_discrete_roundtrip_is_exact() {
        let space = Space::new(vec![
            Dimension::integer(-3, 7).unwrap(),
            Dimension::categorical(["x", "y"]).unwrap(),
        ])
        .unwrap();
        for p in space.enumerate().unwrap() {
            assert_eq!(space.decode(&space.encode(&p).unwrap()), p);
        }
    }

    #[test]
    fn test_extreme_integer_bounds() {
        let space = Space::new(vec![Dimension::integer(i64::MIN, i64::MAX).unwrap()]).unwrap();
        assert_eq!(space.cardinality(), None);
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let points = space.sample(50, &mut rng).unwrap();
        assert!(points.iter().all(|p| space.contains(p)));

        let x = space.encode(&[Value::Int(i64::MIN)]).unwrap();
        assert_eq!(x[0], 0.);
        let x = space.encode(&[Value::Int(i64::MAX)]).unwrap();
        assert_eq!(x[0], 1.);
        assert_abs_diff_eq!(
            space.encode(&[Value::Int(0)]).unwrap()[0],
            0.5,
            epsilon = 1e-12
        );
        assert_eq!(space.decode(&array![0.]), vec![Value::Int(i64::MIN)]);
        assert_eq!(space.decode(&array![1.]), vec![Value::Int(i64::MAX)]);
        assert_eq!(
            Dimension::integer(i64::MIN, i64::MAX).unwrap().from_unit(1.),
            Value::Int(i64::MAX)
        );
    }

    #[test]
    fn test_clip_and_decode_out_of_bounds() {
        let space = mixed_space();
        let x = array![1.7, -0.3, f64::NAN, 0.2, 0.9, 0.9];
        assert_eq!(
            space.clip(&x),
            array![1., 0., 0., 0.2, 0.9, 0.9]
        );
        let p = space.decode(&x);
        assert_eq!(p[0], Value::Real(3.));
        assert_abs_diff_eq!(p[1].as_f64().unwrap(), 1e-4, epsilon = 1e-15);
        assert_eq!(p[2], Value::Int(2));
        // tie between b and c: first wins
        assert_eq!(p[3], Value::Cat("b".to_string()));
        assert!(space.contains(&p));
    }

    #[test]
    fn test_sample_within_domain() {
        let space = mixed_space();
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let points = space.sample(200, &mut rng).unwrap();
        assert_eq!(points.len(), 200);
        assert!(points.iter().all(|p| space.contains(p)));
        // every integer and category is reachable
        for i in 2..=6 {
            assert!(points.iter().any(|p| p[2] == Value::Int(i)));
        }
        for c in ["a", "b", "c"] {
            assert!(points.iter().any(|p| p[3] == Value::from(c)));
        }
    }

    #[test]
    fn test_log_sampling_is_uniform_in_log_space() {
        let space = Space::new(vec![Dimension::log_real(1e-4, 1.).unwrap()]).unwrap();
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        let points = space.sample(2000, &mut rng).unwrap();
        let below = points
            .iter()
            .filter(|p| p[0].as_f64().unwrap() < 1e-2)
            .count();
        // half of the log range lies below 1e-2
        assert!((800..1200).contains(&below));
    }

    #[test]
    fn test_cardinality_and_enumerate() {
        let space = Space::new(vec![
            Dimension::integer(0, 2).unwrap(),
            Dimension::categorical(["u", "v"]).unwrap(),
        ])
        .unwrap();
        assert!(space.is_discrete());
        assert_eq!(space.cardinality(), Some(6));
        let points = space.enumerate().unwrap();
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], vec![Value::Int(0), "u".into()]);
        assert_eq!(points[1], vec![Value::Int(0), "v".into()]);
        assert_eq!(points[5], vec![Value::Int(2), "v".into()]);
        assert_eq!(mixed_space().cardinality(), None);
        assert!(mixed_space().enumerate().is_none());
    }

    #[test]
    fn test_numeric_columns() {
        let space = Space::new(vec![
            Dimension::categorical(["a", "b"]).unwrap(),
            Dimension::real(0., 1.).unwrap(),
            Dimension::categorical(["c", "d", "e"]).unwrap(),
            Dimension::integer(0, 4).unwrap(),
        ])
        .unwrap();
        assert_eq!(space.numeric_columns(), vec![2, 6]);
        assert_eq!(space.encoded_ranges(), vec![0..2, 2..3, 3..6, 6..7]);
    }

    #[cfg(feature = "serializable")]
    #[test]
    fn test_space_serde() {
        let space = mixed_space();
        let json = serde_json::to_string(&space).unwrap();
        let back: Space = serde_json::from_str(&json).unwrap();
        assert_eq!(back, space);
        assert!(back.check().is_ok());

        let point = vec![Value::Real(0.5), Value::Real(1e-3), Value::Int(4), "b".into()];
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(serde_json::from_str::<Point>(&json).unwrap(), point);
    }
}
