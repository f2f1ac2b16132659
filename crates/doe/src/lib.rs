/*!
This library defines the search spaces explored by model-based optimizers and
the Design of Experiments (DoE) methods used to seed them.

A [Space] is an ordered list of [Dimension]s (real, possibly log scaled, integer
or categorical). Points are lists of native [Value]s which are mapped to and from
a continuous encoding in `[0, 1]^n` (see [Space::encode], [Space::decode]).

A DoE method is a way to generate a set of points (i.e. a DoE) within a design (or sample) space `xlimits`.
The design space is defined as a 2D ndarray `(nx, 2)`, specifying lower bound and upper bound
of each `nx` components of the samples `x`. The random generator is passed
by mutable reference so that the caller keeps control of the draw order.

Example:
```
use smbox_doe::{initial_design, Dimension, InitialDesign, Lhs, LhsKind, SamplingMethod, Space};
use ndarray::arr2;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

let mut rng = Xoshiro256Plus::seed_from_u64(42);

// Design space is defined as [5., 10.] x [0., 1.], samples are 2-dimensional.
let xlimits = arr2(&[[5., 10.], [0., 1.]]);
// We generate five samples using centered Latin Hypercube sampling.
let samples = Lhs::new(&xlimits).kind(LhsKind::Centered).sample(5, &mut rng);

// A mixed search space and its first evaluation points
let space = Space::new(vec![
    Dimension::log_real(1e-4, 1e-1).unwrap(),
    Dimension::integer(1, 8).unwrap(),
    Dimension::categorical(["gini", "entropy"]).unwrap(),
]).unwrap();
let points = initial_design(&space, 5, InitialDesign::Lhs(LhsKind::Maximin), &mut rng).unwrap();
assert!(points.iter().all(|p| space.contains(p)));
```

This library contains two kinds of sampling methods:
* [Latin Hypercube Sampling](Lhs),
* [Random Sampling](Random)

*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod design;
mod errors;
mod lhs;
mod random;
mod space;
mod traits;
mod utils;

pub use design::*;
pub use errors::*;
pub use lhs::*;
pub use random::*;
pub use space::*;
pub use traits::*;
pub use utils::pdist;
