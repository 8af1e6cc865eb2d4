/*!
This library implements stratified Design of Experiments (DoE) methods, mainly a
[Latin Hypercube sampling](https://en.wikipedia.org/wiki/Latin_hypercube_sampling)
guarded by a nearest-neighbor space-filling criterion.

A DoE method is a way to generate a set of points (i.e. a DoE) within a design (or sample) space `xlimits`.
The design space is defined as a 2D ndarray `(nx, 2)`, specifying lower bound and upper bound
of each `nx` components of the samples `x`. Samples are first generated in the unit hypercube
`[0, 1)^nx` then scaled to the design space.

Example:
```
use feasample_doe::{Lhs, Random, SamplingMethod};
use ndarray::arr2;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// Design space is defined as [5., 10.] x [0., 1.], samples are 2-dimensional.
let xlimits = arr2(&[[5., 10.], [0., 1.]]);
// We generate five space-filling Latin Hypercube samples.
let samples = Lhs::new(&xlimits).sample(5).expect("LHS samples");
// or with a looser spacing criterion and a seeded random generator for reproducibility
let samples = Lhs::new(&xlimits)
    .ratio(0.5)
    .with_rng(Xoshiro256Plus::seed_from_u64(42))
    .sample(5)
    .expect("LHS samples");
// or else plain uniform random sampling
let samples = Random::new(&xlimits).sample(5).expect("random samples");
```

The Latin Hypercube generation is made of the following building blocks:
* [strata allocation](crate::StrataAllocator): draws one stratum per dimension per sample without repetition,
* [cell jitter](crate::jitter()): maps stratum indices to continuous values inside their cells,
* [neighbor convergence](crate::NeighborConvergence): checks the minimum pairwise distance,
* [Latin Hypercube sampling](crate::Lhs): re-jitters then re-allocates until the check holds.

Unit samples can be mapped to standard normal samples with [to_standard_normal].

*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod convergence;
mod errors;
mod jitter;
mod lhs;
mod normal;
mod random;
mod strata;
mod traits;
mod utils;

pub use convergence::*;
pub use errors::*;
pub use jitter::*;
pub use lhs::*;
pub use normal::*;
pub use random::*;
pub use strata::*;
pub use traits::*;
pub use utils::{min_pdist, unit_hypercube};
