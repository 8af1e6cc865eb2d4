//! This library samples the feasible region of the `[0, 1)^nx` hypercube defined
//! by arbitrary nonlinear constraints, typically mixture or formulation design spaces.
//!
//! Space-filling candidate batches (see [feasample_doe::Lhs]) are filtered through a
//! [Constraint] model and deduplicated. When the feasible region proves too sparse
//! for stratified sampling, the sampler falls back to random perturbations of a
//! feasible point given by the constraint model.
//!
//! # Example
//!
//! ```
//! use feasample::{FnConstraint, SamplerBuilder};
//! use ndarray::array;
//!
//! // Points of the unit square within the disk of radius 0.4 centered at (0.5, 0.5)
//! let disk = FnConstraint::new(array![0.5, 0.5], |x| {
//!     (x[0] - 0.5).powi(2) + (x[1] - 0.5).powi(2) < 0.16
//! });
//! let res = SamplerBuilder::sample(disk)
//!     .configure(|config| config.n_results(30).seed(42))
//!     .build()
//!     .expect("sampler built")
//!     .run()
//!     .expect("feasible samples");
//! println!("{} points found in {} trials", res.candidates.nrows(), res.trials);
//! ```
//!
//! Failed runs report the stage of the failure along with the feasible points found so far.
//!
//! ```
//! use feasample::{FnConstraint, SamplerBuilder, Stage};
//! use ndarray::array;
//!
//! let never = FnConstraint::new(array![0.5, 0.5], |_| false);
//! let err = SamplerBuilder::sample(never)
//!     .configure(|config| config.max_walk_trials(100))
//!     .build()
//!     .expect("sampler built")
//!     .run()
//!     .unwrap_err();
//! assert_eq!(err.stage(), Some(Stage::Walk));
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

mod candidates;
mod config;
mod constraint;
mod errors;
mod orchestrator;
mod output;
mod walk;

pub use crate::candidates::*;
pub use crate::config::*;
pub use crate::constraint::*;
pub use crate::errors::*;
pub use crate::orchestrator::*;
pub use crate::output::*;
pub use crate::walk::*;
