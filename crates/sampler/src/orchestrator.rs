//! Constrained sampler filtering space-filling batches through a feasibility model,
//! with a fallback local walk when the feasible region is too sparse.
//!
//! ```
//! use feasample::{LinearConstraints, SamplerBuilder};
//!
//! // Mixture design: x1 + x2 + x3 <= 1
//! let mixture = LinearConstraints::mixture(3, 1.).expect("mixture constraints");
//! let res = SamplerBuilder::sample(mixture)
//!     .configure(|config| config.n_results(20).seed(42))
//!     .build()
//!     .expect("sampler built")
//!     .run()
//!     .expect("feasible samples");
//! assert_eq!(res.candidates.nrows(), 20);
//! ```
use crate::candidates::CandidateSet;
use crate::config::{BulkStrategy, SamplerConfig};
use crate::constraint::Constraint;
use crate::errors::{Result, SamplerError, Stage};
use crate::walk::LocalWalkSampler;

use feasample_doe::{unit_hypercube, DoeError, Lhs, Random, SamplingMethod};
use log::{debug, info, warn};
use ndarray::Array2;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Candidate generation mode a run ended with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingMode {
    /// Every candidate comes from bulk space-filling batches
    Stratified,
    /// The run switched to the local walk
    Walk,
}

/// Result of a successful sampling run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SamplingResult {
    /// (n, nx) feasible points in acceptance order
    pub candidates: Array2<f64>,
    /// Number of constraint evaluations on stratified candidates
    pub trials: usize,
    /// Number of constraint evaluations during the local walk
    pub walk_trials: usize,
    /// Mode the run ended with
    pub mode: SamplingMode,
}

/// Constrained sampler builder allowing to specify the feasibility model
/// and the configuration of the run.
pub struct SamplerBuilder<C: Constraint> {
    constraint: C,
    config: SamplerConfig,
}

impl<C: Constraint> SamplerBuilder<C> {
    /// Sampling of the region of `[0, 1)^nx` accepted by `constraint`
    /// where `nx` is `constraint.ndim()`
    pub fn sample(constraint: C) -> Self {
        SamplerBuilder {
            constraint,
            config: SamplerConfig::default(),
        }
    }

    /// Set configuration of the sampler
    pub fn configure<F: FnOnce(SamplerConfig) -> SamplerConfig>(mut self, init: F) -> Self {
        self.config = init(self.config);
        self
    }

    /// Build the sampler once the configuration and the constraint model are checked
    pub fn build(self) -> Result<Sampler<C>> {
        self.config.check()?;
        let nx = self.constraint.ndim();
        if nx == 0 {
            return Err(DoeError::InputDegenerate(
                "sampling space should have at least one dimension".to_string(),
            )
            .into());
        }
        let rng = if let Some(seed) = self.config.seed {
            Xoshiro256Plus::seed_from_u64(seed)
        } else {
            Xoshiro256Plus::from_entropy()
        };
        Ok(Sampler {
            constraint: self.constraint,
            config: self.config,
            rng: Arc::new(RwLock::new(rng)),
        })
    }
}

/// Constrained sampler
///
/// Successive runs draw from successive streams of the random generator,
/// a seeded sampler gives the same sequence of runs.
pub struct Sampler<C: Constraint> {
    constraint: C,
    config: SamplerConfig,
    rng: Arc<RwLock<Xoshiro256Plus>>,
}

impl<C: Constraint> Sampler<C> {
    /// Sampler configuration
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Non overlapping generators for the bulk batches and the walk of one run
    fn next_streams(&self) -> Result<(Xoshiro256Plus, Xoshiro256Plus)> {
        let mut rng = self.rng.write().map_err(|_| {
            DoeError::InvalidValue("random generator lock poisoned".to_string())
        })?;
        let bulk_rng = rng.clone();
        rng.jump();
        let walk_rng = rng.clone();
        rng.jump();
        Ok((bulk_rng, walk_rng))
    }

    fn bulk_sampler(&self, nx: usize, rng: Xoshiro256Plus) -> Box<dyn SamplingMethod<f64>> {
        let xlimits = unit_hypercube::<f64>(nx);
        match self.config.bulk {
            BulkStrategy::Lhs { ratio } => Box::new(
                Lhs::new_with_rng(&xlimits, rng)
                    .ratio(ratio)
                    .jitter_retries(self.config.jitter_retries)
                    .max_restarts(self.config.max_restarts),
            ),
            BulkStrategy::Random => Box::new(Random::new_with_rng(&xlimits, rng)),
        }
    }

    /// Runs the sampling until `n_results` (or `result_cap`) feasible unique points are found.
    ///
    /// Bulk batches are filtered through the constraint model. Every `n_freq` trials,
    /// when less than half of the window trials were accepted, the run switches
    /// for good to perturbations of the constraint model example point.
    ///
    /// # Errors
    ///
    /// * [SamplerError::InfeasibleRegion] when a trial budget is exhausted
    /// * [SamplerError::SamplingAborted] when a bulk batch cannot be generated
    /// * [SamplerError::ConstraintError] when the constraint model fails
    ///
    /// Run failures carry the feasible points found so far.
    pub fn run(&self) -> Result<SamplingResult> {
        let nx = self.constraint.ndim();
        let target = self.config.target();
        let n_freq = self.config.n_freq;
        info!(
            "Sampling {} feasible points in dim {} with {:?} batches",
            target, nx, self.config.bulk
        );

        let (bulk_rng, mut walk_rng) = self.next_streams()?;
        let mut candidates = CandidateSet::with_capacity(nx, target, self.config.dedup_tol);
        let bulk = self.bulk_sampler(nx, bulk_rng);
        let mut mode = SamplingMode::Stratified;
        let mut trials = 0;
        let (mut window_trials, mut window_accepted) = (0, 0);

        'stratified: while candidates.len() < target {
            let batch = bulk.sample(self.config.batch_size()).map_err(|err| {
                SamplerError::SamplingAborted {
                    stage: Stage::of(&err),
                    n_valid: candidates.len(),
                    partial: candidates.to_array(),
                    source: err,
                }
            })?;
            for x in batch.rows() {
                if candidates.len() >= target {
                    break 'stratified;
                }
                if trials >= self.config.max_trials {
                    return Err(SamplerError::InfeasibleRegion {
                        stage: Stage::Acceptance,
                        trials,
                        n_valid: candidates.len(),
                        partial: candidates.into_array(),
                    });
                }
                trials += 1;
                window_trials += 1;
                if self.constraint.apply(&x)? && candidates.insert(&x)? {
                    window_accepted += 1;
                }
                if window_trials == n_freq && candidates.len() < target {
                    debug!(
                        "Trial #{}: {}/{} accepted in window, {} candidates",
                        trials,
                        window_accepted,
                        n_freq,
                        candidates.len()
                    );
                    if 2 * window_accepted < n_freq {
                        warn!(
                            "Only {}/{} candidates accepted, switching to local walk",
                            window_accepted, n_freq
                        );
                        mode = SamplingMode::Walk;
                        break 'stratified;
                    }
                    window_trials = 0;
                    window_accepted = 0;
                }
            }
        }

        let mut walk_trials = 0;
        if mode == SamplingMode::Walk {
            let walk = LocalWalkSampler::new(&self.constraint, self.config.max_walk_trials)?;
            walk_trials = walk.fill(&mut candidates, target, &mut walk_rng)?;
        }

        info!(
            "Sampling done: {} points, {} stratified trials, {} walk trials",
            candidates.len(),
            trials,
            walk_trials
        );
        Ok(SamplingResult {
            candidates: candidates.into_array(),
            trials,
            walk_trials,
            mode,
        })
    }
}
