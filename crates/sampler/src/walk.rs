//! Fallback sampling by perturbation of a known feasible point.
//!
//! Every trial perturbs the same original seed point, the walk never moves
//! from an accepted point to the next one.
use crate::candidates::CandidateSet;
use crate::constraint::Constraint;
use crate::errors::{Result, SamplerError, Stage};
use log::{debug, info};
use ndarray::{Array1, ArrayBase, Data, Ix1};
use ndarray_rand::rand::Rng;

/// Adds to each component `x_i` of `seed` a value drawn uniformly in `[0, x_i)`.
///
/// Non positive components are left unchanged.
pub fn perturb<R: Rng>(seed: &ArrayBase<impl Data<Elem = f64>, Ix1>, rng: &mut R) -> Array1<f64> {
    seed.mapv(|v| if v > 0. { v + rng.gen_range(0. ..v) } else { v })
}

/// Local walk sampler around a feasible seed point
pub struct LocalWalkSampler<'a, C: Constraint + ?Sized> {
    constraint: &'a C,
    seed: Array1<f64>,
    max_trials: usize,
}

impl<'a, C: Constraint + ?Sized> LocalWalkSampler<'a, C> {
    /// Walk seeded with the constraint model example point
    pub fn new(constraint: &'a C, max_trials: usize) -> Result<Self> {
        let seed = constraint.example();
        if seed.len() != constraint.ndim() {
            return Err(SamplerError::DimensionError {
                expected: constraint.ndim(),
                actual: seed.len(),
            });
        }
        Ok(LocalWalkSampler {
            constraint,
            seed,
            max_trials,
        })
    }

    /// The point every trial perturbs
    pub fn seed(&self) -> &Array1<f64> {
        &self.seed
    }

    /// Adds feasible perturbations of the seed to `candidates` until it holds `target` points.
    ///
    /// Returns the number of constraint evaluations.
    ///
    /// # Errors
    ///
    /// [SamplerError::InfeasibleRegion] when `max_trials` evaluations do not suffice.
    pub fn fill<R: Rng>(
        &self,
        candidates: &mut CandidateSet,
        target: usize,
        rng: &mut R,
    ) -> Result<usize> {
        info!(
            "Local walk from {} to get {} more points",
            self.seed,
            target.saturating_sub(candidates.len())
        );
        let mut trials = 0;
        while candidates.len() < target {
            if trials >= self.max_trials {
                return Err(SamplerError::InfeasibleRegion {
                    stage: Stage::Walk,
                    trials,
                    n_valid: candidates.len(),
                    partial: candidates.to_array(),
                });
            }
            trials += 1;
            let x = perturb(&self.seed, rng);
            if self.constraint.apply(&x.view())? && candidates.insert(&x.view())? {
                debug!("Walk trial #{trials} accepted {x}");
            }
        }
        Ok(trials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{FnConstraint, LinearConstraints};
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn test_perturb_monotonic() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let seed = array![0., 0.01, 0.5, 0.9];
        for _ in 0..100 {
            let x = perturb(&seed, &mut rng);
            assert_eq!(x[0], 0.);
            for (xi, si) in x.iter().zip(seed.iter()) {
                assert!(xi >= si);
                assert!(*xi <= 2. * si);
            }
        }
    }

    #[test]
    fn test_walk_points_feasible_and_above_seed() {
        let mix = LinearConstraints::mixture(3, 1.).unwrap();
        let walk = LocalWalkSampler::new(&mix, 10_000).unwrap();
        let mut candidates = CandidateSet::with_capacity(3, 30, 0.);
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let trials = walk.fill(&mut candidates, 30, &mut rng).unwrap();
        assert!(trials >= 30);
        let points = candidates.into_array();
        assert_eq!(points.nrows(), 30);
        for x in points.rows() {
            assert!(mix.apply(&x).unwrap());
            for (xi, si) in x.iter().zip(walk.seed().iter()) {
                assert!(xi >= si);
            }
        }
    }

    #[test]
    fn test_walk_budget_exhausted() {
        let never = FnConstraint::new(array![0.5, 0.5], |_| false);
        let walk = LocalWalkSampler::new(&never, 100).unwrap();
        let mut candidates = CandidateSet::with_capacity(2, 5, 0.);
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        match walk.fill(&mut candidates, 5, &mut rng) {
            Err(SamplerError::InfeasibleRegion {
                stage,
                trials,
                n_valid,
                partial,
            }) => {
                assert_eq!(stage, Stage::Walk);
                assert_eq!(trials, 100);
                assert_eq!(n_valid, 0);
                assert_eq!(partial.dim(), (0, 2));
            }
            other => panic!("expected infeasible region, got {other:?}"),
        }
    }

    #[test]
    fn test_walk_rejects_duplicates() {
        // null components are never perturbed
        let origin = FnConstraint::new(array![0., 0.], |_| true);
        let walk = LocalWalkSampler::new(&origin, 20).unwrap();
        let mut candidates = CandidateSet::with_capacity(2, 3, 0.);
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        match walk.fill(&mut candidates, 3, &mut rng) {
            Err(SamplerError::InfeasibleRegion {
                stage,
                trials,
                n_valid,
                partial,
            }) => {
                assert_eq!(stage, Stage::Walk);
                assert_eq!(trials, 20);
                assert_eq!(n_valid, 1);
                assert_eq!(partial, array![[0., 0.]]);
            }
            other => panic!("expected infeasible region, got {other:?}"),
        }
    }

    #[test]
    fn test_walk_example_dimension() {
        struct Inconsistent;
        impl Constraint for Inconsistent {
            fn ndim(&self) -> usize {
                3
            }
            fn example(&self) -> Array1<f64> {
                array![0.1, 0.1]
            }
            fn apply(&self, _x: &ndarray::ArrayView1<f64>) -> anyhow::Result<bool> {
                Ok(true)
            }
        }
        assert!(matches!(
            LocalWalkSampler::new(&Inconsistent, 10),
            Err(SamplerError::DimensionError {
                expected: 3,
                actual: 2
            })
        ));
    }
}
