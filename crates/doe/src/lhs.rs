use crate::convergence::NeighborConvergence;
use crate::errors::{DoeError, Result};
use crate::jitter::jitter;
use crate::strata::StrataAllocator;
use crate::utils::{check_xlimits, unit_hypercube, write_rng};
use crate::SamplingMethod;
use linfa::Float;
use log::debug;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use std::sync::{Arc, RwLock};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Default number of jitter attempts for a given stratum assignment
pub const DEFAULT_JITTER_RETRIES: usize = 3;
/// Default number of stratum assignments tried before giving up
pub const DEFAULT_MAX_RESTARTS: usize = 1000;

type RngRef<R> = Arc<RwLock<R>>;

/// A Latin Hypercube design accepted by the space-filling criterion
#[derive(Clone, Debug)]
pub struct LhsDesign<F: Float> {
    /// (ns, nx) samples in `[0, 1)^nx`
    pub samples: Array2<F>,
    /// (ns, nx) stratum indices the samples were jittered in
    pub strata: Array2<usize>,
    /// Minimum pairwise distance of the accepted samples,
    /// `None` when the criterion is disabled with a zero ratio
    pub min_distance: Option<F>,
    /// Number of stratum re-allocations before acceptance
    pub restarts: usize,
    /// Number of jitter attempts on the accepted stratum assignment
    pub jitters: usize,
}

/// The LHS design is built as follows: each dimension space is divided into ns strata
/// where ns is the number of sampling points, one stratum index vector is drawn per sample
/// without reusing a stratum, then each sample is jittered uniformly inside its cell.
///
/// The resulting set is accepted when its minimum pairwise distance exceeds
/// `ratio * h * sqrt(nx)` (see [NeighborConvergence]). Otherwise samples are re-jittered
/// within the same strata up to `jitter_retries` times, then a brand new stratum assignment
/// is drawn, at most `max_restarts` times.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Lhs<F: Float, R: Rng> {
    /// Sampling space definition as a (nx, 2) matrix
    /// The ith row is the [lower_bound, upper_bound] of xi, the ith component of x
    xlimits: Array2<F>,
    /// Tightness of the nearest-neighbor criterion (0 disables it)
    ratio: F,
    /// Number of jitter attempts for one stratum assignment
    jitter_retries: usize,
    /// Max number of stratum assignments
    max_restarts: usize,
    /// Random generator used for reproducibility
    rng: RngRef<R>,
}

/// LHS with default random generator
impl<F: Float> Lhs<F, Xoshiro256Plus> {
    /// Constructor given a design space given a (nx, 2) matrix \[\[lower bound, upper bound\], ...\]
    ///
    /// ```
    /// use feasample_doe::Lhs;
    /// use ndarray::arr2;
    ///
    /// let doe = Lhs::new(&arr2(&[[0.0, 1.0], [5.0, 10.0]]));
    /// ```
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Self {
        Self::new_with_rng(xlimits, Xoshiro256Plus::from_entropy())
    }

    /// Constructor of a LHS in the `[0, 1]^nx` hypercube
    pub fn unit(nx: usize) -> Self {
        Self::new(&unit_hypercube::<F>(nx))
    }
}

impl<F: Float, R: Rng> SamplingMethod<F> for Lhs<F, R> {
    fn sampling_space(&self) -> &Array2<F> {
        &self.xlimits
    }

    fn normalized_sample(&self, ns: usize) -> Result<Array2<F>> {
        self.design(ns).map(|design| design.samples)
    }
}

impl<F: Float, R: Rng> Lhs<F, R> {
    /// Constructor with given design space and random generator.
    /// * `xlimits`: (nx, 2) matrix where nx is the dimension of the samples and the ith row
    ///   is the definition interval of the ith component of x.
    /// * `rng`: random generator used to draw strata and jitter
    ///
    /// The design space is checked when sampling.
    pub fn new_with_rng(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>, rng: R) -> Self {
        Lhs {
            xlimits: xlimits.to_owned(),
            ratio: F::one(),
            jitter_retries: DEFAULT_JITTER_RETRIES,
            max_restarts: DEFAULT_MAX_RESTARTS,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Sets the nearest-neighbor criterion ratio, higher ratio demands more uniform spacing
    pub fn ratio(mut self, ratio: F) -> Self {
        self.ratio = ratio;
        self
    }

    /// Sets the number of jitter attempts (first one included) before re-allocating strata
    pub fn jitter_retries(mut self, jitter_retries: usize) -> Self {
        self.jitter_retries = jitter_retries;
        self
    }

    /// Sets the max number of stratum assignments before giving up
    pub fn max_restarts(mut self, max_restarts: usize) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    /// Sets the random generator
    pub fn with_rng<R2: Rng>(self, rng: R2) -> Lhs<F, R2> {
        Lhs {
            xlimits: self.xlimits,
            ratio: self.ratio,
            jitter_retries: self.jitter_retries,
            max_restarts: self.max_restarts,
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Generates `ns` samples in `[0, 1)^nx` satisfying the space-filling criterion
    ///
    /// # Errors
    ///
    /// * [DoeError::InputDegenerate] when `ns` is 0 or the design space has no dimension
    /// * [DoeError::ConvergenceExhausted] when `max_restarts` assignments were tried in vain
    pub fn design(&self, ns: usize) -> Result<LhsDesign<F>> {
        check_xlimits(&self.xlimits)?;
        if self.jitter_retries == 0 || self.max_restarts == 0 {
            return Err(DoeError::InvalidValue(
                "jitter retries and max restarts should be positive".to_string(),
            ));
        }
        let nx = self.xlimits.nrows();
        let criterion = NeighborConvergence::new(self.ratio, nx, ns.max(1));
        let mut rng = write_rng(&self.rng)?;

        if criterion.is_trivial() {
            let alloc = StrataAllocator::new(nx, ns)?;
            let h = alloc.h();
            let strata = alloc.draw_all(&mut *rng)?;
            let samples = jitter(&strata, h, &mut *rng);
            return Ok(LhsDesign {
                samples,
                strata,
                min_distance: None,
                restarts: 0,
                jitters: 1,
            });
        }

        let mut best = F::zero();
        for restart in 0..self.max_restarts {
            // Allocating
            let alloc = StrataAllocator::new(nx, ns)?;
            let h = alloc.h();
            let strata = alloc.draw_all(&mut *rng)?;

            for attempt in 1..=self.jitter_retries {
                // Jittering then checking
                let samples: Array2<F> = jitter(&strata, h, &mut *rng);
                let (accepted, min_distance) = criterion.check(&samples);
                if accepted {
                    return Ok(LhsDesign {
                        samples,
                        strata,
                        min_distance: Some(min_distance),
                        restarts: restart,
                        jitters: attempt,
                    });
                }
                if min_distance > best {
                    best = min_distance;
                }
            }
            debug!(
                "LHS restart #{} (best min distance {} <= {})",
                restart + 1,
                best,
                criterion.threshold()
            );
        }
        Err(DoeError::ConvergenceExhausted {
            restarts: self.max_restarts,
            best: best.to_f64().unwrap_or(f64::NAN),
            threshold: criterion.threshold().to_f64().unwrap_or(f64::NAN),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_abs_diff_ne};
    use ndarray::{arr2, array, Zip};

    fn assert_latin(design: &LhsDesign<f64>) {
        let (ns, _) = design.samples.dim();
        let h = 1. / ns as f64;
        for col in design.strata.columns() {
            let mut used = col.to_vec();
            used.sort_unstable();
            assert_eq!(used, (0..ns).collect::<Vec<_>>());
        }
        Zip::from(&design.samples)
            .and(&design.strata)
            .for_each(|&v, &idx| {
                assert!(v >= idx as f64 * h);
                assert!(v < (idx + 1) as f64 * h);
            });
    }

    #[test]
    fn test_lhs_2d_4_samples() {
        let lhs = Lhs::<f64, _>::unit(2).with_rng(Xoshiro256Plus::seed_from_u64(42));
        let design = lhs.design(4).unwrap();
        assert_eq!(design.samples.dim(), (4, 2));
        assert_latin(&design);
        let threshold = 0.25 * 2f64.sqrt();
        assert!(design.min_distance.unwrap() > threshold);
        assert!(design.jitters >= 1 && design.jitters <= DEFAULT_JITTER_RETRIES);
    }

    #[test]
    fn test_lhs_accepted_designs() {
        let mut seed = 0;
        for (nx, ns, ratio) in [(2, 5, 1.0), (3, 10, 0.3), (5, 20, 0.2), (1, 8, 0.5)] {
            seed += 1;
            let design = Lhs::<f64, _>::unit(nx)
                .ratio(ratio)
                .with_rng(Xoshiro256Plus::seed_from_u64(seed))
                .design(ns)
                .unwrap();
            assert_latin(&design);
            let threshold = ratio / ns as f64 * (nx as f64).sqrt();
            assert!(design.min_distance.unwrap() > threshold);
            assert_abs_diff_eq!(
                design.min_distance.unwrap(),
                NeighborConvergence::new(ratio, nx, ns).min_distance(&design.samples)
            );
        }
    }

    #[test]
    fn test_lhs_zero_ratio_skips_check() {
        let design = Lhs::<f64, _>::unit(3)
            .ratio(0.)
            .with_rng(Xoshiro256Plus::seed_from_u64(5))
            .design(200)
            .unwrap();
        assert_latin(&design);
        assert_eq!(design.min_distance, None);
        assert_eq!((design.restarts, design.jitters), (0, 1));
        assert!(NeighborConvergence::new(0., 3, 200).min_distance(&design.samples) > 0.);
    }

    #[test]
    fn test_lhs_replay() {
        let xlimits = arr2(&[[5., 10.], [0., 1.]]);
        let s1 = Lhs::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .sample(5)
            .unwrap();
        let s2 = Lhs::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .sample(5)
            .unwrap();
        assert_abs_diff_eq!(s1, s2, epsilon = 0.);
    }

    #[test]
    fn test_lhs_sample_in_bounds() {
        let xlimits = arr2(&[[5., 10.], [0., 1.], [-2., -1.]]);
        let samples = Lhs::new(&xlimits)
            .ratio(0.5)
            .with_rng(Xoshiro256Plus::seed_from_u64(0))
            .sample(6)
            .unwrap();
        assert_eq!(samples.dim(), (6, 3));
        for row in samples.rows() {
            for (j, v) in row.iter().enumerate() {
                assert!(*v >= xlimits[[j, 0]] && *v < xlimits[[j, 1]]);
            }
        }
    }

    #[test]
    fn test_convergence_exhausted() {
        // threshold 10 * 0.25 * sqrt(2) is larger than the hypercube diagonal
        let res = Lhs::<f64, _>::unit(2)
            .ratio(10.)
            .max_restarts(5)
            .with_rng(Xoshiro256Plus::seed_from_u64(42))
            .design(4);
        match res {
            Err(DoeError::ConvergenceExhausted {
                restarts,
                best,
                threshold,
            }) => {
                assert_eq!(restarts, 5);
                assert!(best > 0. && best < threshold);
            }
            other => panic!("expected exhausted convergence, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        let lhs = Lhs::<f64, _>::unit(2).with_rng(Xoshiro256Plus::seed_from_u64(42));
        assert!(matches!(lhs.design(0), Err(DoeError::InputDegenerate(_))));
        let lhs = Lhs::<f64, _>::unit(0).with_rng(Xoshiro256Plus::seed_from_u64(42));
        assert!(matches!(lhs.design(3), Err(DoeError::InputDegenerate(_))));
        let lhs = Lhs::new(&array![[0., 1., 2.]]);
        assert!(matches!(lhs.sample(3), Err(DoeError::InvalidValue(_))));
        let lhs = Lhs::<f64, _>::unit(2).jitter_retries(0);
        assert!(matches!(lhs.design(3), Err(DoeError::InvalidValue(_))));
    }

    #[test]
    fn test_single_sample() {
        let design = Lhs::<f64, _>::unit(3)
            .with_rng(Xoshiro256Plus::seed_from_u64(1))
            .design(1)
            .unwrap();
        assert_eq!(design.strata, array![[0, 0, 0]]);
        assert_eq!(design.restarts, 0);
        assert_eq!(design.jitters, 1);
    }

    #[test]
    fn test_no_duplicate() {
        let xlimits = arr2(&[[5., 10.], [0., 1.]]);
        let lhs = Lhs::new(&xlimits).with_rng(Xoshiro256Plus::seed_from_u64(42));

        let sample1 = lhs.sample(5).unwrap();
        let sample2 = lhs.sample(5).unwrap();
        assert_abs_diff_ne!(sample1, sample2);
    }

    #[test]
    fn test_lhs_clone_different() {
        let xlimits = array![[-1., 1.]];
        let rng = Xoshiro256Plus::seed_from_u64(42);
        let lhs = Lhs::new(&xlimits).ratio(0.5).with_rng(rng.clone());
        let lhs1 = lhs.clone();
        let s1 = lhs1.sample(10).unwrap();
        let lhs2 = lhs.clone();
        let s2 = lhs2.sample(10).unwrap();
        assert_abs_diff_ne!(s1, s2);
    }

    #[cfg(feature = "serializable")]
    #[test]
    fn test_lhs_serialization() {
        let lhs = Lhs::<f64, _>::unit(2)
            .ratio(0.5)
            .with_rng(Xoshiro256Plus::seed_from_u64(42));
        let json = serde_json::to_string(&lhs).unwrap();
        let restored: Lhs<f64, Xoshiro256Plus> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.sampling_space(), lhs.sampling_space());
        assert_abs_diff_eq!(
            restored.sample(4).unwrap(),
            lhs.sample(4).unwrap(),
            epsilon = 0.
        );
    }
}
