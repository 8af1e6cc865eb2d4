use crate::utils::min_pdist;
use linfa::Float;
use ndarray::{ArrayBase, Data, Ix2};

/// Distance used in place of self-distances so that they never win a minimum
pub const SELF_DISTANCE: f64 = 1e4;

/// Nearest-neighbor space-filling criterion.
///
/// A set of `ns` points in `[0, 1)^nx` is accepted when its minimum pairwise
/// euclidean distance is strictly greater than `ratio * h * sqrt(nx)`
/// with `h = 1/ns`, that is `ratio` times the diagonal of one cell.
#[derive(Clone, Copy, Debug)]
pub struct NeighborConvergence<F: Float> {
    ratio: F,
    threshold: F,
}

impl<F: Float> NeighborConvergence<F> {
    /// Criterion for `ns` points in dimension `nx` with the given tightness `ratio`
    pub fn new(ratio: F, nx: usize, ns: usize) -> Self {
        let h = F::one() / F::cast(ns);
        let threshold = ratio * h * F::cast(nx).sqrt();
        NeighborConvergence { ratio, threshold }
    }

    /// Tightness ratio
    pub fn ratio(&self) -> F {
        self.ratio
    }

    /// Distance the minimum pairwise distance has to exceed
    pub fn threshold(&self) -> F {
        self.threshold
    }

    /// Global minimum pairwise distance, [`SELF_DISTANCE`] when less than two points
    pub fn min_distance(&self, x: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>) -> F {
        min_pdist(x).unwrap_or_else(|| F::cast(SELF_DISTANCE))
    }

    /// Whether the criterion holds for any Latin Hypercube set.
    ///
    /// With a zero ratio, two points of a Latin Hypercube never share a cell
    /// coordinate so their distance is positive and no check is needed.
    pub fn is_trivial(&self) -> bool {
        self.threshold <= F::zero()
    }

    /// Checks the criterion, returns whether it holds along with the minimum distance
    pub fn check(&self, x: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>) -> (bool, F) {
        let d_min = self.min_distance(x);
        (d_min > self.threshold, d_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_threshold() {
        let crit = NeighborConvergence::new(1.0, 2, 4);
        assert_abs_diff_eq!(crit.threshold(), 0.25 * 2f64.sqrt(), epsilon = 1e-12);
        let crit = NeighborConvergence::new(0.5, 9, 10);
        assert_abs_diff_eq!(crit.threshold(), 0.5 * 0.1 * 3., epsilon = 1e-12);
    }

    #[test]
    fn test_check() {
        let crit = NeighborConvergence::new(1.0, 2, 4);
        // one point per row and column of the 4x4 grid
        let spread = array![[0.05, 0.05], [0.4, 0.4], [0.6, 0.95], [0.95, 0.6]];
        let (ok, d) = crit.check(&spread);
        assert!(ok);
        assert!(d > crit.threshold());

        let clumped = array![[0.24, 0.24], [0.26, 0.26], [0.6, 0.9], [0.9, 0.6]];
        let (ok, d) = crit.check(&clumped);
        assert!(!ok);
        assert_abs_diff_eq!(d, 0.02 * 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_trivial_criterion() {
        assert!(NeighborConvergence::new(0., 3, 10).is_trivial());
        assert!(!NeighborConvergence::new(0.1, 3, 10).is_trivial());
    }

    #[test]
    fn test_single_point_passes() {
        let crit = NeighborConvergence::new(1.0, 3, 1);
        let (ok, d) = crit.check(&array![[0.2, 0.3, 0.4]]);
        assert!(ok);
        assert_abs_diff_eq!(d, SELF_DISTANCE);
    }
}
