use crate::errors::{DoeError, Result};
use linfa::Float;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use rayon::prelude::*;
use std::sync::{RwLock, RwLockWriteGuard};

/// Locks the shared random generator of a sampler
pub(crate) fn write_rng<R>(rng: &RwLock<R>) -> Result<RwLockWriteGuard<'_, R>> {
    rng.write()
        .map_err(|_| DoeError::InvalidValue("random generator lock poisoned".to_string()))
}

/// Builds the `[0, 1]^nx` sampling space as a (nx, 2) matrix
pub fn unit_hypercube<F: Float>(nx: usize) -> Array2<F> {
    let mut xlimits = Array2::zeros((nx, 2));
    xlimits.column_mut(1).fill(F::one());
    xlimits
}

/// Checks a sampling space given as a (nx, 2) matrix \[\[lower bound, upper bound\], ...\]
pub(crate) fn check_xlimits<F: Float>(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<()> {
    if xlimits.ncols() != 2 {
        return Err(DoeError::InvalidValue(format!(
            "xlimits must have 2 columns (lower, upper), got {}",
            xlimits.ncols()
        )));
    }
    if xlimits.nrows() == 0 {
        return Err(DoeError::InputDegenerate(
            "sampling space has no dimension".to_string(),
        ));
    }
    if xlimits.rows().into_iter().any(|r| r[1] < r[0]) {
        return Err(DoeError::InvalidValue(
            "xlimits lower bounds should be less than upper bounds".to_string(),
        ));
    }
    Ok(())
}

/// Computes the minimum euclidean distance between two distinct rows of a 2D-array
/// using parallel processing, `None` when the array has less than two rows.
///
/// Distances are folded row by row, no pairwise distance vector is materialized.
pub fn min_pdist<F: Float>(x: &ArrayBase<impl Data<Elem = F> + Sync, Ix2>) -> Option<F> {
    let nrows = x.nrows();
    (0..nrows)
        .into_par_iter()
        .flat_map_iter(|i| {
            let a = x.row(i);
            ((i + 1)..nrows).map(move |j| {
                let b = x.row(j);
                let d2 = a
                    .iter()
                    .zip(b.iter())
                    .fold(F::zero(), |acc, (&ai, &bi)| acc + (ai - bi) * (ai - bi));
                d2.sqrt()
            })
        })
        .reduce_with(|d1, d2| if d2 < d1 { d2 } else { d1 })
}
