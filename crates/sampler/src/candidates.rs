use crate::errors::{Result, SamplerError};
use ndarray::{Array2, ArrayView1, ArrayView2};
use ndarray_stats::DeviationExt;

/// Feasible points accumulated during a run, in acceptance order and without duplicates
#[derive(Clone, Debug)]
pub struct CandidateSet {
    nx: usize,
    /// Row-major storage of the accepted points
    data: Vec<f64>,
    /// Points closer than `tol` to an accepted point are rejected
    tol: f64,
}

impl CandidateSet {
    /// Empty set of `nx`-dimensional points with room for `capacity` points
    pub fn with_capacity(nx: usize, capacity: usize, tol: f64) -> Self {
        CandidateSet {
            nx,
            data: Vec::with_capacity(nx * capacity),
            tol,
        }
    }

    /// Number of accepted points
    pub fn len(&self) -> usize {
        if self.nx == 0 {
            0
        } else {
            self.data.len() / self.nx
        }
    }

    /// Whether no point is accepted yet
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Accepted points as a (len, nx) matrix
    pub fn view(&self) -> ArrayView2<f64> {
        ArrayView2::from_shape((self.len(), self.nx), &self.data)
            .expect("candidate storage holds whole rows")
    }

    /// Whether `x` duplicates an accepted point
    pub fn contains(&self, x: &ArrayView1<f64>) -> Result<bool> {
        self.check_dim(x)?;
        for row in self.view().rows() {
            if row.l2_dist(x).map_or(false, |d| d <= self.tol) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn check_dim(&self, x: &ArrayView1<f64>) -> Result<()> {
        if x.len() != self.nx {
            return Err(SamplerError::DimensionError {
                expected: self.nx,
                actual: x.len(),
            });
        }
        Ok(())
    }

    /// Appends `x` unless it duplicates an accepted point, returns whether it was appended
    pub fn insert(&mut self, x: &ArrayView1<f64>) -> Result<bool> {
        if self.contains(x)? {
            return Ok(false);
        }
        self.data.extend(x.iter());
        Ok(true)
    }

    /// Accepted points as an owned (len, nx) matrix
    pub fn to_array(&self) -> Array2<f64> {
        self.view().to_owned()
    }

    /// Consumes the set, returns the accepted points as a (len, nx) matrix
    pub fn into_array(self) -> Array2<f64> {
        Array2::from_shape_vec((self.len(), self.nx), self.data)
            .expect("candidate storage holds whole rows")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_exact_dedup() {
        let mut set = CandidateSet::with_capacity(2, 4, 0.);
        assert!(set.is_empty());
        assert!(set.insert(&array![0.1, 0.2].view()).unwrap());
        assert!(set.insert(&array![0.3, 0.2].view()).unwrap());
        assert!(!set.insert(&array![0.1, 0.2].view()).unwrap());
        assert!(set.insert(&array![0.1, 0.2000001].view()).unwrap());
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.into_array(),
            array![[0.1, 0.2], [0.3, 0.2], [0.1, 0.2000001]]
        );
    }

    #[test]
    fn test_near_dedup() {
        let mut set = CandidateSet::with_capacity(2, 4, 1e-3);
        assert!(set.insert(&array![0.1, 0.2].view()).unwrap());
        assert!(!set.insert(&array![0.1, 0.2005].view()).unwrap());
        assert!(set.insert(&array![0.1, 0.202].view()).unwrap());
        assert_eq!(set.to_array().nrows(), 2);
        let view = set.view();
        assert_abs_diff_eq!(view.row(1), array![0.1, 0.202]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut set = CandidateSet::with_capacity(2, 1, 0.);
        assert!(matches!(
            set.insert(&array![0.1].view()),
            Err(SamplerError::DimensionError {
                expected: 2,
                actual: 1
            })
        ));
        assert!(set.is_empty());
        assert!(set.contains(&array![0.1, 0.2, 0.3].view()).is_err());
    }
}
