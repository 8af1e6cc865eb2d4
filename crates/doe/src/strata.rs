//! Latin Hypercube strata bookkeeping.
//!
//! Each dimension of the unit hypercube is cut into `ns` strata of width `h = 1/ns`.
//! A [`StrataAllocator`] draws stratum index vectors one after the other so that,
//! once `ns` vectors are drawn, every stratum of every dimension is used exactly once.
use crate::errors::{DoeError, Result};
use ndarray::Array2;
use ndarray_rand::rand::Rng;
use std::collections::BTreeSet;

/// Per-dimension pools of unused stratum indices and history of drawn index vectors
#[derive(Clone, Debug)]
pub struct StrataAllocator {
    nx: usize,
    ns: usize,
    h: f64,
    /// Ordered set of unused stratum indices, one per dimension
    pools: Vec<BTreeSet<usize>>,
    /// Stratum index vectors drawn so far, in draw order
    history: Vec<Vec<usize>>,
}

impl StrataAllocator {
    /// Creates pools `{0, ..., ns-1}` for each of the `nx` dimensions
    pub fn new(nx: usize, ns: usize) -> Result<Self> {
        if nx == 0 {
            return Err(DoeError::InputDegenerate(
                "dimension count should be positive".to_string(),
            ));
        }
        if ns == 0 {
            return Err(DoeError::InputDegenerate(
                "stratum count should be positive".to_string(),
            ));
        }
        let full: BTreeSet<usize> = (0..ns).collect();
        Ok(StrataAllocator {
            nx,
            ns,
            h: 1. / ns as f64,
            pools: vec![full; nx],
            history: Vec::with_capacity(ns),
        })
    }

    /// Cell width `1/ns`
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Number of dimensions
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of strata per dimension
    pub fn ns(&self) -> usize {
        self.ns
    }

    /// Stratum index vectors drawn so far
    pub fn history(&self) -> &[Vec<usize>] {
        &self.history
    }

    /// Unused stratum indices of each dimension
    pub fn pools(&self) -> &[BTreeSet<usize>] {
        &self.pools
    }

    /// Whether every stratum has been drawn
    pub fn is_complete(&self) -> bool {
        self.history.len() == self.ns
    }

    /// Draws the next stratum index vector and appends it to the history.
    ///
    /// The very first vector is drawn uniformly over the whole `[0, ns)` range of each
    /// dimension, the following ones uniformly among the indices still unused.
    ///
    /// # Errors
    ///
    /// [`DoeError::CapacityError`] when the `ns` strata are already consumed.
    pub fn draw_next<R: Rng>(&mut self, rng: &mut R) -> Result<&[usize]> {
        if self.is_complete() {
            return Err(DoeError::CapacityError {
                requested: self.history.len() + 1,
                capacity: self.ns,
            });
        }
        let mut point = Vec::with_capacity(self.nx);
        if self.history.is_empty() {
            point.extend((0..self.nx).map(|_| rng.gen_range(0..self.ns)));
        } else {
            for pool in self.pools.iter() {
                // pools keep ns - history.len() > 0 indices at this point
                let k = rng.gen_range(0..pool.len());
                let idx = pool.iter().nth(k).copied().ok_or(DoeError::CapacityError {
                    requested: self.history.len() + 1,
                    capacity: self.ns,
                })?;
                point.push(idx);
            }
        }
        for (pool, idx) in self.pools.iter_mut().zip(point.iter()) {
            pool.remove(idx);
        }
        self.history.push(point);
        Ok(self.history.last().map(|v| v.as_slice()).unwrap_or_default())
    }

    /// Draws all the remaining strata and returns the (ns, nx) stratum assignment
    pub fn draw_all<R: Rng>(mut self, rng: &mut R) -> Result<Array2<usize>> {
        while !self.is_complete() {
            self.draw_next(rng)?;
        }
        Ok(self.into_assignment())
    }

    /// Returns the history as a (n_drawn, nx) matrix
    pub fn into_assignment(self) -> Array2<usize> {
        let history = self.history;
        Array2::from_shape_fn((history.len(), self.nx), |(i, j)| history[i][j])
    }
}
