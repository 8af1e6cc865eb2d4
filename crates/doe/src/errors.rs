use thiserror::Error;

/// A result type for stratified sampling
pub type Result<T> = std::result::Result<T, DoeError>;

/// An error raised while building a design of experiments
#[derive(Error, Debug)]
pub enum DoeError {
    /// When the sample space has no dimension or no sample is requested
    #[error("Degenerate input: {0}")]
    InputDegenerate(String),
    /// When more stratum draws are requested than available strata
    #[error("Capacity error: draw #{requested} requested with only {capacity} strata per dimension")]
    CapacityError {
        /// Rank (1-based) of the draw which was refused
        requested: usize,
        /// Number of strata per dimension
        capacity: usize,
    },
    /// When the space-filling criterion is never satisfied within the restart budget
    #[error("Convergence exhausted after {restarts} restarts (best min distance {best}, threshold {threshold})")]
    ConvergenceExhausted {
        /// Number of stratum re-allocations performed
        restarts: usize,
        /// Best minimum pairwise distance reached over all attempts
        best: f64,
        /// Distance the minimum pairwise distance had to exceed
        threshold: f64,
    },
    /// When a bad value is given
    #[error("InvalidValue error: {0}")]
    InvalidValue(String),
}
