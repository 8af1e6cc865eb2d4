use feasample_doe::DoeError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A result type for constrained sampling
pub type Result<T> = std::result::Result<T, SamplerError>;

/// Stage of a sampling run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Drawing stratum index vectors
    Allocation,
    /// Checking the nearest-neighbor space-filling criterion
    Convergence,
    /// Filtering stratified candidates through the constraints
    Acceptance,
    /// Perturbing the feasible seed point
    Walk,
}

impl Stage {
    /// Stage at which the given design error is raised
    pub fn of(err: &DoeError) -> Stage {
        match err {
            DoeError::ConvergenceExhausted { .. } => Stage::Convergence,
            _ => Stage::Allocation,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Stage::Allocation => "allocation",
            Stage::Convergence => "convergence",
            Stage::Acceptance => "acceptance",
            Stage::Walk => "walk",
        };
        write!(f, "{name}")
    }
}

/// An error for constrained sampling
#[derive(Error, Debug)]
pub enum SamplerError {
    /// When configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfigError(String),
    /// When a point does not have the dimension of the sampling space
    #[error("Dimension error: expected {expected}, got {actual}")]
    DimensionError {
        /// Dimension of the sampling space
        expected: usize,
        /// Dimension of the given point
        actual: usize,
    },
    /// When the design of experiments cannot be set up
    #[error(transparent)]
    DoeError(#[from] DoeError),
    /// When the stratified generation fails in the middle of a run
    #[error("Sampling aborted at {stage} stage with {n_valid} valid candidates: {source}")]
    SamplingAborted {
        /// Stage of the failure
        stage: Stage,
        /// Number of valid candidates found so far
        n_valid: usize,
        /// Valid candidates found so far, (n_valid, nx) matrix
        partial: Array2<f64>,
        /// Design error
        source: DoeError,
    },
    /// When the trial budget is exhausted before enough feasible points are found
    #[error("Infeasible region: {trials} trials at {stage} stage, {n_valid} valid candidates found")]
    InfeasibleRegion {
        /// Stage of the failure
        stage: Stage,
        /// Number of constraint evaluations spent in that stage
        trials: usize,
        /// Number of valid candidates found so far
        n_valid: usize,
        /// Valid candidates found so far, (n_valid, nx) matrix
        partial: Array2<f64>,
    },
    /// When the constraint model fails to evaluate a point
    #[error(transparent)]
    ConstraintError(#[from] anyhow::Error),
    /// When IO fails
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    /// When delimited text writing fails
    #[error("CSV error")]
    CsvError(#[from] csv::Error),
    /// When configuration reading fails
    #[error("JSON error")]
    JsonError(#[from] serde_json::Error),
}

impl SamplerError {
    /// Valid candidates produced before a run failed, if any
    pub fn partial(&self) -> Option<&Array2<f64>> {
        match self {
            SamplerError::SamplingAborted { partial, .. }
            | SamplerError::InfeasibleRegion { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// Stage at which a run failed, if relevant
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SamplerError::SamplingAborted { stage, .. }
            | SamplerError::InfeasibleRegion { stage, .. } => Some(*stage),
            SamplerError::DoeError(err) => Some(Stage::of(err)),
            _ => None,
        }
    }
}
