//! Sampler configuration.
use crate::errors::{Result, SamplerError};
use feasample_doe::{DEFAULT_JITTER_RETRIES, DEFAULT_MAX_RESTARTS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Way unconstrained candidate batches are generated before filtering
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BulkStrategy {
    /// Latin Hypercube batches checked with the given nearest-neighbor ratio,
    /// usually much looser than for a standalone design as most points get filtered out
    Lhs {
        /// Nearest-neighbor criterion ratio
        ratio: f64,
    },
    /// Uniform random batches
    Random,
}

impl Default for BulkStrategy {
    fn default() -> Self {
        BulkStrategy::Lhs { ratio: 0. }
    }
}

/// Constrained sampler configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Number of feasible points to return
    pub(crate) n_results: usize,
    /// Size of the bulk candidate batches
    /// Note: 0 means the batch size is `n_results`
    pub(crate) n_batch: usize,
    /// Size of the trial window used to monitor the acceptance rate.
    /// When less than `n_freq / 2` points are accepted within a window,
    /// the sampler switches to the local walk for the rest of the run
    pub(crate) n_freq: usize,
    /// Bulk candidate generation
    pub(crate) bulk: BulkStrategy,
    /// Max number of constraint evaluations on stratified candidates
    pub(crate) max_trials: usize,
    /// Max number of constraint evaluations during the local walk
    pub(crate) max_walk_trials: usize,
    /// Optional truncation of the returned candidates
    pub(crate) result_cap: Option<usize>,
    /// Two points closer than this distance are considered duplicates (0 means exact match)
    pub(crate) dedup_tol: f64,
    /// Number of jitter attempts per stratum assignment of a LHS batch
    pub(crate) jitter_retries: usize,
    /// Max number of stratum assignments per LHS batch
    pub(crate) max_restarts: usize,
    /// A random generator seed used to get reproductible results.
    pub(crate) seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            n_results: 100,
            n_batch: 0,
            n_freq: 50,
            bulk: BulkStrategy::default(),
            max_trials: 1_000_000,
            max_walk_trials: 1_000_000,
            result_cap: None,
            dedup_tol: 0.,
            jitter_retries: DEFAULT_JITTER_RETRIES,
            max_restarts: DEFAULT_MAX_RESTARTS,
            seed: None,
        }
    }
}

impl SamplerConfig {
    /// Reads a configuration from a JSON file, missing fields take default values
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: SamplerConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Sets the number of feasible points to return
    pub fn n_results(mut self, n_results: usize) -> Self {
        self.n_results = n_results;
        self
    }

    /// Sets the size of the bulk candidate batches (0 means `n_results`)
    pub fn n_batch(mut self, n_batch: usize) -> Self {
        self.n_batch = n_batch;
        self
    }

    /// Sets the acceptance monitoring window
    pub fn n_freq(mut self, n_freq: usize) -> Self {
        self.n_freq = n_freq;
        self
    }

    /// Sets the bulk candidate generation
    pub fn bulk(mut self, bulk: BulkStrategy) -> Self {
        self.bulk = bulk;
        self
    }

    /// Sets the max number of constraint evaluations on stratified candidates
    pub fn max_trials(mut self, max_trials: usize) -> Self {
        self.max_trials = max_trials;
        self
    }

    /// Sets the max number of constraint evaluations during the local walk
    pub fn max_walk_trials(mut self, max_walk_trials: usize) -> Self {
        self.max_walk_trials = max_walk_trials;
        self
    }

    /// Truncates the returned candidates to `cap` points at most
    pub fn result_cap(mut self, cap: usize) -> Self {
        self.result_cap = Some(cap);
        self
    }

    /// Sets the duplicate detection distance
    pub fn dedup_tol(mut self, dedup_tol: f64) -> Self {
        self.dedup_tol = dedup_tol;
        self
    }

    /// Sets the number of jitter attempts per stratum assignment of a LHS batch
    pub fn jitter_retries(mut self, jitter_retries: usize) -> Self {
        self.jitter_retries = jitter_retries;
        self
    }

    /// Sets the max number of stratum assignments per LHS batch
    pub fn max_restarts(mut self, max_restarts: usize) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    /// Allow to specify a seed for random number generator to allow
    /// reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of points the run aims at, `n_results` possibly truncated by `result_cap`
    pub fn target(&self) -> usize {
        self.result_cap
            .map_or(self.n_results, |cap| cap.min(self.n_results))
    }

    /// Effective size of the bulk candidate batches
    pub fn batch_size(&self) -> usize {
        if self.n_batch == 0 {
            self.n_results
        } else {
            self.n_batch
        }
    }

    /// Checks the configuration consistency
    pub fn check(&self) -> Result<()> {
        let positives = [
            ("n_results", self.n_results),
            ("n_freq", self.n_freq),
            ("max_trials", self.max_trials),
            ("max_walk_trials", self.max_walk_trials),
            ("jitter_retries", self.jitter_retries),
            ("max_restarts", self.max_restarts),
        ];
        if let Some((name, _)) = positives.iter().find(|(_, v)| *v == 0) {
            return Err(SamplerError::InvalidConfigError(format!(
                "{name} should be positive"
            )));
        }
        if self.result_cap == Some(0) {
            return Err(SamplerError::InvalidConfigError(
                "result_cap should be positive".to_string(),
            ));
        }
        if self.dedup_tol.is_nan() || self.dedup_tol < 0. {
            return Err(SamplerError::InvalidConfigError(format!(
                "dedup_tol should be non negative, got {}",
                self.dedup_tol
            )));
        }
        if let BulkStrategy::Lhs { ratio } = self.bulk {
            if ratio.is_nan() || ratio < 0. {
                return Err(SamplerError::InvalidConfigError(format!(
                    "LHS ratio should be non negative, got {ratio}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SamplerConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.n_freq, 50);
        assert_eq!(config.target(), 100);
        assert_eq!(config.batch_size(), 100);
    }

    #[test]
    fn test_target_and_batch() {
        let config = SamplerConfig::default()
            .n_results(2000)
            .result_cap(1000)
            .n_batch(64);
        assert_eq!(config.target(), 1000);
        assert_eq!(config.batch_size(), 64);
    }

    #[test]
    fn test_invalid_config() {
        for config in [
            SamplerConfig::default().n_results(0),
            SamplerConfig::default().n_freq(0),
            SamplerConfig::default().max_trials(0),
            SamplerConfig::default().result_cap(0),
            SamplerConfig::default().dedup_tol(-1.),
            SamplerConfig::default().bulk(BulkStrategy::Lhs { ratio: f64::NAN }),
        ] {
            assert!(matches!(
                config.check(),
                Err(SamplerError::InvalidConfigError(_))
            ));
        }
    }

    #[test]
    fn test_json_config() {
        let config: SamplerConfig =
            serde_json::from_str(r#"{"n_results": 10, "bulk": "Random", "seed": 42}"#).unwrap();
        assert_eq!(config.n_results, 10);
        assert_eq!(config.bulk, BulkStrategy::Random);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.n_freq, 50);

        let path = std::env::temp_dir().join("feasample_test_json_config.json");
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        let read = SamplerConfig::from_json_file(&path).unwrap();
        assert_eq!(read.n_results, 10);
        assert_eq!(read.seed, Some(42));
        let _ = std::fs::remove_file(&path);
    }
}
