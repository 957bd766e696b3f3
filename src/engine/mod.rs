// Clustering engine contract
//
// The adapter layer only talks to the engine through `MedoidEngine`. The
// engine owns its configuration and the results of the last fit; results are
// overwritten in place by every fit and are returned as row matrices, the
// shape the extraction layer squeezes into flat sequences.
//
// `KMedoids` is the bundled implementation: exact PAM (greedy BUILD followed
// by best-improvement SWAP). The algorithm name selects among the supported
// variants; every supported variant currently runs the exact solver.

mod distance;
mod pam;

pub use distance::Metric;
pub use pam::KMedoids;

use crate::config::KMedoidsConfig;
use ndarray::Array2;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the clustering engine during a fit
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unsupported loss specifier: '{0}'")]
    UnsupportedLoss(String),

    #[error("Unknown algorithm: '{0}' (expected BanditPAM or naive)")]
    UnknownAlgorithm(String),

    #[error("Dataset contains no points")]
    EmptyDataset,

    #[error("Number of medoids must be positive")]
    NoMedoids,

    #[error("Cannot select {k} medoids from {n} points")]
    TooManyMedoids { k: usize, n: usize },

    #[error("Dataset contains non-finite value at dimension {dim}, point {point}")]
    NonFiniteData { dim: usize, point: usize },

    #[error("Failed to write log file {path}: {source}")]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Medoid selection variant named by the `algorithm` property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    BanditPam,
    Naive,
}

impl Algorithm {
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        if name.eq_ignore_ascii_case("banditpam") {
            Ok(Self::BanditPam)
        } else if name.eq_ignore_ascii_case("naive") {
            Ok(Self::Naive)
        } else {
            Err(EngineError::UnknownAlgorithm(name.to_string()))
        }
    }
}

/// Contract the adapter consumes from a k-medoids engine
///
/// Points are the columns of the data matrix. Result accessors return row
/// matrices (`1 x k` for medoids, `1 x n` for labels) holding point indices
/// and cluster indices; before the first fit they are `1 x 0`.
pub trait MedoidEngine {
    fn config(&self) -> &KMedoidsConfig;

    fn config_mut(&mut self) -> &mut KMedoidsConfig;

    fn set_n_medoids(&mut self, n_medoids: usize) {
        self.config_mut().set_n_medoids(n_medoids);
    }

    fn set_log_filename(&mut self, log_filename: &str) {
        self.config_mut().set_log_filename(log_filename);
    }

    /// Select medoids for `data` under the metric named by `loss`.
    fn fit(&mut self, data: &Array2<f64>, loss: &str) -> Result<(), EngineError>;

    fn medoids_final(&self) -> Array2<f64>;

    fn medoids_build(&self) -> Array2<f64>;

    fn labels(&self) -> Array2<f64>;

    /// Number of SWAP steps performed by the last fit
    fn steps(&self) -> usize;
}
