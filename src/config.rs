//! Engine configuration model
//!
//! Every property has an independent getter/setter pair. Setting a property
//! only stores the value: nothing is re-validated and no earlier fit is
//! re-run. Validation belongs to the engine at fit time.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_N_MEDOIDS: usize = 5;
pub const DEFAULT_ALGORITHM: &str = "BanditPAM";
pub const DEFAULT_VERBOSITY: u32 = 0;
pub const DEFAULT_MAX_ITER: usize = 1000;
pub const DEFAULT_LOG_FILENAME: &str = "KMedoidsLogfile";
pub const DEFAULT_CACHE: bool = true;

/// Errors raised while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Parameters consumed by a [`crate::engine::MedoidEngine`]
///
/// # Example TOML
/// ```toml
/// n_medoids = 3
/// algorithm = "naive"
/// verbosity = 1
/// max_iter = 50
/// log_filename = "run.log"
/// cache = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KMedoidsConfig {
    n_medoids: usize,
    algorithm: String,
    verbosity: u32,
    max_iter: usize,
    log_filename: String,
    cache: bool,
}

impl Default for KMedoidsConfig {
    fn default() -> Self {
        Self {
            n_medoids: DEFAULT_N_MEDOIDS,
            algorithm: DEFAULT_ALGORITHM.to_string(),
            verbosity: DEFAULT_VERBOSITY,
            max_iter: DEFAULT_MAX_ITER,
            log_filename: DEFAULT_LOG_FILENAME.to_string(),
            cache: DEFAULT_CACHE,
        }
    }
}

impl KMedoidsConfig {
    pub fn new(
        n_medoids: usize,
        algorithm: impl Into<String>,
        verbosity: u32,
        max_iter: usize,
        log_filename: impl Into<String>,
        cache: bool,
    ) -> Self {
        Self {
            n_medoids,
            algorithm: algorithm.into(),
            verbosity,
            max_iter,
            log_filename: log_filename.into(),
            cache,
        }
    }

    /// Load a configuration from a TOML file. Missing keys take their defaults.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn n_medoids(&self) -> usize {
        self.n_medoids
    }

    pub fn set_n_medoids(&mut self, n_medoids: usize) {
        self.n_medoids = n_medoids;
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: impl Into<String>) {
        self.algorithm = algorithm.into();
    }

    pub fn verbosity(&self) -> u32 {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: u32) {
        self.verbosity = verbosity;
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn set_max_iter(&mut self, max_iter: usize) {
        self.max_iter = max_iter;
    }

    pub fn log_filename(&self) -> &str {
        &self.log_filename
    }

    pub fn set_log_filename(&mut self, log_filename: impl Into<String>) {
        self.log_filename = log_filename.into();
    }

    pub fn cache(&self) -> bool {
        self.cache
    }

    pub fn set_cache(&mut self, cache: bool) {
        self.cache = cache;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = KMedoidsConfig::default();
        assert_eq!(config.n_medoids(), 5);
        assert_eq!(config.algorithm(), "BanditPAM");
        assert_eq!(config.verbosity(), 0);
        assert_eq!(config.max_iter(), 1000);
        assert_eq!(config.log_filename(), "KMedoidsLogfile");
        assert!(config.cache());
    }

    #[test]
    fn test_setters_are_independent() {
        let mut config = KMedoidsConfig::default();
        config.set_n_medoids(12);
        config.set_verbosity(3);

        // Unrelated properties keep their values
        assert_eq!(config.algorithm(), "BanditPAM");
        assert_eq!(config.max_iter(), 1000);
        assert_eq!(config.n_medoids(), 12);
        assert_eq!(config.verbosity(), 3);
    }

    #[test]
    fn test_setter_accepts_values_the_engine_would_reject() {
        let mut config = KMedoidsConfig::default();
        config.set_n_medoids(0);
        config.set_algorithm("does-not-exist");
        assert_eq!(config.n_medoids(), 0);
        assert_eq!(config.algorithm(), "does-not-exist");
    }

    #[test]
    fn test_from_toml_partial() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "n_medoids = 3").unwrap();
        writeln!(file, "cache = false").unwrap();

        let config = KMedoidsConfig::from_toml(file.path()).unwrap();
        assert_eq!(config.n_medoids(), 3);
        assert!(!config.cache());
        assert_eq!(config.algorithm(), DEFAULT_ALGORITHM);
        assert_eq!(config.log_filename(), DEFAULT_LOG_FILENAME);
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "medoids = 3").unwrap();

        let err = KMedoidsConfig::from_toml(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_from_toml_missing_file() {
        let err = KMedoidsConfig::from_toml("/nonexistent/banditpam.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/banditpam.toml"));
    }
}
