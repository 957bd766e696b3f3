//! Scripting front end
//!
//! [`ScriptedKMedoids`] is the object a scripting host sees: constructor
//! defaults, mutable configuration properties, read-only result properties
//! and `fit`. The loss string is passed to the engine exactly as the caller
//! wrote it. Unlike the command line, no `L` prefix is stripped here.

use crate::adapter::{self, AdapterError};
use crate::config::KMedoidsConfig;
use crate::dataset::{Dataset, IngestError};
use crate::engine::{KMedoids, MedoidEngine};
use crate::extract::{self, ExtractError};
use ndarray::Array2;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// Scripting-facing k-medoids object wrapping one engine instance
#[derive(Debug, Clone, Default)]
pub struct ScriptedKMedoids {
    engine: KMedoids,
}

impl ScriptedKMedoids {
    pub fn new(
        n_medoids: usize,
        algorithm: impl Into<String>,
        verbosity: u32,
        max_iter: usize,
        log_filename: impl Into<String>,
        cache: bool,
    ) -> Self {
        Self {
            engine: KMedoids::new(KMedoidsConfig::new(
                n_medoids,
                algorithm,
                verbosity,
                max_iter,
                log_filename,
                cache,
            )),
        }
    }

    pub fn n_medoids(&self) -> usize {
        self.engine.config().n_medoids()
    }

    pub fn set_n_medoids(&mut self, n_medoids: usize) {
        self.engine.set_n_medoids(n_medoids);
    }

    pub fn algorithm(&self) -> &str {
        self.engine.config().algorithm()
    }

    pub fn set_algorithm(&mut self, algorithm: impl Into<String>) {
        self.engine.config_mut().set_algorithm(algorithm);
    }

    pub fn verbosity(&self) -> u32 {
        self.engine.config().verbosity()
    }

    pub fn set_verbosity(&mut self, verbosity: u32) {
        self.engine.config_mut().set_verbosity(verbosity);
    }

    pub fn max_iter(&self) -> usize {
        self.engine.config().max_iter()
    }

    pub fn set_max_iter(&mut self, max_iter: usize) {
        self.engine.config_mut().set_max_iter(max_iter);
    }

    pub fn log_filename(&self) -> &str {
        self.engine.config().log_filename()
    }

    pub fn set_log_filename(&mut self, log_filename: impl Into<String>) {
        self.engine.config_mut().set_log_filename(log_filename);
    }

    pub fn cache(&self) -> bool {
        self.engine.config().cache()
    }

    pub fn set_cache(&mut self, cache: bool) {
        self.engine.config_mut().set_cache(cache);
    }

    /// Final medoids of the last fit (empty before any fit)
    pub fn final_medoids(&self) -> Result<Vec<usize>, ExtractError> {
        extract::final_medoids(&self.engine)
    }

    /// BUILD medoids of the last fit (empty before any fit)
    pub fn build_medoids(&self) -> Result<Vec<usize>, ExtractError> {
        extract::build_medoids(&self.engine)
    }

    /// Cluster index of every point from the last fit (empty before any fit)
    pub fn labels(&self) -> Result<Vec<usize>, ExtractError> {
        extract::labels(&self.engine)
    }

    pub fn steps(&self) -> usize {
        extract::steps(&self.engine)
    }

    /// Fit on host rows (one inner sequence per matrix row).
    ///
    /// `n_medoids` and `log_filename`, when given, are stored on the object
    /// before fitting and stay set afterwards.
    pub fn fit(
        &mut self,
        rows: Vec<Vec<f64>>,
        loss: &str,
        n_medoids: Option<usize>,
        log_filename: Option<&str>,
    ) -> Result<(), ScriptError> {
        let dataset = Dataset::from_rows(rows)?;
        self.fit_dataset(&dataset, loss, n_medoids, log_filename)
    }

    /// Same as [`Self::fit`] for an already materialized matrix
    pub fn fit_array(
        &mut self,
        data: Array2<f64>,
        loss: &str,
        n_medoids: Option<usize>,
        log_filename: Option<&str>,
    ) -> Result<(), ScriptError> {
        self.fit_dataset(&Dataset::from_array(data), loss, n_medoids, log_filename)
    }

    fn fit_dataset(
        &mut self,
        dataset: &Dataset,
        loss: &str,
        n_medoids: Option<usize>,
        log_filename: Option<&str>,
    ) -> Result<(), ScriptError> {
        if let Some(n_medoids) = n_medoids {
            self.engine.set_n_medoids(n_medoids);
        }
        if let Some(log_filename) = log_filename {
            self.engine.set_log_filename(log_filename);
        }
        adapter::invoke(&mut self.engine, dataset, loss).map_err(AdapterError::from)?;
        Ok(())
    }
}
