//! Python bindings
//!
//! Exposes [`ScriptedKMedoids`] as `BanditPAM.KMedoids`. Keyword and
//! property names follow the established Python API (`maxIter`,
//! `logFilename`), hence the non-snake-case parameters. `fit` takes a NumPy
//! matrix (or nested sequences) and results come back as NumPy arrays.

#![allow(non_snake_case)]

use crate::config::{
    DEFAULT_ALGORITHM, DEFAULT_CACHE, DEFAULT_LOG_FILENAME, DEFAULT_MAX_ITER, DEFAULT_N_MEDOIDS,
    DEFAULT_VERBOSITY,
};
use crate::extract::ExtractError;
use crate::scripting::{ScriptError, ScriptedKMedoids};
use numpy::{PyArray1, PyReadonlyArray2};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

fn script_err(err: ScriptError) -> PyErr {
    match err {
        ScriptError::Ingest(e) => PyValueError::new_err(e.to_string()),
        ScriptError::Adapter(e) => PyRuntimeError::new_err(e.to_string()),
    }
}

fn extract_err(err: ExtractError) -> PyErr {
    PyRuntimeError::new_err(err.to_string())
}

fn index_array(py: Python<'_>, values: Vec<usize>) -> Bound<'_, PyArray1<u64>> {
    PyArray1::from_iter_bound(py, values.into_iter().map(|v| v as u64))
}

/// k-medoids clustering; one engine instance per object, not shareable
/// across threads
#[pyclass(name = "KMedoids", module = "BanditPAM", unsendable)]
pub struct PyKMedoids {
    inner: ScriptedKMedoids,
}

#[pymethods]
impl PyKMedoids {
    #[new]
    #[pyo3(signature = (
        n_medoids = DEFAULT_N_MEDOIDS,
        algorithm = DEFAULT_ALGORITHM.to_string(),
        verbosity = DEFAULT_VERBOSITY,
        maxIter = DEFAULT_MAX_ITER,
        logFilename = DEFAULT_LOG_FILENAME.to_string(),
        cache = DEFAULT_CACHE
    ))]
    fn new(
        n_medoids: usize,
        algorithm: String,
        verbosity: u32,
        maxIter: usize,
        logFilename: String,
        cache: bool,
    ) -> Self {
        Self {
            inner: ScriptedKMedoids::new(n_medoids, algorithm, verbosity, maxIter, logFilename, cache),
        }
    }

    #[getter]
    fn n_medoids(&self) -> usize {
        self.inner.n_medoids()
    }

    #[setter]
    fn set_n_medoids(&mut self, value: usize) {
        self.inner.set_n_medoids(value);
    }

    #[getter]
    fn algorithm(&self) -> String {
        self.inner.algorithm().to_string()
    }

    #[setter]
    fn set_algorithm(&mut self, value: String) {
        self.inner.set_algorithm(value);
    }

    #[getter]
    fn verbosity(&self) -> u32 {
        self.inner.verbosity()
    }

    #[setter]
    fn set_verbosity(&mut self, value: u32) {
        self.inner.set_verbosity(value);
    }

    #[getter(maxIter)]
    fn max_iter(&self) -> usize {
        self.inner.max_iter()
    }

    #[setter(maxIter)]
    fn set_max_iter(&mut self, value: usize) {
        self.inner.set_max_iter(value);
    }

    #[getter(logFilename)]
    fn log_filename(&self) -> String {
        self.inner.log_filename().to_string()
    }

    #[setter(logFilename)]
    fn set_log_filename(&mut self, value: String) {
        self.inner.set_log_filename(value);
    }

    #[getter]
    fn final_medoids<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<u64>>> {
        let values = self.inner.final_medoids().map_err(extract_err)?;
        Ok(index_array(py, values))
    }

    #[getter]
    fn build_medoids<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<u64>>> {
        let values = self.inner.build_medoids().map_err(extract_err)?;
        Ok(index_array(py, values))
    }

    #[getter]
    fn labels<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<u64>>> {
        let values = self.inner.labels().map_err(extract_err)?;
        Ok(index_array(py, values))
    }

    #[getter]
    fn steps(&self) -> usize {
        self.inner.steps()
    }

    /// fit(data, loss, n_medoids=None, logFilename=None)
    ///
    /// `data` is a 2-D float64 array, or a nested sequence with one inner
    /// sequence per matrix row (points are columns). `loss` is passed to the
    /// engine verbatim.
    #[pyo3(signature = (data, loss, n_medoids = None, logFilename = None))]
    fn fit(
        &mut self,
        data: &Bound<'_, PyAny>,
        loss: String,
        n_medoids: Option<usize>,
        logFilename: Option<String>,
    ) -> PyResult<()> {
        let log_filename = logFilename.as_deref();
        let fitted = match data.extract::<PyReadonlyArray2<'_, f64>>() {
            Ok(array) => {
                let matrix = array.as_array().to_owned();
                self.inner.fit_array(matrix, &loss, n_medoids, log_filename)
            }
            Err(_) => {
                let rows: Vec<Vec<f64>> = data.extract()?;
                self.inner.fit(rows, &loss, n_medoids, log_filename)
            }
        };
        fitted.map_err(script_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "KMedoids(n_medoids={}, algorithm='{}', verbosity={}, maxIter={}, logFilename='{}', cache={})",
            self.inner.n_medoids(),
            self.inner.algorithm(),
            self.inner.verbosity(),
            self.inner.max_iter(),
            self.inner.log_filename(),
            if self.inner.cache() { "True" } else { "False" },
        )
    }
}

/// BanditPAM Python library, implemented in Rust
#[pymodule]
#[pyo3(name = "BanditPAM")]
fn banditpam_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyKMedoids>()?;
    Ok(())
}
