//! Result extraction
//!
//! The engine reports medoids and labels as single-row matrices. Callers get
//! flat sequences: the singleton dimension is squeezed away, and a matrix
//! that is not a vector is rejected instead of being read in some order.

use crate::engine::MedoidEngine;
use ndarray::Array2;
use serde::Serialize;
use thiserror::Error;

// 2^53; every integral f64 below it is exact
const MAX_EXACT_INDEX: f64 = 9_007_199_254_740_992.0;

/// Errors raised while reshaping engine results
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("Expected a single row or column, got a {rows}x{cols} matrix")]
    NotAVector { rows: usize, cols: usize },

    #[error("Value {value} at position {position} is not a valid index")]
    NotAnIndex { position: usize, value: f64 },
}

/// Everything a fit produces, in caller-friendly form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FitResult {
    /// Point indices of the medoids after SWAP
    pub final_medoids: Vec<usize>,
    /// Point indices of the medoids after BUILD
    pub build_medoids: Vec<usize>,
    /// Cluster index (position in `final_medoids`) of every point
    pub labels: Vec<usize>,
    /// Number of SWAP steps
    pub steps: usize,
}

/// Drop the singleton dimension of a `1 x k` or `k x 1` matrix.
///
/// ```
/// use banditpam::extract::squeeze;
/// use ndarray::array;
///
/// assert_eq!(squeeze(&array![[3.0, 1.0, 2.0]]).unwrap(), vec![3.0, 1.0, 2.0]);
/// assert!(squeeze(&array![[1.0, 2.0], [3.0, 4.0]]).is_err());
/// ```
pub fn squeeze(matrix: &Array2<f64>) -> Result<Vec<f64>, ExtractError> {
    let (rows, cols) = matrix.dim();
    if rows > 1 && cols > 1 {
        return Err(ExtractError::NotAVector { rows, cols });
    }
    Ok(matrix.iter().copied().collect())
}

/// Squeeze, then read every value as a non-negative integer index.
///
/// Values that would not survive the conversion to `usize` unchanged are
/// rejected, so out-of-range results never saturate.
pub fn squeeze_indices(matrix: &Array2<f64>) -> Result<Vec<usize>, ExtractError> {
    squeeze(matrix)?
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            let in_range = value >= 0.0 && value < MAX_EXACT_INDEX && value < usize::MAX as f64;
            if value.is_finite() && in_range && value.fract() == 0.0 {
                Ok(value as usize)
            } else {
                Err(ExtractError::NotAnIndex { position, value })
            }
        })
        .collect()
}

pub fn final_medoids<E: MedoidEngine + ?Sized>(engine: &E) -> Result<Vec<usize>, ExtractError> {
    squeeze_indices(&engine.medoids_final())
}

pub fn build_medoids<E: MedoidEngine + ?Sized>(engine: &E) -> Result<Vec<usize>, ExtractError> {
    squeeze_indices(&engine.medoids_build())
}

pub fn labels<E: MedoidEngine + ?Sized>(engine: &E) -> Result<Vec<usize>, ExtractError> {
    squeeze_indices(&engine.labels())
}

pub fn steps<E: MedoidEngine + ?Sized>(engine: &E) -> usize {
    engine.steps()
}

/// Read all results of the last fit from `engine`
pub fn extract<E: MedoidEngine + ?Sized>(engine: &E) -> Result<FitResult, ExtractError> {
    Ok(FitResult {
        final_medoids: final_medoids(engine)?,
        build_medoids: build_medoids(engine)?,
        labels: labels(engine)?,
        steps: steps(engine),
    })
}
