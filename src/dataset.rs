//! Dataset ingestion
//!
//! The engine consumes a `d x n` matrix: one row per dimension, one column
//! per point. Ingestion never transposes. A caller that hands over the other
//! orientation gets whatever the engine makes of it.

use ndarray::Array2;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while parsing a text matrix
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid number '{token}' at line {line}, field {field}")]
    InvalidNumber {
        line: usize,
        field: usize,
        token: String,
    },

    #[error("line {line} has {found} fields, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("no data rows found")]
    Empty,

    #[error("{0}")]
    Shape(String),
}

/// Errors raised while turning caller input into a [`Dataset`]
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load .npy dataset {path}: {source}")]
    Npy {
        path: PathBuf,
        #[source]
        source: ndarray_npy::ReadNpyError,
    },

    #[error("Malformed dataset {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid dataset shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Numeric matrix handed to the engine (rows = dimensions, columns = points)
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    matrix: Array2<f64>,
}

impl Dataset {
    /// Wrap an already materialized matrix without touching its values.
    pub fn from_array(matrix: Array2<f64>) -> Self {
        Self { matrix }
    }

    /// Build a dataset from nested host sequences, one inner sequence per
    /// matrix row. An empty outer sequence yields a `0 x 0` dataset.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, IngestError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);

        let mut values = Vec::with_capacity(n_rows * n_cols);
        for (row, values_in_row) in rows.into_iter().enumerate() {
            if values_in_row.len() != n_cols {
                return Err(IngestError::RaggedRows {
                    row,
                    expected: n_cols,
                    found: values_in_row.len(),
                });
            }
            values.extend(values_in_row);
        }

        let matrix = Array2::from_shape_vec((n_rows, n_cols), values)?;
        Ok(Self { matrix })
    }

    /// Load a dataset from disk.
    ///
    /// Files ending in `.npy` are read as NumPy arrays; anything else is
    /// parsed as a delimited text matrix (see [`parse_text`]).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let is_npy = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("npy"));

        let matrix = if is_npy {
            ndarray_npy::read_npy(path).map_err(|source| IngestError::Npy {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            let content = fs::read_to_string(path).map_err(|source| IngestError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_text(&content).map_err(|source| IngestError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        };

        let dataset = Self { matrix };
        tracing::debug!(
            path = %path.display(),
            n = dataset.n_points(),
            d = dataset.n_dims(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Number of points (matrix columns)
    pub fn n_points(&self) -> usize {
        self.matrix.ncols()
    }

    /// Number of dimensions (matrix rows)
    pub fn n_dims(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }
}

/// Parse a delimited text matrix.
///
/// One matrix row per non-blank line. Fields are separated by commas and/or
/// whitespace; an empty field between two commas is an error. Lines starting
/// with `#` are comments.
pub fn parse_text(content: &str) -> Result<Array2<f64>, ParseError> {
    let mut values = Vec::new();
    let mut n_rows = 0;
    let mut n_cols = None;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields = split_fields(line);

        let expected = *n_cols.get_or_insert(fields.len());
        if fields.len() != expected {
            return Err(ParseError::Ragged {
                line: line_no,
                expected,
                found: fields.len(),
            });
        }

        for (field_idx, token) in fields.iter().enumerate() {
            let value = token
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidNumber {
                    line: line_no,
                    field: field_idx + 1,
                    token: (*token).to_string(),
                })?;
            values.push(value);
        }
        n_rows += 1;
    }

    let n_cols = n_cols.ok_or(ParseError::Empty)?;
    Array2::from_shape_vec((n_rows, n_cols), values).map_err(|e| ParseError::Shape(e.to_string()))
}

fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    for chunk in line.split(',').map(str::trim) {
        if chunk.is_empty() {
            fields.push(chunk);
        } else {
            fields.extend(chunk.split_whitespace());
        }
    }
    fields
}
