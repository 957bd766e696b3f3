//! Result formatting for the command line

use crate::extract::FitResult;
use serde::Serialize;

/// Comma-separated values, no trailing comma
pub fn comma_separated(values: &[usize]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Human-readable summary; empty at verbosity 0
///
/// Verbosity 1 prints the final medoids, 2 and above adds the BUILD medoids
/// and the number of SWAP steps.
pub fn text_summary(result: &FitResult, verbosity: u32) -> String {
    let mut output = String::new();
    if verbosity == 0 {
        return output;
    }

    output.push_str(&format!("Medoids: {}\n", comma_separated(&result.final_medoids)));
    if verbosity > 1 {
        output.push_str(&format!(
            "Build medoids: {}\n",
            comma_separated(&result.build_medoids)
        ));
        output.push_str(&format!("Steps: {}\n", result.steps));
    }
    output
}

/// Complete fit report for `--format json`
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Loss specifier handed to the engine
    pub loss: &'a str,
    /// Number of points
    pub n: usize,
    /// Number of dimensions
    pub d: usize,
    #[serde(flatten)]
    pub result: &'a FitResult,
}

impl JsonReport<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
