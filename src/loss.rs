//! Loss specifier normalization for the command-line path
//!
//! The command line accepts `L1`, `L2`, ... as well as the bare order. Only
//! the command line strips the prefix; the scripting front end hands the
//! caller's string to the engine untouched.

/// Loss used when `-l` is not given (Euclidean)
pub const DEFAULT_LOSS: &str = "2";

/// Strip exactly one leading `L` from a loss specifier.
///
/// ```
/// use banditpam::loss::normalize_cli_loss;
///
/// assert_eq!(normalize_cli_loss("L2"), "2");
/// assert_eq!(normalize_cli_loss("2"), "2");
/// assert_eq!(normalize_cli_loss(""), "");
/// ```
pub fn normalize_cli_loss(loss: &str) -> &str {
    loss.strip_prefix('L').unwrap_or(loss)
}
