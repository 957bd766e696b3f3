//! CLI argument parsing for banditpam

use crate::config::{ConfigError, KMedoidsConfig};
use crate::loss::{normalize_cli_loss, DEFAULT_LOSS};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

/// Output format for fit results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary controlled by -v (default)
    Text,
    /// Full result as a JSON object
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "banditpam")]
#[command(version)]
#[command(about = "k-medoids clustering of a dataset file", long_about = None)]
pub struct Cli {
    /// Dataset file: rows are dimensions, columns are points (.npy or delimited text)
    #[arg(short = 'f', value_name = "PATH")]
    pub file: PathBuf,

    /// Loss/distance specifier (e.g., L1, L2, Linf, cos); a leading L is stripped
    #[arg(short = 'l', value_name = "LOSS", default_value = DEFAULT_LOSS)]
    pub loss: String,

    /// Number of medoids to select
    #[arg(short = 'k', value_name = "K")]
    pub n_medoids: usize,

    /// Verbosity level (0 = quiet, 1 = medoids, 2 = medoids, build medoids and steps)
    #[arg(short = 'v', value_name = "LEVEL")]
    pub verbosity: Option<u32>,

    /// TOML file with engine configuration (flags take precedence)
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Algorithm variant (BanditPAM or naive)
    #[arg(long = "algorithm", value_name = "NAME")]
    pub algorithm: Option<String>,

    /// Maximum number of SWAP steps
    #[arg(long = "max-iter", value_name = "N")]
    pub max_iter: Option<usize>,

    /// Destination of the engine log written when verbosity > 0
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Compute distances on demand instead of caching the distance matrix
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Loss specifier with a leading `L` removed
    pub fn normalized_loss(&self) -> &str {
        normalize_cli_loss(&self.loss)
    }

    /// Defaults, overlaid by the `--config` file, overlaid by flags
    pub fn engine_config(&self) -> Result<KMedoidsConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => KMedoidsConfig::from_toml(path)?,
            None => KMedoidsConfig::default(),
        };

        config.set_n_medoids(self.n_medoids);
        if let Some(verbosity) = self.verbosity {
            config.set_verbosity(verbosity);
        }
        if let Some(algorithm) = &self.algorithm {
            config.set_algorithm(algorithm.as_str());
        }
        if let Some(max_iter) = self.max_iter {
            config.set_max_iter(max_iter);
        }
        if let Some(log_file) = &self.log_file {
            config.set_log_filename(log_file.as_str());
        }
        if self.no_cache {
            config.set_cache(false);
        }
        Ok(config)
    }
}

/// Command-line usage errors, reported with exit status 1
#[derive(Error, Debug)]
pub enum UsageError {
    #[error("option needs a value")]
    MissingValue,

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("missing required option: {0}")]
    MissingOption(String),

    #[error("invalid value '{value}' for {option}")]
    InvalidValue { option: String, value: String },

    /// --help or --version output; not a failure
    #[error("{0}")]
    Informational(clap::Error),

    #[error("{0}")]
    Other(clap::Error),
}

impl UsageError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Informational(err) => err.exit_code(),
            _ => 1,
        }
    }
}

fn context(err: &clap::Error, kind: ContextKind) -> Option<String> {
    match err.get(kind)? {
        ContextValue::String(value) => Some(value.clone()),
        ContextValue::Strings(values) => Some(values.join(", ")),
        other => Some(other.to_string()),
    }
}

impl From<clap::Error> for UsageError {
    fn from(err: clap::Error) -> Self {
        let option = context(&err, ContextKind::InvalidArg).unwrap_or_default();
        let value = context(&err, ContextKind::InvalidValue).unwrap_or_default();

        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Self::Informational(err),
            ErrorKind::TooFewValues => Self::MissingValue,
            // clap reports an absent value as an empty invalid one
            ErrorKind::InvalidValue if value.is_empty() => Self::MissingValue,
            ErrorKind::InvalidValue | ErrorKind::ValueValidation => {
                Self::InvalidValue { option, value }
            }
            ErrorKind::UnknownArgument => {
                Self::UnknownOption(option.trim_start_matches('-').to_string())
            }
            ErrorKind::MissingRequiredArgument => Self::MissingOption(option),
            _ => Self::Other(err),
        }
    }
}

/// Parse command-line arguments, translating clap errors into [`UsageError`]
pub fn parse_args<I, T>(args: I) -> Result<Cli, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(UsageError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_required_flags() {
        let cli = Cli::parse_from(["banditpam", "-f", "points.csv", "-k", "3"]);
        assert_eq!(cli.file, PathBuf::from("points.csv"));
        assert_eq!(cli.n_medoids, 3);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["banditpam", "-f", "points.csv", "-k", "3"]);
        assert_eq!(cli.loss, "2");
        assert_eq!(cli.verbosity, None);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.no_cache);
        assert!(!cli.debug);

        let config = cli.engine_config().unwrap();
        assert_eq!(config.verbosity(), 0);
        assert_eq!(config.algorithm(), "BanditPAM");
    }

    #[test]
    fn test_cli_loss_is_normalized() {
        let cli = Cli::parse_from(["banditpam", "-f", "p.csv", "-k", "2", "-l", "L1"]);
        assert_eq!(cli.loss, "L1");
        assert_eq!(cli.normalized_loss(), "1");
    }

    #[test]
    fn test_cli_attached_values() {
        let cli = Cli::parse_from(["banditpam", "-fp.csv", "-k2", "-v1"]);
        assert_eq!(cli.file, PathBuf::from("p.csv"));
        assert_eq!(cli.n_medoids, 2);
        assert_eq!(cli.verbosity, Some(1));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "banditpam",
            "-f",
            "p.csv",
            "-k",
            "4",
            "-v",
            "2",
            "--algorithm",
            "naive",
            "--max-iter",
            "7",
            "--log-file",
            "run.log",
            "--no-cache",
        ]);
        let config = cli.engine_config().unwrap();
        assert_eq!(config.n_medoids(), 4);
        assert_eq!(config.verbosity(), 2);
        assert_eq!(config.algorithm(), "naive");
        assert_eq!(config.max_iter(), 7);
        assert_eq!(config.log_filename(), "run.log");
        assert!(!config.cache());
    }

    #[test]
    fn test_missing_value() {
        let err = parse_args(["banditpam", "-f", "p.csv", "-k"]).unwrap_err();
        assert!(matches!(err, UsageError::MissingValue));
        assert_eq!(err.to_string(), "option needs a value");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_value_before_next_flag() {
        let err = parse_args(["banditpam", "-f", "p.csv", "-k", "-v", "1"]).unwrap_err();
        assert!(matches!(err, UsageError::MissingValue));
    }

    #[test]
    fn test_unknown_option() {
        let err = parse_args(["banditpam", "-f", "p.csv", "-k", "2", "-z"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown option: z");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_k_fails_fast() {
        let err = parse_args(["banditpam", "-f", "p.csv"]).unwrap_err();
        assert!(matches!(err, UsageError::MissingOption(ref opt) if opt.contains("-k")));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_args(["banditpam", "-f", "p.csv", "-k", "three"]).unwrap_err();
        assert!(matches!(err, UsageError::InvalidValue { ref value, .. } if value == "three"));
    }

    #[test]
    fn test_help_is_informational() {
        let err = parse_args(["banditpam", "--help"]).unwrap_err();
        assert!(matches!(err, UsageError::Informational(_)));
        assert_eq!(err.exit_code(), 0);
    }
}
