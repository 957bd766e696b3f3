use anyhow::{Context, Result};
use banditpam::adapter;
use banditpam::cli::{self, OutputFormat, UsageError};
use banditpam::dataset::Dataset;
use banditpam::engine::{KMedoids, MedoidEngine};
use banditpam::output::{self, JsonReport};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = match cli::parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(UsageError::Informational(err)) => err.exit(),
        Err(err) => {
            println!("{}", err);
            std::process::exit(err.exit_code());
        }
    };

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = args.engine_config()?;
    let dataset = Dataset::from_file(&args.file)?;
    let loss = args.normalized_loss();

    let mut engine = KMedoids::new(config);
    let result = adapter::fit(&mut engine, &dataset, loss)
        .with_context(|| format!("Failed to fit {} medoids", engine.config().n_medoids()))?;

    match args.format {
        OutputFormat::Text => {
            print!("{}", output::text_summary(&result, engine.config().verbosity()));
        }
        OutputFormat::Json => {
            let report = JsonReport {
                loss,
                n: dataset.n_points(),
                d: dataset.n_dims(),
                result: &result,
            };
            println!("{}", report.to_json()?);
        }
    }

    Ok(())
}
