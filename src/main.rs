use anyhow::{Context, Result};
use clap::Parser;
use passenger_eda::analysis::load_and_run;
use passenger_eda::cli::{Cli, OutputFormat};
use passenger_eda::dataset::CsvDirectorySource;
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
    let args = Cli::parse();
    init_tracing(args.debug);

    let config = args
        .analysis_config()
        .context("Failed to build analysis configuration")?;

    let source = CsvDirectorySource::new(&args.data_dir);
    let report = load_and_run(&source, &config).with_context(|| {
        format!(
            "Analysis of '{}' in dataset '{}' failed",
            config.attribute,
            source.path_for(&config.dataset).display()
        )
    })?;

    match args.format {
        OutputFormat::Text => print!("{}", report.to_report_string()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }

    Ok(())
}
