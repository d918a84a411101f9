use clap::Parser;
use miette::Result;
use pixelpress::cli::{Cli, Commands};
use pixelpress::output::{plural, Printer};
use pixelpress::PressError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelpress=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();

    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Compress(args) => {
            let report = pixelpress::cli::compress::run(args, &printer)?;
            if !report.is_clean() {
                return Err(PressError::Build {
                    message: format!(
                        "{} could not be processed",
                        plural(report.failures.len(), "item", "items")
                    ),
                    help: Some("Run with RUST_LOG=pixelpress=debug for details".to_string()),
                }
                .into());
            }
        }
        Commands::Fit(args) => {
            pixelpress::cli::fit::run(args, &printer)?;
        }
        Commands::Sheet(args) => {
            pixelpress::cli::sheet::run(args, &printer)?;
        }
        Commands::Init(args) => pixelpress::cli::init::run(args, &printer)?,
        Commands::Completions(args) => pixelpress::cli::completions::run(args)?,
    }

    Ok(())
}
