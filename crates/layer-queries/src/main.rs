//! layer-queries CLI binary.

use layer_queries::cli::Cli;
use layer_queries::output;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Main entry point for the layer-queries CLI.
fn main() -> ExitCode {
    // Initialize tracing subscriber on stderr so `--json` output stays clean.
    // Can be controlled via RUST_LOG environment variable
    // Example: RUST_LOG=layer_queries=debug layer-queries list
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("layer_queries=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting layer-queries CLI");

    let cli = Cli::parse_args();
    if let Err(e) = cli.execute() {
        tracing::debug!(error = %e, "layer-queries CLI failed");
        output::print_error(&format!("Error: {e:#}"));
        return ExitCode::FAILURE;
    }

    tracing::debug!("layer-queries CLI completed successfully");
    ExitCode::SUCCESS
}
