//! # SketchFlow CLI
//!
//! Entry point for the `sketchflow` binary.

use clap::Parser;
use sketch_cli::{run, CliArgs, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with optional JSON output.
///
/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sketch_core=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // RUST_LOG_FORMAT=json for machine-readable logs
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = CliConfig::from(args);
    tracing::debug!("Data directory: {}", config.data_dir.display());

    let stdout = std::io::stdout();
    run(&config, &mut stdout.lock())
}
