//! CLI entry point for toolgate.

mod app;
mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Log filter variable checked before `RUST_LOG`.
const LOG_ENV: &str = "TOOLGATE_LOG";

fn init_tracing() {
    let filter = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    init_tracing();

    if let Err(e) = app::entry::run(args).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
