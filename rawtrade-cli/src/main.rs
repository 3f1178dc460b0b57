use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod context;
mod error;
mod format;
mod prompt;
mod signer;
mod ui;

use config::CliConfig;
use format::print_error;

fn main() {
    let cli = cli::Cli::parse();

    let loaded = cli
        .config_path()
        .and_then(|path| CliConfig::load(&path).map(|config| (config, path)));
    let (config, config_path) = match loaded {
        Ok(v) => v,
        Err(e) => {
            print_error(&e.to_string(), e.hint());
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level. Logs go to stderr so they do
    // not mix with tables and --json output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            print_error(&format!("failed to start async runtime: {}", e), None);
            std::process::exit(1);
        }
    };
    rt.block_on(async {
        if let Err(e) = cli::run(cli, config, config_path).await {
            tracing::debug!(error = ?e, "command failed");
            print_error(&e.to_string(), e.hint());
            std::process::exit(1);
        }
    });
}
