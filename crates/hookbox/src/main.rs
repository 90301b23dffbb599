// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hookbox - a signed-webhook message inbox.
//!
//! This is the binary entry point for the Hookbox service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hookbox_config::HookboxConfig;

/// Hookbox - a signed-webhook message inbox.
#[derive(Parser, Debug)]
#[command(name = "hookbox", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the default search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP service (default).
    Serve,
    /// Load and validate configuration, then print a summary.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => hookbox_config::load_and_validate_path(path),
        None => hookbox_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            hookbox_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => {
            print!("{}", config_summary(&config));
        }
    }
}

/// Human-readable config summary with the secret redacted.
fn config_summary(config: &HookboxConfig) -> String {
    let secret = match &config.webhook.secret {
        Some(_) => "set (redacted)",
        None => "NOT SET (webhooks will be rejected)",
    };
    format!(
        "listen:    {}:{}\nsecret:    {}\ndatabase:  {} (wal={})\nlog:       {} ({:?})\n",
        config.server.host,
        config.server.port,
        secret,
        config.storage.resolved_path(),
        config.storage.wal_mode,
        config.log.level,
        config.log.format,
    )
}
