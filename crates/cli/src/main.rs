//! layered-hello - Greeting service configured from layered sources.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Load the hello configuration and print the greeting.
//!
//! Does NOT handle:
//! - Config source precedence or field resolution (see `crates/config`).
//!
//! Invariants:
//! - Logs go to stderr; stdout carries only the greeting output.
//! - Any load failure exits with status 1 after printing the error to stderr.

mod args;
mod config;
mod hello;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use config::LoadOptions;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn run(cli: Cli) -> anyhow::Result<()> {
    let opts = LoadOptions {
        config_dir: cli.config_dir,
        env_name: cli.env_name,
        dotenv_file: cli.dotenv,
    };
    let config = config::load_config(&opts).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            opts.config_dir.display()
        )
    })?;

    tracing::info!(
        port = config.server.port,
        idle_timeout = ?config.server.idle_timeout,
        read_header_timeout = ?config.server.read_header_timeout,
        read_timeout = ?config.server.read_timeout,
        write_timeout = ?config.server.write_timeout,
        "Server settings loaded"
    );

    let mut stdout = std::io::stdout().lock();
    hello::write_hello(&mut stdout, &config.hello, config.say_hello_times)
        .context("Failed to write greeting")?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
