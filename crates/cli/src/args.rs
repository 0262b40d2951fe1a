//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not load configuration (see `config` module).

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "layered-hello")]
#[command(about = "Print a greeting configured from layered JSON files and the environment", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  layered-hello\n  layered-hello --env-name staging\n  PORT=9000 HELLO_MESSAGE='Hi there' layered-hello --config-dir ./config\n"
)]
pub struct Cli {
    /// Directory holding `default.json`, `<env>.json` and `<env>-user.json`
    #[arg(long, default_value = "config", value_name = "DIR")]
    pub config_dir: PathBuf,

    /// Environment name selecting the environment-specific config files
    #[arg(long, env = "APP_ENV", default_value = "local")]
    pub env_name: String,

    /// `.env` file consulted for variables missing from the process environment
    #[arg(long, default_value = ".env", value_name = "FILE")]
    pub dotenv: PathBuf,
}
