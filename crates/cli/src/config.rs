//! Hello application configuration.
//!
//! Responsibilities:
//! - Define the typed configuration the application runs with.
//! - Register the config sources in priority order and build the config.
//!
//! Does NOT handle:
//! - Printing greetings (see `hello` module).
//!
//! Invariants / Assumptions:
//! - Source order: `default.json` < `<env>.json` < `<env>-user.json` < environment.
//! - `<env>-user.json` is optional; the other two files must exist.
//! - `PORT` overrides `server/port` and `HELLO_MESSAGE` overrides `hello/message`.

use std::path::PathBuf;
use std::time::Duration;

use layered_config::{EnvSource, JsonSource, LoadError, Loader, Resolver};

/// HTTP server settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub idle_timeout: Duration,
    pub read_header_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelloSection {
    pub message: String,
}

/// Root configuration of the hello application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelloConfig {
    pub say_hello_times: u32,
    pub server: ServerConfig,
    pub hello: HelloSection,
}

impl HelloConfig {
    fn define(r: &mut Resolver<'_>) -> Self {
        Self {
            say_hello_times: r.define("sayHelloTimes"),
            server: ServerConfig {
                port: r.define("server/port"),
                idle_timeout: r.define("server/idleTimeout"),
                read_header_timeout: r.define("server/readHeaderTimeout"),
                read_timeout: r.define("server/readTimeout"),
                write_timeout: r.define("server/writeTimeout"),
            },
            hello: HelloSection {
                message: r.define("hello/message"),
            },
        }
    }
}

/// Where configuration is read from.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub config_dir: PathBuf,
    pub env_name: String,
    pub dotenv_file: PathBuf,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("config"),
            env_name: "local".to_string(),
            dotenv_file: PathBuf::from(".env"),
        }
    }
}

/// Load the hello configuration.
///
/// # Errors
///
/// Returns `LoadError` if a required file is missing or malformed, or if any
/// field is missing or invalid.
pub fn load_config(opts: &LoadOptions) -> Result<HelloConfig, LoadError> {
    let env_name = &opts.env_name;
    tracing::debug!(
        config_dir = %opts.config_dir.display(),
        env_name = %env_name,
        "Loading hello configuration"
    );

    Loader::new()
        .with_source(JsonSource::builder("default.json").base_dir(&opts.config_dir))
        .with_source(JsonSource::builder(format!("{env_name}.json")).base_dir(&opts.config_dir))
        .with_source(
            JsonSource::builder(format!("{env_name}-user.json"))
                .base_dir(&opts.config_dir)
                .ignore_missing_file(),
        )
        .with_source(
            EnvSource::builder()
                .set("server/port")
                .from("PORT")
                .set("hello/message")
                .from("HELLO_MESSAGE")
                .dotenv_file(&opts.dotenv_file),
        )
        .load(HelloConfig::define)
}
