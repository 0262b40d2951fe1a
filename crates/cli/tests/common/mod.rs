//! Shared test utilities for layered-hello integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory.
//! - Write config fixtures into temporary directories.
//!
//! Invariants / Assumptions:
//! - `DOTENV_DISABLED=1` is set unless a test removes it explicitly.
//! - `PORT`, `HELLO_MESSAGE` and `APP_ENV` are cleared to avoid host leakage.

use assert_cmd::Command;
use std::path::Path;

pub const DEFAULT_JSON: &str = r#"{
    "sayHelloTimes": 1,
    "server": {
        "port": 8080,
        "idleTimeout": "2m",
        "readHeaderTimeout": "5s",
        "readTimeout": "10s",
        "writeTimeout": "10s"
    },
    "hello": {"message": "Hello, world!"}
}"#;

/// Returns a hermetic `layered-hello` command for integration testing.
pub fn hello_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("layered-hello");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("PORT")
        .env_remove("HELLO_MESSAGE")
        .env_remove("APP_ENV")
        .env_remove("RUST_LOG");

    cmd
}

pub fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}
