pub mod bench;
pub mod client;
pub mod configuration;
pub mod http;
pub mod session;

use std::fmt;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub struct SmokebenchError {
    pub reason: String,
}

impl SmokebenchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl fmt::Display for SmokebenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for SmokebenchError {}

/// Logs go to stderr so stdout carries only the tool output. `RUST_LOG` overrides the `warn` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
