pub mod artifacts;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod encoder;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod model;
pub mod ranking;
pub mod server;
pub mod sessions;
pub mod signals;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// `RUST_LOG` takes precedence over `default_level`. Logs go to stderr so
/// command output on stdout stays clean.
///
/// Note: This function can only be called once.
pub fn init_tracing(default_level: &str, log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
