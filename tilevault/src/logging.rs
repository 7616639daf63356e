//! Logging infrastructure
//!
//! Structured console logging for binaries built on this library,
//! configurable via the `RUST_LOG` environment variable. The library
//! itself only emits `tracing` events; initialization is explicit so
//! embedders can install their own subscriber instead.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize console logging.
///
/// Defaults to `info` when `RUST_LOG` is not set. Call at most once per
/// process; later calls return an error from the subscriber registry.
pub fn init_logging() -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
}
