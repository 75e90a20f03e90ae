//! Process-wide `tracing` subscriber for the retailpulse binaries.
//!
//! Events are JSON lines on stderr; stdout carries command output only.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::SystemTime;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Install the JSON subscriber. A second call leaves the first in place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(SystemTime)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        ::tracing::debug!("global subscriber already set");
    }
}
