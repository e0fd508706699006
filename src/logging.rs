//! Progress logging.
//!
//! Every phase of a run emits a `tracing` event; this module installs the
//! subscriber that renders them on stdout.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` when set. Otherwise shows this crate's events at `info`,
/// or `debug` when `verbose` is set (per-file copy lines, git stderr).
///
/// # Example
/// ```bash
/// RUST_LOG=rebrand_release=trace rebrand-release --skip-release-merge
/// ```
pub fn init(verbose: bool) {
    let default = if verbose {
        "rebrand_release=debug"
    } else {
        "rebrand_release=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout).with_target(false))
        .try_init();
}
