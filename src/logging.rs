use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Filter directives for a verbosity level (`-v` count)
pub fn filter_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info,rayon=warn",
        2 => "debug,rayon=warn",
        _ => "trace", // shows per-task events too
    }
}

/// Install a fmt subscriber for the engine's `tracing` events.
///
/// `RUST_LOG` wins over `verbose` when set. A second call returns an error
/// and leaves the first subscriber in place.
pub fn init_logging(verbose: u8) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
