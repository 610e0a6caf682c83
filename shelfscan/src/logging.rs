//! Structured logging setup

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise shelfscan crates log at `debug` or
/// `info` depending on `debug`. Calling this more than once is harmless.
pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,shelfscan={lvl},shelfscan_media={lvl},shelfscan_lookup={lvl}",
            lvl = default_level
        ))
    });

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .try_init()
    {
        // A subscriber is already installed, by an earlier call or the host
        tracing::debug!("Logging already initialised: {}", e);
    }
}
