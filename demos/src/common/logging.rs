//! Log output for the demo binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a `fmt` subscriber honouring `RUST_LOG`, falling back to `info`
/// (or `debug` when `verbose` is set) for the stylecrop crates.
pub fn init_tracing(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("stylecrop_burn={log_level},stylecrop_demos={log_level},raw_info={log_level},crop_dataset={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
