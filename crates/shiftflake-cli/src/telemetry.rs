//! Log output for the command-line front end.
//!
//! Events go to stderr so generated IDs on stdout stay pipeable. The filter
//! is read from `RUST_LOG` and defaults to `info`. Enabling `debug` shows the
//! generator's drift and rollback transitions.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
