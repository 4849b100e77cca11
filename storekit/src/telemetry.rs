//! Tracing subscriber setup for binaries built on storekit.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a global subscriber: `RUST_LOG` filtering with a `storekit=info` default,
/// formatted to stderr.
///
/// Does nothing if a global subscriber is already set.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storekit=info,storekit_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
