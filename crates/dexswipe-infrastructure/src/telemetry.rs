//! Tracing subscriber setup for hosts embedding the data layer.

use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_directive` (e.g.
/// `"dexswipe=info"`) is used. Calling this more than once is harmless: the
/// first subscriber stays installed and `false` is returned.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
