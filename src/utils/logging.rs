//! Diagnostic logging setup.
//!
//! Everything goes to stderr so `say` output on stdout stays clean for
//! piping. `RUST_LOG` overrides the filter; records emitted through the `log`
//! facade (actix-web's access log) are bridged into the same subscriber.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

/// Resolve the active filter, falling back to `fallback` when `RUST_LOG` is
/// unset. An unparsable `RUST_LOG` is reported and ignored.
pub fn resolve_filter(rust_log: Option<&str>, fallback: &str) -> EnvFilter {
    match rust_log.map(str::trim).filter(|value| !value.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives).unwrap_or_else(|err| {
            eprintln!("⚠️  Ignoring invalid RUST_LOG '{directives}' ({err}); using '{fallback}'");
            EnvFilter::new(fallback)
        }),
        None => EnvFilter::new(fallback),
    }
}

/// Install the global subscriber. Calling this twice is harmless; the second
/// call leaves the first subscriber in place.
pub fn init(fallback: &str) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = resolve_filter(rust_log.as_deref(), fallback);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
