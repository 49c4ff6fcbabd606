//! Subscriber setup for hosts that want the core's `tracing` output.
//!
//! The library itself only emits events; installing a subscriber is left to
//! binaries and the ffi layer. `RUST_LOG` overrides the default filter.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info,scrollfight_core::player=warn";

static TRACING_INIT: Once = Once::new();

/// Install a compact fmt subscriber. First call wins; later calls are no-ops.
pub fn init_tracing(default_filter: &str) {
    let filter_str = default_filter.to_string();
    TRACING_INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact();

        // Another subscriber may already be installed by the host.
        let _ = subscriber.try_init();
    });
}

pub fn init_tracing_default() {
    init_tracing(DEFAULT_FILTER);
}

#[cfg(test)]
mod tests {
    use super::{init_tracing, init_tracing_default};

    #[test]
    fn init_is_idempotent() {
        init_tracing_default();
        init_tracing("debug");
        tracing::info!(target: "scrollfight_core::logging", "still alive");
    }
}
