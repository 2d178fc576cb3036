//! Logging setup for the test binaries.
//!
//! `RUST_LOG` wins when set; otherwise the shopcheck crates log at INFO.

use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str =
    "shopcheck_config=info,shopcheck_api=info,shopcheck_browser=info,shopcheck_pages=info";

/// Idempotent logger for test binaries.
///
/// Output goes through the test writer so it is captured per test and only
/// shown on failure.
pub fn init_test_logger() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(default_filter())
            .with(
                fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .compact(),
            )
            .try_init();
    });
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
