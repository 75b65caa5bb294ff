#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! Re-exports `tracing::debug!` when the `tracing` feature is enabled and
//! provides a no-op macro otherwise, so call sites compile either way.
//! The `tracing-json` feature adds [`init_json_subscriber`] for binaries.

#[cfg(feature = "tracing")]
pub use tracing::debug;

/// No-op debug macro when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

/// Default filter directive when the filter variable is unset or invalid.
#[cfg(feature = "tracing-json")]
pub const DEFAULT_FILTER: &str = "info";

/// Install a global JSON subscriber filtered by the `filter_env` variable.
///
/// Returns `false` when a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber(filter_env: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(filter_env)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(all(test, feature = "tracing-json"))]
mod tests {
    use super::*;

    #[test]
    fn second_install_reports_existing_subscriber() {
        let _ = init_json_subscriber("SKYPAL_TEST_LOG");
        assert!(!init_json_subscriber("SKYPAL_TEST_LOG"));
    }
}
