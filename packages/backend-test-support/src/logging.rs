//! Test logging initialization shared by the backend's integration test binaries.
//!
//! Each test binary installs this through a `ctor` hook in `tests/common`, so
//! individual tests never have to call it themselves.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Default filter when neither `TEST_LOG` nor `RUST_LOG` is set.
const DEFAULT_TEST_FILTER: &str = "warn";

/// Resolve the filter directive: `TEST_LOG`, then `RUST_LOG`, then `warn`.
fn filter_directive() -> String {
    std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_TEST_FILTER.to_string())
}

/// Install a test-friendly subscriber once per process.
///
/// Output goes through the test writer so cargo captures it per test, and
/// timestamps are dropped to keep failing-test output diffable. Safe to call
/// any number of times; a subscriber installed elsewhere wins silently.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_new(filter_directive())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
