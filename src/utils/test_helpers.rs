use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Installs a test-friendly tracing subscriber exactly once per process.
///
/// Output goes through the test writer so it only shows for failing tests;
/// `RUST_LOG` selects the level.
pub fn setup_test_logging() {
    LOGGING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Returns true when the current process runs as root (UID 0), where
/// permission bits do not stop directory listing.
#[cfg(test)]
#[inline]
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and no side effects.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
