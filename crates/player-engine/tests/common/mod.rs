pub mod fake_media;

use std::sync::Once;

static INIT: Once = Once::new();

/// Route engine logs through the test harness.  RUST_LOG overrides.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "debug".into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
