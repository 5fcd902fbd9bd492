use std::sync::Once;

use tracing::Level;

static INIT: Once = Once::new();

/// Install the global fmt subscriber. Safe to call from multiple entry
/// points; only the first call does anything.
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    });
}
