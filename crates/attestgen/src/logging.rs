//! Subscriber setup for the binary.

use tracing::Level;

/// Install a formatting subscriber capped at `level`. A no-op if one is
/// already installed.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
