//! Tracing/logging setup shared by the service binaries.

/// Tracing configuration (filters, formatters).
pub mod tracing;

pub use self::tracing::{LogFormat, ParseLogFormatError};

/// Initialize process-wide tracing from the environment.
///
/// Reads `RUST_LOG` for the filter and `CLIENTELE_LOG_FORMAT` for the output
/// format. Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
