//! Logging port
//!
//! Foundation services record failures only through [`LoggingPort`].

use std::error::Error as StdError;

/// Write-only sink for error, critical, informational and trace entries
pub trait LoggingPort: Send + Sync {
    /// Records a failure at error severity
    fn log_error(&self, error: &(dyn StdError + 'static));

    /// Records a failure at critical severity
    fn log_critical(&self, error: &(dyn StdError + 'static));

    /// Records an informational message
    fn log_information(&self, message: &str);

    /// Records a trace message
    fn log_trace(&self, message: &str);
}

/// [`LoggingPort`] that forwards entries to `tracing`
///
/// `tracing` has no critical level; critical entries are emitted at error
/// level with `severity = "critical"` so subscribers can filter on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLoggingBroker;

impl TracingLoggingBroker {
    pub fn new() -> Self {
        Self
    }
}

impl LoggingPort for TracingLoggingBroker {
    fn log_error(&self, error: &(dyn StdError + 'static)) {
        tracing::error!(severity = "error", error = %error, cause = ?error.source().map(|s| s.to_string()), "operation failed");
    }

    fn log_critical(&self, error: &(dyn StdError + 'static)) {
        tracing::error!(severity = "critical", error = %error, cause = ?error.source().map(|s| s.to_string()), "operation failed");
    }

    fn log_information(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn log_trace(&self, message: &str) {
        tracing::trace!("{}", message);
    }
}
