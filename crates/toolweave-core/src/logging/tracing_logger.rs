//! Logger backed by the `tracing` crate

use super::traits::Logger;

/// Target every event from this crate is emitted under
pub const LOG_TARGET: &str = "toolweave";

/// Forwards log lines to `tracing` events
///
/// Whatever subscriber the host installs (e.g. `tracing-subscriber` with an
/// `EnvFilter`) decides where they go.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: LOG_TARGET, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: LOG_TARGET, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: LOG_TARGET, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: LOG_TARGET, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use std::sync::Arc;

    #[test]
    fn test_loggers_do_not_panic_without_subscriber() {
        let loggers: Vec<Arc<dyn Logger>> = vec![Arc::new(TracingLogger::new()), Arc::new(NoOpLogger::new())];
        for logger in loggers {
            logger.debug("debug message");
            logger.info("info message");
            logger.warn("warn message");
            crate::log_error!(logger, "error {}", 42);
        }
    }
}
