//! Logging abstractions
//!
//! Library code logs through an injected `Arc<dyn Logger>` so embedders pick
//! the sink. `TracingLogger` forwards to the `tracing` ecosystem.

mod traits;
mod noop;
mod tracing_logger;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use tracing_logger::{TracingLogger, LOG_TARGET};
