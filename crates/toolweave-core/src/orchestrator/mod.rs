//! Conversation orchestration
//!
//! A query makes at most two model calls. The first sees the full tool
//! catalog; if it asks for tools, they are dispatched, their results are
//! added as system messages and a second call produces the answer, which
//! may be streamed.
//!
//! ```rust,ignore
//! let mut orchestrator = Orchestrator::new(connector, backend, OrchestratorConfig::default(), logger);
//! orchestrator.connect(&providers).await?;
//!
//! let outcome = orchestrator.process_query("What is the resolution of 1HR7?", &history).await?;
//! let answer = outcome.answer.into_text().await?;
//!
//! orchestrator.close().await;
//! ```

mod answer;
mod config;
mod prompt;
mod query;

pub use answer::{Answer, QueryOutcome, TextStream, ToolCallRecord};
pub use config::{OrchestratorConfig, DEFAULT_CLOSING_INSTRUCTION, DEFAULT_GUIDANCE, DEFAULT_HISTORY_WINDOW};
pub use prompt::history_window;
pub use query::Orchestrator;
